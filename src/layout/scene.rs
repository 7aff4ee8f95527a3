//! Positioned drawing primitives produced by layout.

use crate::document::FontFamily;
use crate::theme::{Background, Rgba, Shadow};

/// A fully laid-out image, in CSS pixels at 1x.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub width: f32,
    pub height: f32,
    pub background: Background,
    pub sans_family: String,
    pub mono_family: String,
    pub items: Vec<SceneItem>,
}

impl Scene {
    /// Text runs in paint order.
    pub fn texts(&self) -> impl Iterator<Item = &TextRun> {
        self.items.iter().filter_map(|item| match item {
            SceneItem::Text(run) => Some(run),
            _ => None,
        })
    }

    /// All painted text joined with spaces, in paint order.
    pub fn plain_text(&self) -> String {
        self.texts()
            .map(|run| run.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub const fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    pub(crate) fn translate(&mut self, dx: f32, dy: f32) {
        for item in &mut self.items {
            item.translate(dx, dy);
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SceneItem {
    Rect(Rect),
    Line(Line),
    Text(TextRun),
}

impl SceneItem {
    pub(crate) fn translate(&mut self, dx: f32, dy: f32) {
        match self {
            Self::Rect(rect) => {
                rect.x += dx;
                rect.y += dy;
            }
            Self::Line(line) => {
                line.x1 += dx;
                line.x2 += dx;
                line.y1 += dy;
                line.y2 += dy;
            }
            Self::Text(run) => {
                run.x += dx;
                run.baseline += dy;
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub radius: f32,
    pub fill: Option<Rgba>,
    pub stroke: Option<Rgba>,
    pub stroke_width: f32,
    pub shadow: Option<Shadow>,
}

impl Rect {
    pub const fn filled(x: f32, y: f32, width: f32, height: f32, fill: Rgba) -> Self {
        Self {
            x,
            y,
            width,
            height,
            radius: 0.0,
            fill: Some(fill),
            stroke: None,
            stroke_width: 0.0,
            shadow: None,
        }
    }

    #[must_use]
    pub const fn rounded(mut self, radius: f32) -> Self {
        self.radius = radius;
        self
    }

    #[must_use]
    pub const fn stroked(mut self, color: Rgba, width: f32) -> Self {
        self.stroke = Some(color);
        self.stroke_width = width;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
    pub color: Rgba,
    pub width: f32,
}

/// A single-style run of text positioned by its baseline.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub x: f32,
    pub baseline: f32,
    pub text: String,
    pub font: FontFamily,
    pub size: f32,
    pub weight: u16,
    pub italic: bool,
    pub underline: bool,
    pub strikethrough: bool,
    pub color: Rgba,
}
