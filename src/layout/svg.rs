//! Scene to SVG serialization.
//!
//! Pure string building. The output never contains hyperlinks or external
//! references, so rasterizing it needs nothing but fonts.

use std::fmt::Write;

use crate::document::FontFamily;
use crate::theme::{Background, GradientDirection, Rgba};

use super::scene::{Line, Rect, Scene, SceneItem, TextRun};

/// Serialize a scene into a standalone SVG document.
pub fn to_svg(scene: &Scene) -> String {
    let mut out = String::with_capacity(4096 + scene.items.len() * 160);
    let _ = write!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" xml:space="preserve">"#,
        w = num(scene.width),
        h = num(scene.height),
    );

    out.push_str("<defs>");
    if let Background::Gradient { from, to, direction } = scene.background {
        let (x2, y2) = match direction {
            GradientDirection::ToRight => ("1", "0"),
            GradientDirection::ToBottomRight => ("1", "1"),
        };
        let _ = write!(
            out,
            r#"<linearGradient id="bg" x1="0" y1="0" x2="{x2}" y2="{y2}"><stop offset="0" {}/><stop offset="1" {}/></linearGradient>"#,
            stop_color(from),
            stop_color(to),
        );
    }
    let mut shadows = 0usize;
    for item in &scene.items {
        if let SceneItem::Rect(Rect {
            shadow: Some(shadow),
            ..
        }) = item
        {
            let _ = write!(
                out,
                r#"<filter id="shadow{shadows}" x="-20%" y="-20%" width="140%" height="160%"><feDropShadow dx="0" dy="{}" stdDeviation="{}" flood-color="{}" flood-opacity="{}"/></filter>"#,
                num(shadow.offset_y),
                num(shadow.blur / 2.0),
                shadow.color.to_hex_string(),
                num(shadow.color.alpha),
            );
            shadows += 1;
        }
    }
    out.push_str("</defs>");

    match scene.background {
        Background::Solid(color) => {
            let _ = write!(
                out,
                r#"<rect width="100%" height="100%" {}/>"#,
                paint("fill", color)
            );
        }
        Background::Gradient { .. } => {
            out.push_str(r#"<rect width="100%" height="100%" fill="url(#bg)"/>"#);
        }
    }

    let mut shadow_index = 0usize;
    for item in &scene.items {
        match item {
            SceneItem::Rect(rect) => {
                let filter = rect.shadow.map(|_| {
                    let id = shadow_index;
                    shadow_index += 1;
                    id
                });
                write_rect(&mut out, rect, filter);
            }
            SceneItem::Line(line) => write_line(&mut out, line),
            SceneItem::Text(run) => write_text(&mut out, run, scene),
        }
    }

    out.push_str("</svg>");
    out
}

fn write_rect(out: &mut String, rect: &Rect, filter: Option<usize>) {
    let radius = rect.radius.min(rect.height / 2.0).min(rect.width / 2.0);
    let _ = write!(
        out,
        r#"<rect x="{}" y="{}" width="{}" height="{}""#,
        num(rect.x),
        num(rect.y),
        num(rect.width),
        num(rect.height),
    );
    if radius > 0.0 {
        let _ = write!(out, r#" rx="{}""#, num(radius));
    }
    match rect.fill {
        Some(fill) => {
            let _ = write!(out, " {}", paint("fill", fill));
        }
        None => out.push_str(r#" fill="none""#),
    }
    if let Some(stroke) = rect.stroke {
        let _ = write!(
            out,
            r#" {} stroke-width="{}""#,
            paint("stroke", stroke),
            num(rect.stroke_width)
        );
    }
    if let Some(id) = filter {
        let _ = write!(out, r#" filter="url(#shadow{id})""#);
    }
    out.push_str("/>");
}

fn write_line(out: &mut String, line: &Line) {
    let _ = write!(
        out,
        r#"<line x1="{}" y1="{}" x2="{}" y2="{}" {} stroke-width="{}"/>"#,
        num(line.x1),
        num(line.y1),
        num(line.x2),
        num(line.y2),
        paint("stroke", line.color),
        num(line.width),
    );
}

fn write_text(out: &mut String, run: &TextRun, scene: &Scene) {
    let family = match run.font {
        FontFamily::Sans => &scene.sans_family,
        FontFamily::Mono => &scene.mono_family,
    };
    let _ = write!(
        out,
        r#"<text x="{}" y="{}" font-family="{}" font-size="{}" font-weight="{}""#,
        num(run.x),
        num(run.baseline),
        escape(family),
        num(run.size),
        run.weight,
    );
    if run.italic {
        out.push_str(r#" font-style="italic""#);
    }
    match (run.underline, run.strikethrough) {
        (true, true) => out.push_str(r#" text-decoration="underline line-through""#),
        (true, false) => out.push_str(r#" text-decoration="underline""#),
        (false, true) => out.push_str(r#" text-decoration="line-through""#),
        (false, false) => {}
    }
    let _ = write!(out, " {}>{}</text>", paint("fill", run.color), escape(&run.text));
}

fn paint(attr: &str, color: Rgba) -> String {
    if color.alpha >= 1.0 {
        format!(r#"{attr}="{}""#, color.to_hex_string())
    } else {
        format!(
            r#"{attr}="{}" {attr}-opacity="{}""#,
            color.to_hex_string(),
            num(color.alpha)
        )
    }
}

fn stop_color(color: Rgba) -> String {
    paint("stop-color", color)
}

/// Escape text for XML content and attribute values. Control characters
/// that XML 1.0 forbids are dropped.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            '\t' => out.push(' '),
            c if (c as u32) < 0x20 => {}
            c => out.push(c),
        }
    }
    out
}

/// Format a coordinate with at most two decimals.
fn num(value: f32) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    let text = format!("{rounded:.2}");
    let text = text.trim_end_matches('0').trim_end_matches('.');
    if text == "-0" {
        "0".to_string()
    } else {
        text.to_string()
    }
}
