//! Per-element styling keyed by theme.
//!
//! One rule per element kind. All sizes are in CSS pixels at 1x.

use crate::highlight;
use crate::theme::{Rgba, Theme};

/// The element kinds the renderer styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    HeaderBand,
    HeaderTitle,
    HeaderAuthor,
    Heading(u8),
    Paragraph,
    List,
    BlockQuote,
    Rule,
    InlineCode,
    Link,
    CodeBlock,
    Table,
    TableHeader,
    TableCell,
    Image,
    FooterBand,
    BrandBadge,
    Watermark,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontFamily {
    Sans,
    Mono,
}

/// Resolved visual style for one element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElementStyle {
    /// Text color, opacity folded into alpha.
    pub color: Rgba,
    pub font: FontFamily,
    pub font_size: f32,
    pub weight: u16,
    pub italic: bool,
    pub uppercase: bool,
    pub underline: bool,
    pub line_height: f32,
    pub margin_top: f32,
    pub margin_bottom: f32,
    /// Horizontal padding inside the element box.
    pub padding_x: f32,
    /// Vertical padding inside the element box.
    pub padding_y: f32,
    /// Extra left indent for nested content (lists).
    pub indent: f32,
    pub fill: Option<Rgba>,
    pub border: Option<Rgba>,
    pub border_width: f32,
    pub radius: f32,
}

impl ElementStyle {
    fn text(color: Rgba, font_size: f32, line_height: f32) -> Self {
        Self {
            color,
            font: FontFamily::Sans,
            font_size,
            weight: 400,
            italic: false,
            uppercase: false,
            underline: false,
            line_height,
            margin_top: 0.0,
            margin_bottom: 0.0,
            padding_x: 0.0,
            padding_y: 0.0,
            indent: 0.0,
            fill: None,
            border: None,
            border_width: 0.0,
            radius: 0.0,
        }
    }

    /// Bold text is anything at weight 600 or above.
    pub const fn is_bold(&self) -> bool {
        self.weight >= 600
    }
}

/// Scale a color's existing alpha by `opacity`.
pub const fn fade(color: Rgba, opacity: f32) -> Rgba {
    color.with_alpha(color.alpha * opacity)
}

/// Resolve the style for `kind` under `theme`.
pub fn style_for(theme: &Theme, kind: ElementKind) -> ElementStyle {
    let text = theme.text;
    let accent = theme.accent;
    let tint = theme.tint();

    match kind {
        ElementKind::HeaderBand => ElementStyle {
            padding_x: 32.0,
            padding_y: 24.0,
            border: Some(accent),
            border_width: 1.0,
            ..ElementStyle::text(text, 18.0, 28.0)
        },
        ElementKind::HeaderTitle => ElementStyle {
            weight: 700,
            ..ElementStyle::text(text, 18.0, 28.0)
        },
        ElementKind::HeaderAuthor => ElementStyle {
            weight: 500,
            ..ElementStyle::text(fade(text, 0.6), 14.0, 20.0)
        },
        ElementKind::Heading(level) => {
            let (size, weight, line_height, top, bottom) = match level {
                1 => (24.0, 800, 32.0, 8.0, 16.0),
                2 => (20.0, 700, 28.0, 24.0, 12.0),
                3 => (18.0, 600, 28.0, 16.0, 8.0),
                _ => (16.0, 600, 24.0, 16.0, 8.0),
            };
            ElementStyle {
                weight,
                margin_top: top,
                margin_bottom: bottom,
                ..ElementStyle::text(text, size, line_height)
            }
        }
        ElementKind::Paragraph => ElementStyle {
            margin_bottom: 12.0,
            ..ElementStyle::text(fade(text, 0.9), 16.0, 28.0)
        },
        ElementKind::List => ElementStyle {
            margin_bottom: 12.0,
            indent: 20.0,
            // space-y-1 between items
            padding_y: 4.0,
            ..ElementStyle::text(fade(text, 0.9), 16.0, 24.0)
        },
        ElementKind::BlockQuote => ElementStyle {
            italic: true,
            margin_top: 16.0,
            margin_bottom: 16.0,
            padding_x: 16.0,
            padding_y: 4.0,
            fill: Some(tint),
            border: Some(accent),
            border_width: 4.0,
            radius: 4.0,
            ..ElementStyle::text(fade(text, 0.8), 16.0, 28.0)
        },
        ElementKind::Rule => ElementStyle {
            margin_top: 24.0,
            margin_bottom: 24.0,
            border: Some(fade(accent, 0.3)),
            border_width: 1.0,
            ..ElementStyle::text(text, 16.0, 1.0)
        },
        ElementKind::InlineCode => ElementStyle {
            font: FontFamily::Mono,
            weight: 500,
            padding_x: 4.0,
            fill: Some(tint),
            radius: 4.0,
            ..ElementStyle::text(text, 13.6, 28.0)
        },
        ElementKind::Link => ElementStyle {
            underline: true,
            ..ElementStyle::text(fade(text, 0.8), 16.0, 28.0)
        },
        ElementKind::CodeBlock => {
            let palette = theme.palette();
            let bg = highlight::code_background(palette);
            let fg = highlight::code_foreground(palette);
            ElementStyle {
                font: FontFamily::Mono,
                margin_top: 16.0,
                margin_bottom: 16.0,
                padding_x: 16.0,
                padding_y: 16.0,
                fill: Some(Rgba {
                    r: bg.r,
                    g: bg.g,
                    b: bg.b,
                    alpha: 1.0,
                }),
                border: Some(Rgba::BLACK.with_alpha(0.05)),
                border_width: 1.0,
                radius: 6.0,
                ..ElementStyle::text(
                    Rgba {
                        r: fg.r,
                        g: fg.g,
                        b: fg.b,
                        alpha: 1.0,
                    },
                    13.6,
                    20.4,
                )
            }
        }
        ElementKind::Table => ElementStyle {
            margin_top: 16.0,
            margin_bottom: 16.0,
            border: Some(fade(accent, 0.5)),
            border_width: 1.0,
            radius: 4.0,
            ..ElementStyle::text(text, 14.0, 20.0)
        },
        ElementKind::TableHeader => ElementStyle {
            weight: 600,
            uppercase: true,
            padding_x: 12.0,
            padding_y: 8.0,
            fill: Some(tint),
            ..ElementStyle::text(text, 12.0, 16.0)
        },
        ElementKind::TableCell => ElementStyle {
            padding_x: 12.0,
            padding_y: 8.0,
            border: Some(accent),
            border_width: 1.0,
            ..ElementStyle::text(fade(text, 0.9), 14.0, 20.0)
        },
        ElementKind::Image => ElementStyle {
            italic: true,
            margin_bottom: 12.0,
            ..ElementStyle::text(fade(text, 0.6), 14.0, 24.0)
        },
        ElementKind::FooterBand => ElementStyle {
            padding_x: 32.0,
            padding_y: 16.0,
            border: Some(accent),
            border_width: 1.0,
            ..ElementStyle::text(text, 10.0, 16.0)
        },
        ElementKind::BrandBadge => ElementStyle {
            weight: 700,
            uppercase: true,
            padding_x: 10.0,
            padding_y: 4.0,
            fill: Some(tint),
            radius: 999.0,
            ..ElementStyle::text(text, 10.0, 16.0)
        },
        ElementKind::Watermark => ElementStyle {
            font: FontFamily::Mono,
            weight: 500,
            uppercase: true,
            ..ElementStyle::text(fade(text, 0.4), 10.0, 16.0)
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::{self, ThemeId};

    #[test]
    fn test_heading_sizes_step_down() {
        let theme = theme::default_theme();
        let h1 = style_for(theme, ElementKind::Heading(1));
        let h2 = style_for(theme, ElementKind::Heading(2));
        let h3 = style_for(theme, ElementKind::Heading(3));
        let h6 = style_for(theme, ElementKind::Heading(6));
        assert!(h1.font_size > h2.font_size);
        assert!(h2.font_size > h3.font_size);
        assert!(h3.font_size > h6.font_size);
        assert_eq!(h1.weight, 800);
    }

    #[test]
    fn test_paragraph_uses_theme_text_at_ninety_percent() {
        let theme = ThemeId::Dark.theme();
        let style = style_for(theme, ElementKind::Paragraph);
        assert_eq!(style.color.r, theme.text.r);
        assert!((style.color.alpha - 0.9).abs() < f32::EPSILON);
    }

    #[test]
    fn test_code_block_background_follows_palette() {
        let light = style_for(ThemeId::Light.theme(), ElementKind::CodeBlock);
        let nature = style_for(ThemeId::Nature.theme(), ElementKind::CodeBlock);
        let midnight = style_for(ThemeId::Midnight.theme(), ElementKind::CodeBlock);
        assert_eq!(light.fill, nature.fill);
        assert_ne!(light.fill, midnight.fill);
        assert_eq!(light.font, FontFamily::Mono);
    }

    #[test]
    fn test_fade_multiplies_existing_alpha() {
        let accent = ThemeId::Midnight.theme().accent;
        let faded = fade(accent, 0.5);
        assert!((faded.alpha - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_quote_and_badge_use_theme_tint() {
        let theme = ThemeId::Midnight.theme();
        assert_eq!(style_for(theme, ElementKind::BlockQuote).fill, Some(theme.tint()));
        assert_eq!(style_for(theme, ElementKind::BrandBadge).fill, Some(theme.tint()));
    }
}
