//! Terminal colors for the preview.
//!
//! The preview uses the same resolved element styles as the exported image,
//! mapped onto terminal colors. Terminals without truecolor get the nearest
//! xterm-256 cube entry.

use ratatui::style::{Color, Modifier, Style};

use crate::document::{ElementStyle, InlineColor, InlineStyle};
use crate::theme::{Background, Rgba, Theme};

/// Map a theme color onto the terminal palette.
///
/// Translucent colors are blended over `under` first, since terminal cells
/// have no alpha channel.
pub fn color(rgba: Rgba, under: Rgba) -> Color {
    let blended = blend(rgba, under);
    terminal_color(blended.r, blended.g, blended.b)
}

/// Style for text of an element printed on the theme's paper.
pub fn element_style(element: &ElementStyle, theme: &Theme) -> Style {
    let paper = theme.paper.fill;
    let mut style = Style::default().fg(color(element.color, paper));
    if let Some(fill) = element.fill {
        style = style.bg(color(fill, paper));
    }
    if element.is_bold() {
        style = style.add_modifier(Modifier::BOLD);
    }
    if element.italic {
        style = style.add_modifier(Modifier::ITALIC);
    }
    if element.underline {
        style = style.add_modifier(Modifier::UNDERLINED);
    }
    style
}

/// Get the style for an inline span, merged with a base element style.
pub fn style_for_inline(base: Style, inline: InlineStyle) -> Style {
    let mut style = base;

    if let Some(fg) = inline.fg {
        style = style.fg(inline_color(fg));
    }
    if let Some(bg) = inline.bg {
        style = style.bg(inline_color(bg));
    }

    if inline.emphasis {
        style = style.add_modifier(Modifier::ITALIC);
    }
    if inline.strong {
        style = style.add_modifier(Modifier::BOLD);
    }
    if inline.strikethrough {
        style = style.add_modifier(Modifier::CROSSED_OUT);
    }
    if inline.link {
        style = style.add_modifier(Modifier::UNDERLINED);
    }
    style
}

/// The paper fill used as the preview background.
pub fn paper_style(theme: &Theme) -> Style {
    let paper = theme.paper.fill;
    Style::default()
        .bg(color(paper, canvas_base(theme)))
        .fg(color(theme.text, paper))
}

/// Style for the margin around the paper, approximating gradients by their
/// first stop.
pub fn canvas_style(theme: &Theme) -> Style {
    Style::default().bg(color(canvas_base(theme), Rgba::WHITE))
}

const fn canvas_base(theme: &Theme) -> Rgba {
    match theme.background {
        Background::Solid(fill) => fill,
        Background::Gradient { from, .. } => from,
    }
}

fn inline_color(c: InlineColor) -> Color {
    terminal_color(c.r, c.g, c.b)
}

fn terminal_color(r: u8, g: u8, b: u8) -> Color {
    if supports_truecolor() {
        Color::Rgb(r, g, b)
    } else {
        Color::Indexed(rgb_to_xterm_256(r, g, b))
    }
}

fn blend(top: Rgba, under: Rgba) -> Rgba {
    let alpha = top.alpha.clamp(0.0, 1.0);
    if alpha >= 1.0 {
        return top;
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let mix = |a: u8, b: u8| {
        (f32::from(a) * alpha + f32::from(b) * (1.0 - alpha)).round() as u8
    };
    Rgba {
        r: mix(top.r, under.r),
        g: mix(top.g, under.g),
        b: mix(top.b, under.b),
        alpha: 1.0,
    }
}

fn supports_truecolor() -> bool {
    if let Ok(force) = std::env::var("AI_SHARE_TRUECOLOR") {
        let value = force.to_ascii_lowercase();
        return matches!(value.as_str(), "1" | "true" | "yes" | "on");
    }
    supports_truecolor_from_env(
        std::env::var("COLORTERM").ok().as_deref(),
        std::env::var("TERM").ok().as_deref(),
    )
}

fn supports_truecolor_from_env(colorterm: Option<&str>, term: Option<&str>) -> bool {
    if let Some(ct) = colorterm {
        let lower = ct.to_ascii_lowercase();
        if lower.contains("truecolor") || lower.contains("24bit") {
            return true;
        }
    }
    if let Some(t) = term {
        let lower = t.to_ascii_lowercase();
        if lower.contains("direct") || lower.contains("truecolor") {
            return true;
        }
    }
    false
}

fn rgb_to_xterm_256(r: u8, g: u8, b: u8) -> u8 {
    // Result is always 0-5, fits in u8
    #[allow(clippy::cast_possible_truncation)]
    let to_cube = |v: u8| ((u16::from(v) * 5) / 255) as u8;
    16 + (36 * to_cube(r)) + (6 * to_cube(g)) + to_cube(b)
}
