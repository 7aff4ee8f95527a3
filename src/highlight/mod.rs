//! Syntax highlighting for code blocks.
//!
//! Uses syntect for highlighting with Sublime Text syntax definitions.
//! Exactly two palettes exist: one for dark themes and one for all others.

use std::path::Path;
use std::sync::OnceLock;

use syntect::easy::HighlightLines;
use syntect::highlighting::{FontStyle, Theme, ThemeSet};
use syntect::parsing::{SyntaxReference, SyntaxSet};
use syntect::util::LinesWithEndings;

use crate::document::{InlineColor, InlineSpan, InlineStyle};
use crate::theme::Palette;

const DARK_PREFERRED: &[&str] = &[
    "base16-ocean.dark",
    "base16-eighties.dark",
    "base16-mocha.dark",
    "Solarized (dark)",
];

const LIGHT_PREFERRED: &[&str] = &["InspiredGitHub", "base16-ocean.light", "Solarized (light)"];

/// Highlight `code` in `language` using the palette's theme.
///
/// Returns one span list per source line. When the language is missing or
/// unknown, every line is a single uncolored code span.
pub fn highlight_code(language: Option<&str>, code: &str, palette: Palette) -> Vec<Vec<InlineSpan>> {
    let Some(syntax) = language.and_then(find_syntax) else {
        return plain_lines(code);
    };

    let syntax_set = syntax_set();
    let mut highlighter = HighlightLines::new(syntax, theme(palette));
    let mut lines = Vec::new();
    for line in LinesWithEndings::from(code) {
        let Ok(ranges) = highlighter.highlight_line(line, syntax_set) else {
            tracing::debug!(language, "highlighting failed, falling back to plain text");
            return plain_lines(code);
        };
        let mut spans = Vec::new();
        for (style, text) in ranges {
            let text = text.trim_end_matches(['\n', '\r']);
            if text.is_empty() {
                continue;
            }
            let inline_style = InlineStyle {
                code: true,
                strong: style.font_style.contains(FontStyle::BOLD),
                emphasis: style.font_style.contains(FontStyle::ITALIC),
                fg: Some(InlineColor {
                    r: style.foreground.r,
                    g: style.foreground.g,
                    b: style.foreground.b,
                }),
                ..InlineStyle::default()
            };
            spans.push(InlineSpan::new(text.to_string(), inline_style));
        }
        lines.push(spans);
    }
    lines
}

/// Whether a fence language tag maps to a known grammar.
pub fn supports_language(language: &str) -> bool {
    find_syntax(language).is_some()
}

/// Background color of the palette's code theme.
pub fn code_background(palette: Palette) -> InlineColor {
    let fallback = match palette {
        Palette::Dark => InlineColor { r: 30, g: 30, b: 30 },
        Palette::Light => InlineColor {
            r: 246,
            g: 248,
            b: 250,
        },
    };
    theme(palette)
        .settings
        .background
        .map_or(fallback, |c| InlineColor {
            r: c.r,
            g: c.g,
            b: c.b,
        })
}

/// Default foreground of the palette's code theme, used for unhighlighted code.
pub fn code_foreground(palette: Palette) -> InlineColor {
    let fallback = match palette {
        Palette::Dark => InlineColor {
            r: 212,
            g: 212,
            b: 212,
        },
        Palette::Light => InlineColor {
            r: 36,
            g: 41,
            b: 46,
        },
    };
    theme(palette)
        .settings
        .foreground
        .map_or(fallback, |c| InlineColor {
            r: c.r,
            g: c.g,
            b: c.b,
        })
}

/// Fence tag for a source file, taken from its extension when a grammar
/// knows it.
///
/// Markdown and plain-text files return `None` so they render as markdown.
pub fn language_for_file(path: &Path) -> Option<String> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    if matches!(ext.as_str(), "md" | "markdown" | "mdown" | "mkd" | "txt") {
        return None;
    }
    let syntax = syntax_set().find_syntax_by_extension(&ext)?;
    if syntax.name == "Plain Text" {
        return None;
    }
    Some(ext)
}

fn find_syntax(language: &str) -> Option<&'static SyntaxReference> {
    let token = language.trim();
    if token.is_empty() {
        return None;
    }
    let syntax_set = syntax_set();
    syntax_set
        .find_syntax_by_token(token)
        .or_else(|| syntax_set.find_syntax_by_name(token))
        .or_else(|| syntax_set.find_syntax_by_token(&token.to_ascii_lowercase()))
        .or_else(|| alias(token).and_then(|alias| syntax_set.find_syntax_by_token(alias)))
        .filter(|syntax| syntax.name != "Plain Text")
}

// Common fence tags that the bundled grammars only know by extension.
fn alias(token: &str) -> Option<&'static str> {
    match token.to_ascii_lowercase().as_str() {
        "javascript" | "jsx" | "node" => Some("js"),
        "typescript" | "ts" | "tsx" => Some("js"),
        "shell" | "bash" | "zsh" | "console" => Some("sh"),
        "python3" | "py3" => Some("py"),
        "golang" => Some("go"),
        "c++" => Some("cpp"),
        "c#" | "csharp" => Some("cs"),
        "yml" => Some("yaml"),
        _ => None,
    }
}

fn plain_lines(code: &str) -> Vec<Vec<InlineSpan>> {
    code.lines()
        .map(|line| {
            let style = InlineStyle {
                code: true,
                ..InlineStyle::default()
            };
            vec![InlineSpan::new(line.to_string(), style)]
        })
        .collect()
}

fn syntax_set() -> &'static SyntaxSet {
    static SYNTAX_SET: OnceLock<SyntaxSet> = OnceLock::new();
    SYNTAX_SET.get_or_init(|| {
        let _span = tracing::debug_span!("highlight.syntax_set.load_defaults").entered();
        SyntaxSet::load_defaults_newlines()
    })
}

fn theme(palette: Palette) -> &'static Theme {
    static DARK: OnceLock<Theme> = OnceLock::new();
    static LIGHT: OnceLock<Theme> = OnceLock::new();
    let (cell, preferred) = match palette {
        Palette::Dark => (&DARK, DARK_PREFERRED),
        Palette::Light => (&LIGHT, LIGHT_PREFERRED),
    };
    cell.get_or_init(|| {
        let _span = tracing::debug_span!("highlight.theme.load_defaults", ?palette).entered();
        let theme_set = ThemeSet::load_defaults();
        for name in preferred {
            if let Some(theme) = theme_set.themes.get(*name) {
                return theme.clone();
            }
        }

        theme_set
            .themes
            .values()
            .next()
            .cloned()
            .unwrap_or_default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_highlight_rust_produces_colored_spans() {
        let code = "fn main() {\n    let x = 1;\n}\n";
        let lines = highlight_code(Some("rust"), code, Palette::Light);

        assert_eq!(lines.len(), 3);
        let has_color = lines.iter().flatten().any(|span| span.style().fg.is_some());
        assert!(has_color, "Expected at least one colored span for Rust");
    }

    #[test]
    fn test_highlight_javascript_tag_is_recognized() {
        assert!(supports_language("javascript"));
        let lines = highlight_code(Some("javascript"), "const a = 1;", Palette::Dark);
        assert!(lines.iter().flatten().any(|span| span.style().fg.is_some()));
    }

    #[test]
    fn test_highlight_unknown_language_falls_back_to_plain() {
        let code = "just text";
        let lines = highlight_code(Some("nope"), code, Palette::Light);

        assert_eq!(lines.len(), 1);
        let has_color = lines.iter().flatten().any(|span| span.style().fg.is_some());
        assert!(!has_color, "Unknown language should not colorize");
        assert!(!supports_language("nope"));
    }

    #[test]
    fn test_highlight_plain_code_sets_code_style() {
        let lines = highlight_code(None, "plain", Palette::Light);
        let spans = &lines[0];
        assert!(spans.iter().all(|span| span.style().code));
    }

    #[test]
    fn test_highlight_does_not_set_background_color() {
        let lines = highlight_code(Some("rust"), "fn main() {}", Palette::Dark);
        let has_bg = lines.iter().flatten().any(|span| span.style().bg.is_some());
        assert!(!has_bg, "Highlighting should not override background");
    }

    #[test]
    fn test_highlighted_text_has_no_newlines() {
        let lines = highlight_code(Some("rust"), "let a = 1;\nlet b = 2;\n", Palette::Light);
        assert!(
            lines
                .iter()
                .flatten()
                .all(|span| !span.text().contains('\n'))
        );
    }

    #[test]
    fn test_palettes_have_distinct_backgrounds() {
        assert_ne!(code_background(Palette::Dark), code_background(Palette::Light));
    }

    #[test]
    fn test_language_for_file_detects_rust() {
        assert_eq!(
            language_for_file(Path::new("main.RS")).as_deref(),
            Some("rs")
        );
        assert_eq!(language_for_file(Path::new("README.md")), None);
        assert_eq!(language_for_file(Path::new("notes")), None);
    }
}
