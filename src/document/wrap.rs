//! Greedy line wrapping over styled spans.
//!
//! The same routine drives both pixel layout for export and column layout
//! for the terminal preview; only the measure function differs.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use super::markdown::HARD_BREAK;
use super::types::{InlineSpan, InlineStyle};

/// Width of a run of text in some unit (pixels or columns).
pub trait Measure {
    fn measure(&self, text: &str, style: InlineStyle) -> f32;
}

impl<F> Measure for F
where
    F: Fn(&str, InlineStyle) -> f32,
{
    fn measure(&self, text: &str, style: InlineStyle) -> f32 {
        self(text, style)
    }
}

/// Terminal display columns.
pub struct Columns;

impl Measure for Columns {
    fn measure(&self, text: &str, _style: InlineStyle) -> f32 {
        UnicodeWidthStr::width(text) as f32
    }
}

/// Wrap spans to `max_width`, breaking on whitespace and around wide (CJK)
/// characters. A token wider than a whole line is split by characters.
/// Leading whitespace on wrapped lines is dropped. A [`HARD_BREAK`] span
/// always ends the current line.
pub fn wrap_spans(spans: &[InlineSpan], max_width: f32, measure: &impl Measure) -> Vec<Vec<InlineSpan>> {
    let mut tokens: Vec<InlineSpan> = Vec::new();
    for span in spans {
        tokens.extend(split_inline_tokens(span));
    }
    if tokens.is_empty() {
        return Vec::new();
    }

    let mut lines: Vec<Vec<InlineSpan>> = Vec::new();
    let mut current: Vec<InlineSpan> = Vec::new();
    let mut current_width = 0.0_f32;
    let mut has_word = false;

    for token in tokens {
        if token.text() == HARD_BREAK {
            lines.push(finish_line(std::mem::take(&mut current)));
            current_width = 0.0;
            has_word = false;
            continue;
        }

        let token_is_ws = token.text().chars().all(char::is_whitespace);
        let token_width = measure.measure(token.text(), token.style());

        if has_word && current_width + token_width > max_width {
            lines.push(finish_line(std::mem::take(&mut current)));
            current_width = 0.0;
            has_word = false;
        }

        if token_is_ws && !has_word {
            continue;
        }

        if !token_is_ws && token_width > max_width {
            for piece in split_by_chars(&token, max_width, measure, current_width) {
                let piece_width = measure.measure(piece.text(), piece.style());
                if has_word && current_width + piece_width > max_width {
                    lines.push(finish_line(std::mem::take(&mut current)));
                    current_width = 0.0;
                }
                current_width += piece_width;
                current.push(piece);
                has_word = true;
            }
            continue;
        }

        current_width += token_width;
        current.push(token);
        has_word = true;
    }

    if !current.is_empty() {
        lines.push(finish_line(current));
    }
    lines
}

/// Wrap spans purely by characters, keeping all whitespace. Used for code.
pub fn wrap_chars(spans: &[InlineSpan], max_width: f32, measure: &impl Measure) -> Vec<Vec<InlineSpan>> {
    let mut lines: Vec<Vec<InlineSpan>> = Vec::new();
    let mut current: Vec<InlineSpan> = Vec::new();
    let mut current_width = 0.0_f32;

    for span in spans {
        let mut buf = String::new();
        for ch in span.text().chars() {
            let mut tmp = [0u8; 4];
            let ch_width = measure.measure(ch.encode_utf8(&mut tmp), span.style());
            if current_width + ch_width > max_width && (current_width > 0.0) {
                if !buf.is_empty() {
                    current.push(InlineSpan::new(std::mem::take(&mut buf), span.style()));
                }
                lines.push(std::mem::take(&mut current));
                current_width = 0.0;
            }
            buf.push(ch);
            current_width += ch_width;
        }
        if !buf.is_empty() {
            current.push(InlineSpan::new(buf, span.style()));
        }
    }

    lines.push(current);
    lines
}

// Trim trailing whitespace tokens and merge neighbours with the same style.
fn finish_line(mut line: Vec<InlineSpan>) -> Vec<InlineSpan> {
    while line
        .last()
        .is_some_and(|span| span.text().chars().all(char::is_whitespace))
    {
        line.pop();
    }
    merge_adjacent(line)
}

fn merge_adjacent(line: Vec<InlineSpan>) -> Vec<InlineSpan> {
    let mut out: Vec<InlineSpan> = Vec::with_capacity(line.len());
    for span in line {
        match out.last_mut() {
            Some(last) if last.style() == span.style() => {
                let text = format!("{}{}", last.text(), span.text());
                *last = InlineSpan::new(text, span.style());
            }
            _ => out.push(span),
        }
    }
    out
}

fn split_by_chars(
    token: &InlineSpan,
    max_width: f32,
    measure: &impl Measure,
    used: f32,
) -> Vec<InlineSpan> {
    let mut out = Vec::new();
    let mut buf = String::new();
    let mut width = used;
    for ch in token.text().chars() {
        let mut tmp = [0u8; 4];
        let ch_width = measure.measure(ch.encode_utf8(&mut tmp), token.style());
        if width + ch_width > max_width && !buf.is_empty() {
            out.push(InlineSpan::new(std::mem::take(&mut buf), token.style()));
            width = 0.0;
        }
        buf.push(ch);
        width += ch_width;
    }
    if !buf.is_empty() {
        out.push(InlineSpan::new(buf, token.style()));
    }
    out
}

/// Split a span into whitespace runs, word runs, and single wide characters.
fn split_inline_tokens(span: &InlineSpan) -> Vec<InlineSpan> {
    #[derive(PartialEq, Eq, Clone, Copy)]
    enum Class {
        Break,
        Space,
        Word,
        Wide,
    }

    let classify = |ch: char| {
        if ch == '\n' {
            Class::Break
        } else if ch.is_whitespace() {
            Class::Space
        } else if ch.width().unwrap_or(0) >= 2 {
            Class::Wide
        } else {
            Class::Word
        }
    };

    let mut out = Vec::new();
    let mut buf = String::new();
    let mut state: Option<Class> = None;

    for ch in span.text().chars() {
        let class = classify(ch);
        let continues = state == Some(class) && !matches!(class, Class::Wide | Class::Break);
        if !continues && !buf.is_empty() {
            out.push(InlineSpan::new(std::mem::take(&mut buf), span.style()));
        }
        buf.push(ch);
        state = Some(class);
    }

    if !buf.is_empty() {
        out.push(InlineSpan::new(buf, span.style()));
    }

    out
}
