//! Terminal rendition of a [`Document`].
//!
//! The preview shows the same blocks the image export draws, laid out in
//! terminal columns instead of pixels. Lines are rebuilt for the pane width
//! on every frame.

use ratatui::prelude::*;
use unicode_width::UnicodeWidthStr;

use crate::document::wrap::{Columns, wrap_chars, wrap_spans};
use crate::document::{Alignment, Block, Document, InlineSpan, List, Table};
use crate::theme::Theme;

use super::style::{element_style, style_for_inline};

/// Columns between the pane edge and the paper content.
pub const PREVIEW_PADDING: u16 = 2;

/// Lay out `doc` for a pane `width` columns wide.
pub fn preview_lines(doc: &Document, width: u16) -> Vec<Line<'static>> {
    let theme = doc.theme().theme();
    let inner = usize::from(width.saturating_sub(PREVIEW_PADDING * 2)).max(8);
    let mut out = Vec::new();

    if let Some(header) = doc.header() {
        if let Some(title) = &header.title {
            out.push(Line::styled(title.clone(), element_style(&header.title_style, theme)));
        }
        if let Some(author) = &header.author {
            out.push(Line::styled(
                author.clone(),
                element_style(&header.author_style, theme),
            ));
        }
        out.push(rule(inner, element_style(&header.band_style, theme)));
        out.push(Line::default());
    }

    render_blocks(doc.blocks(), inner, theme, &mut out);

    let footer = doc.footer();
    out.push(Line::default());
    out.push(rule(inner, element_style(&footer.band_style, theme)));
    let badge = footer.badge.as_ref().map_or_else(String::new, |badge| {
        badge
            .glyph
            .map_or_else(|| badge.label.clone(), |glyph| format!("{glyph} {}", badge.label))
    });
    let gap = inner
        .saturating_sub(badge.width() + footer.watermark.width())
        .max(1);
    out.push(Line::from(vec![
        Span::styled(badge, element_style(&footer.badge_style, theme)),
        Span::raw(" ".repeat(gap)),
        Span::styled(
            footer.watermark.to_string(),
            element_style(&footer.watermark_style, theme),
        ),
    ]));
    out
}

fn render_blocks(blocks: &[Block], width: usize, theme: &Theme, out: &mut Vec<Line<'static>>) {
    for (idx, block) in blocks.iter().enumerate() {
        if idx > 0 {
            out.push(Line::default());
        }
        render_block(block, width, theme, out);
    }
}

fn render_block(block: &Block, width: usize, theme: &Theme, out: &mut Vec<Line<'static>>) {
    match block {
        Block::Heading { spans, style, .. } | Block::Paragraph { spans, style } => {
            push_wrapped(spans, width, element_style(style, theme), out);
        }
        Block::List(list) => render_list(list, width, theme, out),
        Block::BlockQuote { blocks, style } => {
            let bar = element_style(style, theme);
            let mut inner = Vec::new();
            render_blocks(blocks, width.saturating_sub(2).max(1), theme, &mut inner);
            out.extend(prefixed(inner, Span::styled("│ ", bar), Span::styled("│ ", bar)));
        }
        Block::Rule { style } => out.push(rule(width, element_style(style, theme))),
        Block::Code(code) => {
            let base = element_style(&code.style, theme);
            if let Some(language) = &code.language {
                out.push(Line::styled(format!(" {language}"), base));
            }
            let body = width.saturating_sub(2).max(1);
            for source_line in &code.lines {
                for wrapped in wrap_chars(source_line, body as f32, &Columns) {
                    let used: usize = wrapped.iter().map(|span| span.text().width()).sum();
                    let mut spans = vec![Span::styled(" ", base)];
                    spans.extend(styled(&wrapped, base));
                    spans.push(Span::styled(" ".repeat(width.saturating_sub(used + 1)), base));
                    out.push(Line::from(spans));
                }
            }
        }
        Block::Table(table) => render_table(table, width, theme, out),
        Block::Image { alt, style, .. } => {
            let label = if alt.is_empty() { "图片".to_string() } else { alt.clone() };
            out.push(Line::styled(
                truncate(&format!("[{label}]"), width),
                element_style(style, theme),
            ));
        }
    }
}

fn render_list(list: &List, width: usize, theme: &Theme, out: &mut Vec<Line<'static>>) {
    let base = element_style(&list.style, theme);
    for (idx, item) in list.items.iter().enumerate() {
        let mut marker = list
            .start
            .map_or_else(|| "• ".to_string(), |start| format!("{}. ", start + idx));
        if let Some(checked) = item.task {
            marker.push_str(if checked { "[x] " } else { "[ ] " });
        }
        let indent = marker.width();
        let mut inner = Vec::new();
        render_blocks(&item.blocks, width.saturating_sub(indent).max(1), theme, &mut inner);
        if inner.is_empty() {
            inner.push(Line::default());
        }
        out.extend(prefixed(
            inner,
            Span::styled(marker, base),
            Span::raw(" ".repeat(indent)),
        ));
    }
}

fn render_table(table: &Table, width: usize, theme: &Theme, out: &mut Vec<Line<'static>>) {
    let columns = table.column_count();
    if columns == 0 {
        return;
    }
    let border = element_style(&table.style, theme);
    let header_style = element_style(&table.header_style, theme);
    let cell_style = element_style(&table.cell_style, theme);

    let cell_text = |row: &[Vec<InlineSpan>], col: usize| {
        row.get(col)
            .map(|cell| crate::document::spans_to_string(cell))
            .unwrap_or_default()
    };

    let mut widths = vec![1usize; columns];
    for row in std::iter::once(&table.header).chain(&table.rows) {
        for (col, slot) in widths.iter_mut().enumerate() {
            *slot = (*slot).max(cell_text(row, col).width());
        }
    }
    // Each column costs its text plus " │ " separators.
    let budget = width.saturating_sub(3 * columns + 1);
    let total: usize = widths.iter().sum();
    if total > budget {
        let cap = (budget / columns).max(1);
        for slot in &mut widths {
            *slot = (*slot).min(cap);
        }
    }

    let render_row = |row: &[Vec<InlineSpan>], style: Style| {
        let mut spans = vec![Span::styled("│", border)];
        for (col, &col_width) in widths.iter().enumerate() {
            let text = truncate(&cell_text(row, col), col_width);
            let alignment = table.alignments.get(col).copied().unwrap_or(Alignment::None);
            spans.push(Span::styled(format!(" {} ", pad(&text, col_width, alignment)), style));
            spans.push(Span::styled("│", border));
        }
        Line::from(spans)
    };

    out.push(render_row(&table.header, header_style));
    let separator: Vec<String> = widths.iter().map(|w| "─".repeat(w + 2)).collect();
    out.push(Line::styled(format!("├{}┤", separator.join("┼")), border));
    for row in &table.rows {
        out.push(render_row(row, cell_style));
    }
}

fn push_wrapped(spans: &[InlineSpan], width: usize, base: Style, out: &mut Vec<Line<'static>>) {
    for line in wrap_spans(spans, width as f32, &Columns) {
        out.push(Line::from(styled(&line, base)));
    }
}

fn styled(spans: &[InlineSpan], base: Style) -> Vec<Span<'static>> {
    spans
        .iter()
        .map(|span| Span::styled(span.text().to_string(), style_for_inline(base, span.style())))
        .collect()
}

fn prefixed(
    lines: Vec<Line<'static>>,
    first: Span<'static>,
    rest: Span<'static>,
) -> Vec<Line<'static>> {
    lines
        .into_iter()
        .enumerate()
        .map(|(idx, line)| {
            let lead = if idx == 0 { first.clone() } else { rest.clone() };
            let mut spans = vec![lead];
            spans.extend(line.spans);
            Line::from(spans)
        })
        .collect()
}

fn rule(width: usize, style: Style) -> Line<'static> {
    Line::styled("─".repeat(width), style)
}

fn pad(text: &str, width: usize, alignment: Alignment) -> String {
    let gap = width.saturating_sub(text.width());
    match alignment {
        Alignment::Right => format!("{}{text}", " ".repeat(gap)),
        Alignment::Center => {
            let left = gap / 2;
            format!("{}{text}{}", " ".repeat(left), " ".repeat(gap - left))
        }
        Alignment::None | Alignment::Left => format!("{text}{}", " ".repeat(gap)),
    }
}

/// Cut `text` to at most `width` columns, marking the cut with `…`.
fn truncate(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }
    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let ch_width = unicode_width::UnicodeWidthChar::width(ch).unwrap_or(0);
        if used + ch_width + 1 > width {
            break;
        }
        out.push(ch);
        used += ch_width;
    }
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{RenderDescriptor, WATERMARK, render};
    use crate::theme::ThemeId;

    fn text_of(lines: &[Line<'_>]) -> Vec<String> {
        lines
            .iter()
            .map(|line| line.spans.iter().map(|span| span.content.as_ref()).collect())
            .collect()
    }

    fn preview(source: &str, width: u16) -> Vec<String> {
        let doc = render(&RenderDescriptor::new(source, ThemeId::Light.theme()));
        text_of(&preview_lines(&doc, width))
    }

    #[test]
    fn test_paragraph_wraps_to_width() {
        let lines = preview("alpha beta gamma delta epsilon zeta", 16);
        assert!(lines.contains(&"alpha beta".to_string()));
        assert!(lines.contains(&"gamma delta".to_string()));
        assert!(lines.contains(&"epsilon zeta".to_string()));
    }

    #[test]
    fn test_hard_break_starts_a_new_line() {
        let lines = preview("line one  \nline two", 60);
        assert!(lines.contains(&"line one".to_string()));
        assert!(lines.contains(&"line two".to_string()));
        assert!(!lines.iter().any(|l| l.contains("one line")));
    }

    #[test]
    fn test_header_shows_title_and_author() {
        let doc = render(
            &RenderDescriptor::new("body", ThemeId::Light.theme())
                .with_title("My Title")
                .with_author("alice"),
        );
        let lines = text_of(&preview_lines(&doc, 40));
        assert_eq!(lines[0], "My Title");
        assert_eq!(lines[1], "@alice");
    }

    #[test]
    fn test_footer_carries_watermark() {
        let lines = preview("text", 60);
        let last = lines.last().unwrap();
        assert!(last.ends_with(WATERMARK));
    }

    #[test]
    fn test_list_markers() {
        let lines = preview("- one\n- two\n\n3. three\n", 40);
        assert!(lines.iter().any(|l| l == "• one"));
        assert!(lines.iter().any(|l| l == "3. three"));
    }

    #[test]
    fn test_table_renders_header_and_separator() {
        let lines = preview("| a | b |\n|---|--:|\n| 1 | 22 |\n", 40);
        assert!(lines.iter().any(|l| l == "│ a │  b │"));
        assert!(lines.iter().any(|l| l.starts_with('├') && l.ends_with('┤')));
        assert!(lines.iter().any(|l| l == "│ 1 │ 22 │"));
    }

    #[test]
    fn test_quote_lines_are_barred() {
        let lines = preview("> quoted words", 40);
        assert!(lines.iter().any(|l| l == "│ quoted words"));
    }

    #[test]
    fn test_truncate_marks_cut() {
        assert_eq!(truncate("abcdef", 4), "abc…");
        assert_eq!(truncate("abc", 4), "abc");
        assert_eq!(truncate("中文字符", 5), "中文…");
    }

    #[test]
    fn test_pad_alignment() {
        assert_eq!(pad("x", 3, Alignment::Right), "  x");
        assert_eq!(pad("x", 3, Alignment::Center), " x ");
        assert_eq!(pad("x", 3, Alignment::Left), "x  ");
    }
}
