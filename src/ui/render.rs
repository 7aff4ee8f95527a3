use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Padding, Paragraph};

use crate::app::{Focus, Model, Pane};
use crate::editor::LineField;

use super::preview::{PREVIEW_PADDING, preview_lines};
use super::{Areas, areas, overlays, status, style};

/// Placeholder shown in an empty editor.
pub const EDITOR_PLACEHOLDER: &str = "在此输入或粘贴 Markdown 内容...";

const FOCUS_COLOR: Color = Color::Yellow;
const DIM: Color = Color::Indexed(245);

/// Render the complete UI.
pub fn render(model: &mut Model, frame: &mut Frame) {
    let area = frame.area();
    let layout = areas(area, model.is_wide(), model.pane);

    render_toolbar(model, frame, layout.toolbar);
    render_field(frame, layout.title, "标题", &model.title, model.focus == Focus::Title);
    render_field(frame, layout.author, "@作者", &model.author, model.focus == Focus::Author);
    if let Some(editor) = layout.editor {
        render_editor(model, frame, editor);
    }
    if let Some(preview) = layout.preview {
        render_preview(model, frame, preview);
    }
    if let Some(tabs) = layout.tabs {
        render_tabs(model, frame, tabs);
    }
    render_footer(model, frame, &layout);

    if model.help_visible {
        overlays::render_help_overlay(model, frame, area);
    }
}

fn render_footer(model: &Model, frame: &mut Frame, layout: &Areas) {
    if model.active_toast().is_some() {
        status::render_toast_bar(model, frame, layout.status);
    } else {
        status::render_status_bar(model, frame, layout.status);
    }
}

fn render_toolbar(model: &Model, frame: &mut Frame, area: Rect) {
    let theme = model.theme.theme();
    let brand = model.brand();
    let key = Style::default().fg(DIM);
    let value = Style::default().add_modifier(Modifier::BOLD);

    let left = vec![
        Span::styled(" AI分享助手 ", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
        Span::raw("│ 主题 "),
        Span::styled(theme.name, value),
        Span::styled(" ^T ", key),
        Span::raw("│ 水印 "),
        Span::styled(brand.name, value),
        Span::styled(" ^B", key),
    ];
    let button = if model.exporting {
        Span::styled(" 生成中... ", Style::default().bg(Color::DarkGray).fg(Color::White))
    } else {
        Span::styled(
            " 导出图片 ^S ",
            Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
    };

    let left_width: usize = left.iter().map(Span::width).sum();
    let gap = usize::from(area.width).saturating_sub(left_width + button.width());
    let mut spans = left;
    spans.push(Span::raw(" ".repeat(gap)));
    spans.push(button);
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_field(frame: &mut Frame, area: Rect, label: &str, field: &LineField, focused: bool) {
    let label_style = if focused {
        Style::default().fg(FOCUS_COLOR).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DIM)
    };
    let mut spans = vec![Span::styled(format!(" {label}: "), label_style)];

    if focused {
        let (before, at, after) = split_at_cursor(field.as_str(), field.cursor());
        spans.push(Span::raw(before));
        spans.push(Span::styled(at, Style::default().bg(Color::White).fg(Color::Black)));
        spans.push(Span::raw(after));
    } else if field.as_str().is_empty() {
        spans.push(Span::styled(label.to_string(), Style::default().fg(DIM)));
    } else {
        spans.push(Span::raw(field.as_str().to_string()));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_editor(model: &Model, frame: &mut Frame, area: Rect) {
    let focused = model.focus == Focus::Source;
    let block = Block::default()
        .title(" Markdown 输入 ")
        .title(Line::from(" ^L 清空 · ^V 清空并粘贴 ").right_aligned())
        .borders(Borders::ALL)
        .border_style(if focused {
            Style::default().fg(FOCUS_COLOR)
        } else {
            Style::default()
        });
    let inner = block.inner(area);
    frame.render_widget(Clear, area);
    frame.render_widget(block, area);

    let buf = &model.source;
    if buf.is_empty() && !focused {
        let placeholder = Paragraph::new(Line::styled(EDITOR_PLACEHOLDER, Style::default().fg(DIM)));
        frame.render_widget(placeholder, inner);
        return;
    }

    let total_lines = buf.line_count();
    let gutter_width = line_number_width(total_lines);
    let start = model.editor_scroll_offset;
    let end = (start + inner.height as usize).min(total_lines);
    let cursor = buf.cursor();

    let mut content: Vec<Line> = Vec::new();
    for line_idx in start..end {
        let line_text = buf.line_at(line_idx).unwrap_or_default();
        let line_num = format!("{:>width$} ", line_idx + 1, width = gutter_width as usize);
        let mut spans = vec![Span::styled(line_num, Style::default().fg(Color::DarkGray))];

        if focused && line_idx == cursor.line {
            let (before, at, after) = split_at_cursor(&line_text, cursor.col);
            spans.push(Span::raw(before));
            spans.push(Span::styled(at, Style::default().bg(Color::White).fg(Color::Black)));
            spans.push(Span::raw(after));
        } else {
            spans.push(Span::raw(line_text));
        }
        content.push(Line::from(spans));
    }

    if buf.is_empty() {
        content.push(Line::styled(
            format!("{}{EDITOR_PLACEHOLDER}", " ".repeat(gutter_width as usize + 2)),
            Style::default().fg(DIM),
        ));
    }

    frame.render_widget(Paragraph::new(content), inner);
}

fn render_preview(model: &mut Model, frame: &mut Frame, area: Rect) {
    let theme = model.theme.theme();
    let percent = model.preview.scroll_percent();
    let block = Block::default()
        .title(" 预览 ")
        .title(Line::from(format!(" {percent}% ")).right_aligned())
        .borders(Borders::ALL)
        .style(style::canvas_style(theme));
    let inner = block.inner(area);
    frame.render_widget(Clear, area);
    frame.render_widget(block, area);

    let lines = preview_lines(model.document(), inner.width);
    model.preview.resize(inner.width, inner.height);
    model.preview.set_total_lines(lines.len());

    let range = model.preview.visible_range();
    let visible: Vec<Line> = lines[range].to_vec();
    let paper = Paragraph::new(visible)
        .style(style::paper_style(theme))
        .block(Block::default().padding(Padding::horizontal(PREVIEW_PADDING)));
    frame.render_widget(paper, inner);
}

fn render_tabs(model: &Model, frame: &mut Frame, area: Rect) {
    let tab = |pane: Pane| {
        let style = if model.pane == pane {
            Style::default().add_modifier(Modifier::REVERSED | Modifier::BOLD)
        } else {
            Style::default().fg(DIM)
        };
        Span::styled(format!(" {} ", pane.label()), style)
    };
    let line = Line::from(vec![
        Span::raw(" "),
        tab(Pane::Editor),
        Span::raw(" "),
        tab(Pane::Preview),
        Span::styled("  F2 切换", Style::default().fg(DIM)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

/// Split `text` around the character at `cursor` (a char index). Past the
/// end the cursor cell is a space.
fn split_at_cursor(text: &str, cursor: usize) -> (String, String, String) {
    let mut chars = text.chars();
    let before: String = chars.by_ref().take(cursor).collect();
    let at = chars.next().map_or_else(|| " ".to_string(), String::from);
    let after: String = chars.collect();
    (before, at, after)
}

/// Calculate the width needed for line numbers.
pub const fn line_number_width(total_lines: usize) -> u16 {
    if total_lines < 10 {
        1
    } else if total_lines < 100 {
        2
    } else if total_lines < 1_000 {
        3
    } else if total_lines < 10_000 {
        4
    } else if total_lines < 100_000 {
        5
    } else {
        6
    }
}

#[cfg(test)]
mod split_tests {
    use super::split_at_cursor;

    #[test]
    fn test_split_at_cursor_middle() {
        let (a, b, c) = split_at_cursor("héllo", 1);
        assert_eq!((a.as_str(), b.as_str(), c.as_str()), ("h", "é", "llo"));
    }

    #[test]
    fn test_split_at_cursor_end_is_space() {
        let (a, b, c) = split_at_cursor("ab", 2);
        assert_eq!((a.as_str(), b.as_str(), c.as_str()), ("ab", " ", ""));
    }
}
