use super::*;
use crate::app::{Focus, Model, Pane, update, Message};
use ratatui::Terminal;
use ratatui::backend::TestBackend;

fn create_test_terminal(width: u16, height: u16) -> Terminal<TestBackend> {
    let backend = TestBackend::new(width, height);
    Terminal::new(backend).unwrap()
}

/// Screen rows with spaces removed, so wide characters (which leave a
/// blank trailing cell) compare as plain strings.
fn screen_rows(terminal: &Terminal<TestBackend>) -> Vec<String> {
    let buffer = terminal.backend().buffer();
    (0..buffer.area.height)
        .map(|y| {
            (0..buffer.area.width)
                .map(|x| buffer[(x, y)].symbol())
                .collect::<String>()
                .replace(' ', "")
        })
        .collect()
}

fn screen_contains(terminal: &Terminal<TestBackend>, needle: &str) -> bool {
    let needle = needle.replace(' ', "");
    screen_rows(terminal).iter().any(|row| row.contains(&needle))
}

fn draw(model: &mut Model, width: u16, height: u16) -> Terminal<TestBackend> {
    let mut terminal = create_test_terminal(width, height);
    terminal.draw(|frame| render(model, frame)).unwrap();
    terminal
}

#[test]
fn test_wide_layout_shows_both_panes() {
    let mut model = Model::new("# Heading\n\nbody text", (120, 30));
    let terminal = draw(&mut model, 120, 30);
    assert!(screen_contains(&terminal, "Markdown 输入"));
    assert!(screen_contains(&terminal, "预览"));
    assert!(screen_contains(&terminal, "body text"));
    assert!(screen_contains(&terminal, "导出图片"));
}

#[test]
fn test_narrow_layout_shows_one_pane_and_tabs() {
    let mut model = Model::new("plain words here", (80, 24));
    let terminal = draw(&mut model, 80, 24);
    assert!(screen_contains(&terminal, "Markdown 输入"));
    assert!(screen_contains(&terminal, "编辑 预览 F2 切换"));

    let mut model = update(model, Message::ShowPane(Pane::Preview));
    let terminal = draw(&mut model, 80, 24);
    assert!(!screen_contains(&terminal, "Markdown 输入"));
    assert!(screen_contains(&terminal, "plain words here"));
}

#[test]
fn test_toolbar_shows_busy_label_while_exporting() {
    let model = Model::new("text", (120, 30));
    let mut model = update(model, Message::Export);
    let terminal = draw(&mut model, 120, 30);
    assert!(screen_contains(&terminal, "生成中..."));
    assert!(!screen_contains(&terminal, "导出图片"));
}

#[test]
fn test_toolbar_shows_theme_and_brand_names() {
    let mut model = Model::new("text", (120, 30)).with_brand("gemini");
    let terminal = draw(&mut model, 120, 30);
    assert!(screen_contains(&terminal, "Minimal Light"));
    assert!(screen_contains(&terminal, "Gemini"));
}

#[test]
fn test_empty_editor_shows_placeholder() {
    let mut model = Model::new("", (120, 30));
    model.focus = Focus::Title;
    let terminal = draw(&mut model, 120, 30);
    assert!(screen_contains(&terminal, "在此输入或粘贴 Markdown 内容..."));
}

#[test]
fn test_field_labels_and_default_title() {
    let mut model = Model::new("text", (120, 30));
    let terminal = draw(&mut model, 120, 30);
    assert!(screen_contains(&terminal, "标题: 代码片段"));
    assert!(screen_contains(&terminal, "@作者: @作者"));
}

#[test]
fn test_render_updates_preview_viewport() {
    let mut source = String::new();
    for i in 0..60 {
        source.push_str(&format!("paragraph {i}\n\n"));
    }
    let mut model = Model::new(&source, (120, 30));
    let _terminal = draw(&mut model, 120, 30);
    // 30 rows minus toolbar, fields, status and the pane border.
    assert_eq!(model.preview.height(), 25);
    assert!(model.preview.total_lines() > 100);
    assert!(model.preview.can_scroll_down());
}

#[test]
fn test_toast_replaces_status_bar() {
    let model = Model::new("text", (120, 30));
    let mut model = update(
        model,
        Message::ClipboardLoaded(Err(crate::clipboard::ClipboardError::Empty)),
    );
    let terminal = draw(&mut model, 120, 30);
    let rows = screen_rows(&terminal);
    assert!(rows.last().unwrap().contains("剪贴板为空，请先复制内容。"));
}

#[test]
fn test_help_overlay_lists_export_key() {
    let model = Model::new("text", (120, 30));
    let mut model = update(model, Message::ToggleHelp);
    let terminal = draw(&mut model, 120, 30);
    assert!(screen_contains(&terminal, "帮助"));
    assert!(screen_contains(&terminal, "Ctrl-s / Ctrl-e"));
}

#[test]
fn test_areas_split_wide_and_narrow() {
    let screen = Rect::new(0, 0, 120, 30);
    let wide = areas(screen, true, Pane::Editor);
    assert!(wide.editor.is_some() && wide.preview.is_some());
    assert!(wide.tabs.is_none());
    assert_eq!(wide.status.y, 29);

    let narrow = areas(Rect::new(0, 0, 80, 24), false, Pane::Preview);
    assert!(narrow.editor.is_none());
    assert_eq!(narrow.tabs.map(|r| r.y), Some(22));
    assert_eq!(narrow.preview.map(|r| r.height), Some(20));
}

#[test]
fn test_contains_is_half_open() {
    let rect = Rect::new(2, 3, 4, 2);
    assert!(contains(rect, 2, 3));
    assert!(contains(rect, 5, 4));
    assert!(!contains(rect, 6, 4));
    assert!(!contains(rect, 2, 5));
}

#[test]
fn test_line_number_width() {
    assert_eq!(line_number_width(9), 1);
    assert_eq!(line_number_width(10), 2);
    assert_eq!(line_number_width(12_345), 5);
}
