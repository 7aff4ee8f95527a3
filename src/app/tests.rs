use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};
use tempfile::tempdir;

use crate::clipboard::{ClipboardError, StaticClipboard};
use crate::editor::Direction;
use crate::export::{ExportJob, Exporter};
use crate::layout::FontBook;
use crate::theme::ThemeId;

use super::event_loop::ResizeDebouncer;
use super::{App, EXPORT_FAILED, Focus, Message, Model, Pane, ToastLevel, update};

fn create_test_model() -> Model {
    Model::new("# Test\n\nHello world", (120, 30))
}

fn create_narrow_model() -> Model {
    Model::new("# Test\n\nHello world", (80, 24))
}

fn type_text(mut model: Model, text: &str) -> Model {
    for ch in text.chars() {
        model = update(model, Message::InsertChar(ch));
    }
    model
}

fn test_exporter() -> Arc<Exporter> {
    Arc::new(Exporter::new(Arc::new(FontBook::empty())).with_settle(Duration::ZERO))
}

fn test_app(clipboard: StaticClipboard) -> App {
    App::new("# Export me", test_exporter()).with_clipboard(Box::new(clipboard))
}

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn ctrl(ch: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(ch), KeyModifiers::CONTROL)
}

fn heading_text(model: &Model) -> Option<String> {
    model.document().headings().first().map(|h| h.text.clone())
}

// ---- update: editing -------------------------------------------------------

#[test]
fn test_typing_rerenders_document() {
    let model = Model::new("", (120, 30));
    let model = type_text(model, "# Hi");
    assert_eq!(model.source.text(), "# Hi");
    assert_eq!(heading_text(&model).as_deref(), Some("Hi"));
}

#[test]
fn test_newline_splits_source_line() {
    let model = Model::new("ab", (120, 30));
    let model = update(model, Message::MoveCursor(Direction::Left));
    let model = update(model, Message::Newline);
    assert_eq!(model.source.text(), "a\nb");
    assert_eq!(model.source.cursor().line, 1);
}

#[test]
fn test_delete_back_in_source() {
    let model = Model::new("", (120, 30));
    let model = type_text(model, "abc");
    let model = update(model, Message::DeleteBack);
    assert_eq!(model.source.text(), "ab");
}

#[test]
fn test_paste_event_inserts_at_cursor() {
    let model = Model::new("", (120, 30));
    let model = update(model, Message::InsertText("| a |\n|---|\n| 1 |".to_string()));
    assert_eq!(model.source.line_count(), 3);
    assert!(matches!(
        model.document().blocks().first(),
        Some(crate::document::Block::Table(_))
    ));
}

#[test]
fn test_bracketed_paste_is_ignored_while_editor_is_hidden() {
    let mut debouncer = ResizeDebouncer::new(100);
    let paste = || crossterm::event::Event::Paste("pasted".to_string());

    let model = create_narrow_model();
    assert_eq!(
        App::handle_event(paste(), &model, 0, &mut debouncer),
        Some(Message::InsertText("pasted".to_string()))
    );

    let model = update(model, Message::ShowPane(Pane::Preview));
    assert_eq!(App::handle_event(paste(), &model, 0, &mut debouncer), None);
}

#[test]
fn test_typing_into_title_updates_header() {
    let model = create_test_model();
    let model = update(model, Message::SetFocus(Focus::Title));
    let model = update(model, Message::DeleteWordBack);
    let model = type_text(model, "Notes");
    assert_eq!(model.title.as_str(), "Notes");
    let header = model.document().header().expect("header");
    assert_eq!(header.title.as_deref(), Some("Notes"));
    // The source is untouched.
    assert_eq!(model.source.text(), "# Test\n\nHello world");
}

#[test]
fn test_typing_into_author_prefixes_at_sign() {
    let model = create_test_model();
    let model = update(model, Message::SetFocus(Focus::Author));
    let model = type_text(model, "ada");
    let header = model.document().header().expect("header");
    assert_eq!(header.author.as_deref(), Some("@ada"));
}

#[test]
fn test_enter_in_field_moves_focus() {
    let model = create_test_model();
    let model = update(model, Message::SetFocus(Focus::Title));
    let model = update(model, Message::Newline);
    assert_eq!(model.focus, Focus::Author);
    assert_eq!(model.title.as_str(), "代码片段");
}

#[test]
fn test_clearing_title_and_author_drops_header() {
    let model = create_test_model();
    let model = update(model, Message::SetTitle(String::new()));
    let model = update(model, Message::SetAuthor(String::new()));
    assert!(model.document().header().is_none());

    let model = update(model, Message::SetAuthor("  ".to_string()));
    assert!(model.document().header().is_some());
}

#[test]
fn test_clear_source_empties_and_focuses_editor() {
    let model = create_test_model();
    let model = update(model, Message::SetFocus(Focus::Author));
    let model = update(model, Message::ClearSource);
    assert!(model.source.is_empty());
    assert_eq!(model.focus, Focus::Source);
    assert!(model.document().is_empty());
}

#[test]
fn test_set_source_replaces_text() {
    let model = create_test_model();
    let model = update(model, Message::SetSource("## Other".to_string()));
    assert_eq!(heading_text(&model).as_deref(), Some("Other"));
    assert_eq!(model.editor_scroll_offset, 0);
}

#[test]
fn test_cursor_stays_visible_when_typing_past_bottom() {
    let mut model = Model::new("", (120, 30));
    for _ in 0..60 {
        model = update(model, Message::Newline);
    }
    let visible = super::update::editor_rows(&model);
    let cursor_line = model.source.cursor().line;
    assert!(cursor_line >= model.editor_scroll_offset);
    assert!(cursor_line < model.editor_scroll_offset + visible);
}

// ---- update: appearance ----------------------------------------------------

#[test]
fn test_next_theme_rerenders_with_new_theme() {
    let model = create_test_model();
    assert_eq!(model.document().theme(), ThemeId::Light);
    let model = update(model, Message::NextTheme);
    assert_eq!(model.theme, ThemeId::Dark);
    assert_eq!(model.document().theme(), ThemeId::Dark);
    let model = update(model, Message::PrevTheme);
    assert_eq!(model.document().theme(), ThemeId::Light);
}

#[test]
fn test_set_brand_shows_badge() {
    let model = create_test_model();
    assert!(model.document().footer().badge.is_none());
    let model = update(model, Message::SetBrand("claude".to_string()));
    let badge = model.document().footer().badge.as_ref().expect("badge");
    assert_eq!(badge.brand_id, "claude");
}

#[test]
fn test_unknown_brand_falls_back_to_none() {
    let model = create_test_model().with_brand("gemini");
    let model = update(model, Message::SetBrand("acme".to_string()));
    assert_eq!(model.brand_id, "none");
    assert!(model.document().footer().badge.is_none());
}

#[test]
fn test_brand_cycle_wraps() {
    let model = create_test_model();
    let model = update(model, Message::PrevBrand);
    assert_eq!(model.brand_id, "llama");
    let model = update(model, Message::NextBrand);
    assert_eq!(model.brand_id, "none");
}

// ---- update: focus, panes, preview -----------------------------------------

#[test]
fn test_focus_cycles_through_inputs() {
    let model = create_test_model();
    let model = update(model, Message::FocusNext);
    assert_eq!(model.focus, Focus::Title);
    let model = update(model, Message::FocusNext);
    assert_eq!(model.focus, Focus::Author);
    let model = update(model, Message::FocusNext);
    assert_eq!(model.focus, Focus::Source);
    let model = update(model, Message::FocusPrev);
    assert_eq!(model.focus, Focus::Author);
}

#[test]
fn test_toggle_pane_switches_active_pane() {
    let model = create_narrow_model();
    assert!(model.editor_visible());
    assert!(!model.preview_visible());
    let model = update(model, Message::TogglePane);
    assert_eq!(model.pane, Pane::Preview);
    assert!(!model.editor_visible());
    assert!(model.preview_visible());
}

#[test]
fn test_wide_terminal_shows_both_panes() {
    let model = create_test_model();
    let model = update(model, Message::ShowPane(Pane::Preview));
    assert!(model.editor_visible());
    assert!(model.preview_visible());
}

#[test]
fn test_preview_scroll_is_clamped() {
    let mut model = create_test_model();
    model.preview.set_total_lines(50);
    model.preview.resize(60, 20);
    let model = update(model, Message::PreviewScrollDown(100));
    assert_eq!(model.preview.offset(), 30);
    let model = update(model, Message::PreviewTop);
    assert_eq!(model.preview.offset(), 0);
}

#[test]
fn test_resize_updates_breakpoint() {
    let model = create_test_model();
    assert!(model.is_wide());
    let model = update(model, Message::Resize(60, 20));
    assert!(!model.is_wide());
}

#[test]
fn test_quit_sets_flag() {
    let model = update(create_test_model(), Message::Quit);
    assert!(model.should_quit);
}

// ---- update: export --------------------------------------------------------

#[test]
fn test_export_is_single_flight() {
    let model = create_test_model();
    let mut model = update(model, Message::Export);
    assert!(model.exporting);
    assert!(model.take_export_request());

    let mut model = update(model, Message::Export);
    assert!(model.exporting);
    assert!(!model.take_export_request(), "second export must be ignored while busy");
}

#[test]
fn test_export_finished_clears_busy_and_reports_path() {
    let model = update(create_test_model(), Message::Export);
    let model = update(
        model,
        Message::ExportFinished(Ok(PathBuf::from("/tmp/ai-share-1.png"))),
    );
    assert!(!model.exporting);
    let (message, level) = model.active_toast().expect("toast");
    assert_eq!(level, ToastLevel::Info);
    assert!(message.contains("/tmp/ai-share-1.png"));
}

#[test]
fn test_export_failure_shows_alert() {
    let model = update(create_test_model(), Message::Export);
    let model = update(model, Message::ExportFinished(Err("boom".to_string())));
    assert!(!model.exporting);
    let (message, level) = model.active_toast().expect("toast");
    assert_eq!(level, ToastLevel::Error);
    assert!(message.starts_with(EXPORT_FAILED));
}

// ---- update: clipboard -----------------------------------------------------

#[test]
fn test_clipboard_text_replaces_source() {
    let model = create_test_model();
    let model = update(
        model,
        Message::ClipboardLoaded(Ok("## Pasted".to_string())),
    );
    assert_eq!(model.source.text(), "## Pasted");
    assert_eq!(heading_text(&model).as_deref(), Some("Pasted"));
}

#[test]
fn test_empty_clipboard_keeps_source() {
    let model = create_test_model();
    let model = update(model, Message::ClipboardLoaded(Err(ClipboardError::Empty)));
    assert_eq!(model.source.text(), "# Test\n\nHello world");
    let (message, level) = model.active_toast().expect("toast");
    assert_eq!(level, ToastLevel::Error);
    assert_eq!(message, "剪贴板为空，请先复制内容。");
}

#[test]
fn test_unavailable_clipboard_suggests_manual_paste() {
    let model = create_test_model();
    let model = update(
        model,
        Message::ClipboardLoaded(Err(ClipboardError::Unavailable("no display".to_string()))),
    );
    let (message, _) = model.active_toast().expect("toast");
    assert!(message.contains("no display"));
    assert!(message.contains("手动粘贴"));
}

#[test]
fn test_toast_expires() {
    let mut model = update(create_test_model(), Message::Export);
    assert!(model.active_toast().is_some());
    assert!(!model.expire_toast(Instant::now()));
    assert!(model.expire_toast(Instant::now() + Duration::from_secs(10)));
    assert!(model.active_toast().is_none());
}

// ---- side effects ----------------------------------------------------------

#[test]
fn test_paste_replace_reads_clipboard() {
    let app = test_app(StaticClipboard(Ok("# From clipboard".to_string())));
    let mut model = create_test_model();
    let mut job = None;
    model = update(model, Message::PasteReplace);
    app.handle_message_side_effects(&mut model, &mut job, &Message::PasteReplace);
    assert_eq!(model.source.text(), "# From clipboard");
    assert!(job.is_none());
}

#[test]
fn test_paste_replace_with_blank_clipboard_alerts() {
    let app = test_app(StaticClipboard(Ok("   ".to_string())));
    let mut model = create_test_model();
    let mut job = None;
    app.handle_message_side_effects(&mut model, &mut job, &Message::PasteReplace);
    assert_eq!(model.source.text(), "# Test\n\nHello world");
    assert_eq!(
        model.active_toast().map(|(message, _)| message.to_string()),
        Some(ClipboardError::Empty.to_string())
    );
}

fn wait_for_export(model: &mut Model, job: &mut Option<ExportJob>) {
    let deadline = Instant::now() + Duration::from_secs(30);
    while !App::poll_export(model, job) {
        assert!(Instant::now() < deadline, "export did not finish");
        std::thread::sleep(Duration::from_millis(10));
    }
}

#[test]
fn test_export_side_effect_writes_png() {
    let dir = tempdir().unwrap();
    let app = test_app(StaticClipboard(Err(ClipboardError::Empty))).with_out_dir(dir.path());
    let mut model = app.initial_model((120, 30));
    let mut job = None;

    model = update(model, Message::Export);
    app.handle_message_side_effects(&mut model, &mut job, &Message::Export);
    assert!(job.is_some());

    wait_for_export(&mut model, &mut job);
    assert!(job.is_none());
    assert!(!model.exporting);

    let files: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .collect();
    assert_eq!(files.len(), 1);
    let bytes = std::fs::read(&files[0]).unwrap();
    assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
    let (message, level) = model.active_toast().expect("toast");
    assert_eq!(level, ToastLevel::Info);
    assert!(message.contains("ai-share-"));
}

#[test]
fn test_export_to_missing_directory_reports_failure() {
    let dir = tempdir().unwrap();
    let app = test_app(StaticClipboard(Err(ClipboardError::Empty)))
        .with_out_dir(dir.path().join("missing"));
    let mut model = app.initial_model((120, 30));
    let mut job = None;

    model = update(model, Message::Export);
    app.handle_message_side_effects(&mut model, &mut job, &Message::Export);
    wait_for_export(&mut model, &mut job);

    assert!(!model.exporting);
    let (message, level) = model.active_toast().expect("toast");
    assert_eq!(level, ToastLevel::Error);
    assert!(message.starts_with(EXPORT_FAILED));
}

#[test]
fn test_initial_model_applies_app_settings() {
    let app = App::new("# Start", test_exporter())
        .with_theme(ThemeId::Sunset)
        .with_brand("deepseek")
        .with_title("T")
        .with_author("me")
        .with_out_dir("/tmp/out");
    let model = app.initial_model((120, 30));
    assert_eq!(model.theme, ThemeId::Sunset);
    assert_eq!(model.brand_id, "deepseek");
    assert_eq!(model.title.as_str(), "T");
    assert_eq!(model.author.as_str(), "me");
    assert_eq!(model.out_dir, PathBuf::from("/tmp/out"));
    assert_eq!(model.document().theme(), ThemeId::Sunset);
}

// ---- input -----------------------------------------------------------------

#[test]
fn test_global_shortcuts() {
    let model = create_test_model();
    assert_eq!(App::handle_key(ctrl('s'), &model), Some(Message::Export));
    assert_eq!(App::handle_key(ctrl('e'), &model), Some(Message::Export));
    assert_eq!(App::handle_key(ctrl('q'), &model), Some(Message::Quit));
    assert_eq!(App::handle_key(ctrl('l'), &model), Some(Message::ClearSource));
    assert_eq!(App::handle_key(ctrl('v'), &model), Some(Message::PasteReplace));
    assert_eq!(App::handle_key(ctrl('t'), &model), Some(Message::NextTheme));
    assert_eq!(
        App::handle_key(KeyEvent::new(KeyCode::Char('b'), KeyModifiers::ALT), &model),
        Some(Message::PrevBrand)
    );
    assert_eq!(App::handle_key(key(KeyCode::Tab), &model), Some(Message::FocusNext));
    assert_eq!(App::handle_key(key(KeyCode::F(2)), &model), Some(Message::TogglePane));
}

#[test]
fn test_editing_keys() {
    let model = create_test_model();
    assert_eq!(
        App::handle_key(key(KeyCode::Char('x')), &model),
        Some(Message::InsertChar('x'))
    );
    assert_eq!(App::handle_key(key(KeyCode::Enter), &model), Some(Message::Newline));
    assert_eq!(App::handle_key(ctrl('w'), &model), Some(Message::DeleteWordBack));
    assert_eq!(
        App::handle_key(KeyEvent::new(KeyCode::Left, KeyModifiers::CONTROL), &model),
        Some(Message::MoveWordLeft)
    );
    assert_eq!(
        App::handle_key(key(KeyCode::Up), &model),
        Some(Message::MoveCursor(Direction::Up))
    );
}

#[test]
fn test_narrow_preview_keys_scroll() {
    let model = update(create_narrow_model(), Message::ShowPane(Pane::Preview));
    assert_eq!(
        App::handle_key(key(KeyCode::Down), &model),
        Some(Message::PreviewScrollDown(1))
    );
    assert_eq!(App::handle_key(key(KeyCode::Char('x')), &model), None);
    assert_eq!(
        App::handle_key(key(KeyCode::Esc), &model),
        Some(Message::ShowPane(Pane::Editor))
    );
}

#[test]
fn test_any_key_closes_help() {
    let model = update(create_test_model(), Message::ToggleHelp);
    assert_eq!(App::handle_key(key(KeyCode::Char('x')), &model), Some(Message::HideHelp));
}

#[test]
fn test_escape_returns_focus_to_editor() {
    let model = update(create_test_model(), Message::SetFocus(Focus::Title));
    assert_eq!(
        App::handle_key(key(KeyCode::Esc), &model),
        Some(Message::SetFocus(Focus::Source))
    );
}

#[test]
fn test_wheel_over_preview_scrolls_preview() {
    let model = create_test_model();
    let mouse = MouseEvent {
        kind: MouseEventKind::ScrollDown,
        column: 100,
        row: 10,
        modifiers: KeyModifiers::NONE,
    };
    assert_eq!(
        App::handle_mouse(mouse, &model),
        Some(Message::PreviewScrollDown(3))
    );
}

#[test]
fn test_click_on_title_field_focuses_it() {
    let model = create_test_model();
    let mouse = MouseEvent {
        kind: MouseEventKind::Down(crossterm::event::MouseButton::Left),
        column: 5,
        row: 1,
        modifiers: KeyModifiers::NONE,
    };
    assert_eq!(
        App::handle_mouse(mouse, &model),
        Some(Message::SetFocus(Focus::Title))
    );
}

// ---- event loop helpers ----------------------------------------------------

#[test]
fn test_resize_debouncer_waits_for_delay() {
    let mut debouncer = ResizeDebouncer::new(100);
    debouncer.queue(80, 24, 1_000);
    assert!(debouncer.is_pending());
    assert_eq!(debouncer.take_ready(1_050), None);
    assert_eq!(debouncer.take_ready(1_100), Some((80, 24)));
    assert!(!debouncer.is_pending());
}

#[test]
fn test_resize_debouncer_keeps_latest_size() {
    let mut debouncer = ResizeDebouncer::new(100);
    debouncer.queue(80, 24, 1_000);
    debouncer.queue(100, 40, 1_050);
    assert_eq!(debouncer.take_ready(1_120), None);
    assert_eq!(debouncer.take_ready(1_150), Some((100, 40)));
}
