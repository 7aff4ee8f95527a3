use std::path::PathBuf;

use crate::app::{Focus, Model, Pane, ToastLevel};
use crate::brand;
use crate::clipboard::ClipboardError;
use crate::editor::Direction;
use crate::theme::{self, ThemeId};

/// Alert shown when rasterization or saving fails.
pub const EXPORT_FAILED: &str = "生成图片失败，请重试。";

/// All possible events and actions in the application.
///
/// Text-editing messages act on whichever input has [`Focus`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    // Editing (focused input)
    InsertChar(char),
    /// Bracketed paste or any other multi-character insertion.
    InsertText(String),
    DeleteBack,
    DeleteForward,
    DeleteWordBack,
    Newline,
    MoveCursor(Direction),
    MoveHome,
    MoveEnd,
    MoveWordLeft,
    MoveWordRight,
    MoveToStart,
    MoveToEnd,
    /// Move the source cursor by a screenful.
    CursorPageUp,
    CursorPageDown,

    // Source
    /// Replace the whole source text.
    SetSource(String),
    /// Empty the source text.
    ClearSource,
    /// Replace the source with the clipboard text.
    PasteReplace,
    /// Result of the clipboard read started by `PasteReplace`.
    ClipboardLoaded(Result<String, ClipboardError>),

    // Appearance
    SetTheme(ThemeId),
    NextTheme,
    PrevTheme,
    SetBrand(String),
    NextBrand,
    PrevBrand,
    SetTitle(String),
    SetAuthor(String),

    // Focus and panes
    FocusNext,
    FocusPrev,
    SetFocus(Focus),
    ShowPane(Pane),
    TogglePane,

    // Preview scrolling
    PreviewScrollUp(usize),
    PreviewScrollDown(usize),
    PreviewPageUp,
    PreviewPageDown,
    PreviewTop,
    PreviewBottom,

    // Export
    /// Export the current document; ignored while one is in flight.
    Export,
    /// An export worker finished with the saved path or an error message.
    ExportFinished(Result<PathBuf, String>),

    // Window
    Resize(u16, u16),
    Redraw,
    ToggleHelp,
    HideHelp,

    // Application
    Quit,
}

/// Pure function that updates the model based on a message.
///
/// This is the core of TEA - all state transitions happen here. Every
/// message that changes the source, theme, brand, title or author
/// re-renders the document before returning, so the preview is never stale.
pub fn update(mut model: Model, msg: Message) -> Model {
    let mut dirty = false;

    match msg {
        Message::InsertChar(ch) => {
            dirty = edit(&mut model, |src| src.insert_char(ch), |f| f.insert_char(ch));
        }
        Message::InsertText(text) => {
            dirty = edit(&mut model, |src| src.insert_str(&text), |f| f.insert_str(&text));
        }
        Message::DeleteBack => {
            dirty = edit(&mut model, |src| { src.delete_back(); }, |f| f.delete_back());
        }
        Message::DeleteForward => {
            dirty = edit(&mut model, |src| { src.delete_forward(); }, |f| f.delete_forward());
        }
        Message::DeleteWordBack => {
            dirty = edit(&mut model, |src| { src.delete_word_back(); }, |f| f.clear());
        }
        Message::Newline => match model.focus {
            Focus::Source => dirty = edit(&mut model, |src| src.split_line(), |_| false),
            // Enter in a single-line field moves on, like a form.
            Focus::Title | Focus::Author => model.focus = model.focus.next(),
        },
        Message::MoveCursor(direction) => match model.focus {
            Focus::Source => model.source.move_cursor(direction),
            Focus::Title | Focus::Author => {
                let field = focused_field(&mut model);
                match direction {
                    Direction::Left => field.move_left(),
                    Direction::Right => field.move_right(),
                    Direction::Up | Direction::Down => {}
                }
            }
        },
        Message::MoveHome => match model.focus {
            Focus::Source => model.source.move_home(),
            _ => focused_field(&mut model).move_home(),
        },
        Message::MoveEnd => match model.focus {
            Focus::Source => model.source.move_end(),
            _ => focused_field(&mut model).move_end(),
        },
        Message::MoveWordLeft => {
            if model.focus == Focus::Source {
                model.source.move_word_left();
            }
        }
        Message::MoveWordRight => {
            if model.focus == Focus::Source {
                model.source.move_word_right();
            }
        }
        Message::MoveToStart => {
            if model.focus == Focus::Source {
                model.source.move_to_start();
            }
        }
        Message::MoveToEnd => {
            if model.focus == Focus::Source {
                model.source.move_to_end();
            }
        }
        Message::CursorPageUp => {
            let rows = isize::try_from(editor_rows(&model)).unwrap_or(isize::MAX);
            model.source.move_lines(-rows);
        }
        Message::CursorPageDown => {
            let rows = isize::try_from(editor_rows(&model)).unwrap_or(isize::MAX);
            model.source.move_lines(rows);
        }

        Message::SetSource(text) => {
            model.source.replace_all(&text);
            model.editor_scroll_offset = 0;
            dirty = true;
        }
        Message::ClearSource => {
            model.source.clear();
            model.editor_scroll_offset = 0;
            model.focus = Focus::Source;
            dirty = true;
        }
        // The clipboard read happens in the side-effect handler.
        Message::PasteReplace => {}
        Message::ClipboardLoaded(result) => match result {
            Ok(text) => {
                model.source.replace_all(&text);
                model.editor_scroll_offset = 0;
                model.preview.go_to_top();
                model.show_toast(ToastLevel::Info, "已粘贴剪贴板内容");
                dirty = true;
            }
            Err(ClipboardError::Empty) => {
                model.show_toast(ToastLevel::Error, ClipboardError::Empty.to_string());
            }
            Err(ClipboardError::Unavailable(reason)) => {
                model.show_toast(
                    ToastLevel::Error,
                    format!("无法访问剪贴板（{reason}）。请使用终端的粘贴快捷键手动粘贴。"),
                );
            }
        },

        Message::SetTheme(id) => {
            dirty = model.theme != id;
            model.theme = id;
        }
        Message::NextTheme => {
            model.theme = theme::next(model.theme);
            dirty = true;
        }
        Message::PrevTheme => {
            model.theme = theme::previous(model.theme);
            dirty = true;
        }
        Message::SetBrand(id) => {
            let resolved = brand::resolve(&id).id;
            dirty = model.brand_id != resolved;
            model.brand_id = resolved;
        }
        Message::NextBrand => {
            model.brand_id = brand::next(model.brand_id).id;
            dirty = true;
        }
        Message::PrevBrand => {
            model.brand_id = brand::previous(model.brand_id).id;
            dirty = true;
        }
        Message::SetTitle(text) => {
            model.title.set(&text);
            dirty = true;
        }
        Message::SetAuthor(text) => {
            model.author.set(&text);
            dirty = true;
        }

        Message::FocusNext => model.focus = model.focus.next(),
        Message::FocusPrev => model.focus = model.focus.previous(),
        Message::SetFocus(focus) => model.focus = focus,
        Message::ShowPane(pane) => model.pane = pane,
        Message::TogglePane => model.pane = model.pane.other(),

        Message::PreviewScrollUp(n) => model.preview.scroll_up(n),
        Message::PreviewScrollDown(n) => model.preview.scroll_down(n),
        Message::PreviewPageUp => model.preview.page_up(),
        Message::PreviewPageDown => model.preview.page_down(),
        Message::PreviewTop => model.preview.go_to_top(),
        Message::PreviewBottom => model.preview.go_to_bottom(),

        Message::Export => {
            if model.request_export() {
                model.show_toast(ToastLevel::Info, "生成中...");
            }
        }
        Message::ExportFinished(result) => {
            model.exporting = false;
            match result {
                Ok(path) => {
                    model.show_toast(ToastLevel::Info, format!("已导出图片：{}", path.display()));
                }
                Err(reason) => {
                    model.show_toast(ToastLevel::Error, format!("{EXPORT_FAILED}（{reason}）"));
                }
            }
        }

        Message::Resize(width, height) => {
            model.width = width;
            model.height = height;
        }
        Message::Redraw => {}
        Message::ToggleHelp => model.help_visible = !model.help_visible,
        Message::HideHelp => model.help_visible = false,
        Message::Quit => model.should_quit = true,
    }

    if dirty {
        model.rerender();
    }
    editor_ensure_cursor_visible(&mut model);
    model
}

/// Apply an edit to the focused input. Returns whether text changed.
fn edit(
    model: &mut Model,
    on_source: impl FnOnce(&mut crate::editor::SourceBuffer),
    on_field: impl FnOnce(&mut crate::editor::LineField) -> bool,
) -> bool {
    match model.focus {
        Focus::Source => {
            let before = model.source.revision();
            on_source(&mut model.source);
            model.source.revision() != before
        }
        Focus::Title | Focus::Author => on_field(focused_field(model)),
    }
}

fn focused_field(model: &mut Model) -> &mut crate::editor::LineField {
    match model.focus {
        Focus::Author => &mut model.author,
        Focus::Title | Focus::Source => &mut model.title,
    }
}

/// Rows available to the source editor: screen minus toolbar, fields,
/// status line and, on narrow terminals, the tab bar.
pub(crate) fn editor_rows(model: &Model) -> usize {
    let chrome = crate::ui::CHROME_ROWS + u16::from(!model.is_wide());
    usize::from(model.height.saturating_sub(chrome)).max(1)
}

/// Ensure the editor cursor line is visible in the viewport.
fn editor_ensure_cursor_visible(model: &mut Model) {
    let cursor_line = model.source.cursor().line;
    let visible = editor_rows(model);
    if cursor_line < model.editor_scroll_offset {
        model.editor_scroll_offset = cursor_line;
    } else if cursor_line >= model.editor_scroll_offset + visible {
        model.editor_scroll_offset = cursor_line + 1 - visible;
    }
}
