use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::Frame;
use ratatui::layout::Rect;

use crate::app::{App, Focus, Message, Model, Pane};
use crate::editor::Direction;
use crate::ui;

use super::event_loop::ResizeDebouncer;

/// Lines moved per mouse wheel notch.
const WHEEL_LINES: usize = 3;

impl App {
    pub(super) fn handle_event(
        event: Event,
        model: &Model,
        now_ms: u64,
        resize_debouncer: &mut ResizeDebouncer,
    ) -> Option<Message> {
        match event {
            Event::Key(key) if key.kind != KeyEventKind::Release => Self::handle_key(key, model),
            Event::Mouse(mouse) => Self::handle_mouse(mouse, model),
            Event::Paste(text) if !model.help_visible && model.editor_visible() => {
                Some(Message::InsertText(text))
            }
            Event::Resize(w, h) => {
                tracing::trace!(width = w, height = h, "resize queued");
                resize_debouncer.queue(w, h, now_ms);
                None
            }
            _ => None,
        }
    }

    pub(super) fn handle_key(key: KeyEvent, model: &Model) -> Option<Message> {
        if model.help_visible {
            return Some(Message::HideHelp);
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let alt = key.modifiers.contains(KeyModifiers::ALT);

        // Global commands work from any input.
        match key.code {
            KeyCode::Char('q' | 'c') if ctrl => return Some(Message::Quit),
            KeyCode::Char('s' | 'e') if ctrl => return Some(Message::Export),
            KeyCode::Char('l') if ctrl => return Some(Message::ClearSource),
            KeyCode::Char('v') if ctrl => return Some(Message::PasteReplace),
            KeyCode::Char('t') if ctrl => return Some(Message::NextTheme),
            KeyCode::Char('t') if alt => return Some(Message::PrevTheme),
            KeyCode::Char('b') if ctrl => return Some(Message::NextBrand),
            KeyCode::Char('b') if alt => return Some(Message::PrevBrand),
            KeyCode::F(1) => return Some(Message::ToggleHelp),
            KeyCode::F(2) => return Some(Message::TogglePane),
            KeyCode::Tab => return Some(Message::FocusNext),
            KeyCode::BackTab => return Some(Message::FocusPrev),
            KeyCode::Up if alt => return Some(Message::PreviewScrollUp(1)),
            KeyCode::Down if alt => return Some(Message::PreviewScrollDown(1)),
            KeyCode::PageUp if alt => return Some(Message::PreviewPageUp),
            KeyCode::PageDown if alt => return Some(Message::PreviewPageDown),
            KeyCode::Esc if model.focus != Focus::Source => {
                return Some(Message::SetFocus(Focus::Source));
            }
            _ => {}
        }

        // The narrow preview pane has nothing to edit; keys scroll it.
        if !model.editor_visible() {
            return match key.code {
                KeyCode::Up | KeyCode::Char('k') => Some(Message::PreviewScrollUp(1)),
                KeyCode::Down | KeyCode::Char('j') => Some(Message::PreviewScrollDown(1)),
                KeyCode::PageUp => Some(Message::PreviewPageUp),
                KeyCode::PageDown | KeyCode::Char(' ') => Some(Message::PreviewPageDown),
                KeyCode::Home | KeyCode::Char('g') => Some(Message::PreviewTop),
                KeyCode::End | KeyCode::Char('G') => Some(Message::PreviewBottom),
                KeyCode::Esc => Some(Message::ShowPane(Pane::Editor)),
                _ => None,
            };
        }

        match key.code {
            KeyCode::Char('w') if ctrl => Some(Message::DeleteWordBack),
            KeyCode::Char(ch) if !ctrl && !alt => Some(Message::InsertChar(ch)),
            KeyCode::Enter => Some(Message::Newline),
            KeyCode::Backspace if ctrl || alt => Some(Message::DeleteWordBack),
            KeyCode::Backspace => Some(Message::DeleteBack),
            KeyCode::Delete => Some(Message::DeleteForward),
            KeyCode::Left if ctrl => Some(Message::MoveWordLeft),
            KeyCode::Right if ctrl => Some(Message::MoveWordRight),
            KeyCode::Left => Some(Message::MoveCursor(Direction::Left)),
            KeyCode::Right => Some(Message::MoveCursor(Direction::Right)),
            KeyCode::Up => Some(Message::MoveCursor(Direction::Up)),
            KeyCode::Down => Some(Message::MoveCursor(Direction::Down)),
            KeyCode::Home if ctrl => Some(Message::MoveToStart),
            KeyCode::End if ctrl => Some(Message::MoveToEnd),
            KeyCode::Home => Some(Message::MoveHome),
            KeyCode::End => Some(Message::MoveEnd),
            KeyCode::PageUp => Some(Message::CursorPageUp),
            KeyCode::PageDown => Some(Message::CursorPageDown),
            _ => None,
        }
    }

    pub(super) fn handle_mouse(mouse: MouseEvent, model: &Model) -> Option<Message> {
        if model.help_visible {
            return None;
        }

        let screen = Rect::new(0, 0, model.width, model.height);
        let layout = ui::areas(screen, model.is_wide(), model.pane);
        let inside = |rect: Option<Rect>| rect.is_some_and(|r| ui::contains(r, mouse.column, mouse.row));

        match mouse.kind {
            MouseEventKind::ScrollUp if inside(layout.preview) => {
                Some(Message::PreviewScrollUp(WHEEL_LINES))
            }
            MouseEventKind::ScrollDown if inside(layout.preview) => {
                Some(Message::PreviewScrollDown(WHEEL_LINES))
            }
            MouseEventKind::ScrollUp if inside(layout.editor) => {
                Some(Message::MoveCursor(Direction::Up))
            }
            MouseEventKind::ScrollDown if inside(layout.editor) => {
                Some(Message::MoveCursor(Direction::Down))
            }
            MouseEventKind::Down(MouseButton::Left) => {
                if inside(Some(layout.title)) {
                    Some(Message::SetFocus(Focus::Title))
                } else if inside(Some(layout.author)) {
                    Some(Message::SetFocus(Focus::Author))
                } else if inside(layout.editor) {
                    Some(Message::SetFocus(Focus::Source))
                } else if let Some(tabs) = layout.tabs.filter(|r| ui::contains(*r, mouse.column, mouse.row)) {
                    Some(Message::ShowPane(tab_at(tabs, mouse.column)))
                } else if inside(Some(layout.toolbar)) && is_export_button(layout.toolbar, mouse.column) {
                    Some(Message::Export)
                } else {
                    None
                }
            }
            _ => None,
        }
    }

    pub(super) fn view(model: &mut Model, frame: &mut Frame) {
        crate::ui::render(model, frame);
    }
}

/// The tab bar starts with a space and the six-column editor tab; anything
/// right of that picks the preview.
const fn tab_at(tabs: Rect, column: u16) -> Pane {
    if column < tabs.x + 7 {
        Pane::Editor
    } else {
        Pane::Preview
    }
}

/// The export button occupies the right end of the toolbar.
const fn is_export_button(toolbar: Rect, column: u16) -> bool {
    column + 14 >= toolbar.x + toolbar.width
}
