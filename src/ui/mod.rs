//! Terminal UI components.
//!
//! This module contains all UI-related code including:
//! - [`viewport`]: Preview scroll position and visible range
//! - [`preview`]: The rendered document laid out in terminal columns
//! - [`style`]: Theme colors mapped onto the terminal palette

pub mod preview;
pub mod style;
pub mod viewport;

mod overlays;
mod render;
mod status;

use ratatui::layout::{Constraint, Direction, Layout, Rect};

use crate::app::Pane;

pub use overlays::centered_popup_rect;
pub use render::{line_number_width, render};

/// Rows the editor loses to the toolbar, the fields row, the status line
/// and its own border.
pub const CHROME_ROWS: u16 = 5;

/// Where each part of the screen goes for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Areas {
    pub toolbar: Rect,
    pub title: Rect,
    pub author: Rect,
    pub editor: Option<Rect>,
    pub preview: Option<Rect>,
    /// Pane tabs, only on narrow terminals.
    pub tabs: Option<Rect>,
    pub status: Rect,
}

/// Split the screen. Wide terminals show editor and preview side by side;
/// narrow ones show the active pane with a tab bar below it.
pub fn areas(area: Rect, wide: bool, pane: Pane) -> Areas {
    let tab_rows = u16::from(!wide);
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(tab_rows),
            Constraint::Length(1),
        ])
        .split(area);
    let fields = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[1]);

    let (editor, preview, tabs) = if wide {
        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(rows[2]);
        (Some(body[0]), Some(body[1]), None)
    } else {
        match pane {
            Pane::Editor => (Some(rows[2]), None, Some(rows[3])),
            Pane::Preview => (None, Some(rows[2]), Some(rows[3])),
        }
    };

    Areas {
        toolbar: rows[0],
        title: fields[0],
        author: fields[1],
        editor,
        preview,
        tabs,
        status: rows[4],
    }
}

/// Whether a cell lies inside `rect`.
pub const fn contains(rect: Rect, column: u16, row: u16) -> bool {
    column >= rect.x
        && column < rect.x.saturating_add(rect.width)
        && row >= rect.y
        && row < rect.y.saturating_add(rect.height)
}

#[cfg(test)]
mod tests;
