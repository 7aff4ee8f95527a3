use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use crate::app::{Focus, Model, ToastLevel};

pub fn render_status_bar(model: &Model, frame: &mut Frame, area: Rect) {
    let position = match model.focus {
        Focus::Source => {
            let cursor = model.source.cursor();
            format!("Ln {}, Col {}", cursor.line + 1, cursor.col + 1)
        }
        Focus::Title => "标题".to_string(),
        Focus::Author => "作者".to_string(),
    };
    let lines = model.source.line_count();

    let status = format!(
        " {position}  [{lines} 行]  {}  {}  Tab:切换输入  F1:帮助  ^Q:退出",
        model.theme,
        model.brand_id,
    );

    let status_bar =
        Paragraph::new(status).style(Style::default().bg(Color::DarkGray).fg(Color::White));

    frame.render_widget(status_bar, area);
}

pub fn render_toast_bar(model: &Model, frame: &mut Frame, area: Rect) {
    let Some((message, level)) = model.active_toast() else {
        return;
    };
    let (prefix, style) = match level {
        ToastLevel::Info => ("[提示]", Style::default().bg(Color::DarkGray).fg(Color::White)),
        ToastLevel::Warning => ("[注意]", Style::default().bg(Color::Yellow).fg(Color::Black)),
        ToastLevel::Error => ("[错误]", Style::default().bg(Color::Red).fg(Color::White)),
    };
    let toast = Paragraph::new(format!(" {prefix} {message}")).style(style);
    frame.render_widget(toast, area);
}
