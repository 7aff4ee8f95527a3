use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Padding, Paragraph};

use crate::app::Model;

pub fn render_help_overlay(model: &Model, frame: &mut Frame, area: Rect) {
    let popup_width = area.width.saturating_sub(12).max(48);
    let popup_height = area.height.saturating_sub(4).max(12);
    let popup = centered_popup_rect(popup_width, popup_height, area);

    let global_cfg = model
        .config_global_path
        .as_ref()
        .map_or_else(|| "<unknown>".to_string(), |p| p.display().to_string());
    let local_cfg = model
        .config_local_path
        .as_ref()
        .map_or_else(|| "<none>".to_string(), |p| p.display().to_string());

    let section_style = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);
    let dim_style = Style::default().fg(Color::Indexed(245));

    let mut lines: Vec<Line> = Vec::new();

    lines.push(Line::styled("编辑", section_style));
    lines.push(Line::raw("  Tab / Shift-Tab      切换输入框（正文、标题、作者）"));
    lines.push(Line::raw("  方向键, Home/End     移动光标"));
    lines.push(Line::raw("  Ctrl+Left/Right      按词移动"));
    lines.push(Line::raw("  Ctrl-w               删除前一个词"));
    lines.push(Line::raw("  Ctrl-l               清空"));
    lines.push(Line::raw("  Ctrl-v               清空并粘贴"));
    lines.push(Line::raw(""));

    lines.push(Line::styled("外观", section_style));
    lines.push(Line::raw("  Ctrl-t / Alt-t       下一个 / 上一个主题"));
    lines.push(Line::raw("  Ctrl-b / Alt-b       下一个 / 上一个水印"));
    lines.push(Line::raw(""));

    lines.push(Line::styled("预览", section_style));
    lines.push(Line::raw("  Alt+Up/Down          滚动预览"));
    lines.push(Line::raw("  Alt+PageUp/PageDown  预览翻页"));
    lines.push(Line::raw("  F2                   切换编辑 / 预览（窄屏）"));
    lines.push(Line::raw(""));

    lines.push(Line::styled("其他", section_style));
    lines.push(Line::raw("  Ctrl-s / Ctrl-e      导出图片"));
    lines.push(Line::raw("  F1                   帮助"));
    lines.push(Line::raw("  Ctrl-q / Ctrl-c      退出"));
    lines.push(Line::raw(""));

    lines.push(Line::styled("文件", section_style));
    lines.push(Line::raw(format!("  导出目录: {}", model.out_dir.display())));
    lines.push(Line::raw(format!("  全局配置: {global_cfg}")));
    lines.push(Line::raw(format!("  本地配置: {local_cfg}")));

    let block = Block::default()
        .title("帮助")
        .borders(Borders::ALL)
        .padding(Padding::uniform(1))
        .style(Style::default().bg(Color::Black).fg(Color::White));

    frame.render_widget(Clear, popup);
    frame.render_widget(block, popup);

    // Inner area: border(1) + padding(1) on each side = 4
    let inner = Rect::new(
        popup.x + 2,
        popup.y + 2,
        popup.width.saturating_sub(4),
        popup.height.saturating_sub(4),
    );

    // Reserve 1 row at bottom for footer hint
    let content_height = inner.height.saturating_sub(1);
    let visible: Vec<Line> = lines.into_iter().take(content_height as usize).collect();
    let content_area = Rect::new(inner.x, inner.y, inner.width, content_height);
    frame.render_widget(Paragraph::new(visible), content_area);

    let footer_area = Rect::new(inner.x, inner.y + content_height, inner.width, 1);
    frame.render_widget(Paragraph::new(Line::styled("任意键关闭", dim_style)), footer_area);
}

pub fn centered_popup_rect(width: u16, height: u16, area: Rect) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(w) / 2);
    let y = area.y + (area.height.saturating_sub(h) / 2);
    Rect::new(x, y, w, h)
}
