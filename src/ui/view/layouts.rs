//! 配置ユーティリティ

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// 画面中央に割合指定の矩形を取る
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

/// 中央寄せ。ただし最小の高さを確保する
pub fn centered_rect_min(percent_x: u16, min_height: u16, r: Rect) -> Rect {
    let height = min_height.min(r.height);
    let y = r.y + (r.height - height) / 2;
    let horizontal = centered_rect(percent_x, 100, r);
    Rect::new(horizontal.x, y, horizontal.width, height)
}
