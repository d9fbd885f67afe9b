//! 共通 UI 部品
//!
//! ダイアログ枠・入力欄など

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

/// [部品] ダイアログの枠
pub fn render_dialog_framework(frame: &mut Frame, area: Rect, title: &str) -> Rect {
    frame.render_widget(Clear, area);
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    frame.render_widget(block, area);
    inner
}

/// [部品] ラベル付き入力欄（下にエラー行）
///
/// 高さ 4 を使う: 枠付き入力 3 行 + エラー 1 行
pub fn render_input_widget(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    value: &str,
    is_focused: bool,
    error: Option<&str>,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Length(1)])
        .split(area);

    let style = if is_focused {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Gray)
    };
    let border_style = if error.is_some() {
        Style::default().fg(Color::Red)
    } else {
        style
    };

    let text = if is_focused {
        format!("{}▏", value)
    } else {
        value.to_string()
    };
    let input = Paragraph::new(text).style(style).block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(border_style),
    );
    frame.render_widget(input, chunks[0]);

    if let Some(message) = error {
        frame.render_widget(
            Paragraph::new(message).style(Style::default().fg(Color::Red)),
            chunks[1],
        );
    }
}

/// [部品] キー案内 `[a] 新規登録` 形式の 1 行
pub fn key_hints(hints: &[(&str, &str)]) -> Line<'static> {
    let mut spans = Vec::with_capacity(hints.len() * 2);
    for (key, label) in hints {
        spans.push(Span::styled(
            format!("[{}]", key),
            Style::default().fg(Color::Cyan),
        ));
        spans.push(Span::raw(format!(" {}  ", label)));
    }
    Line::from(spans)
}
