//! 在庫一覧表

use chrono::Local;
use ratatui::{
    Frame,
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
};

use crate::format::{format_price, format_timestamp};
use crate::models::Stock;
use crate::ui::layout::{self, Column, WidthTier};
use crate::ui::state::App;

pub const EMPTY_MESSAGE: &str = "該当する商品がありません。条件を変更してください。";

/// セルに表示する文字列
pub fn cell_text(column: Column, stock: &Stock) -> String {
    let dash = || "-".to_string();
    match column {
        Column::Id => stock.id.map(|id| id.to_string()).unwrap_or_else(dash),
        Column::Name => stock.name.clone(),
        Column::Sku => stock.sku.clone().unwrap_or_else(dash),
        Column::Price => stock.price.map(format_price).unwrap_or_else(dash),
        Column::Quantity => stock.quantity.map(|q| q.to_string()).unwrap_or_else(dash),
        // UUID は先頭 8 桁だけ
        Column::UpdatedBy => stock
            .user_id
            .map(|u| u.simple().to_string()[..8].to_string())
            .unwrap_or_else(dash),
        Column::CreatedAt => stock
            .created_at
            .map(|t| format_timestamp(&t, &Local))
            .unwrap_or_else(dash),
        Column::UpdatedAt => stock
            .updated_at
            .map(|t| format_timestamp(&t, &Local))
            .unwrap_or_else(dash),
        Column::Actions => "e/d".to_string(),
    }
}

fn aligned(column: Column, text: String) -> Cell<'static> {
    let line = Line::from(text);
    if column.right_aligned() {
        Cell::from(line.right_aligned())
    } else {
        Cell::from(line)
    }
}

pub fn render_stock_table(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default().title("在庫一覧").borders(Borders::ALL);
    let stocks = app.stocks();

    if stocks.is_empty() {
        let inner = block.inner(area);
        frame.render_widget(block, area);
        let middle = Rect::new(inner.x, inner.y + inner.height / 2, inner.width, 1.min(inner.height));
        frame.render_widget(
            Paragraph::new(EMPTY_MESSAGE)
                .style(Style::default().fg(Color::Gray))
                .centered(),
            middle,
        );
        return;
    }

    let columns = layout::columns(WidthTier::from_width(area.width));

    let header = Row::new(
        columns
            .iter()
            .map(|(column, _)| aligned(*column, column.title().to_string())),
    )
    .style(
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    );

    let rows = stocks.iter().enumerate().map(|(i, stock)| {
        let style = if i % 2 == 1 {
            Style::default().fg(Color::Gray)
        } else {
            Style::default()
        };
        Row::new(
            columns
                .iter()
                .map(|(column, _)| aligned(*column, cell_text(*column, stock))),
        )
        .style(style)
    });

    let widths = columns
        .iter()
        .map(|(_, percent)| Constraint::Percentage(*percent));

    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .row_highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::REVERSED),
        );

    let mut state = TableState::default();
    state.select(Some(app.selected_index));

    frame.render_stateful_widget(table, area, &mut state);
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_cell_text() {
        let stock = Stock {
            id: Some(12),
            name: "Pen".to_string(),
            sku: None,
            price: Some(1500.0),
            quantity: Some(0),
            store_id: None,
            user_id: Some(Uuid::parse_str("1234abcd-0000-0000-0000-000000000000").unwrap()),
            created_at: None,
            updated_at: None,
        };

        assert_eq!(cell_text(Column::Id, &stock), "12");
        assert_eq!(cell_text(Column::Sku, &stock), "-");
        assert_eq!(cell_text(Column::Price, &stock), "￥1,500");
        assert_eq!(cell_text(Column::Quantity, &stock), "0");
        assert_eq!(cell_text(Column::UpdatedBy, &stock), "1234abcd");
        assert_eq!(cell_text(Column::CreatedAt, &stock), "-");
    }
}
