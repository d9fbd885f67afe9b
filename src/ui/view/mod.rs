//! 画面描画
//!
//! 描画の入口と各ビュー

pub mod components;
pub mod layouts;
pub mod table;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use super::form::FormField;
use super::state::{App, AppMode, ConfirmAction, LoadState, Severity};
use components::{key_hints, render_dialog_framework, render_input_widget};
use layouts::{centered_rect, centered_rect_min};
use table::render_stock_table;

pub const LOAD_ERROR_MESSAGE: &str = "在庫データの取得中にエラーが発生しました。";
pub const CREATE_TITLE: &str = "新規登録";
pub const EDIT_TITLE: &str = "在庫を編集";

/// 画面全体を描画する
pub fn render(frame: &mut Frame, app: &App) {
    let export_error_height = if app.export_error.is_some() { 1 } else { 0 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),                   // 見出し
            Constraint::Length(1),                   // ツールバー
            Constraint::Length(export_error_height), // 出力エラー
            Constraint::Min(5),                      // 一覧
            Constraint::Length(1),                   // ページ送り
            Constraint::Length(3),                   // 案内・通知
        ])
        .split(frame.area());

    render_title(frame, chunks[0]);
    render_toolbar(frame, app, chunks[1]);
    render_export_error(frame, app, chunks[2]);
    render_body(frame, app, chunks[3]);
    render_pagination(frame, app, chunks[4]);
    render_help(frame, app, chunks[5]);

    // ダイアログ
    match &app.mode {
        AppMode::AddingStock => render_form_dialog(frame, app, CREATE_TITLE, "登録"),
        AppMode::EditingStock(_) => render_form_dialog(frame, app, EDIT_TITLE, "更新"),
        AppMode::Confirm(action) => render_confirm_dialog(frame, app, action),
        AppMode::Normal => {}
    }
}

fn render_title(frame: &mut Frame, area: Rect) {
    let title = Paragraph::new("📦 在庫管理")
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(title, area);
}

fn render_toolbar(frame: &mut Frame, app: &App, area: Rect) {
    let export_label = if app.exporting { "出力中…" } else { "CSV出力" };
    let line = key_hints(&[("a", "新規登録"), ("c", export_label)]).right_aligned();
    frame.render_widget(Paragraph::new(line), area);
}

fn render_export_error(frame: &mut Frame, app: &App, area: Rect) {
    if let Some(message) = &app.export_error {
        let line = Line::from(vec![
            Span::styled(format!("⚠ {}", message), Style::default().fg(Color::Red)),
            Span::styled("  [x] 閉じる", Style::default().fg(Color::Gray)),
        ]);
        frame.render_widget(Paragraph::new(line), area);
    }
}

fn render_body(frame: &mut Frame, app: &App, area: Rect) {
    match &app.load {
        LoadState::Loading => {
            let loading = Paragraph::new("読み込み中…")
                .centered()
                .block(Block::default().borders(Borders::ALL));
            frame.render_widget(loading, area);
        }
        LoadState::Failed(detail) => {
            let text = vec![
                Line::styled(LOAD_ERROR_MESSAGE, Style::default().fg(Color::Red)),
                Line::styled(detail.clone(), Style::default().fg(Color::Gray)),
                Line::raw(""),
                key_hints(&[("r", "再試行")]),
            ];
            let panel = Paragraph::new(text)
                .wrap(Wrap { trim: true })
                .block(
                    Block::default()
                        .title("エラー")
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(Color::Red)),
                );
            frame.render_widget(panel, area);
        }
        LoadState::Loaded(_) => render_stock_table(frame, app, area),
    }
}

fn render_pagination(frame: &mut Frame, app: &App, area: Rect) {
    let (from, to) = app.displayed_range();
    let text = format!(
        "表示件数: {}  {}-{}  ページ {}",
        app.pagination.limit(),
        from,
        to,
        app.pagination.page + 1
    );
    let mut hints = vec![("s", "件数変更")];
    if app.pagination.page > 0 {
        hints.push(("p", "前へ"));
    }
    if app.has_next_page() {
        hints.push(("n", "次へ"));
    }

    let mut spans = vec![Span::styled(text, Style::default().fg(Color::Gray)), Span::raw("   ")];
    spans.extend(key_hints(&hints).spans);
    frame.render_widget(Paragraph::new(Line::from(spans).right_aligned()), area);
}

fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let hints: &[(&str, &str)] = match &app.mode {
        AppMode::Normal => &[
            ("j/k", "選択"),
            ("e", "編集"),
            ("d", "削除"),
            ("r", "再読込"),
            ("q", "終了"),
        ],
        AppMode::AddingStock | AppMode::EditingStock(_) => &[
            ("Tab", "次の項目"),
            ("Enter", "送信"),
            ("Esc", "キャンセル"),
        ],
        AppMode::Confirm(_) => &[("y", "確認"), ("n", "キャンセル")],
    };

    let mut line = key_hints(hints);
    if let Some(notification) = &app.notification {
        let color = match notification.severity {
            Severity::Success => Color::Green,
            Severity::Error => Color::Red,
        };
        line.spans.push(Span::raw("|  "));
        line.spans.push(Span::styled(
            notification.message.clone(),
            Style::default().fg(color),
        ));
    }

    let help = Paragraph::new(line)
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));

    frame.render_widget(help, area);
}

fn render_form_dialog(frame: &mut Frame, app: &App, title: &str, submit_label: &str) {
    // 入力欄 3 つ (各 4 行) + 案内 1 行 + 枠 2 行
    let area = centered_rect_min(60, 15, frame.area());
    let inner = render_dialog_framework(frame, area, title);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Length(4),
            Constraint::Length(4),
            Constraint::Min(1),
        ])
        .split(inner);

    let fields = [FormField::Name, FormField::Price, FormField::Quantity];
    for (field, chunk) in fields.iter().zip(chunks.iter()) {
        render_input_widget(
            frame,
            *chunk,
            field.label(),
            app.form.value(*field),
            app.form.focus == *field,
            app.form.errors.get(*field),
        );
    }

    let hint = if app.submitting {
        Line::styled("送信中…", Style::default().fg(Color::Yellow))
    } else {
        key_hints(&[("Enter", submit_label), ("Esc", "キャンセル")])
    };
    frame.render_widget(Paragraph::new(hint), chunks[3]);
}

fn render_confirm_dialog(frame: &mut Frame, app: &App, action: &ConfirmAction) {
    let area = centered_rect(50, 30, frame.area());
    frame.render_widget(Clear, area);

    let ConfirmAction::Delete(stock) = action;
    let footer = if app.submitting {
        "削除中…"
    } else {
        "[y] 削除  [n] キャンセル"
    };
    let message = format!(
        "「{}」を削除しますか？\nこの操作は取り消せません。\n\n{}",
        stock.name, footer
    );

    let dialog = Paragraph::new(message)
        .style(Style::default().fg(Color::Red))
        .wrap(Wrap { trim: true })
        .block(Block::default().title("⚠️ 削除確認").borders(Borders::ALL));

    frame.render_widget(dialog, area);
}
