//! App 状態定義 (Model)
//!
//! 画面の状態と、それを構成する列挙型

use std::time::{Duration, Instant};

use super::form::StockForm;
use crate::models::{Identity, Stock};

/// 通知の表示時間
pub const NOTIFICATION_TTL: Duration = Duration::from_secs(3);

/// 1 ページあたりの表示件数
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PageSize {
    #[default]
    Ten,
    TwentyFive,
    Fifty,
}

impl PageSize {
    pub fn rows(self) -> usize {
        match self {
            PageSize::Ten => 10,
            PageSize::TwentyFive => 25,
            PageSize::Fifty => 50,
        }
    }

    pub fn from_rows(rows: usize) -> Option<Self> {
        match rows {
            10 => Some(PageSize::Ten),
            25 => Some(PageSize::TwentyFive),
            50 => Some(PageSize::Fifty),
            _ => None,
        }
    }

    /// 10 -> 25 -> 50 -> 10
    pub fn next(self) -> Self {
        match self {
            PageSize::Ten => PageSize::TwentyFive,
            PageSize::TwentyFive => PageSize::Fifty,
            PageSize::Fifty => PageSize::Ten,
        }
    }
}

/// ページ位置 (page, page_size)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Pagination {
    pub page: usize,
    pub page_size: PageSize,
}

impl Pagination {
    pub fn limit(&self) -> usize {
        self.page_size.rows()
    }

    pub fn offset(&self) -> usize {
        self.page * self.page_size.rows()
    }

    /// 件数を変えたら先頭ページに戻す
    pub fn set_page_size(&mut self, page_size: PageSize) {
        self.page_size = page_size;
        self.page = 0;
    }
}

/// 一覧の読み込み状態
#[derive(Debug, Clone, PartialEq)]
pub enum LoadState {
    Loading,
    Loaded(Vec<Stock>),
    Failed(String),
}

/// 画面モード
#[derive(Debug, Clone, PartialEq)]
pub enum AppMode {
    Normal,
    AddingStock,
    EditingStock(Stock),
    Confirm(ConfirmAction),
}

/// 確認ダイアログの操作
#[derive(Debug, Clone, PartialEq)]
pub enum ConfirmAction {
    Delete(Stock),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
}

/// 一定時間で消える通知
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub message: String,
    pub severity: Severity,
    pub shown_at: Instant,
}

impl Notification {
    pub fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.shown_at) >= NOTIFICATION_TTL
    }
}

/// アプリ全体の状態
pub struct App {
    pub identity: Identity,
    pub pagination: Pagination,
    pub load: LoadState,
    pub selected_index: usize,
    pub mode: AppMode,
    pub form: StockForm,
    pub submitting: bool,
    pub exporting: bool,
    pub export_error: Option<String>,
    pub notification: Option<Notification>,
    pub fetch_seq: u64, // 最後に発行した一覧取得の番号
}

impl App {
    /// 初期状態（一覧は読み込み中）
    pub fn new(identity: Identity, page_size: PageSize) -> Self {
        Self {
            identity,
            pagination: Pagination {
                page: 0,
                page_size,
            },
            load: LoadState::Loading,
            selected_index: 0,
            mode: AppMode::Normal,
            form: StockForm::new(),
            submitting: false,
            exporting: false,
            export_error: None,
            notification: None,
            fetch_seq: 0,
        }
    }

    /// 現在読み込まれているページ（未読込・失敗時は空）
    pub fn stocks(&self) -> &[Stock] {
        match &self.load {
            LoadState::Loaded(stocks) => stocks.as_slice(),
            _ => &[],
        }
    }

    /// 選択中の在庫
    pub fn selected_stock(&self) -> Option<&Stock> {
        self.stocks().get(self.selected_index)
    }

    /// 表示範囲 (1 始まり from, to)。空なら (0, 0)
    pub fn displayed_range(&self) -> (usize, usize) {
        let count = self.stocks().len();
        if count == 0 {
            return (0, 0);
        }
        let from = self.pagination.offset() + 1;
        (from, from + count - 1)
    }

    /// 総件数が不明なので、満杯のページのときだけ次ページがあるとみなす
    pub fn has_next_page(&self) -> bool {
        matches!(&self.load, LoadState::Loaded(stocks) if stocks.len() == self.pagination.limit())
    }
}
