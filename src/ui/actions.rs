//! Action / Command 定義 (Intent)
//!
//! キー操作と API 結果は Action として状態に入り、
//! 副作用は Command として状態から出ていく

use std::path::PathBuf;
use std::time::Instant;

use crate::models::{Stock, StockId, StockInput};

/// 状態遷移のきっかけ
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Quit,
    MoveSelectionUp,
    MoveSelectionDown,

    // ページ送り
    NextPage,
    PrevPage,
    CyclePageSize,
    Reload, // 再試行

    // ダイアログ
    StartCreate,
    StartEdit,
    StartDelete,

    // CSV 出力
    StartExport,
    DismissExportError,

    // フォーム/共通
    Cancel,      // Esc / n
    Submit,      // Enter / y
    Input(char), // 文字入力
    DeleteChar,  // Backspace
    NextField,   // Tab / ↓
    PrevField,   // Shift-Tab / ↑

    // 副作用の結果
    PageLoaded {
        seq: u64,
        result: Result<Vec<Stock>, String>,
    },
    MutationSucceeded(Mutation),
    MutationFailed(Mutation, String),
    Exported(Result<PathBuf, String>),

    Tick(Instant),
}

/// 更新系の種類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    Create,
    Update,
    Delete,
}

impl Mutation {
    pub fn success_message(self) -> &'static str {
        match self {
            Mutation::Create => "商品を登録しました",
            Mutation::Update => "商品を更新しました",
            Mutation::Delete => "削除しました",
        }
    }

    pub fn failure_prefix(self) -> &'static str {
        match self {
            Mutation::Create | Mutation::Update => "保存に失敗しました",
            Mutation::Delete => "削除に失敗しました",
        }
    }
}

/// 状態から要求される副作用
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Quit,
    FetchPage {
        seq: u64,
        limit: usize,
        offset: usize,
    },
    Create(StockInput),
    Update(StockId, StockInput),
    Delete(StockId),
    Export(Vec<Stock>),
}
