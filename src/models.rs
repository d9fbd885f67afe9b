use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type StockId = i64;

/// 在庫レコード
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stock {
    #[serde(default)]
    pub id: Option<StockId>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub quantity: Option<i64>,
    #[serde(default)]
    pub store_id: Option<Uuid>,
    #[serde(default)]
    pub user_id: Option<Uuid>, // 最終更新者
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Stock {
    /// 入力値から新しいレコードを作成する（ID と日時はストア側で採番）
    pub fn from_input(id: StockId, input: StockInput, now: DateTime<Utc>) -> Self {
        Self {
            id: Some(id),
            name: input.name,
            sku: None,
            price: Some(input.price),
            quantity: Some(input.quantity),
            store_id: Some(input.store_id),
            user_id: Some(input.user_id),
            created_at: Some(now),
            updated_at: Some(now),
        }
    }

    /// 入力値で上書きする（作成日時は保持）
    pub fn apply(&mut self, input: StockInput, now: DateTime<Utc>) {
        self.name = input.name;
        self.price = Some(input.price);
        self.quantity = Some(input.quantity);
        self.store_id = Some(input.store_id);
        self.user_id = Some(input.user_id);
        self.updated_at = Some(now);
    }
}

/// 作成・更新 API に送る入力
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockInput {
    pub name: String,
    pub price: f64,
    pub quantity: i64,
    pub store_id: Uuid,
    pub user_id: Uuid,
}

/// 操作ユーザーと店舗
///
/// 不明な場合は nil UUID (全ゼロ) にフォールバックする。
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Identity {
    pub user_id: Option<Uuid>,
    pub store_id: Option<Uuid>,
}

impl Identity {
    pub fn user_or_nil(&self) -> Uuid {
        self.user_id.unwrap_or(Uuid::nil())
    }

    pub fn store_or_nil(&self) -> Uuid {
        self.store_id.unwrap_or(Uuid::nil())
    }
}

/// TOML ファイル構造
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockStoreData {
    pub meta: StoreMeta,
    #[serde(default)]
    pub stocks: Vec<Stock>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreMeta {
    pub version: String,
    pub next_id: StockId,
    pub created_at: DateTime<Local>,
    pub last_modified: DateTime<Local>,
}

impl Default for StockStoreData {
    fn default() -> Self {
        let now = Local::now();
        Self {
            meta: StoreMeta {
                version: "1.0".to_string(),
                next_id: 1,
                created_at: now,
                last_modified: now,
            },
            stocks: Vec::new(),
        }
    }
}
