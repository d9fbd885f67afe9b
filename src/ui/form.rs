//! 登録・編集フォーム
//!
//! 入力中の文字列と、送信時の検証

use crate::models::{Identity, Stock, StockInput};

pub const NAME_MAX_CHARS: usize = 100;

pub const NAME_ERROR: &str = "1〜100文字で入力してください";
pub const PRICE_ERROR: &str = "0以上の数値を入力してください";
pub const QUANTITY_ERROR: &str = "0以上の整数を入力してください";

/// 入力フィールド
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FormField {
    #[default]
    Name,
    Price,
    Quantity,
}

impl FormField {
    pub fn next(self) -> Self {
        match self {
            FormField::Name => FormField::Price,
            FormField::Price => FormField::Quantity,
            FormField::Quantity => FormField::Name,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            FormField::Name => FormField::Quantity,
            FormField::Price => FormField::Name,
            FormField::Quantity => FormField::Price,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FormField::Name => "商品名",
            FormField::Price => "価格",
            FormField::Quantity => "在庫数",
        }
    }
}

/// フィールドごとの検証エラー
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldErrors {
    pub name: Option<&'static str>,
    pub price: Option<&'static str>,
    pub quantity: Option<&'static str>,
}

impl FieldErrors {
    pub fn get(&self, field: FormField) -> Option<&'static str> {
        match field {
            FormField::Name => self.name,
            FormField::Price => self.price,
            FormField::Quantity => self.quantity,
        }
    }
}

/// 検証済みの入力値
#[derive(Debug, Clone, PartialEq)]
pub struct StockDraft {
    pub name: String,
    pub price: f64,
    pub quantity: i64,
}

impl StockDraft {
    /// 操作者を付けて API 入力にする（不明なら nil UUID）
    pub fn to_input(&self, identity: &Identity) -> StockInput {
        StockInput {
            name: self.name.clone(),
            price: self.price,
            quantity: self.quantity,
            store_id: identity.store_or_nil(),
            user_id: identity.user_or_nil(),
        }
    }
}

/// フォームの入力状態
#[derive(Debug, Clone, PartialEq)]
pub struct StockForm {
    pub name: String,
    pub price: String,
    pub quantity: String,
    pub focus: FormField,
    pub errors: FieldErrors,
}

impl Default for StockForm {
    fn default() -> Self {
        Self::new()
    }
}

impl StockForm {
    /// 新規登録の初期値 (名前は空、価格・在庫数は 0)
    pub fn new() -> Self {
        Self {
            name: String::new(),
            price: "0".to_string(),
            quantity: "0".to_string(),
            focus: FormField::Name,
            errors: FieldErrors::default(),
        }
    }

    /// 編集対象の値で埋める
    pub fn from_stock(stock: &Stock) -> Self {
        Self {
            name: stock.name.clone(),
            price: stock.price.map(|p| p.to_string()).unwrap_or_default(),
            quantity: stock.quantity.map(|q| q.to_string()).unwrap_or_default(),
            focus: FormField::Name,
            errors: FieldErrors::default(),
        }
    }

    pub fn value(&self, field: FormField) -> &str {
        match field {
            FormField::Name => &self.name,
            FormField::Price => &self.price,
            FormField::Quantity => &self.quantity,
        }
    }

    fn focused_mut(&mut self) -> &mut String {
        match self.focus {
            FormField::Name => &mut self.name,
            FormField::Price => &mut self.price,
            FormField::Quantity => &mut self.quantity,
        }
    }

    pub fn input(&mut self, c: char) {
        self.focused_mut().push(c);
    }

    pub fn delete_char(&mut self) {
        self.focused_mut().pop();
    }

    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn focus_prev(&mut self) {
        self.focus = self.focus.prev();
    }

    /// 送信前の検証
    pub fn validate(&self) -> Result<StockDraft, FieldErrors> {
        let name = validate_name(&self.name);
        let price = validate_price(&self.price);
        let quantity = validate_quantity(&self.quantity);

        match (name, price, quantity) {
            (Ok(name), Ok(price), Ok(quantity)) => Ok(StockDraft {
                name,
                price,
                quantity,
            }),
            (name, price, quantity) => Err(FieldErrors {
                name: name.err(),
                price: price.err(),
                quantity: quantity.err(),
            }),
        }
    }
}

fn validate_name(value: &str) -> Result<String, &'static str> {
    let count = value.chars().count();
    if count == 0 || count > NAME_MAX_CHARS {
        return Err(NAME_ERROR);
    }
    Ok(value.to_string())
}

fn validate_price(value: &str) -> Result<f64, &'static str> {
    match value.trim().parse::<f64>() {
        Ok(price) if price.is_finite() && price >= 0.0 => Ok(price),
        _ => Err(PRICE_ERROR),
    }
}

fn validate_quantity(value: &str) -> Result<i64, &'static str> {
    match value.trim().parse::<i64>() {
        Ok(quantity) if quantity >= 0 => Ok(quantity),
        _ => Err(QUANTITY_ERROR),
    }
}
