//! CSV 出力
//!
//! 表示中のページを出力用の行に整形し、BOM 付き CSV ファイルとして書き出す

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, TimeZone};
use tracing::info;

use crate::csv::{self, CsvRecord, CsvValue};
use crate::error::ExportError;
use crate::format::{file_timestamp, format_price, format_timestamp};
use crate::models::Stock;

pub const CSV_CONTENT_TYPE: &str = "text/csv;charset=utf-8;";

/// スプレッドシート側で UTF-8 と判定させるための BOM
pub const BOM: char = '\u{FEFF}';

pub const GENERIC_FAILURE: &str = "CSV出力に失敗しました";

/// 出力ファイル
#[derive(Debug, Clone, PartialEq)]
pub struct CsvFile {
    pub file_name: String,
    pub content_type: &'static str,
    pub content: String,
}

/// 在庫レコード 1 件を出力用の行に変換する
pub fn export_row<Tz: TimeZone>(stock: &Stock, tz: &Tz) -> CsvRecord
where
    Tz::Offset: std::fmt::Display,
{
    let timestamp = |t: &Option<DateTime<chrono::Utc>>| {
        t.as_ref()
            .map(|t| CsvValue::Text(format_timestamp(t, tz)))
            .unwrap_or(CsvValue::Empty)
    };

    CsvRecord::new()
        .with("ID", stock.id)
        .with("商品名", stock.name.as_str())
        .with("価格", stock.price.map(format_price))
        .with("在庫数", stock.quantity)
        .with("作成日時", timestamp(&stock.created_at))
        .with("更新日時", timestamp(&stock.updated_at))
}

/// 出力ファイルを組み立てる
pub fn build_export<Tz: TimeZone>(
    stocks: &[Stock],
    now: &DateTime<Tz>,
) -> Result<CsvFile, ExportError>
where
    Tz::Offset: std::fmt::Display,
{
    let tz = now.timezone();
    let rows: Vec<CsvRecord> = stocks.iter().map(|s| export_row(s, &tz)).collect();
    if rows.is_empty() {
        return Err(ExportError::NothingToExport);
    }

    Ok(CsvFile {
        file_name: format!("stocks_{}.csv", file_timestamp(now)),
        content_type: CSV_CONTENT_TYPE,
        content: format!("{}{}", BOM, csv::encode(&rows)),
    })
}

/// ファイルを書き出し、書き出したパスを返す
pub fn write_export(file: &CsvFile, dir: &Path) -> Result<PathBuf, ExportError> {
    fs::create_dir_all(dir)?;
    let path = dir.join(&file.file_name);
    fs::write(&path, file.content.as_bytes())?;
    info!(
        path = %path.display(),
        bytes = file.content.len(),
        content_type = file.content_type,
        "exported stocks to csv"
    );
    Ok(path)
}

/// 表示中のページをローカルタイムで出力する
pub fn export_page(stocks: &[Stock], dir: &Path) -> Result<PathBuf, ExportError> {
    let file = build_export(stocks, &Local::now())?;
    write_export(&file, dir)
}

/// 画面表示用のエラーメッセージ
pub fn describe(err: &ExportError) -> String {
    let message = err.to_string();
    if message.trim().is_empty() {
        GENERIC_FAILURE.to_string()
    } else {
        message
    }
}
