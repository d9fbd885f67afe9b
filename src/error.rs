use thiserror::Error;

use crate::models::StockId;

/// 在庫 API 呼び出しのエラー
#[derive(Error, Debug)]
pub enum ApiError {
    /// HTTP 通信そのものの失敗（接続・タイムアウト・JSON デコード）
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// サーバーが 2xx 以外を返した
    #[error("server responded with {status}: {body}")]
    Status { status: u16, body: String },

    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to decode stock file: {0}")]
    Decode(#[from] toml::de::Error),

    #[error("failed to encode stock file: {0}")]
    Encode(#[from] toml::ser::Error),

    #[error("stock {0} not found")]
    NotFound(StockId),
}

/// CSV 出力のエラー
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("出力対象の在庫データがありません")]
    NothingToExport,

    #[error("{0}")]
    Io(#[from] std::io::Error),
}

/// 設定読み込みのエラー
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("{key} is not a valid UUID: {value}")]
    InvalidUuid { key: &'static str, value: String },

    #[error("{key} has an invalid value: {value}")]
    InvalidValue { key: &'static str, value: String },

    #[error("cannot determine the user data directory")]
    NoDataDir,
}
