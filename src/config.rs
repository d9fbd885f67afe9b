//! 設定
//!
//! `<データディレクトリ>/config.toml` を読み込み、環境変数で上書きする

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use uuid::Uuid;

use crate::error::ConfigError;
use crate::models::Identity;
use crate::ui::state::PageSize;

const ENV_API_URL: &str = "STOCKROOM_API_URL";
const ENV_DATA_DIR: &str = "STOCKROOM_DATA_DIR";
const ENV_EXPORT_DIR: &str = "STOCKROOM_EXPORT_DIR";
const ENV_USER_ID: &str = "STOCKROOM_USER_ID";
const ENV_STORE_ID: &str = "STOCKROOM_STORE_ID";
const ENV_PAGE_SIZE: &str = "STOCKROOM_PAGE_SIZE";
const ENV_HTTP_TIMEOUT: &str = "STOCKROOM_HTTP_TIMEOUT_SECS";

/// config.toml の内容（すべて省略可）
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    pub api_url: Option<String>,
    pub export_dir: Option<PathBuf>,
    pub user_id: Option<Uuid>,
    pub store_id: Option<Uuid>,
    pub page_size: Option<usize>,
    pub http_timeout_secs: Option<u64>,
}

/// 実行時設定
#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: PathBuf,
    pub export_dir: PathBuf,
    pub api_url: Option<String>,
    pub identity: Identity,
    pub page_size: PageSize,
    pub http_timeout: Duration,
}

impl Config {
    /// 既定のデータディレクトリ (~/.local/share/stockroom/)
    pub fn default_data_dir() -> Result<PathBuf, ConfigError> {
        Ok(dirs::data_dir()
            .ok_or(ConfigError::NoDataDir)?
            .join("stockroom"))
    }

    /// 設定ファイルと環境変数から読み込む
    pub fn load() -> Result<Self, ConfigError> {
        let data_dir = match std::env::var(ENV_DATA_DIR) {
            Ok(dir) if !dir.is_empty() => PathBuf::from(dir),
            _ => Self::default_data_dir()?,
        };
        fs::create_dir_all(&data_dir)?;

        let file = read_config_file(&data_dir.join("config.toml"))?;
        Self::resolve(data_dir, file, |key| std::env::var(key).ok())
    }

    /// ファイルの値に環境変数を重ねる
    pub fn resolve(
        data_dir: PathBuf,
        file: ConfigFile,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let env = |key: &str| env(key).filter(|v| !v.trim().is_empty());

        let api_url = env(ENV_API_URL).or(file.api_url);
        if let Some(url) = &api_url {
            validate_api_url(url)?;
        }

        let export_dir = env(ENV_EXPORT_DIR)
            .map(PathBuf::from)
            .or(file.export_dir)
            .or_else(dirs::download_dir)
            .unwrap_or_else(|| data_dir.clone());

        let identity = Identity {
            user_id: match env(ENV_USER_ID) {
                Some(v) => Some(parse_uuid(ENV_USER_ID, &v)?),
                None => file.user_id,
            },
            store_id: match env(ENV_STORE_ID) {
                Some(v) => Some(parse_uuid(ENV_STORE_ID, &v)?),
                None => file.store_id,
            },
        };

        // 不正なページサイズは無視して次の候補へ
        let page_size = env(ENV_PAGE_SIZE)
            .and_then(|v| v.trim().parse::<usize>().ok())
            .and_then(PageSize::from_rows)
            .or_else(|| file.page_size.and_then(PageSize::from_rows))
            .unwrap_or_default();

        let http_timeout_secs = match env(ENV_HTTP_TIMEOUT) {
            Some(v) => v.trim().parse::<u64>().map_err(|_| ConfigError::InvalidValue {
                key: ENV_HTTP_TIMEOUT,
                value: v.clone(),
            })?,
            None => file.http_timeout_secs.unwrap_or(10),
        };

        Ok(Self {
            data_dir,
            export_dir,
            api_url,
            identity,
            page_size,
            http_timeout: Duration::from_secs(http_timeout_secs),
        })
    }

    pub fn store_path(&self) -> PathBuf {
        self.data_dir.join("stocks.toml")
    }

    pub fn log_dir(&self) -> PathBuf {
        self.data_dir.join("logs")
    }
}

fn read_config_file(path: &Path) -> Result<ConfigFile, ConfigError> {
    if !path.exists() {
        return Ok(ConfigFile::default());
    }
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// http/https でホストを持つ URL だけを受け付ける
fn validate_api_url(url: &str) -> Result<(), ConfigError> {
    let invalid = || ConfigError::InvalidValue {
        key: ENV_API_URL,
        value: url.to_string(),
    };
    let parsed = reqwest::Url::parse(url.trim()).map_err(|_| invalid())?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(invalid());
    }
    match parsed.host_str() {
        Some(host) if !host.is_empty() => Ok(()),
        _ => Err(invalid()),
    }
}

fn parse_uuid(key: &'static str, value: &str) -> Result<Uuid, ConfigError> {
    Uuid::parse_str(value.trim()).map_err(|_| ConfigError::InvalidUuid {
        key,
        value: value.to_string(),
    })
}
