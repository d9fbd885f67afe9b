use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Local, Utc};
use tracing::info;

use crate::api::StockApi;
use crate::error::ApiError;
use crate::models::{Stock, StockId, StockInput, StockStoreData};

/// TOML ファイルから在庫データを読み込む
pub fn load_store(path: &Path) -> Result<StockStoreData, ApiError> {
    if !path.exists() {
        return Ok(StockStoreData::default());
    }

    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// 在庫データを TOML ファイルに保存する
pub fn save_store(data: &mut StockStoreData, path: &Path) -> Result<(), ApiError> {
    data.meta.last_modified = Local::now();
    let content = toml::to_string_pretty(data)?;
    fs::write(path, content)?;
    Ok(())
}

/// API サーバーを使わない場合のローカルファイル実装
///
/// 変更のたびにファイルへ書き戻す。
pub struct FileStockApi {
    path: PathBuf,
    data: StockStoreData,
}

impl FileStockApi {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, ApiError> {
        let path = path.into();
        let mut data = load_store(&path)?;
        data.stocks.sort_by_key(|s| s.id);
        info!(path = %path.display(), records = data.stocks.len(), "opened local stock file");
        Ok(Self { path, data })
    }

    fn position(&self, id: StockId) -> Result<usize, ApiError> {
        self.data
            .stocks
            .iter()
            .position(|s| s.id == Some(id))
            .ok_or(ApiError::NotFound(id))
    }

    /// 複製に変更を加えて保存し、成功した場合だけ差し替える
    fn commit<T>(
        &mut self,
        change: impl FnOnce(&mut StockStoreData) -> Result<T, ApiError>,
    ) -> Result<T, ApiError> {
        let mut next = self.data.clone();
        let value = change(&mut next)?;
        save_store(&mut next, &self.path)?;
        self.data = next;
        Ok(value)
    }
}

impl StockApi for FileStockApi {
    fn list(&self, limit: usize, offset: usize) -> Result<Vec<Stock>, ApiError> {
        Ok(self
            .data
            .stocks
            .iter()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }

    fn create(&mut self, input: &StockInput) -> Result<Stock, ApiError> {
        self.commit(|data| {
            let stock = Stock::from_input(data.meta.next_id, input.clone(), Utc::now());
            data.meta.next_id += 1;
            data.stocks.push(stock.clone());
            Ok(stock)
        })
    }

    fn update(&mut self, id: StockId, input: &StockInput) -> Result<Stock, ApiError> {
        let index = self.position(id)?;
        self.commit(|data| {
            let stock = &mut data.stocks[index];
            stock.apply(input.clone(), Utc::now());
            Ok(stock.clone())
        })
    }

    fn delete(&mut self, id: StockId) -> Result<(), ApiError> {
        let index = self.position(id)?;
        self.commit(|data| {
            data.stocks.remove(index);
            Ok(())
        })
    }
}
