//! 在庫 API
//!
//! 一覧・作成・更新・削除の契約と HTTP 実装

use std::time::Duration;

use reqwest::blocking::{Client, Response};
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT};
use tracing::{debug, warn};

use crate::error::ApiError;
use crate::models::{Stock, StockId, StockInput};

/// 在庫データの永続化先
pub trait StockApi {
    fn list(&self, limit: usize, offset: usize) -> Result<Vec<Stock>, ApiError>;
    fn create(&mut self, input: &StockInput) -> Result<Stock, ApiError>;
    fn update(&mut self, id: StockId, input: &StockInput) -> Result<Stock, ApiError>;
    fn delete(&mut self, id: StockId) -> Result<(), ApiError>;
}

/// REST API クライアント (`/stocks`, `/stocks/{id}`)
pub struct HttpStockApi {
    client: Client,
    base_url: String,
}

impl HttpStockApi {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("stockroom/", env!("CARGO_PKG_VERSION"))),
        );

        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn stocks_url(&self) -> String {
        format!("{}/stocks", self.base_url)
    }

    fn stock_url(&self, id: StockId) -> String {
        format!("{}/stocks/{}", self.base_url, id)
    }

    /// 2xx 以外をエラーに変換する
    fn check(response: Response) -> Result<Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().unwrap_or_default();
        warn!(status = status.as_u16(), %body, "stock API returned an error status");
        Err(ApiError::Status {
            status: status.as_u16(),
            body,
        })
    }
}

impl StockApi for HttpStockApi {
    fn list(&self, limit: usize, offset: usize) -> Result<Vec<Stock>, ApiError> {
        debug!(limit, offset, "GET /stocks");
        let response = self
            .client
            .get(self.stocks_url())
            .query(&[("limit", limit), ("offset", offset)])
            .send()?;
        // 空の一覧を null で返すサーバーもある
        let stocks: Option<Vec<Stock>> = Self::check(response)?.json()?;
        Ok(stocks.unwrap_or_default())
    }

    fn create(&mut self, input: &StockInput) -> Result<Stock, ApiError> {
        debug!(name = %input.name, "POST /stocks");
        let response = self.client.post(self.stocks_url()).json(input).send()?;
        Ok(Self::check(response)?.json()?)
    }

    fn update(&mut self, id: StockId, input: &StockInput) -> Result<Stock, ApiError> {
        debug!("PUT {}", self.stock_url(id));
        let response = self.client.put(self.stock_url(id)).json(input).send()?;
        Ok(Self::check(response)?.json()?)
    }

    fn delete(&mut self, id: StockId) -> Result<(), ApiError> {
        debug!("DELETE {}", self.stock_url(id));
        let response = self.client.delete(self.stock_url(id)).send()?;
        Self::check(response)?;
        Ok(())
    }
}
