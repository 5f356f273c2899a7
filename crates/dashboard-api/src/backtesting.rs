use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::ApiResult;
use crate::{build_http_client, endpoint, read_json};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: String,
    pub price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestResult {
    pub strategy: String,
    pub stock: String,
    /// Percent return of the strategy over the tested window.
    pub profit_loss: f64,
    #[serde(default)]
    pub historical_data: Vec<PricePoint>,
}

impl BacktestResult {
    pub fn is_profitable(&self) -> bool {
        self.profit_loss >= 0.0
    }
}

#[derive(Debug, Deserialize)]
struct BacktestingResponse {
    backtesting_results: Option<Vec<BacktestResult>>,
}

#[derive(Clone)]
pub struct BacktestingClient {
    client: reqwest::Client,
    base_url: String,
}

impl BacktestingClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> ApiResult<Self> {
        Ok(Self::with_client(build_http_client(timeout)?, base_url))
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    pub async fn list(&self) -> ApiResult<Vec<BacktestResult>> {
        let url = endpoint(&self.base_url, &["api", "backtesting"])?;
        tracing::debug!(%url, "GET backtesting results");

        let response = self.client.get(url).send().await?;
        let body: BacktestingResponse = read_json(response).await?;
        Ok(body.backtesting_results.unwrap_or_default())
    }
}
