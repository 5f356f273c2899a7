use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::ApiResult;
use crate::{build_http_client, endpoint, read_json};

/// One row of the cross-user watchlist (`GET /api/watchlist/all/`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateRow {
    #[serde(default)]
    pub stocks: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct WatchlistResponse<T> {
    watchlist: Option<Vec<T>>,
}

impl<T> WatchlistResponse<T> {
    fn into_items(self) -> Vec<T> {
        self.watchlist.unwrap_or_default()
    }
}

#[derive(Debug, Clone, Serialize)]
struct WatchlistMutation<'a> {
    user_id: &'a str,
    stock: &'a str,
}

#[derive(Clone)]
pub struct WatchlistClient {
    client: reqwest::Client,
    base_url: String,
}

impl WatchlistClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> ApiResult<Self> {
        Ok(Self::with_client(build_http_client(timeout)?, base_url))
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// Fetch one user's watchlist.
    pub async fn personal(&self, user_id: &str) -> ApiResult<Vec<String>> {
        let url = endpoint(&self.base_url, &["api", "watchlist", user_id])?;
        tracing::debug!(%url, "GET personal watchlist");

        let response = self.client.get(url).send().await?;
        let body: WatchlistResponse<String> = read_json(response).await?;
        Ok(body.into_items())
    }

    /// Fetch the union of every user's watchlist.
    pub async fn aggregate(&self) -> ApiResult<Vec<AggregateRow>> {
        let url = endpoint(&self.base_url, &["api", "watchlist", "all"])?;
        tracing::debug!(%url, "GET aggregate watchlist");

        let response = self.client.get(url).send().await?;
        let body: WatchlistResponse<AggregateRow> = read_json(response).await?;
        Ok(body.into_items())
    }

    /// Add a symbol; returns the canonical list as stored by the server.
    pub async fn add(&self, user_id: &str, stock: &str) -> ApiResult<Vec<String>> {
        self.mutate("add", user_id, stock).await
    }

    /// Remove a symbol; returns the canonical list as stored by the server.
    pub async fn remove(&self, user_id: &str, stock: &str) -> ApiResult<Vec<String>> {
        self.mutate("remove", user_id, stock).await
    }

    async fn mutate(&self, action: &str, user_id: &str, stock: &str) -> ApiResult<Vec<String>> {
        let url = endpoint(&self.base_url, &["api", "watchlist", action])?;
        tracing::debug!(%url, user_id, stock, "POST watchlist {}", action);

        let response = self
            .client
            .post(url)
            .json(&WatchlistMutation { user_id, stock })
            .send()
            .await?;
        let body: WatchlistResponse<String> = read_json(response).await?;
        Ok(body.into_items())
    }
}
