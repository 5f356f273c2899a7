use async_trait::async_trait;

use crate::error::ApiResult;
use crate::watchlist::{AggregateRow, WatchlistClient};

/// Remote source of truth for watchlists.
///
/// Implemented by the HTTP client; the sync layer only talks to this trait
/// so it can run against any backend (or an in-memory double in tests).
#[async_trait]
pub trait WatchlistStore: Send + Sync {
    async fn personal(&self, user_id: &str) -> ApiResult<Vec<String>>;

    async fn aggregate(&self) -> ApiResult<Vec<AggregateRow>>;

    /// Returns the canonical list after the add.
    async fn add(&self, user_id: &str, stock: &str) -> ApiResult<Vec<String>>;

    /// Returns the canonical list after the removal.
    async fn remove(&self, user_id: &str, stock: &str) -> ApiResult<Vec<String>>;

    fn backend_name(&self) -> &'static str;
}

#[async_trait]
impl WatchlistStore for WatchlistClient {
    async fn personal(&self, user_id: &str) -> ApiResult<Vec<String>> {
        WatchlistClient::personal(self, user_id).await
    }

    async fn aggregate(&self) -> ApiResult<Vec<AggregateRow>> {
        WatchlistClient::aggregate(self).await
    }

    async fn add(&self, user_id: &str, stock: &str) -> ApiResult<Vec<String>> {
        WatchlistClient::add(self, user_id, stock).await
    }

    async fn remove(&self, user_id: &str, stock: &str) -> ApiResult<Vec<String>> {
        WatchlistClient::remove(self, user_id, stock).await
    }

    fn backend_name(&self) -> &'static str {
        "http"
    }
}
