pub mod backtesting;
pub mod error;
pub mod provider;
pub mod sentiment;
pub mod watchlist;

pub use backtesting::{BacktestResult, BacktestingClient, PricePoint};
pub use error::{ApiError, ApiResult};
pub use provider::WatchlistStore;
pub use sentiment::{SentimentClient, SentimentLabel, SentimentRecord, SentimentScore};
pub use watchlist::{AggregateRow, WatchlistClient};

use serde::de::DeserializeOwned;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Connection settings for the dashboard backend.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        }
    }
}

/// All backend endpoints the dashboard consumes, sharing one connection pool.
#[derive(Clone)]
pub struct DashboardApi {
    pub watchlist: WatchlistClient,
    pub sentiment: SentimentClient,
    pub backtesting: BacktestingClient,
}

impl DashboardApi {
    pub fn new(config: &ApiConfig) -> ApiResult<Self> {
        let client = build_http_client(config.timeout)?;
        Ok(Self {
            watchlist: WatchlistClient::with_client(client.clone(), config.base_url.clone()),
            sentiment: SentimentClient::with_client(client.clone(), config.base_url.clone()),
            backtesting: BacktestingClient::with_client(client, config.base_url.clone()),
        })
    }
}

pub(crate) fn build_http_client(timeout: Duration) -> ApiResult<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(ApiError::from)
}

/// Join `segments` onto `base_url` as percent-encoded path segments, with
/// the trailing slash the backend routes expect.
pub(crate) fn endpoint(base_url: &str, segments: &[&str]) -> ApiResult<reqwest::Url> {
    let mut url = reqwest::Url::parse(base_url)
        .map_err(|e| ApiError::InvalidUrl(format!("{base_url}: {e}")))?;
    {
        let mut path = url
            .path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl(format!("{base_url}: cannot be a base")))?;
        path.pop_if_empty().extend(segments).push("");
    }
    Ok(url)
}

pub(crate) async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> ApiResult<T> {
    let status = response.status();
    if !status.is_success() {
        let url = response.url().clone();
        let body = response.text().await.unwrap_or_default();
        tracing::warn!(%url, %status, "backend returned an error status");
        return Err(ApiError::server(status, &body));
    }

    Ok(response.json::<T>().await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_appends_trailing_slash() {
        let url = endpoint("http://localhost:8000", &["api", "watchlist", "all"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/api/watchlist/all/");
    }

    #[test]
    fn endpoint_keeps_base_path_prefix() {
        let url = endpoint("https://example.com/stocks", &["api", "sentiments"]).unwrap();
        assert_eq!(url.as_str(), "https://example.com/stocks/api/sentiments/");
    }

    #[test]
    fn endpoint_encodes_user_id_as_one_segment() {
        let url = endpoint("http://localhost:8000", &["api", "watchlist", "a/b c"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/api/watchlist/a%2Fb%20c/");
    }

    #[test]
    fn endpoint_rejects_garbage_base() {
        let err = endpoint("not a url", &["api"]).unwrap_err();
        assert!(matches!(err, ApiError::InvalidUrl(_)));
    }

    #[test]
    fn config_strips_trailing_slash() {
        let config = ApiConfig::new("http://localhost:8000/", DEFAULT_TIMEOUT);
        assert_eq!(config.base_url, "http://localhost:8000");
    }
}
