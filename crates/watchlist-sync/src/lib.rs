//! Watchlist Synchronization
//!
//! Keeps a client-side watchlist in step with the remote store. The store is
//! the single source of truth: the local list is only ever a copy of the
//! last server response, and mutations are applied once confirmed.

pub mod component;
pub mod error;
pub mod fetch;
pub mod models;
pub mod mutation;
pub mod view;

#[cfg(test)]
mod test_support;

pub use component::{SyncOptions, WatchlistComponent};
pub use error::{WatchlistError, WatchlistResult};
pub use fetch::FetchController;
pub use models::{Scope, WatchlistEntry, WatchlistState, WatchlistStatus};
pub use mutation::{validate_symbol, MutationController, MutationKind};
pub use view::{WatchlistRow, WatchlistView};

use dashboard_api::ApiResult;
use std::future::Future;
use std::time::Duration;

/// Bound a store request; an expired timer becomes a transport error.
pub(crate) async fn with_timeout<T, F>(timeout: Duration, request: F) -> WatchlistResult<T>
where
    F: Future<Output = ApiResult<T>>,
{
    match tokio::time::timeout(timeout, request).await {
        Ok(result) => result.map_err(WatchlistError::from),
        Err(_) => Err(WatchlistError::timed_out()),
    }
}
