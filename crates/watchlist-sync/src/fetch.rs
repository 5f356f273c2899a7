//! Fetch Controller
//!
//! Reads the watchlist for a scope from the store. It never decides *when*
//! to fetch; the component binds it to activation and scope changes.

use dashboard_api::WatchlistStore;
use std::sync::Arc;
use std::time::Duration;

use crate::error::WatchlistResult;
use crate::models::{personal_entries, Scope, WatchlistEntry, WatchlistState};
use crate::with_timeout;

#[derive(Clone)]
pub struct FetchController {
    store: Arc<dyn WatchlistStore>,
    timeout: Duration,
}

impl FetchController {
    pub fn new(store: Arc<dyn WatchlistStore>, timeout: Duration) -> Self {
        Self { store, timeout }
    }

    /// Issue exactly one read request for `scope`.
    pub async fn load(&self, scope: &Scope) -> WatchlistResult<Vec<WatchlistEntry>> {
        let request = async {
            match scope {
                Scope::Personal(user_id) => self
                    .store
                    .personal(user_id)
                    .await
                    .map(personal_entries),
                Scope::Aggregate => self
                    .store
                    .aggregate()
                    .await
                    .map(|rows| rows.into_iter().map(WatchlistEntry::from).collect()),
            }
        };

        with_timeout(self.timeout, request).await
    }
}

/// Apply a load outcome. Failures leave `items` untouched.
pub(crate) fn apply_load(
    state: &mut WatchlistState,
    scope: &Scope,
    result: WatchlistResult<Vec<WatchlistEntry>>,
) {
    match result {
        Ok(items) => {
            tracing::debug!(?scope, count = items.len(), "watchlist loaded");
            state.replace_items(items);
        }
        Err(err) => {
            tracing::warn!(?scope, error = %err, "Error fetching watchlist");
            state.record_error(err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WatchlistError;
    use crate::models::WatchlistStatus;
    use crate::test_support::{Call, MockStore};

    #[tokio::test]
    async fn aggregate_rows_become_aggregate_entries() {
        let store = Arc::new(MockStore::new().rows(vec![vec!["AAPL", "TSLA"], vec![]]));
        let fetch = FetchController::new(store.clone(), Duration::from_secs(10));

        let entries = fetch.load(&Scope::Aggregate).await.unwrap();

        assert_eq!(
            entries,
            vec![
                WatchlistEntry::Aggregate {
                    stocks: vec!["AAPL".into(), "TSLA".into()]
                },
                WatchlistEntry::Aggregate { stocks: vec![] },
            ]
        );
        assert_eq!(store.calls(), vec![Call::Aggregate]);
    }

    #[tokio::test(start_paused = true)]
    async fn hung_request_times_out() {
        let store = Arc::new(MockStore::new().hangs());
        let fetch = FetchController::new(store, Duration::from_secs(10));

        let err = fetch
            .load(&Scope::Personal("user42".into()))
            .await
            .unwrap_err();

        assert_eq!(err, WatchlistError::timed_out());
    }

    #[test]
    fn failed_load_keeps_previous_items() {
        let mut state = WatchlistState::new();
        let scope = Scope::Personal("user42".into());
        apply_load(&mut state, &scope, Ok(vec![WatchlistEntry::Personal("AMZN".into())]));

        apply_load(&mut state, &scope, Err(WatchlistError::timed_out()));

        assert_eq!(state.status, WatchlistStatus::Error);
        assert_eq!(state.items, vec![WatchlistEntry::Personal("AMZN".into())]);
    }
}
