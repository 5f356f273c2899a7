//! Mutation Controller
//!
//! Sends add/remove requests and hands back the server's canonical list.
//! Nothing is applied locally before the server answers.

use dashboard_api::WatchlistStore;
use std::sync::Arc;
use std::time::Duration;

use crate::error::{WatchlistError, WatchlistResult};
use crate::models::{personal_entries, Scope, WatchlistEntry, WatchlistState};
use crate::with_timeout;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    Add,
    Remove,
}

impl MutationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MutationKind::Add => "add",
            MutationKind::Remove => "remove",
        }
    }
}

/// Reject blank symbols; returns the trimmed symbol otherwise.
pub fn validate_symbol(raw: &str) -> WatchlistResult<&str> {
    let symbol = raw.trim();
    if symbol.is_empty() {
        return Err(WatchlistError::Validation(raw.to_string()));
    }
    Ok(symbol)
}

#[derive(Clone)]
pub struct MutationController {
    store: Arc<dyn WatchlistStore>,
    timeout: Duration,
}

impl MutationController {
    pub fn new(store: Arc<dyn WatchlistStore>, timeout: Duration) -> Self {
        Self { store, timeout }
    }

    /// Add `symbol` (trimmed) to the personal watchlist.
    pub async fn add(&self, scope: &Scope, symbol: &str) -> WatchlistResult<Vec<WatchlistEntry>> {
        let symbol = validate_symbol(symbol)?;
        let user_id = scope.user_id().ok_or(WatchlistError::ReadOnly)?;

        with_timeout(self.timeout, self.store.add(user_id, symbol))
            .await
            .map(personal_entries)
    }

    /// Remove an entry exactly as it is displayed.
    pub async fn remove(&self, scope: &Scope, symbol: &str) -> WatchlistResult<Vec<WatchlistEntry>> {
        if symbol.trim().is_empty() {
            return Err(WatchlistError::Validation(symbol.to_string()));
        }
        let user_id = scope.user_id().ok_or(WatchlistError::ReadOnly)?;

        with_timeout(self.timeout, self.store.remove(user_id, symbol))
            .await
            .map(personal_entries)
    }
}

/// Apply a mutation outcome. A successful add also clears the input.
pub(crate) fn apply_mutation(
    state: &mut WatchlistState,
    kind: MutationKind,
    symbol: &str,
    result: WatchlistResult<Vec<WatchlistEntry>>,
) -> WatchlistResult<()> {
    match result {
        Ok(items) => {
            tracing::info!(symbol, count = items.len(), "watchlist {} confirmed", kind.as_str());
            state.replace_items(items);
            if kind == MutationKind::Add {
                state.pending_input.clear();
            }
            Ok(())
        }
        Err(err) => {
            tracing::warn!(symbol, error = %err, "Error during watchlist {}", kind.as_str());
            state.record_error(err.clone());
            Err(err)
        }
    }
}
