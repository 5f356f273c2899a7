//! Watchlist Data Models

use chrono::{DateTime, Utc};
use dashboard_api::AggregateRow;
use serde::{Deserialize, Serialize};

use crate::error::WatchlistError;

/// Whose watchlist the component shows.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Scope {
    /// One identified user; supports add and remove.
    Personal(String),
    /// Union across all users; read-only.
    Aggregate,
}

impl Scope {
    /// Blank or missing ids select the aggregate view. Any other id is kept
    /// verbatim (no trimming, no format validation).
    pub fn from_user_id(user_id: Option<&str>) -> Self {
        match user_id {
            Some(id) if !id.trim().is_empty() => Scope::Personal(id.to_string()),
            _ => Scope::Aggregate,
        }
    }

    pub fn user_id(&self) -> Option<&str> {
        match self {
            Scope::Personal(id) => Some(id),
            Scope::Aggregate => None,
        }
    }

    pub fn is_personal(&self) -> bool {
        matches!(self, Scope::Personal(_))
    }
}

/// A displayed watchlist row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WatchlistEntry {
    Personal(String),
    Aggregate { stocks: Vec<String> },
}

impl WatchlistEntry {
    pub fn label(&self) -> String {
        match self {
            WatchlistEntry::Personal(symbol) => symbol.clone(),
            WatchlistEntry::Aggregate { stocks } => stocks.join(", "),
        }
    }

    /// Symbol to send back on removal; aggregate rows cannot be removed.
    pub fn removable_symbol(&self) -> Option<&str> {
        match self {
            WatchlistEntry::Personal(symbol) => Some(symbol),
            WatchlistEntry::Aggregate { .. } => None,
        }
    }

    pub fn is_removable(&self) -> bool {
        self.removable_symbol().is_some()
    }
}

impl From<AggregateRow> for WatchlistEntry {
    fn from(row: AggregateRow) -> Self {
        WatchlistEntry::Aggregate { stocks: row.stocks }
    }
}

pub(crate) fn personal_entries(symbols: Vec<String>) -> Vec<WatchlistEntry> {
    symbols.into_iter().map(WatchlistEntry::Personal).collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WatchlistStatus {
    Loading,
    Ready,
    Error,
}

/// View state shared by the fetch and mutation controllers.
///
/// `items` is only ever replaced wholesale by a server response.
#[derive(Debug, Clone, PartialEq)]
pub struct WatchlistState {
    pub items: Vec<WatchlistEntry>,
    pub pending_input: String,
    pub status: WatchlistStatus,
    pub last_error: Option<WatchlistError>,
    pub last_synced_at: Option<DateTime<Utc>>,
}

impl WatchlistState {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            pending_input: String::new(),
            status: WatchlistStatus::Loading,
            last_error: None,
            last_synced_at: None,
        }
    }

    pub(crate) fn replace_items(&mut self, items: Vec<WatchlistEntry>) {
        self.items = items;
        self.status = WatchlistStatus::Ready;
        self.last_error = None;
        self.last_synced_at = Some(Utc::now());
    }

    pub(crate) fn record_error(&mut self, err: WatchlistError) {
        self.status = WatchlistStatus::Error;
        self.last_error = Some(err);
    }
}

impl Default for WatchlistState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_user_id_selects_aggregate() {
        assert_eq!(Scope::from_user_id(None), Scope::Aggregate);
        assert_eq!(Scope::from_user_id(Some("")), Scope::Aggregate);
        assert_eq!(Scope::from_user_id(Some("   ")), Scope::Aggregate);
    }

    #[test]
    fn user_id_is_kept_verbatim() {
        let scope = Scope::from_user_id(Some(" user42 "));
        assert_eq!(scope, Scope::Personal(" user42 ".into()));
        assert_eq!(scope.user_id(), Some(" user42 "));
        assert!(scope.is_personal());
    }

    #[test]
    fn aggregate_label_joins_stocks() {
        let entry = WatchlistEntry::from(AggregateRow {
            stocks: vec!["AAPL".into(), "TSLA".into()],
        });
        assert_eq!(entry.label(), "AAPL, TSLA");
        assert!(!entry.is_removable());
    }

    #[test]
    fn personal_entry_is_removable_by_symbol() {
        let entry = WatchlistEntry::Personal("MSFT".into());
        assert_eq!(entry.label(), "MSFT");
        assert_eq!(entry.removable_symbol(), Some("MSFT"));
    }

    #[test]
    fn new_state_is_loading_and_empty() {
        let state = WatchlistState::new();
        assert_eq!(state.status, WatchlistStatus::Loading);
        assert!(state.items.is_empty());
        assert!(state.pending_input.is_empty());
        assert!(state.last_synced_at.is_none());
    }
}
