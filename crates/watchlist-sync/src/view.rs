use serde::Serialize;

use crate::models::{Scope, WatchlistState, WatchlistStatus};

pub const LOADING_MESSAGE: &str = "Loading your watchlist...";
pub const EMPTY_MESSAGE: &str = "No stocks in your watchlist.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WatchlistRow {
    pub label: String,
    /// Set only for rows that offer a remove control.
    pub remove_symbol: Option<String>,
}

/// Render-ready snapshot of the component. Building one never touches the
/// network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WatchlistView {
    pub heading: &'static str,
    pub status: WatchlistStatus,
    pub rows: Vec<WatchlistRow>,
    pub show_input: bool,
    pub input: String,
    pub can_submit: bool,
    pub message: Option<&'static str>,
    pub error: Option<String>,
}

impl WatchlistView {
    pub(crate) fn build(scope: &Scope, state: &WatchlistState, submitting: bool) -> Self {
        let rows: Vec<WatchlistRow> = match state.status {
            WatchlistStatus::Loading => Vec::new(),
            _ => state
                .items
                .iter()
                .map(|entry| WatchlistRow {
                    label: entry.label(),
                    remove_symbol: entry.removable_symbol().map(str::to_string),
                })
                .collect(),
        };

        let message = match state.status {
            WatchlistStatus::Loading => Some(LOADING_MESSAGE),
            _ if rows.is_empty() => Some(EMPTY_MESSAGE),
            _ => None,
        };

        let show_input = scope.is_personal();

        Self {
            heading: if show_input { "My Watchlist" } else { "All Watchlists" },
            status: state.status,
            rows,
            show_input,
            input: state.pending_input.clone(),
            can_submit: show_input && !submitting && !state.pending_input.trim().is_empty(),
            message,
            error: state.last_error.as_ref().map(ToString::to_string),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WatchlistError;
    use crate::models::WatchlistEntry;

    fn ready(items: Vec<WatchlistEntry>) -> WatchlistState {
        let mut state = WatchlistState::new();
        state.replace_items(items);
        state
    }

    #[test]
    fn loading_hides_rows() {
        let view = WatchlistView::build(&Scope::Aggregate, &WatchlistState::new(), false);
        assert!(view.rows.is_empty());
        assert_eq!(view.message, Some(LOADING_MESSAGE));
    }

    #[test]
    fn aggregate_rows_are_read_only() {
        let state = ready(vec![WatchlistEntry::Aggregate {
            stocks: vec!["AAPL".into(), "TSLA".into()],
        }]);
        let view = WatchlistView::build(&Scope::Aggregate, &state, false);

        assert_eq!(
            view.rows,
            vec![WatchlistRow {
                label: "AAPL, TSLA".into(),
                remove_symbol: None
            }]
        );
        assert!(!view.show_input);
        assert!(!view.can_submit);
    }

    #[test]
    fn submit_disabled_for_blank_input_or_in_flight_add() {
        let scope = Scope::Personal("user42".into());
        let mut state = ready(vec![WatchlistEntry::Personal("AAPL".into())]);

        state.pending_input = "   ".into();
        assert!(!WatchlistView::build(&scope, &state, false).can_submit);

        state.pending_input = "GOOGL".into();
        assert!(WatchlistView::build(&scope, &state, false).can_submit);
        assert!(!WatchlistView::build(&scope, &state, true).can_submit);
    }

    #[test]
    fn failed_load_shows_empty_state_with_error() {
        let mut state = WatchlistState::new();
        state.record_error(WatchlistError::timed_out());

        let view = WatchlistView::build(&Scope::Personal("user42".into()), &state, false);

        assert_eq!(view.status, WatchlistStatus::Error);
        assert_eq!(view.message, Some(EMPTY_MESSAGE));
        assert_eq!(
            view.error.as_deref(),
            Some("transport error: request timed out")
        );
    }
}
