//! Watchlist component lifecycle.
//!
//! Owns the single `WatchlistState` slot and decides when the fetch and
//! mutation controllers run:
//!
//! - the read request is bound to activation and scope changes, never to
//!   rendering, so re-rendering cannot cause a request loop;
//! - mutations are confirmed-only: `items` is replaced by the server's list
//!   when (and in the order) responses arrive;
//! - responses that belong to a previous scope are dropped.

use dashboard_api::WatchlistStore;
use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::RwLock;

use crate::error::{WatchlistError, WatchlistResult};
use crate::fetch::{self, FetchController};
use crate::models::{Scope, WatchlistEntry, WatchlistState};
use crate::mutation::{self, validate_symbol, MutationController, MutationKind};
use crate::view::WatchlistView;

#[derive(Debug, Clone, Copy)]
pub struct SyncOptions {
    /// Upper bound on every store request; expiry counts as a transport error.
    pub request_timeout: Duration,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            request_timeout: dashboard_api::DEFAULT_TIMEOUT,
        }
    }
}

struct Shared {
    scope: Scope,
    state: WatchlistState,
    /// Bumped on every scope change; responses tagged with an older value
    /// are discarded.
    activation: u64,
    load_issued: bool,
}

impl Shared {
    fn new(scope: Scope) -> Self {
        Self {
            scope,
            state: WatchlistState::new(),
            activation: 0,
            load_issued: false,
        }
    }
}

/// Outstanding mutations of one activation. Kept behind a plain mutex so a
/// dropped operation can release its slot synchronously.
#[derive(Default)]
struct InFlight {
    activation: u64,
    symbols: HashSet<String>,
    adds: usize,
}

fn lock(slots: &Mutex<InFlight>) -> MutexGuard<'_, InFlight> {
    slots.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Releases an in-flight slot when the operation finishes or its future is
/// dropped.
struct SlotGuard<'a> {
    slots: &'a Mutex<InFlight>,
    activation: u64,
    key: String,
    kind: MutationKind,
}

impl Drop for SlotGuard<'_> {
    fn drop(&mut self) {
        let mut slots = lock(self.slots);
        // a scope change already cleared the table
        if slots.activation != self.activation {
            return;
        }
        slots.symbols.remove(&self.key);
        if self.kind == MutationKind::Add {
            slots.adds = slots.adds.saturating_sub(1);
        }
    }
}

struct Ticket {
    scope: Scope,
    activation: u64,
}

struct Inner {
    fetch: FetchController,
    mutation: MutationController,
    shared: RwLock<Shared>,
    in_flight: Mutex<InFlight>,
}

/// Client-side view of one watchlist, kept in step with the remote store.
///
/// Cloning is cheap and every clone drives the same state, so UI tasks can
/// issue operations concurrently.
#[derive(Clone)]
pub struct WatchlistComponent {
    inner: Arc<Inner>,
}

impl WatchlistComponent {
    /// Creates the component in `Loading`. No request is sent until
    /// [`activate`](Self::activate).
    pub fn new(store: Arc<dyn WatchlistStore>, scope: Scope, options: SyncOptions) -> Self {
        tracing::debug!(?scope, backend = store.backend_name(), "watchlist component created");
        Self {
            inner: Arc::new(Inner {
                fetch: FetchController::new(store.clone(), options.request_timeout),
                mutation: MutationController::new(store, options.request_timeout),
                shared: RwLock::new(Shared::new(scope)),
                in_flight: Mutex::new(InFlight::default()),
            }),
        }
    }

    pub async fn scope(&self) -> Scope {
        self.inner.shared.read().await.scope.clone()
    }

    pub async fn state(&self) -> WatchlistState {
        self.inner.shared.read().await.state.clone()
    }

    fn adds_in_flight(&self) -> bool {
        lock(&self.inner.in_flight).adds > 0
    }

    /// True while an add is outstanding; the input affordance stays disabled.
    pub async fn is_submitting(&self) -> bool {
        self.adds_in_flight()
    }

    pub async fn render(&self) -> WatchlistView {
        let shared = self.inner.shared.read().await;
        WatchlistView::build(&shared.scope, &shared.state, self.adds_in_flight())
    }

    /// Mount trigger. Loads once per activation; later calls return the
    /// current state without touching the store.
    pub async fn activate(&self) -> WatchlistState {
        let ticket = {
            let mut shared = self.inner.shared.write().await;
            if shared.load_issued {
                return shared.state.clone();
            }
            shared.load_issued = true;
            Ticket {
                scope: shared.scope.clone(),
                activation: shared.activation,
            }
        };
        self.load(ticket).await
    }

    /// Switch to another scope. A different scope starts a fresh activation
    /// (state back to `Loading`, one read); the same scope is a no-op.
    pub async fn rescope(&self, scope: Scope) -> WatchlistState {
        {
            let mut shared = self.inner.shared.write().await;
            if shared.scope != scope {
                tracing::info!(from = ?shared.scope, to = ?scope, "watchlist scope changed");
                let activation = shared.activation + 1;
                *shared = Shared::new(scope);
                shared.activation = activation;
                *lock(&self.inner.in_flight) = InFlight {
                    activation,
                    ..InFlight::default()
                };
            }
        }
        self.activate().await
    }

    /// Explicit reload, e.g. to retry after a failed load.
    pub async fn refresh(&self) -> WatchlistState {
        let ticket = {
            let mut shared = self.inner.shared.write().await;
            shared.load_issued = true;
            Ticket {
                scope: shared.scope.clone(),
                activation: shared.activation,
            }
        };
        self.load(ticket).await
    }

    async fn load(&self, ticket: Ticket) -> WatchlistState {
        let result = self.inner.fetch.load(&ticket.scope).await;

        let mut shared = self.inner.shared.write().await;
        if shared.activation != ticket.activation {
            tracing::debug!(scope = ?ticket.scope, "dropping watchlist load for a previous scope");
            return shared.state.clone();
        }
        fetch::apply_load(&mut shared.state, &ticket.scope, result);
        shared.state.clone()
    }

    /// Update the text being composed for an add. Ignored in aggregate scope.
    pub async fn set_input(&self, text: impl Into<String>) {
        let mut shared = self.inner.shared.write().await;
        if shared.scope.is_personal() {
            shared.state.pending_input = text.into();
        }
    }

    /// Add whatever is in the input box.
    pub async fn submit(&self) -> WatchlistResult<WatchlistState> {
        self.submit_with(None).await
    }

    /// Type `text` into the input box and submit it as one step, so a later
    /// edit cannot replace the symbol before it is sent.
    pub async fn submit_input(&self, text: impl Into<String>) -> WatchlistResult<WatchlistState> {
        self.submit_with(Some(text.into())).await
    }

    async fn submit_with(&self, text: Option<String>) -> WatchlistResult<WatchlistState> {
        let (symbol, ticket, slot) = {
            let mut shared = self.inner.shared.write().await;
            writable(&shared)?;
            let input = text.unwrap_or_else(|| shared.state.pending_input.clone());
            if self.adds_in_flight() {
                return Err(WatchlistError::Busy(input.trim().to_string()));
            }
            let symbol = validate_symbol(&input)
                .inspect_err(|err| tracing::debug!(error = %err, "add rejected locally"))?
                .to_string();
            let (ticket, slot) = self.claim(&shared, &symbol, MutationKind::Add)?;
            shared.state.pending_input = input;
            (symbol, ticket, slot)
        };
        let result = self.inner.mutation.add(&ticket.scope, &symbol).await;
        self.finish(ticket, slot, &symbol, MutationKind::Add, result).await
    }

    /// Add a symbol. Blank symbols are rejected without a request and leave
    /// the state untouched.
    pub async fn add(&self, symbol: &str) -> WatchlistResult<WatchlistState> {
        let (symbol, ticket, slot) = {
            let shared = self.inner.shared.read().await;
            writable(&shared)?;
            let symbol = validate_symbol(symbol).inspect_err(|err| {
                tracing::debug!(error = %err, "add rejected locally");
            })?;
            let (ticket, slot) = self.claim(&shared, symbol, MutationKind::Add)?;
            (symbol, ticket, slot)
        };
        let result = self.inner.mutation.add(&ticket.scope, symbol).await;
        self.finish(ticket, slot, symbol, MutationKind::Add, result).await
    }

    /// Remove an entry exactly as displayed.
    pub async fn remove(&self, symbol: &str) -> WatchlistResult<WatchlistState> {
        let (ticket, slot) = {
            let shared = self.inner.shared.read().await;
            writable(&shared)?;
            if symbol.trim().is_empty() {
                tracing::debug!("remove rejected locally: blank symbol");
                return Err(WatchlistError::Validation(symbol.to_string()));
            }
            self.claim(&shared, symbol, MutationKind::Remove)?
        };
        let result = self.inner.mutation.remove(&ticket.scope, symbol).await;
        self.finish(ticket, slot, symbol, MutationKind::Remove, result).await
    }

    /// Reserve the in-flight slot for `symbol`. Callers hold the shared lock,
    /// which keeps a scope change from interleaving.
    fn claim(
        &self,
        shared: &Shared,
        symbol: &str,
        kind: MutationKind,
    ) -> WatchlistResult<(Ticket, SlotGuard<'_>)> {
        let key = symbol.trim().to_string();
        let mut slots = lock(&self.inner.in_flight);
        if !slots.symbols.insert(key.clone()) {
            tracing::debug!(symbol = %key, "{} rejected: change already in flight", kind.as_str());
            return Err(WatchlistError::Busy(key));
        }
        if kind == MutationKind::Add {
            slots.adds += 1;
        }
        let ticket = Ticket {
            scope: shared.scope.clone(),
            activation: shared.activation,
        };
        let slot = SlotGuard {
            slots: &self.inner.in_flight,
            activation: slots.activation,
            key,
            kind,
        };
        Ok((ticket, slot))
    }

    async fn finish(
        &self,
        ticket: Ticket,
        slot: SlotGuard<'_>,
        symbol: &str,
        kind: MutationKind,
        result: WatchlistResult<Vec<WatchlistEntry>>,
    ) -> WatchlistResult<WatchlistState> {
        let mut shared = self.inner.shared.write().await;
        drop(slot);
        if shared.activation != ticket.activation {
            tracing::debug!(symbol, "dropping watchlist {} for a previous scope", kind.as_str());
            return result.map(|_| shared.state.clone());
        }
        mutation::apply_mutation(&mut shared.state, kind, symbol, result)?;
        Ok(shared.state.clone())
    }
}

fn writable(shared: &Shared) -> WatchlistResult<()> {
    if shared.scope.is_personal() {
        Ok(())
    } else {
        Err(WatchlistError::ReadOnly)
    }
}
