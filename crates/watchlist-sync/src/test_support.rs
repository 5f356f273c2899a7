use async_trait::async_trait;
use dashboard_api::{AggregateRow, ApiError, ApiResult, WatchlistStore};
use std::collections::VecDeque;
use std::sync::Mutex;
use tokio::sync::oneshot;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Call {
    Personal(String),
    Aggregate,
    Add(String, String),
    Remove(String, String),
}

pub(crate) enum Reply {
    Symbols(ApiResult<Vec<String>>),
    Rows(ApiResult<Vec<AggregateRow>>),
}

enum Delay {
    Immediate,
    Gate(oneshot::Receiver<()>),
    Forever,
}

struct Step {
    delay: Delay,
    reply: Reply,
}

/// Scripted store: each call consumes the next queued reply in order.
#[derive(Default)]
pub(crate) struct MockStore {
    script: Mutex<VecDeque<Step>>,
    calls: Mutex<Vec<Call>>,
}

impl MockStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn symbols(self, symbols: &[&str]) -> Self {
        self.push(Delay::Immediate, Reply::Symbols(Ok(to_strings(symbols))));
        self
    }

    pub(crate) fn rows(self, rows: Vec<Vec<&str>>) -> Self {
        let rows = rows
            .into_iter()
            .map(|stocks| AggregateRow {
                stocks: to_strings(&stocks),
            })
            .collect();
        self.push(Delay::Immediate, Reply::Rows(Ok(rows)));
        self
    }

    pub(crate) fn fails(self, err: ApiError) -> Self {
        self.push(Delay::Immediate, Reply::Symbols(Err(err)));
        self
    }

    pub(crate) fn hangs(self) -> Self {
        self.push(Delay::Forever, Reply::Symbols(Ok(Vec::new())));
        self
    }

    /// Queue a reply that is held until the returned sender fires.
    pub(crate) fn gated(&self, reply: Reply) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.push(Delay::Gate(rx), reply);
        tx
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn push(&self, delay: Delay, reply: Reply) {
        self.script.lock().unwrap().push_back(Step { delay, reply });
    }

    async fn next(&self, call: Call) -> Reply {
        self.calls.lock().unwrap().push(call.clone());
        let step = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| panic!("unexpected store call: {call:?}"));

        match step.delay {
            Delay::Immediate => {}
            Delay::Gate(rx) => {
                let _ = rx.await;
            }
            Delay::Forever => std::future::pending::<()>().await,
        }
        step.reply
    }

    async fn next_symbols(&self, call: Call) -> ApiResult<Vec<String>> {
        match self.next(call).await {
            Reply::Symbols(reply) => reply,
            Reply::Rows(_) => panic!("scripted rows for a symbol request"),
        }
    }
}

#[async_trait]
impl WatchlistStore for MockStore {
    async fn personal(&self, user_id: &str) -> ApiResult<Vec<String>> {
        self.next_symbols(Call::Personal(user_id.to_string())).await
    }

    async fn aggregate(&self) -> ApiResult<Vec<AggregateRow>> {
        match self.next(Call::Aggregate).await {
            Reply::Rows(reply) => reply,
            Reply::Symbols(Err(err)) => Err(err),
            Reply::Symbols(Ok(_)) => panic!("scripted symbols for an aggregate request"),
        }
    }

    async fn add(&self, user_id: &str, stock: &str) -> ApiResult<Vec<String>> {
        self.next_symbols(Call::Add(user_id.to_string(), stock.to_string()))
            .await
    }

    async fn remove(&self, user_id: &str, stock: &str) -> ApiResult<Vec<String>> {
        self.next_symbols(Call::Remove(user_id.to_string(), stock.to_string()))
            .await
    }

    fn backend_name(&self) -> &'static str {
        "mock"
    }
}

pub(crate) fn to_strings(symbols: &[&str]) -> Vec<String> {
    symbols.iter().map(|s| s.to_string()).collect()
}

/// Yield until the store has seen `count` calls.
pub(crate) async fn wait_for_calls(store: &MockStore, count: usize) {
    for _ in 0..1000 {
        if store.calls().len() >= count {
            return;
        }
        tokio::task::yield_now().await;
    }
    panic!(
        "store saw {} calls, expected {count}",
        store.calls().len()
    );
}
