use dashboard_api::ApiError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WatchlistError {
    /// Network unreachable or request timed out.
    #[error("transport error: {0}")]
    Transport(String),

    /// Non-2xx response from the store.
    #[error("server error {status}: {message}")]
    Server { status: u16, message: String },

    /// 2xx response whose body could not be decoded.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// Rejected locally before any request was sent.
    #[error("invalid symbol: {0:?}")]
    Validation(String),

    #[error("the aggregate watchlist is read-only")]
    ReadOnly,

    #[error("a change to {0} is already in flight")]
    Busy(String),
}

impl WatchlistError {
    /// True for errors raised before a request left the client.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            WatchlistError::Validation(_) | WatchlistError::ReadOnly | WatchlistError::Busy(_)
        )
    }

    pub(crate) fn timed_out() -> Self {
        WatchlistError::Transport("request timed out".to_string())
    }
}

impl From<ApiError> for WatchlistError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Timeout => WatchlistError::timed_out(),
            ApiError::Transport(msg) | ApiError::InvalidUrl(msg) => WatchlistError::Transport(msg),
            ApiError::Server { status, body } => WatchlistError::Server {
                status,
                message: body,
            },
            ApiError::InvalidResponse(msg) => WatchlistError::InvalidResponse(msg),
        }
    }
}

pub type WatchlistResult<T> = Result<T, WatchlistError>;
