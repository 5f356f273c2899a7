use thiserror::Error;

/// Longest response body kept on a `Server` error.
const MAX_BODY_LEN: usize = 200;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("request timed out")]
    Timeout,

    #[error("transport error: {0}")]
    Transport(String),

    #[error("server returned {status}: {body}")]
    Server { status: u16, body: String },

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("invalid base url: {0}")]
    InvalidUrl(String),
}

impl ApiError {
    pub(crate) fn server(status: reqwest::StatusCode, body: &str) -> Self {
        let body = match body.char_indices().nth(MAX_BODY_LEN) {
            Some((idx, _)) => format!("{}...", &body[..idx]),
            None => body.to_string(),
        };
        ApiError::Server {
            status: status.as_u16(),
            body,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Timeout
        } else if err.is_decode() {
            ApiError::InvalidResponse(err.to_string())
        } else {
            ApiError::Transport(err.to_string())
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
