//! Upstream API error types

use reqwest::StatusCode;
use thiserror::Error;

/// Failure talking to the farm-supply REST API.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Connection, timeout or body read failure
    #[error("Upstream transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Upstream resource not found: {0}")]
    NotFound(String),

    /// Any other non-2xx answer. `body` is kept for logs only.
    #[error("Upstream rejected request ({status})")]
    Rejected { status: StatusCode, body: String },

    /// 2xx answer whose JSON did not match the expected shape
    #[error("Malformed upstream payload: {0}")]
    Malformed(#[from] serde_json::Error),
}

pub type ClientResult<T> = Result<T, ClientError>;
