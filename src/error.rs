//! Unified SDK error types.
//!
//! Arithmetic never lands here: rate math reports "unknown" through `Option`
//! and field-level input problems surface as data on the derived state.

use thiserror::Error;

/// Top-level SDK error.
#[derive(Error, Debug)]
pub enum SdkError {
    #[error("HTTP error: {0}")]
    Http(#[from] HttpError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Signer error: {0}")]
    Signer(String),

    #[error("{0}")]
    Other(String),
}

/// HTTP-layer errors.
#[derive(Error, Debug)]
pub enum HttpError {
    #[cfg(feature = "http")]
    #[error("Request failed: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Server error {status}: {body}")]
    ServerError { status: u16, body: String },

    #[error("Timeout")]
    Timeout,

    #[error("Max retries exceeded after {attempts} attempts: {last_error}")]
    MaxRetriesExceeded { attempts: u32, last_error: String },
}

/// Order parameter validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("input and output tokens are the same")]
    SameToken,

    #[error("amount must be greater than zero")]
    ZeroAmount,

    #[error("invalid amount string: {0}")]
    InvalidAmount(String),
}
