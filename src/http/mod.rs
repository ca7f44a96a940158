//! Thin HTTP layer shared by the indexer and gas-station clients.

pub mod client;
pub mod retry;

pub use client::HttpClient;
pub use retry::{RetryConfig, RetryPolicy};
