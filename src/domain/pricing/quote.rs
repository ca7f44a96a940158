//! Quote collaborators: best-route price quotes and gas price.
//!
//! Routing itself lives outside this crate; callers plug a [`PriceQuoter`]
//! in. Every quote carries the request it answered so consumers can detect
//! and discard results that arrive for a state that has since changed.

use alloy::primitives::U256;
use async_trait::async_trait;

use crate::shared::Token;

// ─── Quote types ─────────────────────────────────────────────────────────────

/// Direction of a quote: fix the sell amount or fix the buy amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuoteKind {
    ExactIn,
    ExactOut,
}

/// A best-route quote request. Doubles as the cache key for its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct QuoteRequest {
    pub sell: Token,
    pub buy: Token,
    pub amount: U256,
    pub kind: QuoteKind,
}

/// A best-route quote, token-exact on both sides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TradeQuote {
    /// The request this quote answers.
    pub request: QuoteRequest,
    pub input_amount: U256,
    pub output_amount: U256,
}

impl TradeQuote {
    /// Whether this quote answers `request`; a stale quote must be ignored.
    pub fn answers(&self, request: &QuoteRequest) -> bool {
        self.request == *request
    }
}

// ─── Collaborator traits ─────────────────────────────────────────────────────

/// Best-route price source. `None` means "no route", not an error.
#[async_trait]
pub trait PriceQuoter: Send + Sync {
    async fn best_quote(&self, request: &QuoteRequest) -> Option<TradeQuote>;
}

/// Current fast gas price in wei. `None` means unavailable right now.
#[async_trait]
pub trait GasPriceSource: Send + Sync {
    async fn fast_gas_price(&self) -> Option<U256>;
}

// ─── Gas station client ──────────────────────────────────────────────────────

#[cfg(feature = "http")]
mod gas_station {
    use super::*;
    use crate::http::{HttpClient, RetryPolicy};
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct GasStationResponse {
        data: GasStationData,
    }

    #[derive(Deserialize)]
    struct GasStationData {
        fast: u64,
    }

    /// Gas-station HTTP client (`{"data":{"fast":<wei>}}` endpoints).
    ///
    /// Apps refresh this once per block; failures degrade to `None`.
    pub struct GasStationClient {
        http: HttpClient,
        url: String,
    }

    impl GasStationClient {
        pub fn new(url: impl Into<String>) -> Self {
            Self {
                http: HttpClient::new(),
                url: url.into(),
            }
        }
    }

    #[async_trait]
    impl GasPriceSource for GasStationClient {
        async fn fast_gas_price(&self) -> Option<U256> {
            match self
                .http
                .get_json::<GasStationResponse>(&self.url, RetryPolicy::Idempotent)
                .await
            {
                Ok(response) => Some(U256::from(response.data.fast)),
                Err(err) => {
                    tracing::warn!(error = %err, "gas station unavailable");
                    None
                }
            }
        }
    }
}

#[cfg(feature = "http")]
pub use gas_station::GasStationClient;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_answers_only_its_own_request() {
        let request = QuoteRequest {
            sell: Token::Eth,
            buy: Token::Eth,
            amount: U256::from(10u64),
            kind: QuoteKind::ExactIn,
        };
        let quote = TradeQuote {
            request,
            input_amount: U256::from(10u64),
            output_amount: U256::from(20u64),
        };
        assert!(quote.answers(&request));

        let other = QuoteRequest {
            amount: U256::from(11u64),
            ..request
        };
        assert!(!quote.answers(&other));
    }
}
