//! # Evergreen SDK
//!
//! Client-side engine for the Evergreen limit-order protocol: the order
//! pricing state machine and the multi-source order reconciler.
//!
//! ## Architecture
//!
//! The SDK is organized in layers:
//!
//! 1. **Core** — Fixed-point rate math, the pricing state machine, order
//!    identity/placement rules, domain models (always available)
//! 2. **Collaborator seams** — Price quoting, gas price, the order store,
//!    and aggregated balance probes are traits the app implements
//! 3. **HTTP** — `IndexerClient` and `GasStationClient`, thin `reqwest`
//!    clients with per-request retry (feature `http`, default on)
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use evergreen_sdk::prelude::*;
//!
//! let mut state = PricingState::new(Some(dai));
//! state = reduce(&state, &PricingAction::SetIndependent {
//!     field: Field::Input,
//!     value: "1.0".into(),
//! });
//!
//! let derived = derive_pricing(&state, &ctx);
//! if let Some(request) = &derived.wanted_quote {
//!     // fetch the quote, refresh ctx, derive again
//! }
//! ```

// ── Layer 1: Core ────────────────────────────────────────────────────────────

/// Shared newtypes and fixed-point math used across all domains.
pub mod shared;

/// Domain modules (vertical slices): types, wire types, conversions, state.
pub mod domain;

/// On-chain protocol rules: identity derivation, encodings, placement.
pub mod program;

/// Unified SDK error types.
pub mod error;

/// Per-network deployment and endpoint configuration.
pub mod network;

// ── Layer 3: HTTP ────────────────────────────────────────────────────────────

/// Thin HTTP layer with retry policies.
#[cfg(feature = "http")]
pub mod http;

// ── Prelude ──────────────────────────────────────────────────────────────────

pub mod prelude {
    // Shared newtypes + rate math
    pub use crate::shared::rate::{
        apply_rate, compute_rate, invert_rate, parse_units, parse_units_lenient, rate_delta,
    };
    pub use crate::shared::Token;

    // Domain types — pricing
    pub use crate::domain::pricing::{
        derive_pricing, reduce, DerivedPricing, ExecutionEstimate, Field, FieldIssue,
        GasPriceSource, PriceQuoter, PricingAction, PricingContext, PricingState, QuoteKind,
        QuoteRequest, RateOp, TradeQuote,
    };

    // Domain types — order
    pub use crate::domain::order::{
        storage_key, CallAggregator, MemoryOrderStore, Order, OrderIndexer, OrderStatus,
        OrderStore, PendingActivity, PendingKind, ReconciledOrders, Reconciler,
    };

    // Program rules
    pub use crate::program::{
        build_placement, generate_secret, order_kind, NewOrder, OrderKind, OrderTerms, Placement,
        ProbeCall,
    };

    // Errors + network
    pub use crate::error::SdkError;
    pub use crate::network::NetworkConfig;

    // HTTP collaborators
    #[cfg(feature = "http")]
    pub use crate::domain::order::IndexerClient;
    #[cfg(feature = "http")]
    pub use crate::domain::pricing::quote::GasStationClient;
    #[cfg(feature = "http")]
    pub use crate::http::{HttpClient, RetryPolicy};
}
