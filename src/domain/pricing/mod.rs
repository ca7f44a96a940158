//! Pricing domain — the limit-order entry state machine.
//!
//! [`PricingState`] holds what the user is editing; [`state::reduce`] is the
//! pure transition function; [`derived::derive_pricing`] recomputes the
//! dependent quantities (amounts, rate, execution economics) on every read.

pub mod derived;
pub mod quote;
pub mod state;

use crate::shared::Token;

pub use derived::{
    derive_pricing, DerivedPricing, ExecutionEstimate, FieldIssue, PricingContext,
};
pub use quote::{GasPriceSource, PriceQuoter, QuoteKind, QuoteRequest, TradeQuote};
pub use state::{reduce, PricingAction};

// ─── Field ───────────────────────────────────────────────────────────────────

/// Which of the three triangle quantities the user is directly editing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Input,
    Output,
    Rate,
}

// ─── RateOp ──────────────────────────────────────────────────────────────────

/// Orientation of the displayed rate: output-per-input (`Multiply`) or
/// input-per-output (`Divide`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RateOp {
    Multiply,
    Divide,
}

impl RateOp {
    pub fn flipped(self) -> Self {
        match self {
            RateOp::Multiply => RateOp::Divide,
            RateOp::Divide => RateOp::Multiply,
        }
    }

    /// Whether rate math runs in the inverted direction.
    pub fn inverted(self) -> bool {
        matches!(self, RateOp::Divide)
    }
}

// ─── PricingState ────────────────────────────────────────────────────────────

/// The order-entry state owned by a UI session.
///
/// Exactly one field is independent at a time; the other two are derived on
/// read. `independent_value` is the amount slot (INPUT or OUTPUT text),
/// `rate_value` the rate slot. `dependent_value` caches the last derived
/// value for display and is cleared whenever the independent magnitude
/// changes.
#[derive(Debug, Clone, PartialEq)]
pub struct PricingState {
    pub input_token: Option<Token>,
    pub output_token: Option<Token>,
    pub independent_field: Field,
    pub previous_independent_field: Field,
    pub independent_value: String,
    pub rate_value: String,
    pub dependent_value: Option<String>,
    pub rate_op: RateOp,
}

impl PricingState {
    /// Fresh session state: selling ETH, editing the input amount.
    pub fn new(initial_output: Option<Token>) -> Self {
        Self {
            input_token: Some(Token::Eth),
            output_token: initial_output,
            independent_field: Field::Input,
            previous_independent_field: Field::Output,
            independent_value: String::new(),
            rate_value: String::new(),
            dependent_value: None,
            rate_op: RateOp::Multiply,
        }
    }

    /// The field the amount slot currently belongs to. While the rate is
    /// independent this is the previously independent amount field.
    pub fn amount_slot_field(&self) -> Field {
        if self.independent_field == Field::Rate {
            self.previous_independent_field
        } else {
            self.independent_field
        }
    }
}

impl Default for PricingState {
    fn default() -> Self {
        Self::new(None)
    }
}
