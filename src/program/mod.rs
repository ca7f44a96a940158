//! On-chain protocol rules: constants, order identity, placement assembly.
//!
//! Everything here mirrors externally observable contract behavior —
//! address derivation and encodings — not the contracts' own logic.

pub mod constants;
pub mod identity;
pub mod place;

pub use identity::{OrderTerms, ProbeCall};
pub use place::{build_placement, generate_secret, order_kind, NewOrder, OrderKind, Placement};
