//! Order domain — limit orders, reconciliation, indexer access.

#[cfg(feature = "http")]
pub mod client;
mod convert;
pub mod reconcile;
pub mod state;
pub mod store;
pub mod wire;

use alloy::primitives::{Address, B256, U256};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::program::constants::ETH_ADDRESS;
use crate::program::identity::OrderTerms;

#[cfg(feature = "http")]
pub use client::IndexerClient;
pub use reconcile::{CallAggregator, OrderIndexer, Reconciler};
pub use state::{PendingActivity, PendingKind, ReconciledOrders};
pub use store::{storage_key, MemoryOrderStore, OrderStore};

// ─── OrderStatus ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Open,
    Executed,
    Cancelled,
}

// ─── Order ───────────────────────────────────────────────────────────────────

/// A limit order as this client sees it.
///
/// Created locally at placement time (full identity, a `secret` only the
/// creator knows) or observed through the indexer. Settled indexer records
/// carry no identity fields beyond the id, so those are optional; `status`
/// is the only field that changes over the lifecycle, and this engine never
/// flips it itself — it only merges views.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Order {
    /// Indexer-assigned id; `None` until the order has been indexed.
    pub id: Option<String>,
    pub module: Option<Address>,
    pub input_token: Address,
    pub output_token: Address,
    pub owner: Address,
    pub witness: Option<Address>,
    /// One-time key whose address is the witness; known only to the creator
    /// until settlement.
    pub secret: Option<B256>,
    /// Current deposit backing the order (refreshed from balance probes).
    pub input_amount: U256,
    /// Deposit at creation time, kept for display once the vault drains.
    pub creation_amount: U256,
    pub min_return: U256,
    pub status: OrderStatus,
    /// Amount received, populated once executed.
    pub bought: Option<U256>,
    pub executed_tx: Option<B256>,
    pub cancelled_tx: Option<B256>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Order {
    pub fn is_eth(&self) -> bool {
        self.input_token == ETH_ADDRESS
    }

    pub fn is_open(&self) -> bool {
        self.status == OrderStatus::Open
    }

    /// Identity-bearing terms, when all of them are known.
    pub fn terms(&self) -> Option<OrderTerms> {
        Some(OrderTerms {
            module: self.module?,
            input_token: self.input_token,
            owner: self.owner,
            witness: self.witness?,
            output_token: self.output_token,
            min_return: self.min_return,
        })
    }

    /// Canonical order key, when derivable.
    pub fn key(&self) -> Option<B256> {
        self.terms().map(|terms| terms.key())
    }

    /// Whether two records describe the same order: by `secret` when both
    /// carry one, otherwise by derived key.
    pub fn matches(&self, other: &Order) -> bool {
        if let (Some(a), Some(b)) = (self.secret, other.secret) {
            return a == b;
        }
        matches!((self.key(), other.key()), (Some(a), Some(b)) if a == b)
    }

    /// Amount to display as the order's size: the live deposit while funded,
    /// the creation amount afterwards.
    pub fn display_amount(&self) -> U256 {
        if self.input_amount.is_zero() {
            self.creation_amount
        } else {
            self.input_amount
        }
    }
}
