//! Local order cache — the persistence collaborator.
//!
//! The cache is a key-value store keyed by `(owner, chain_id)` with two
//! operations: append-if-absent and read-all. Apps back it with whatever
//! storage they have; [`MemoryOrderStore`] ships for tests and ephemeral
//! sessions.

use std::collections::HashMap;
use std::sync::Mutex;

use alloy::primitives::Address;

use super::Order;

/// Canonical storage key for kv-backed implementations.
pub fn storage_key(owner: Address, chain_id: u64) -> String {
    format!("orders_{owner:#x}{chain_id}")
}

/// Persistent order cache collaborator.
pub trait OrderStore: Send + Sync {
    /// Store an order unless a matching one (same secret or key) is already
    /// present under the same `(owner, chain_id)`.
    fn append_if_absent(&self, owner: Address, chain_id: u64, order: &Order);

    /// All orders stored under `(owner, chain_id)`.
    fn orders_for(&self, owner: Address, chain_id: u64) -> Vec<Order>;
}

/// In-memory [`OrderStore`].
#[derive(Default)]
pub struct MemoryOrderStore {
    inner: Mutex<HashMap<(Address, u64), Vec<Order>>>,
}

impl MemoryOrderStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl OrderStore for MemoryOrderStore {
    fn append_if_absent(&self, owner: Address, chain_id: u64, order: &Order) {
        let mut inner = self.inner.lock().expect("order store poisoned");
        let orders = inner.entry((owner, chain_id)).or_default();
        if !orders.iter().any(|existing| existing.matches(order)) {
            orders.push(order.clone());
        }
    }

    fn orders_for(&self, owner: Address, chain_id: u64) -> Vec<Order> {
        self.inner
            .lock()
            .expect("order store poisoned")
            .get(&(owner, chain_id))
            .cloned()
            .unwrap_or_default()
    }
}
