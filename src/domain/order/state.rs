//! Order state containers — app-owned, SDK-provided update logic.

use alloy::primitives::B256;

use super::Order;

// ─── PendingActivity ─────────────────────────────────────────────────────────

/// What an order is currently waiting on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingKind {
    /// Place transaction submitted, not yet mined.
    Placing,
    /// Cancel transaction submitted, not yet mined.
    Cancelling,
}

/// Locally submitted, not-yet-mined transactions.
///
/// The app owns an instance, records submissions as they happen, and drops
/// entries once it sees the transaction mined. The reconciler uses the
/// placing set to keep just-submitted orders visible before the indexer or
/// a balance probe can confirm them.
#[derive(Debug, Clone, Default)]
pub struct PendingActivity {
    placing: Vec<Order>,
    cancelling: Vec<B256>,
}

impl PendingActivity {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a submitted place transaction.
    pub fn track_placement(&mut self, order: Order) {
        if !self.placing.iter().any(|p| p.matches(&order)) {
            self.placing.push(order);
        }
    }

    /// Record a submitted cancel transaction for the order with `secret`.
    pub fn track_cancel(&mut self, secret: B256) {
        if !self.cancelling.contains(&secret) {
            self.cancelling.push(secret);
        }
    }

    /// Drop a placement once its transaction mined.
    pub fn placement_confirmed(&mut self, order: &Order) {
        self.placing.retain(|p| !p.matches(order));
    }

    /// Drop a cancellation once its transaction mined.
    pub fn cancel_confirmed(&mut self, secret: B256) {
        self.cancelling.retain(|s| *s != secret);
    }

    pub fn is_placing(&self, order: &Order) -> bool {
        self.placing.iter().any(|p| p.matches(order))
    }

    pub fn placing(&self) -> &[Order] {
        &self.placing
    }

    /// Pending badge for an order card, cancellation taking precedence.
    pub fn state_of(&self, order: &Order) -> Option<PendingKind> {
        if let Some(secret) = order.secret {
            if self.cancelling.contains(&secret) {
                return Some(PendingKind::Cancelling);
            }
        }
        if self.is_placing(order) {
            return Some(PendingKind::Placing);
        }
        None
    }

    pub fn is_empty(&self) -> bool {
        self.placing.is_empty() && self.cancelling.is_empty()
    }
}

// ─── ReconciledOrders ────────────────────────────────────────────────────────

/// The canonical, duplicate-free order view produced by reconciliation.
#[derive(Debug, Clone, Default)]
pub struct ReconciledOrders {
    /// Orders to show as open: live cached orders, indexer-open orders not
    /// cached locally, and just-submitted pending orders.
    pub open: Vec<Order>,
    /// Every known order regardless of liveness, for historical display.
    pub all: Vec<Order>,
}

impl ReconciledOrders {
    pub fn is_empty(&self) -> bool {
        self.open.is_empty()
    }
}
