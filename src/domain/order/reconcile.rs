//! Multi-source order reconciliation.
//!
//! Three disjoint sources of truth feed one canonical view: the local cache
//! (orders this client created), the indexer (authoritative once it has seen
//! an order), and locally pending not-yet-mined transactions. Local orders
//! win conflicts — they are fresher right after placement and carry the
//! `secret` needed to cancel.
//!
//! Collaborator failures degrade the view, they never raise: an unreachable
//! indexer leaves cache + pending, a failed probe batch leaves every cached
//! order's liveness unknown.

use alloy::primitives::{Address, Bytes, U256};
use async_trait::async_trait;
use tracing::{debug, warn};

use super::state::{PendingActivity, ReconciledOrders};
use super::Order;
use crate::error::SdkError;
use crate::network::NetworkConfig;
use crate::program::identity::ProbeCall;

// ─── Collaborator traits ─────────────────────────────────────────────────────

/// Query-by-owner order indexer.
#[async_trait]
pub trait OrderIndexer: Send + Sync {
    async fn open_orders(&self, owner: Address) -> Result<Vec<Order>, SdkError>;
    async fn settled_orders(&self, owner: Address) -> Result<Vec<Order>, SdkError>;
}

/// On-chain aggregate-call collaborator: one multicall per probe batch,
/// results in call order.
#[async_trait]
pub trait CallAggregator: Send + Sync {
    async fn aggregate(&self, calls: Vec<ProbeCall>) -> Result<Vec<Bytes>, SdkError>;
}

// ─── Reconciler ──────────────────────────────────────────────────────────────

/// Produces the canonical order view for one owner on one network.
pub struct Reconciler<I, S, A> {
    indexer: I,
    store: S,
    aggregator: A,
    network: NetworkConfig,
}

impl<I, S, A> Reconciler<I, S, A>
where
    I: OrderIndexer,
    S: super::store::OrderStore,
    A: CallAggregator,
{
    pub fn new(indexer: I, store: S, aggregator: A, network: NetworkConfig) -> Self {
        Self {
            indexer,
            store,
            aggregator,
            network,
        }
    }

    /// The cache this reconciler reads; placements go through it too.
    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn network(&self) -> &NetworkConfig {
        &self.network
    }

    /// Merge cache, indexer, and pending transactions into one view.
    pub async fn reconcile(&self, owner: Address, pending: &PendingActivity) -> ReconciledOrders {
        let mut cached = self.store.orders_for(owner, self.network.chain_id);
        debug!(count = cached.len(), %owner, "loaded cached orders");

        self.refresh_balances(&mut cached).await;
        let live: Vec<Order> = cached
            .iter()
            .filter(|order| !order.input_amount.is_zero())
            .cloned()
            .collect();

        let indexer_open = match self.indexer.open_orders(owner).await {
            Ok(orders) => {
                debug!(count = orders.len(), "fetched open orders from indexer");
                orders
            }
            Err(err) => {
                warn!(error = %err, "indexer unavailable, using cache-only view");
                Vec::new()
            }
        };

        merge(cached, live, indexer_open, pending)
    }

    /// Settled (executed or cancelled) orders for the history display.
    pub async fn order_history(&self, owner: Address) -> Vec<Order> {
        match self.indexer.settled_orders(owner).await {
            Ok(orders) => orders,
            Err(err) => {
                warn!(error = %err, "indexer unavailable, no order history");
                Vec::new()
            }
        }
    }

    /// Refresh each cached order's deposit from a single aggregated probe.
    /// Any batch-level failure leaves all amounts untouched (liveness
    /// unknown) rather than guessing per order.
    async fn refresh_balances(&self, cached: &mut [Order]) {
        if cached.is_empty() {
            return;
        }
        let calls: Option<Vec<ProbeCall>> = cached
            .iter()
            .map(|order| {
                order
                    .terms()
                    .map(|terms| terms.balance_probe(self.network.core))
            })
            .collect();
        let Some(calls) = calls else {
            warn!("cached order is missing identity fields, skipping balance probe");
            return;
        };

        match self.aggregator.aggregate(calls).await {
            Ok(returns) if returns.len() == cached.len() => {
                for (order, data) in cached.iter_mut().zip(returns) {
                    if let Some(balance) = decode_balance(&data) {
                        order.input_amount = balance;
                    }
                }
            }
            Ok(returns) => {
                warn!(
                    expected = cached.len(),
                    got = returns.len(),
                    "balance probe arity mismatch, liveness unknown"
                );
            }
            Err(err) => {
                warn!(error = %err, "balance probe batch failed, liveness unknown");
            }
        }
    }
}

fn decode_balance(data: &[u8]) -> Option<U256> {
    if data.len() < 32 {
        return None;
    }
    Some(U256::from_be_slice(&data[..32]))
}

/// Pure three-source merge. Local orders always precede and suppress their
/// indexer duplicates; pending placements stay visible everywhere.
pub(crate) fn merge(
    local_all: Vec<Order>,
    local_live: Vec<Order>,
    indexer_open: Vec<Order>,
    pending: &PendingActivity,
) -> ReconciledOrders {
    let fresh: Vec<Order> = indexer_open
        .into_iter()
        .filter(|order| !local_all.iter().any(|local| local.matches(order)))
        .collect();

    let mut all = local_all;
    all.extend(fresh.iter().cloned());

    let mut open = local_live;
    open.extend(fresh);

    // a just-placed order probes to zero until its transaction mines; the
    // pending set keeps it on screen
    for order in &all {
        if pending.is_placing(order) && !open.iter().any(|o| o.matches(order)) {
            open.push(order.clone());
        }
    }
    for order in pending.placing() {
        if !all.iter().any(|o| o.matches(order)) {
            all.push(order.clone());
        }
        if !open.iter().any(|o| o.matches(order)) {
            open.push(order.clone());
        }
    }

    ReconciledOrders { open, all }
}
