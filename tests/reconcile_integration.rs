//! Integration tests for order reconciliation with mock collaborators.
//!
//! Exercises the full place → cache → probe → indexer merge cycle against
//! in-process stand-ins for the indexer and the aggregate-call contract.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use alloy::primitives::{address, Address, Bytes, U256};
use async_trait::async_trait;

use evergreen_sdk::prelude::*;

const OWNER: Address = address!("3333333333333333333333333333333333333333");

fn dai() -> Token {
    Token::Erc20(address!("6b175474e89094c44da98b954eedeac495271d0f"))
}

fn placed_order(min_return: u64) -> Order {
    let new_order = NewOrder {
        input_token: Token::Eth,
        output_token: dai(),
        input_amount: U256::from(1_000_000_000_000_000_000u64),
        min_return: U256::from(min_return),
        owner: OWNER,
    };
    build_placement(&new_order, &NetworkConfig::mainnet())
        .unwrap()
        .order
}

// ─── Mock collaborators ──────────────────────────────────────────────────────

/// Indexer stub: fixed order sets, or failure.
#[derive(Default)]
struct StubIndexer {
    open: Vec<Order>,
    settled: Vec<Order>,
    unavailable: bool,
}

#[async_trait]
impl OrderIndexer for StubIndexer {
    async fn open_orders(&self, _owner: Address) -> Result<Vec<Order>, SdkError> {
        if self.unavailable {
            return Err(SdkError::Other("indexer down".into()));
        }
        Ok(self.open.clone())
    }

    async fn settled_orders(&self, _owner: Address) -> Result<Vec<Order>, SdkError> {
        if self.unavailable {
            return Err(SdkError::Other("indexer down".into()));
        }
        Ok(self.settled.clone())
    }
}

/// Aggregate-call stub: answers each probe from a balance table keyed by
/// calldata, recording batch sizes.
#[derive(Default)]
struct StubAggregator {
    balances: HashMap<Bytes, U256>,
    fail: bool,
    batches: Arc<Mutex<Vec<usize>>>,
}

impl StubAggregator {
    fn fund(&mut self, order: &Order, core: Address, balance: U256) {
        let probe = order.terms().unwrap().balance_probe(core);
        self.balances.insert(probe.calldata, balance);
    }
}

#[async_trait]
impl CallAggregator for StubAggregator {
    async fn aggregate(&self, calls: Vec<ProbeCall>) -> Result<Vec<Bytes>, SdkError> {
        self.batches.lock().unwrap().push(calls.len());
        if self.fail {
            return Err(SdkError::Other("rpc down".into()));
        }
        Ok(calls
            .into_iter()
            .map(|call| {
                let balance = self.balances.get(&call.calldata).copied().unwrap_or_default();
                Bytes::from(balance.to_be_bytes::<32>().to_vec())
            })
            .collect())
    }
}

fn reconciler(
    indexer: StubIndexer,
    aggregator: StubAggregator,
) -> Reconciler<StubIndexer, MemoryOrderStore, StubAggregator> {
    Reconciler::new(
        indexer,
        MemoryOrderStore::new(),
        aggregator,
        NetworkConfig::mainnet(),
    )
}

// ─── Tests ───────────────────────────────────────────────────────────────────

mod merging {
    use super::*;

    #[tokio::test]
    async fn test_local_and_indexed_copy_collapse_to_one_entry() {
        let network = NetworkConfig::mainnet();
        let local = placed_order(2_000_000_000);

        // the indexer reports the same order (same secret), with an id
        let mut indexed = local.clone();
        indexed.id = Some("0xabc".into());

        let mut aggregator = StubAggregator::default();
        aggregator.fund(&local, network.core, local.input_amount);
        let indexer = StubIndexer {
            open: vec![indexed],
            ..Default::default()
        };

        let reconciler = reconciler(indexer, aggregator);
        reconciler
            .store()
            .append_if_absent(OWNER, network.chain_id, &local);

        let view = reconciler.reconcile(OWNER, &PendingActivity::new()).await;
        assert_eq!(view.all.len(), 1);
        assert_eq!(view.open.len(), 1);
        // the local record won: it still has no indexer id but keeps the secret
        assert_eq!(view.open[0].id, None);
        assert!(view.open[0].secret.is_some());
    }

    #[tokio::test]
    async fn test_indexer_only_orders_join_the_view() {
        let mine = placed_order(2_000_000_000);
        let other_client = placed_order(3_000_000_000);

        let network = NetworkConfig::mainnet();
        let mut aggregator = StubAggregator::default();
        aggregator.fund(&mine, network.core, mine.input_amount);
        let indexer = StubIndexer {
            open: vec![other_client.clone()],
            ..Default::default()
        };

        let reconciler = reconciler(indexer, aggregator);
        reconciler
            .store()
            .append_if_absent(OWNER, network.chain_id, &mine);

        let view = reconciler.reconcile(OWNER, &PendingActivity::new()).await;
        assert_eq!(view.open.len(), 2);
        assert!(view.open.iter().any(|o| o.matches(&other_client)));
    }
}

mod liveness {
    use super::*;

    #[tokio::test]
    async fn test_drained_vault_removes_order_from_open_view() {
        let network = NetworkConfig::mainnet();
        let executed = placed_order(2_000_000_000);
        let live = placed_order(3_000_000_000);

        let mut aggregator = StubAggregator::default();
        // executed order's vault probes to zero, live one keeps its deposit
        aggregator.fund(&executed, network.core, U256::ZERO);
        aggregator.fund(&live, network.core, live.input_amount);

        let reconciler = reconciler(StubIndexer::default(), aggregator);
        for order in [&executed, &live] {
            reconciler
                .store()
                .append_if_absent(OWNER, network.chain_id, order);
        }

        let view = reconciler.reconcile(OWNER, &PendingActivity::new()).await;
        assert_eq!(view.open.len(), 1);
        assert!(view.open[0].matches(&live));
        // still visible in the historical view
        assert_eq!(view.all.len(), 2);
    }

    #[tokio::test]
    async fn test_probes_go_out_as_one_batch() {
        let network = NetworkConfig::mainnet();
        let orders: Vec<Order> = (0..5u64)
            .map(|i| placed_order(1_000_000_000 + i))
            .collect();

        let mut aggregator = StubAggregator::default();
        for order in &orders {
            aggregator.fund(order, network.core, order.input_amount);
        }
        let batches = aggregator.batches.clone();

        let reconciler = reconciler(StubIndexer::default(), aggregator);
        for order in &orders {
            reconciler
                .store()
                .append_if_absent(OWNER, network.chain_id, order);
        }

        reconciler.reconcile(OWNER, &PendingActivity::new()).await;
        // five orders, exactly one aggregated call
        assert_eq!(*batches.lock().unwrap(), vec![5]);
    }

    #[tokio::test]
    async fn test_probe_batch_failure_keeps_cached_amounts() {
        let network = NetworkConfig::mainnet();
        let order = placed_order(2_000_000_000);

        let aggregator = StubAggregator {
            fail: true,
            ..Default::default()
        };

        let reconciler = reconciler(StubIndexer::default(), aggregator);
        reconciler
            .store()
            .append_if_absent(OWNER, network.chain_id, &order);

        // liveness unknown: the order stays in the open view with its stored
        // amount rather than being blamed for the batch failure
        let view = reconciler.reconcile(OWNER, &PendingActivity::new()).await;
        assert_eq!(view.open.len(), 1);
        assert_eq!(view.open[0].input_amount, order.input_amount);
    }
}

mod degradation {
    use super::*;

    #[tokio::test]
    async fn test_indexer_outage_degrades_to_cache_plus_pending() {
        let network = NetworkConfig::mainnet();
        let cached = placed_order(2_000_000_000);
        let just_placed = placed_order(3_000_000_000);

        let mut aggregator = StubAggregator::default();
        aggregator.fund(&cached, network.core, cached.input_amount);
        // just_placed's vault is unfunded until its transaction mines
        aggregator.fund(&just_placed, network.core, U256::ZERO);

        let indexer = StubIndexer {
            unavailable: true,
            ..Default::default()
        };
        let reconciler = reconciler(indexer, aggregator);
        for order in [&cached, &just_placed] {
            reconciler
                .store()
                .append_if_absent(OWNER, network.chain_id, order);
        }

        let mut pending = PendingActivity::new();
        pending.track_placement(just_placed.clone());

        let view = reconciler.reconcile(OWNER, &pending).await;
        assert_eq!(view.open.len(), 2);
        assert_eq!(pending.state_of(&just_placed), Some(PendingKind::Placing));
    }

    #[tokio::test]
    async fn test_history_outage_yields_empty_list() {
        let indexer = StubIndexer {
            unavailable: true,
            ..Default::default()
        };
        let reconciler = reconciler(indexer, StubAggregator::default());
        assert!(reconciler.order_history(OWNER).await.is_empty());
    }

    #[tokio::test]
    async fn test_history_passes_through_settled_orders() {
        let mut settled = placed_order(2_000_000_000);
        settled.status = OrderStatus::Executed;
        settled.bought = Some(U256::from(2_100_000_000u64));

        let indexer = StubIndexer {
            settled: vec![settled],
            ..Default::default()
        };
        let reconciler = reconciler(indexer, StubAggregator::default());
        let history = reconciler.order_history(OWNER).await;
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].status, OrderStatus::Executed);
    }
}
