//! Indexer sub-client — GraphQL order queries by owner.

use alloy::primitives::Address;
use async_trait::async_trait;
use tracing::warn;

use super::reconcile::OrderIndexer;
use super::wire::GraphResponse;
use super::Order;
use crate::error::SdkError;
use crate::http::{HttpClient, RetryPolicy};

const OPEN_ORDERS_QUERY: &str = r#"
query GetOrdersByOwner($owner: String) {
  orders(where:{owner:$owner,status:open}) {
    id
    owner
    module
    inputToken
    outputToken
    inputAmount
    minReturn
    witness
    secret
    status
  }
}"#;

const SETTLED_ORDERS_QUERY: &str = r#"
query GetOrdersByOwner($owner: String) {
  orders(where:{owner:$owner,status_not:open}) {
    id
    inputToken
    outputToken
    inputAmount
    minReturn
    bought
    status
    cancelledTxHash
    executedTxHash
    updatedAt
  }
}"#;

/// GraphQL client for the order indexer.
pub struct IndexerClient {
    http: HttpClient,
    url: String,
}

impl IndexerClient {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            http: HttpClient::new(),
            url: url.into(),
        }
    }

    async fn query(&self, query: &str, owner: Address) -> Result<Vec<Order>, SdkError> {
        let body = serde_json::json!({
            "query": query,
            "variables": { "owner": format!("{owner:#x}") },
        });
        let response: GraphResponse = self
            .http
            .post_json(&self.url, &body, RetryPolicy::Idempotent)
            .await?;

        response
            .data
            .map(|data| data.orders)
            .unwrap_or_default()
            .into_iter()
            .map(|order| order.into_order(owner))
            .collect()
    }
}

#[async_trait]
impl OrderIndexer for IndexerClient {
    async fn open_orders(&self, owner: Address) -> Result<Vec<Order>, SdkError> {
        self.query(OPEN_ORDERS_QUERY, owner).await.map_err(|err| {
            warn!(error = %err, "open-orders query failed");
            err
        })
    }

    async fn settled_orders(&self, owner: Address) -> Result<Vec<Order>, SdkError> {
        self.query(SETTLED_ORDERS_QUERY, owner)
            .await
            .map_err(|err| {
                warn!(error = %err, "settled-orders query failed");
                err
            })
    }
}
