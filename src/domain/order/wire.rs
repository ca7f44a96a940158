//! Wire types for the order indexer's GraphQL responses.

use alloy::primitives::{Address, B256};
use serde::Deserialize;

use super::OrderStatus;

/// Top-level GraphQL envelope. A missing `data` field (server-side error)
/// reads as an empty result set.
#[derive(Deserialize, Debug, Clone)]
pub struct GraphResponse {
    #[serde(default)]
    pub data: Option<OrdersData>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct OrdersData {
    pub orders: Vec<GraphOrder>,
}

/// One order as the indexer reports it.
///
/// The open-orders and settled-orders queries select different field
/// subsets, so everything outside the common core is optional.
#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct GraphOrder {
    pub id: String,
    #[serde(default)]
    pub owner: Option<Address>,
    #[serde(default)]
    pub module: Option<Address>,
    pub input_token: Address,
    pub output_token: Address,
    pub input_amount: String,
    pub min_return: String,
    #[serde(default)]
    pub witness: Option<Address>,
    #[serde(default)]
    pub secret: Option<B256>,
    pub status: OrderStatus,
    #[serde(default)]
    pub bought: Option<String>,
    #[serde(default)]
    pub cancelled_tx_hash: Option<B256>,
    #[serde(default)]
    pub executed_tx_hash: Option<B256>,
    #[serde(default)]
    pub updated_at: Option<String>,
}
