//! Per-network deployment and endpoint configuration.

use alloy::primitives::{address, Address};

pub const CHAIN_MAINNET: u64 = 1;
pub const CHAIN_SEPOLIA: u64 = 11_155_111;

/// Deployment addresses and service endpoints for one network.
#[derive(Debug, Clone)]
pub struct NetworkConfig {
    pub chain_id: u64,
    /// Core order registry: holds ETH deposits, derives deposit vaults.
    pub core: Address,
    /// Limit-order module handling `(output_token, min_return)` orders.
    pub limit_order_module: Address,
    /// Order indexer GraphQL endpoint.
    pub indexer_url: String,
    /// Gas station endpoint (`{"data":{"fast":<wei>}}`).
    pub gas_station_url: String,
}

impl NetworkConfig {
    pub fn mainnet() -> Self {
        Self {
            chain_id: CHAIN_MAINNET,
            core: address!("b4b2e2e7f6e4c1d5a9c3f8d7a6b5c4d3e2f1a0b9"),
            limit_order_module: address!("37a1f37e9b5a4b3c2d1e0f9a8b7c6d5e4f3a2b1c"),
            indexer_url: "https://api.thegraph.com/subgraphs/name/evergreen-fi/evergreen"
                .to_string(),
            gas_station_url: "https://gas.evergreen.fi/v1/price".to_string(),
        }
    }

    pub fn sepolia() -> Self {
        Self {
            chain_id: CHAIN_SEPOLIA,
            core: address!("5e9011a2b3c4d5e6f7a8b9c0d1e2f3a4b5c6d7e8"),
            limit_order_module: address!("8f0e1d2c3b4a5f6e7d8c9b0a1f2e3d4c5b6a7f8e"),
            indexer_url: "https://api.thegraph.com/subgraphs/name/evergreen-fi/evergreen-sepolia"
                .to_string(),
            gas_station_url: "https://gas.evergreen.fi/v1/price?chain=sepolia".to_string(),
        }
    }

    /// Look up the configuration for a chain id, if the protocol is
    /// deployed there.
    pub fn for_chain(chain_id: u64) -> Option<Self> {
        match chain_id {
            CHAIN_MAINNET => Some(Self::mainnet()),
            CHAIN_SEPOLIA => Some(Self::sepolia()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_chain_lookup() {
        assert_eq!(NetworkConfig::for_chain(1).unwrap().chain_id, CHAIN_MAINNET);
        assert!(NetworkConfig::for_chain(123_456).is_none());
    }
}
