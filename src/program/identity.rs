//! Deterministic order identity: canonical key, deposit-vault address, and
//! on-chain balance probes.
//!
//! The byte layouts here are a wire-format contract with the deployed core:
//! the key is the keccak256 of the ABI parameter encoding of the order tuple,
//! and the vault is the deterministic-deployment address
//! `keccak256(0xff ‖ core ‖ key ‖ VAULT_CODE_HASH)[12..]`. External balance
//! probes query these exact addresses.

use alloy::primitives::{Address, Bytes, B256, U256};
use alloy::sol_types::SolValue;
use sha3::{Digest, Keccak256};

use crate::program::constants::{
    BALANCE_OF_SELECTOR, ETH_ADDRESS, ETH_DEPOSITS_SELECTOR, VAULT_CODE_HASH,
};

fn keccak(data: &[u8]) -> B256 {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    B256::from_slice(&hasher.finalize())
}

/// One `(target, calldata)` pair of the aggregated balance-probe batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeCall {
    pub target: Address,
    pub calldata: Bytes,
}

/// The identity-bearing parameters of an order.
///
/// Two orders with the same terms and the same one-time witness share a key
/// on purpose: that collision is what lets a locally created order and its
/// indexer-observed counterpart be recognized as the same entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderTerms {
    pub module: Address,
    pub input_token: Address,
    pub owner: Address,
    pub witness: Address,
    pub output_token: Address,
    pub min_return: U256,
}

impl OrderTerms {
    pub fn is_eth(&self) -> bool {
        self.input_token == ETH_ADDRESS
    }

    /// ABI encoding of `(address output_token, uint256 min_return)` — the
    /// module-specific half of the order tuple.
    pub fn module_data(&self) -> Bytes {
        (self.output_token, self.min_return).abi_encode_params().into()
    }

    /// Canonical order key: keccak256 of the ABI parameter encoding of
    /// `(module, input_token, owner, witness, module_data)`.
    pub fn key(&self) -> B256 {
        let encoded = (
            self.module,
            self.input_token,
            self.owner,
            self.witness,
            self.module_data(),
        )
            .abi_encode_params();
        keccak(&encoded)
    }

    /// Deterministic deposit-vault address for ERC-20 orders.
    pub fn vault(&self, core: Address) -> Address {
        let mut preimage = Vec::with_capacity(1 + 20 + 32 + 32);
        preimage.push(0xff);
        preimage.extend_from_slice(core.as_slice());
        preimage.extend_from_slice(self.key().as_slice());
        preimage.extend_from_slice(VAULT_CODE_HASH.as_slice());
        Address::from_slice(&keccak(&preimage)[12..])
    }

    /// The balance probe for this order: ERC-20 orders read
    /// `balanceOf(vault)` on the input token, ETH orders read
    /// `ethDeposits(key)` on the core contract.
    pub fn balance_probe(&self, core: Address) -> ProbeCall {
        if self.is_eth() {
            let mut calldata = Vec::with_capacity(4 + 32);
            calldata.extend_from_slice(&ETH_DEPOSITS_SELECTOR);
            calldata.extend_from_slice(self.key().as_slice());
            ProbeCall {
                target: core,
                calldata: calldata.into(),
            }
        } else {
            let mut calldata = Vec::with_capacity(4 + 32);
            calldata.extend_from_slice(&BALANCE_OF_SELECTOR);
            calldata.extend_from_slice(&self.vault(core).abi_encode());
            ProbeCall {
                target: self.input_token,
                calldata: calldata.into(),
            }
        }
    }
}
