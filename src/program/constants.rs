//! Constants for the Evergreen on-chain protocol.
//!
//! Selectors, code hashes, and byte layouts here mirror the deployed
//! contracts exactly; deviating from any of them breaks address matching.

use alloy::primitives::{address, b256, Address, B256};

// ============================================================================
// Token sentinels
// ============================================================================

/// Placeholder address denoting native ETH in order records.
pub const ETH_ADDRESS: Address = address!("EeeeeEeeeEeEeeEeEeEeeEEEeeeeEeeeeeeeEEeE");

// ============================================================================
// Vault derivation
// ============================================================================

/// keccak256 of the deposit-vault init code, fixed by the deployed core
/// contract. Part of the deterministic-deployment address preimage.
pub const VAULT_CODE_HASH: B256 =
    b256!("fa3da1081bc86587310fce8f3a5309785fc567b9b20875900cb289302d6bfa97");

// ============================================================================
// Probe selectors
// ============================================================================

/// `balanceOf(address)` — ERC-20 vault balance probe.
pub const BALANCE_OF_SELECTOR: [u8; 4] = [0x70, 0xa0, 0x82, 0x31];

/// `ethDeposits(bytes32)` — ETH order deposit probe on the core contract.
pub const ETH_DEPOSITS_SELECTOR: [u8; 4] = [0xeb, 0xd9, 0xc3, 0x9c];

// ============================================================================
// Order secrets
// ============================================================================

/// Branded prefix of every order secret (" evergreen.fi  🌲" with the emoji
/// as UTF-16 code units). The secret only deters relayer front-running, so
/// the reduced entropy of a constant prefix is intended.
pub const SECRET_PREFIX: [u8; 19] = [
    0x20, 0x65, 0x76, 0x65, 0x72, 0x67, 0x72, 0x65, 0x65, 0x6e, 0x2e, 0x66, 0x69, 0x20, 0x20,
    0xd8, 0x3c, 0xdf, 0x32,
];

/// Random bytes appended to [`SECRET_PREFIX`] to form a 32-byte key.
pub const SECRET_RANDOM_BYTES: usize = 13;

// ============================================================================
// Execution economics
// ============================================================================

/// Gas limit a filler spends executing a generic order; used to amortize gas
/// cost into the execution rate.
pub const ORDER_EXECUTE_GAS_LIMIT: u64 = 150_000;

/// Warn when the nominal rate sits more than this far below market.
pub const SLIPPAGE_WARNING_PERCENT: u64 = 30;

/// Warn when the gas-adjusted execution rate deviates more than this from
/// the nominal rate.
pub const EXECUTION_WARNING_PERCENT: u64 = 3;
