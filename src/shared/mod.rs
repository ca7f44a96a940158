//! Shared newtypes and fixed-point utilities used across all domains.

pub mod fmt;
pub mod rate;

pub use rate::{
    apply_rate, compute_rate, invert_rate, parse_units, parse_units_lenient, rate_delta,
};

use alloy::primitives::Address;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::program::constants::ETH_ADDRESS;

// ─── Token ───────────────────────────────────────────────────────────────────

/// A tradable asset: native ETH or an ERC-20 contract.
///
/// On the wire and in order records ETH appears as the placeholder address;
/// this enum keeps the distinction explicit everywhere else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Token {
    Eth,
    Erc20(Address),
}

impl Token {
    /// The address this token takes in order records and probe calls.
    pub fn address(&self) -> Address {
        match self {
            Token::Eth => ETH_ADDRESS,
            Token::Erc20(address) => *address,
        }
    }

    /// Inverse of [`Token::address`]: maps the ETH placeholder back.
    pub fn from_address(address: Address) -> Self {
        if address == ETH_ADDRESS {
            Token::Eth
        } else {
            Token::Erc20(address)
        }
    }

    pub fn is_eth(&self) -> bool {
        matches!(self, Token::Eth)
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Eth => write!(f, "ETH"),
            Token::Erc20(address) => write!(f, "{address:#x}"),
        }
    }
}

impl Serialize for Token {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Token {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        if s == "ETH" {
            return Ok(Token::Eth);
        }
        s.parse::<Address>()
            .map(Token::from_address)
            .map_err(serde::de::Error::custom)
    }
}
