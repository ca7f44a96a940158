//! Order placement assembly: one-time secret/witness generation and the
//! record handed to the transaction builder.

use alloy::primitives::{Address, Bytes, B256, U256};
use alloy::signers::local::PrivateKeySigner;

use crate::domain::order::{Order, OrderStatus};
use crate::error::{SdkError, ValidationError};
use crate::network::NetworkConfig;
use crate::program::constants::{SECRET_PREFIX, SECRET_RANDOM_BYTES};
use crate::program::identity::OrderTerms;
use crate::shared::Token;

// ─── OrderKind ───────────────────────────────────────────────────────────────

/// Deposit path of an order, decided by the token pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderKind {
    EthToToken,
    TokenToEth,
    TokenToToken,
}

/// Which deposit path a pair takes.
pub fn order_kind(input: Token, output: Token) -> OrderKind {
    match (input, output) {
        (Token::Eth, _) => OrderKind::EthToToken,
        (_, Token::Eth) => OrderKind::TokenToEth,
        _ => OrderKind::TokenToToken,
    }
}

// ─── Placement ───────────────────────────────────────────────────────────────

/// Parameters of an order about to be placed.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub input_token: Token,
    pub output_token: Token,
    pub input_amount: U256,
    pub min_return: U256,
    pub owner: Address,
}

/// Everything the placement transaction builder needs: the order record to
/// cache, its identity terms, the raw module data, and the one-time
/// secret/witness pair.
#[derive(Debug, Clone)]
pub struct Placement {
    pub order: Order,
    pub terms: OrderTerms,
    pub module_data: Bytes,
    pub secret: B256,
    pub witness: Address,
    pub kind: OrderKind,
}

/// Generate a fresh order secret and its witness address.
///
/// The secret is a secp256k1 private key: the branded prefix plus
/// [`SECRET_RANDOM_BYTES`] random bytes. It only deters relayer
/// front-running, so the reduced entropy is intended.
pub fn generate_secret() -> Result<(B256, Address), SdkError> {
    let mut bytes = [0u8; 32];
    bytes[..SECRET_PREFIX.len()].copy_from_slice(&SECRET_PREFIX);
    let tail: [u8; SECRET_RANDOM_BYTES] = rand::random();
    bytes[SECRET_PREFIX.len()..].copy_from_slice(&tail);

    let secret = B256::from(bytes);
    let signer =
        PrivateKeySigner::from_bytes(&secret).map_err(|err| SdkError::Signer(err.to_string()))?;
    Ok((secret, signer.address()))
}

/// Assemble a placement from validated order parameters.
pub fn build_placement(new_order: &NewOrder, network: &NetworkConfig) -> Result<Placement, SdkError> {
    if new_order.input_token == new_order.output_token {
        return Err(ValidationError::SameToken.into());
    }
    if new_order.input_amount.is_zero() || new_order.min_return.is_zero() {
        return Err(ValidationError::ZeroAmount.into());
    }

    let (secret, witness) = generate_secret()?;
    let terms = OrderTerms {
        module: network.limit_order_module,
        input_token: new_order.input_token.address(),
        owner: new_order.owner,
        witness,
        output_token: new_order.output_token.address(),
        min_return: new_order.min_return,
    };

    let order = Order {
        id: None,
        module: Some(terms.module),
        input_token: terms.input_token,
        output_token: terms.output_token,
        owner: terms.owner,
        witness: Some(witness),
        secret: Some(secret),
        input_amount: new_order.input_amount,
        creation_amount: new_order.input_amount,
        min_return: new_order.min_return,
        status: OrderStatus::Open,
        bought: None,
        executed_tx: None,
        cancelled_tx: None,
        updated_at: None,
    };

    Ok(Placement {
        module_data: terms.module_data(),
        terms,
        order,
        secret,
        witness,
        kind: order_kind(new_order.input_token, new_order.output_token),
    })
}
