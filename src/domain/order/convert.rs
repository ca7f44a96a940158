//! Conversions: indexer wire types → Order domain types.

use alloy::primitives::{Address, U256};
use chrono::DateTime;

use super::wire::GraphOrder;
use super::Order;
use crate::error::{SdkError, ValidationError};

fn parse_amount(text: &str) -> Result<U256, SdkError> {
    U256::from_str_radix(text, 10)
        .map_err(|_| ValidationError::InvalidAmount(text.to_string()).into())
}

impl GraphOrder {
    /// Build a domain order. The settled-orders query omits `owner`, so the
    /// queried owner fills the gap.
    pub(crate) fn into_order(self, fallback_owner: Address) -> Result<Order, SdkError> {
        let input_amount = parse_amount(&self.input_amount)?;
        let updated_at = self
            .updated_at
            .as_deref()
            .map(|text| {
                text.parse::<i64>()
                    .ok()
                    .and_then(|secs| DateTime::from_timestamp(secs, 0))
                    .ok_or_else(|| ValidationError::InvalidAmount(text.to_string()))
            })
            .transpose()?;

        Ok(Order {
            id: Some(self.id),
            module: self.module,
            input_token: self.input_token,
            output_token: self.output_token,
            owner: self.owner.unwrap_or(fallback_owner),
            witness: self.witness,
            secret: self.secret,
            input_amount,
            creation_amount: input_amount,
            min_return: parse_amount(&self.min_return)?,
            status: self.status,
            bought: self.bought.as_deref().map(parse_amount).transpose()?,
            executed_tx: self.executed_tx_hash,
            cancelled_tx: self.cancelled_tx_hash,
            updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::order::wire::GraphResponse;
    use crate::domain::order::OrderStatus;
    use alloy::primitives::address;

    #[test]
    fn test_settled_order_converts() {
        let json = r#"{
            "data": {
                "orders": [{
                    "id": "0x02",
                    "inputToken": "0x2222222222222222222222222222222222222222",
                    "outputToken": "0x5555555555555555555555555555555555555555",
                    "inputAmount": "1000000000000000000",
                    "minReturn": "2000000000",
                    "bought": "2100000000",
                    "status": "executed",
                    "updatedAt": "1612345678"
                }]
            }
        }"#;
        let wire: GraphResponse = serde_json::from_str(json).unwrap();
        let owner = address!("3333333333333333333333333333333333333333");
        let mut data = wire.data.unwrap();
        let order = data.orders.remove(0).into_order(owner).unwrap();

        assert_eq!(order.owner, owner);
        assert_eq!(order.status, OrderStatus::Executed);
        assert_eq!(order.bought, Some(U256::from(2_100_000_000u64)));
        assert_eq!(order.input_amount, U256::from(1_000_000_000_000_000_000u64));
        assert_eq!(order.updated_at.unwrap().timestamp(), 1_612_345_678);
        // settled records carry no identity beyond the id
        assert_eq!(order.key(), None);
    }

    #[test]
    fn test_garbage_amount_is_an_error() {
        let json = r#"{
            "data": {
                "orders": [{
                    "id": "0x02",
                    "inputToken": "0x2222222222222222222222222222222222222222",
                    "outputToken": "0x5555555555555555555555555555555555555555",
                    "inputAmount": "not-a-number",
                    "minReturn": "2000000000",
                    "status": "open"
                }]
            }
        }"#;
        let wire: GraphResponse = serde_json::from_str(json).unwrap();
        let owner = address!("3333333333333333333333333333333333333333");
        let mut data = wire.data.unwrap();
        assert!(data.orders.remove(0).into_order(owner).is_err());
    }
}
