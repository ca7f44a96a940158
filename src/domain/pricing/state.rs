//! Pure state transitions for the order-entry state machine.

use super::{Field, PricingState};
use crate::shared::fmt::format_units;
use crate::shared::rate::{invert_rate, numeric_eq, parse_units_lenient, RATE_DECIMALS};
use crate::shared::Token;

/// Order-entry actions, dispatched through [`reduce`].
#[derive(Debug, Clone, PartialEq)]
pub enum PricingAction {
    /// Swap input and output tokens. The entered rate no longer applies
    /// across swapped sides, so all values reset and INPUT becomes
    /// independent again.
    FlipTokens,
    /// Toggle the rate orientation, re-expressing an entered rate as its
    /// multiplicative inverse so it keeps meaning the same economic rate.
    FlipRateOp,
    /// Pick a token for one side. Selecting the other side's token clears
    /// that side instead of allowing a same-token pair.
    SelectToken { field: Field, token: Token },
    /// User typed into the given field, making it independent.
    SetIndependent { field: Field, value: String },
    /// Reset the dependent slot; issued when the independent field is
    /// OUTPUT or RATE and the input amount must be re-derived from a quote.
    ClearDependent,
}

/// Apply an action to a state snapshot, returning the next snapshot.
pub fn reduce(state: &PricingState, action: &PricingAction) -> PricingState {
    match action {
        PricingAction::FlipTokens => PricingState {
            input_token: state.output_token,
            output_token: state.input_token,
            independent_field: Field::Input,
            independent_value: String::new(),
            rate_value: String::new(),
            dependent_value: None,
            ..state.clone()
        },

        PricingAction::FlipRateOp => {
            let flipped = parse_units_lenient(&state.rate_value, RATE_DECIMALS)
                .and_then(invert_rate)
                .map(|rate| format_units(rate, RATE_DECIMALS, RATE_DECIMALS))
                .unwrap_or_default();
            PricingState {
                rate_value: flipped,
                rate_op: state.rate_op.flipped(),
                ..state.clone()
            }
        }

        PricingAction::SelectToken { field, token } => {
            let input = match field {
                Field::Input => Some(*token),
                _ => state.input_token,
            };
            let output = match field {
                Field::Output => Some(*token),
                _ => state.output_token,
            };

            if input.is_some() && input == output {
                // same-token pair: keep the side just chosen, clear the other
                PricingState {
                    input_token: (*field == Field::Input).then_some(*token),
                    output_token: (*field == Field::Output).then_some(*token),
                    ..state.clone()
                }
            } else {
                PricingState {
                    input_token: input,
                    output_token: output,
                    ..state.clone()
                }
            }
        }

        PricingAction::SetIndependent { field, value } => PricingState {
            independent_value: if *field != Field::Rate {
                value.clone()
            } else {
                state.independent_value.clone()
            },
            rate_value: if *field == Field::Rate {
                value.clone()
            } else {
                state.rate_value.clone()
            },
            // an exact numeric echo keeps the cached dependent value alive
            dependent_value: if numeric_eq(value, &state.independent_value) {
                state.dependent_value.clone()
            } else {
                None
            },
            independent_field: *field,
            previous_independent_field: if state.independent_field == *field {
                state.previous_independent_field
            } else {
                state.independent_field
            },
            ..state.clone()
        },

        PricingAction::ClearDependent => PricingState {
            dependent_value: None,
            ..state.clone()
        },
    }
}
