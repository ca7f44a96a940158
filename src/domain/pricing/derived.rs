//! Derived pricing: the dependent triangle values, execution economics, and
//! advisory warnings, recomputed on every read.
//!
//! [`derive_pricing`] is pure: async collaborator results arrive through
//! [`PricingContext`], each tagged with the request it answered. A result
//! whose request no longer matches the current state is ignored, and the
//! request the engine actually wants is reported back instead.

use alloy::primitives::{I256, U256};

use super::quote::{QuoteKind, QuoteRequest, TradeQuote};
use super::{Field, PricingState};
use crate::program::constants::{
    EXECUTION_WARNING_PERCENT, ORDER_EXECUTE_GAS_LIMIT, SLIPPAGE_WARNING_PERCENT,
};
use crate::shared::rate::{
    apply_rate, compute_rate, invert_rate, numeric_eq, parse_units, parse_units_lenient,
    rate_delta, RATE_DECIMALS,
};
use crate::shared::Token;

// ─── Inputs ──────────────────────────────────────────────────────────────────

/// Externally gathered inputs to a derivation pass: token metadata plus the
/// latest async results the app holds.
#[derive(Debug, Clone, Default)]
pub struct PricingContext {
    pub input_decimals: Option<u8>,
    pub output_decimals: Option<u8>,
    /// Best-route quote for the current amount (exact-in or exact-out).
    pub best_quote: Option<TradeQuote>,
    /// Fast gas price in wei.
    pub gas_price: Option<U256>,
    /// Quote converting the required gas cost into input-token units.
    pub gas_quote: Option<TradeQuote>,
    /// Wallet balance of the input token.
    pub input_balance: Option<U256>,
}

// ─── Outputs ─────────────────────────────────────────────────────────────────

/// Field-level problems that block placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldIssue {
    /// Entered value parses to zero, is malformed, or overflows.
    InvalidValue,
    /// Input amount exceeds the wallet balance.
    InsufficientBalance,
}

/// Gas-adjusted execution rate.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ExecutionEstimate {
    /// Not enough data yet.
    #[default]
    Unknown,
    /// The rate a filler would realize after paying gas, and its signed
    /// deviation from the nominal rate.
    Rate { rate: U256, delta: Option<I256> },
    /// Gas cost exceeds the input amount; the order can never execute.
    NeverExecutes,
}

/// Everything derivable from a [`PricingState`] snapshot.
///
/// `input_amount` is carried here explicitly — it is the one quantity that
/// detaches from the output across quote refreshes and must never live in
/// hidden module state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DerivedPricing {
    pub input_amount: Option<U256>,
    pub output_amount: Option<U256>,
    /// Nominal rate in the current orientation.
    pub rate: Option<U256>,
    pub inverse_rate: Option<U256>,
    /// Live market rate from the best-route quote, same orientation.
    pub market_rate: Option<U256>,
    /// Signed deviation of the nominal rate from the market rate,
    /// always expressed in output-per-input orientation.
    pub market_delta: Option<I256>,
    pub execution: ExecutionEstimate,
    /// Execution rate degraded beyond tolerance or order never executes.
    pub execution_warning: bool,
    /// Nominal rate more than the slippage threshold below market.
    pub slippage_warning: bool,
    /// Problem with the value in the edited field.
    pub independent_issue: Option<FieldIssue>,
    /// Problem with the input amount (balance check).
    pub input_issue: Option<FieldIssue>,
    /// All triangle values present and nothing blocking placement.
    pub ready: bool,
    /// Best-route quote the engine needs for this state, if any.
    pub wanted_quote: Option<QuoteRequest>,
    /// Gas-cost conversion quote the engine needs, if any.
    pub wanted_gas_quote: Option<QuoteRequest>,
}

fn percent_limit(percent: u64) -> I256 {
    // N% expressed at rate precision: N · 10^16
    I256::from_raw(U256::from(percent) * U256::from(10u64).pow(U256::from(16u64)))
}

fn matching<'a>(quote: Option<&'a TradeQuote>, wanted: Option<&QuoteRequest>) -> Option<&'a TradeQuote> {
    match (quote, wanted) {
        (Some(quote), Some(request)) if quote.answers(request) => Some(quote),
        _ => None,
    }
}

// ─── Derivation ──────────────────────────────────────────────────────────────

/// Recompute every dependent quantity for the given state snapshot.
pub fn derive_pricing(state: &PricingState, ctx: &PricingContext) -> DerivedPricing {
    let mut derived = DerivedPricing::default();

    let (Some(input_token), Some(output_token)) = (state.input_token, state.output_token) else {
        return derived;
    };
    let (Some(input_decimals), Some(output_decimals)) =
        (ctx.input_decimals, ctx.output_decimals)
    else {
        return derived;
    };

    // ── amount slot ──────────────────────────────────────────────────────
    let slot_field = state.amount_slot_field();
    let slot_decimals = match slot_field {
        Field::Input => input_decimals,
        _ => output_decimals,
    };
    let parsed_slot = if state.independent_value.is_empty() {
        None
    } else {
        parse_units(&state.independent_value, slot_decimals).filter(|v| !v.is_zero())
    };
    if !state.independent_value.is_empty() && parsed_slot.is_none() {
        derived.independent_issue = Some(FieldIssue::InvalidValue);
    }

    // ── the quote this state needs ───────────────────────────────────────
    derived.wanted_quote = parsed_slot.map(|amount| QuoteRequest {
        sell: input_token,
        buy: output_token,
        amount,
        kind: match slot_field {
            Field::Input => QuoteKind::ExactIn,
            _ => QuoteKind::ExactOut,
        },
    });
    let quote = matching(ctx.best_quote.as_ref(), derived.wanted_quote.as_ref());

    // ── triangle ─────────────────────────────────────────────────────────
    let inverted = state.rate_op.inverted();
    match state.independent_field {
        Field::Input => {
            derived.input_amount = parsed_slot;
            derived.output_amount = quote.map(|q| q.output_amount);
            derived.rate = derived.input_amount.zip(derived.output_amount).and_then(
                |(input, output)| {
                    compute_rate(input, input_decimals, output, output_decimals, inverted)
                },
            );
        }
        Field::Output => {
            derived.output_amount = parsed_slot;
            derived.input_amount = quote.map(|q| q.input_amount);
            derived.rate = derived.input_amount.zip(derived.output_amount).and_then(
                |(input, output)| {
                    compute_rate(input, input_decimals, output, output_decimals, inverted)
                },
            );
        }
        Field::Rate => {
            let entered = if state.rate_value.is_empty() || numeric_eq(&state.rate_value, "0") {
                None
            } else {
                parse_units_lenient(&state.rate_value, RATE_DECIMALS).filter(|r| !r.is_zero())
            };
            derived.input_amount = match slot_field {
                Field::Input => parsed_slot,
                _ => quote.map(|q| q.input_amount),
            };
            derived.rate = entered;
            derived.output_amount = derived.input_amount.zip(entered).and_then(
                |(input, rate)| {
                    apply_rate(input, rate, input_decimals, output_decimals, inverted)
                },
            );
        }
    }
    derived.inverse_rate = derived.rate.and_then(invert_rate);

    // ── market comparison ────────────────────────────────────────────────
    derived.market_rate = quote.and_then(|q| {
        compute_rate(
            q.input_amount,
            input_decimals,
            q.output_amount,
            output_decimals,
            inverted,
        )
    });
    // the delta is always compared in output-per-input orientation
    derived.market_delta = if inverted {
        derived
            .inverse_rate
            .zip(derived.market_rate.and_then(invert_rate))
            .and_then(|(rate, market)| rate_delta(rate, market))
    } else {
        derived
            .rate
            .zip(derived.market_rate)
            .and_then(|(rate, market)| rate_delta(rate, market))
    };
    derived.slippage_warning = derived
        .market_delta
        .map(|delta| delta < -percent_limit(SLIPPAGE_WARNING_PERCENT))
        .unwrap_or(false);

    // ── gas-adjusted execution rate ──────────────────────────────────────
    let required_gas = ctx
        .gas_price
        .and_then(|price| price.checked_mul(U256::from(ORDER_EXECUTE_GAS_LIMIT)));
    derived.wanted_gas_quote = match (required_gas, input_token) {
        (Some(amount), Token::Erc20(_)) => Some(QuoteRequest {
            sell: Token::Eth,
            buy: input_token,
            amount,
            kind: QuoteKind::ExactIn,
        }),
        _ => None,
    };
    let used_input = if input_token.is_eth() {
        required_gas
    } else {
        matching(ctx.gas_quote.as_ref(), derived.wanted_gas_quote.as_ref())
            .map(|q| q.output_amount)
    };

    derived.execution = match (derived.input_amount, used_input) {
        (Some(input), Some(gas)) => match input.checked_sub(gas) {
            None => ExecutionEstimate::NeverExecutes,
            Some(real_input) => {
                let rate = derived.output_amount.and_then(|output| {
                    compute_rate(real_input, input_decimals, output, output_decimals, inverted)
                });
                match rate {
                    Some(rate) => ExecutionEstimate::Rate {
                        rate,
                        delta: derived
                            .rate
                            .and_then(|nominal| rate_delta(rate, nominal)),
                    },
                    None => ExecutionEstimate::Unknown,
                }
            }
        },
        _ => ExecutionEstimate::Unknown,
    };
    derived.execution_warning = match &derived.execution {
        ExecutionEstimate::NeverExecutes => true,
        ExecutionEstimate::Rate { delta, .. } => delta
            .map(|delta| delta.unsigned_abs() > percent_limit(EXECUTION_WARNING_PERCENT).unsigned_abs())
            .unwrap_or(false),
        ExecutionEstimate::Unknown => false,
    };

    // ── balance check ────────────────────────────────────────────────────
    if let (Some(balance), Some(input)) = (ctx.input_balance, derived.input_amount) {
        if balance < input {
            derived.input_issue = Some(FieldIssue::InsufficientBalance);
        }
    }

    derived.ready = derived.output_amount.is_some()
        && derived.independent_issue.is_none()
        && derived.input_issue.is_none();

    derived
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::pricing::{reduce, PricingAction, RateOp};
    use alloy::primitives::Address;

    const DAI: Token = Token::Erc20(Address::repeat_byte(0xda));

    fn units(value: u64, decimals: u32) -> U256 {
        U256::from(value) * U256::from(10u64).pow(U256::from(decimals))
    }

    /// ETH -> DAI state editing the given field.
    fn eth_dai_state(field: Field, value: &str) -> PricingState {
        let state = PricingState::new(Some(DAI));
        reduce(
            &state,
            &PricingAction::SetIndependent {
                field,
                value: value.to_string(),
            },
        )
    }

    fn ctx_18_6() -> PricingContext {
        PricingContext {
            input_decimals: Some(18),
            output_decimals: Some(6),
            ..Default::default()
        }
    }

    fn quote_for(request: QuoteRequest, input: U256, output: U256) -> TradeQuote {
        TradeQuote {
            request,
            input_amount: input,
            output_amount: output,
        }
    }

    #[test]
    fn test_input_independent_wants_exact_in_quote() {
        let state = eth_dai_state(Field::Input, "1");
        let derived = derive_pricing(&state, &ctx_18_6());

        assert_eq!(derived.input_amount, Some(units(1, 18)));
        assert_eq!(derived.output_amount, None);
        let wanted = derived.wanted_quote.unwrap();
        assert_eq!(wanted.kind, QuoteKind::ExactIn);
        assert_eq!(wanted.amount, units(1, 18));
    }

    #[test]
    fn test_input_independent_with_quote_completes_triangle() {
        let state = eth_dai_state(Field::Input, "1");
        let mut ctx = ctx_18_6();
        let wanted = derive_pricing(&state, &ctx).wanted_quote.unwrap();
        ctx.best_quote = Some(quote_for(wanted, units(1, 18), units(1000, 6)));

        let derived = derive_pricing(&state, &ctx);
        assert_eq!(derived.output_amount, Some(units(1000, 6)));
        assert_eq!(derived.rate, Some(units(1000, 18)));
        assert_eq!(derived.market_rate, Some(units(1000, 18)));
        assert_eq!(derived.market_delta, Some(I256::ZERO));
        assert!(derived.ready);
    }

    #[test]
    fn test_stale_quote_is_discarded() {
        let state = eth_dai_state(Field::Input, "2");
        let mut ctx = ctx_18_6();
        // quote answered for 1 ETH, state now says 2 ETH
        let stale = QuoteRequest {
            sell: Token::Eth,
            buy: DAI,
            amount: units(1, 18),
            kind: QuoteKind::ExactIn,
        };
        ctx.best_quote = Some(quote_for(stale, units(1, 18), units(1000, 6)));

        let derived = derive_pricing(&state, &ctx);
        assert_eq!(derived.output_amount, None);
        assert_eq!(derived.wanted_quote.unwrap().amount, units(2, 18));
    }

    #[test]
    fn test_output_independent_wants_exact_out_quote() {
        let state = eth_dai_state(Field::Output, "1000");
        let mut ctx = ctx_18_6();

        let wanted = derive_pricing(&state, &ctx).wanted_quote.unwrap();
        assert_eq!(wanted.kind, QuoteKind::ExactOut);
        assert_eq!(wanted.amount, units(1000, 6));

        ctx.best_quote = Some(quote_for(wanted, units(1, 18), units(1000, 6)));
        let derived = derive_pricing(&state, &ctx);
        assert_eq!(derived.input_amount, Some(units(1, 18)));
        assert_eq!(derived.rate, Some(units(1000, 18)));
    }

    #[test]
    fn test_rate_independent_applies_entered_rate() {
        let state = eth_dai_state(Field::Input, "1");
        let state = reduce(
            &state,
            &PricingAction::SetIndependent {
                field: Field::Rate,
                value: "2000".into(),
            },
        );
        let derived = derive_pricing(&state, &ctx_18_6());

        assert_eq!(derived.input_amount, Some(units(1, 18)));
        assert_eq!(derived.rate, Some(units(2000, 18)));
        assert_eq!(derived.output_amount, Some(units(2000, 6)));
    }

    #[test]
    fn test_rate_independent_zero_rate_leaves_output_blank() {
        let state = eth_dai_state(Field::Input, "1");
        let state = reduce(
            &state,
            &PricingAction::SetIndependent {
                field: Field::Rate,
                value: "0".into(),
            },
        );
        let derived = derive_pricing(&state, &ctx_18_6());
        assert_eq!(derived.output_amount, None);
        assert_eq!(derived.rate, None);
        assert!(!derived.ready);
    }

    #[test]
    fn test_divide_orientation_inverts_rate() {
        let state = eth_dai_state(Field::Input, "1");
        let mut state = reduce(
            &state,
            &PricingAction::SetIndependent {
                field: Field::Rate,
                value: "0.001".into(),
            },
        );
        state.rate_op = RateOp::Divide;

        let derived = derive_pricing(&state, &ctx_18_6());
        // 1 ETH at 0.001 ETH-per-DAI buys 1000 DAI
        assert_eq!(derived.output_amount, Some(units(1000, 6)));
    }

    #[test]
    fn test_invalid_value_flags_field() {
        let state = eth_dai_state(Field::Input, "not-a-number");
        let derived = derive_pricing(&state, &ctx_18_6());
        assert_eq!(derived.independent_issue, Some(FieldIssue::InvalidValue));
        assert!(!derived.ready);

        let state = eth_dai_state(Field::Input, "0");
        let derived = derive_pricing(&state, &ctx_18_6());
        assert_eq!(derived.independent_issue, Some(FieldIssue::InvalidValue));
    }

    #[test]
    fn test_insufficient_balance_flags_input() {
        let state = eth_dai_state(Field::Input, "2");
        let mut ctx = ctx_18_6();
        ctx.input_balance = Some(units(1, 18));
        let derived = derive_pricing(&state, &ctx);
        assert_eq!(derived.input_issue, Some(FieldIssue::InsufficientBalance));
        assert!(!derived.ready);
    }

    #[test]
    fn test_gas_exceeding_input_never_executes() {
        // 100 gwei * 150_000 = 0.015 ETH required, only 0.01 ETH offered
        let state = eth_dai_state(Field::Input, "0.01");
        let mut ctx = ctx_18_6();
        ctx.gas_price = Some(U256::from(100_000_000_000u64));
        let wanted = derive_pricing(&state, &ctx).wanted_quote.unwrap();
        ctx.best_quote = Some(quote_for(wanted, units(1, 16), units(10, 6)));

        let derived = derive_pricing(&state, &ctx);
        assert_eq!(derived.execution, ExecutionEstimate::NeverExecutes);
        assert!(derived.execution_warning);
        // advisory only: the order itself is still placeable
        assert!(derived.ready);
    }

    #[test]
    fn test_execution_rate_degradation_warns_past_threshold() {
        // 1 ETH in; gas burns 0.1 ETH of it, so the realized rate is ~11% up
        // on the nominal rate (1000 / 0.9 vs 1000 / 1.0)
        let state = eth_dai_state(Field::Input, "1");
        let mut ctx = ctx_18_6();
        ctx.gas_price = Some(units(1, 18) / U256::from(10u64) / U256::from(ORDER_EXECUTE_GAS_LIMIT));
        let wanted = derive_pricing(&state, &ctx).wanted_quote.unwrap();
        ctx.best_quote = Some(quote_for(wanted, units(1, 18), units(1000, 6)));

        let derived = derive_pricing(&state, &ctx);
        match derived.execution {
            ExecutionEstimate::Rate { rate, delta } => {
                assert!(rate > units(1000, 18));
                assert!(delta.unwrap() > I256::ZERO);
            }
            other => panic!("expected execution rate, got {other:?}"),
        }
        assert!(derived.execution_warning);
    }

    #[test]
    fn test_small_gas_cost_does_not_warn() {
        // gas burns 1% of the input: delta stays inside the 3% band
        let state = eth_dai_state(Field::Input, "1");
        let mut ctx = ctx_18_6();
        ctx.gas_price = Some(units(1, 18) / U256::from(100u64) / U256::from(ORDER_EXECUTE_GAS_LIMIT));
        let wanted = derive_pricing(&state, &ctx).wanted_quote.unwrap();
        ctx.best_quote = Some(quote_for(wanted, units(1, 18), units(1000, 6)));

        let derived = derive_pricing(&state, &ctx);
        assert!(matches!(derived.execution, ExecutionEstimate::Rate { .. }));
        assert!(!derived.execution_warning);
    }

    #[test]
    fn test_rate_far_below_market_raises_slippage_warning() {
        // market pays 1000 DAI per ETH, user asks only 500: 50% below
        let state = eth_dai_state(Field::Input, "1");
        let state = reduce(
            &state,
            &PricingAction::SetIndependent {
                field: Field::Rate,
                value: "500".into(),
            },
        );
        let mut ctx = ctx_18_6();
        let wanted = derive_pricing(&state, &ctx).wanted_quote.unwrap();
        ctx.best_quote = Some(quote_for(wanted, units(1, 18), units(1000, 6)));

        let derived = derive_pricing(&state, &ctx);
        assert!(derived.slippage_warning);

        // asking above market is not a slippage problem
        let state = reduce(
            &state,
            &PricingAction::SetIndependent {
                field: Field::Rate,
                value: "1500".into(),
            },
        );
        let derived = derive_pricing(&state, &ctx);
        assert!(!derived.slippage_warning);
    }

    #[test]
    fn test_erc20_input_needs_gas_quote() {
        let mut state = PricingState::new(Some(Token::Eth));
        state.input_token = Some(DAI);
        state.output_token = Some(Token::Eth);
        let state = reduce(
            &state,
            &PricingAction::SetIndependent {
                field: Field::Input,
                value: "1000".into(),
            },
        );
        let mut ctx = PricingContext {
            input_decimals: Some(6),
            output_decimals: Some(18),
            gas_price: Some(U256::from(100_000_000_000u64)),
            ..Default::default()
        };

        let derived = derive_pricing(&state, &ctx);
        let gas_wanted = derived.wanted_gas_quote.unwrap();
        assert_eq!(gas_wanted.sell, Token::Eth);
        assert_eq!(gas_wanted.buy, DAI);
        assert_eq!(gas_wanted.amount, units(15, 15)); // 0.015 ETH
        // without the conversion quote the estimate stays unknown
        assert_eq!(derived.execution, ExecutionEstimate::Unknown);

        ctx.gas_quote = Some(quote_for(gas_wanted, units(15, 15), units(15, 6)));
        let wanted = derive_pricing(&state, &ctx).wanted_quote.unwrap();
        ctx.best_quote = Some(quote_for(wanted, units(1000, 6), units(1, 18)));
        let derived = derive_pricing(&state, &ctx);
        assert!(matches!(derived.execution, ExecutionEstimate::Rate { .. }));
    }
}
