//! Pure fixed-point rate arithmetic over token amounts.
//!
//! Amounts are unsigned integers scaled by each token's decimal count; rates
//! are always scaled by 18 decimals. All math runs on 512-bit intermediates so
//! in-range operands never spuriously overflow. No async, no network calls.
//!
//! Every operation returns `Option`: `None` means "currently unknown"
//! (missing or zero operand, true overflow, division by zero), never an error.

use alloy::primitives::{I256, U256, U512};

/// Rates are fixed-point numbers at this scale.
pub const RATE_DECIMALS: u8 = 18;

const RATE_SCALE_U64: u64 = 1_000_000_000_000_000_000;

/// `10^18` as a rate denominator.
pub fn rate_scale() -> U256 {
    U256::from(RATE_SCALE_U64)
}

fn rate_scale_wide() -> U512 {
    U512::from(RATE_SCALE_U64)
}

fn pow10(exp: u32) -> Option<U512> {
    U512::from(10u64).checked_pow(U512::from(exp))
}

fn widen(value: U256) -> U512 {
    let l = value.as_limbs();
    U512::from_limbs([l[0], l[1], l[2], l[3], 0, 0, 0, 0])
}

fn narrow(value: U512) -> Option<U256> {
    let l = value.as_limbs();
    if l[4..].iter().any(|limb| *limb != 0) {
        return None;
    }
    Some(U256::from_limbs([l[0], l[1], l[2], l[3]]))
}

/// Compute `amount_b / amount_a` as an 18-decimal rate, normalizing for each
/// side's decimal count. With `invert` the reciprocal is returned instead.
///
/// The division sequence is part of the wire contract (truncation points must
/// match the on-chain math): `(b · 10^18 / a) · 10^dec_a / 10^dec_b`, with the
/// roles of `a` and `b` swapped under `invert`.
pub fn compute_rate(
    amount_a: U256,
    decimals_a: u8,
    amount_b: U256,
    decimals_b: u8,
    invert: bool,
) -> Option<U256> {
    if amount_a.is_zero() || amount_b.is_zero() {
        return None;
    }

    let (num, den, mul_dec, div_dec) = if invert {
        (amount_a, amount_b, decimals_b, decimals_a)
    } else {
        (amount_b, amount_a, decimals_a, decimals_b)
    };

    let raw = widen(num)
        .checked_mul(rate_scale_wide())?
        .checked_div(widen(den))?
        .checked_mul(pow10(mul_dec as u32)?)?
        .checked_div(pow10(div_dec as u32)?)?;

    narrow(raw)
}

/// Apply an 18-decimal rate to an amount, rescaling from `decimals_in` to
/// `decimals_out`. With `invert` the amount is divided by the rate instead.
pub fn apply_rate(
    amount: U256,
    rate: U256,
    decimals_in: u8,
    decimals_out: u8,
    invert: bool,
) -> Option<U256> {
    if amount.is_zero() || rate.is_zero() {
        return None;
    }

    let scaled = if invert {
        widen(amount)
            .checked_mul(rate_scale_wide())?
            .checked_div(widen(rate))?
    } else {
        widen(rate)
            .checked_mul(widen(amount))?
            .checked_div(rate_scale_wide())?
    };

    let raw = scaled
        .checked_mul(pow10(decimals_out as u32)?)?
        .checked_div(pow10(decimals_in as u32)?)?;

    narrow(raw)
}

/// Multiplicative inverse of an 18-decimal rate: `10^36 / rate`.
pub fn invert_rate(rate: U256) -> Option<U256> {
    if rate.is_zero() {
        return None;
    }
    let raw = rate_scale_wide()
        .checked_mul(rate_scale_wide())?
        .checked_div(widen(rate))?;
    narrow(raw)
}

/// Signed relative difference between two rates: `10^18 · a / b − 10^18`.
///
/// Rendered at 16 decimals the value reads as a percentage. The sign says
/// whether `rate_a` is above or below `rate_b`.
pub fn rate_delta(rate_a: U256, rate_b: U256) -> Option<I256> {
    if rate_b.is_zero() {
        return None;
    }
    let raw = rate_scale_wide()
        .checked_mul(widen(rate_a))?
        .checked_div(widen(rate_b))?;
    let ratio = I256::try_from(narrow(raw)?).ok()?;
    ratio.checked_sub(I256::exp10(RATE_DECIMALS as usize))
}

fn parse_digits(text: &str) -> Option<U512> {
    let ten = U512::from(10u64);
    let mut acc = U512::ZERO;
    for byte in text.bytes() {
        if !byte.is_ascii_digit() {
            return None;
        }
        acc = acc
            .checked_mul(ten)?
            .checked_add(U512::from((byte - b'0') as u64))?;
    }
    Some(acc)
}

fn parse_units_wide(text: &str, decimals: u32) -> Option<U512> {
    if text.is_empty() {
        return None;
    }
    let (whole, frac) = match text.split_once('.') {
        Some((whole, frac)) => (whole, frac),
        None => (text, ""),
    };
    if whole.is_empty() && frac.is_empty() {
        return None;
    }
    if frac.len() as u32 > decimals {
        return None;
    }

    let whole = parse_digits(whole)?;
    let frac_scaled = parse_digits(frac)?.checked_mul(pow10(decimals - frac.len() as u32)?)?;

    whole
        .checked_mul(pow10(decimals)?)?
        .checked_add(frac_scaled)
}

/// Strict parse of a user-typed decimal string into an integer at `decimals`.
///
/// Signs, exponents, grouping characters, and fractions longer than
/// `decimals` are all rejected as `None`.
pub fn parse_units(text: &str, decimals: u8) -> Option<U256> {
    narrow(parse_units_wide(text, decimals as u32)?)
}

/// Lenient parse: like [`parse_units`], but a fraction longer than `decimals`
/// does not fail — the value is computed at `decimals × 8` extra precision
/// and truncated down to the target scale.
pub fn parse_units_lenient(text: &str, decimals: u8) -> Option<U256> {
    if let Some(value) = parse_units(text, decimals) {
        return Some(value);
    }
    let margin = decimals as u32 * 8;
    let wide = parse_units_wide(text, margin)?;
    let down = wide.checked_div(pow10(margin - decimals as u32)?)?;
    narrow(down)
}

/// Whether two user-typed decimal strings denote the same magnitude
/// ("1.0" == "1.00" == " 1"). Malformed input is never equal to anything;
/// an empty string counts as zero.
pub fn numeric_eq(a: &str, b: &str) -> bool {
    match (normalize_decimal(a.trim()), normalize_decimal(b.trim())) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

fn normalize_decimal(text: &str) -> Option<(String, String)> {
    let (whole, frac) = match text.split_once('.') {
        Some((whole, frac)) => (whole, frac),
        None => (text, ""),
    };
    if !whole.bytes().all(|b| b.is_ascii_digit()) || !frac.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let whole = whole.trim_start_matches('0');
    let frac = frac.trim_end_matches('0');
    Some((whole.to_string(), frac.to_string()))
}
