//! Display formatting for fixed-point amounts.
//!
//! Turns raw scaled integers back into decimal strings for UI display and for
//! re-entering computed values into the pricing state (rate re-orientation).

use alloy::primitives::{I256, U256};

/// Format a scaled amount as a decimal string, keeping at most
/// `max_fraction` fractional digits (truncating, not rounding) and trimming
/// trailing zeros.
pub fn format_units(amount: U256, decimals: u8, max_fraction: u8) -> String {
    let digits = amount.to_string();
    let decimals = decimals as usize;

    let padded = if digits.len() <= decimals {
        format!("{}{}", "0".repeat(decimals - digits.len() + 1), digits)
    } else {
        digits
    };

    let split = padded.len() - decimals;
    let whole = &padded[..split];
    let fraction = &padded[split..];

    let keep = (max_fraction as usize).min(fraction.len());
    let fraction = fraction[..keep].trim_end_matches('0');

    if fraction.is_empty() {
        whole.to_string()
    } else {
        format!("{}.{}", whole, fraction)
    }
}

/// Signed variant of [`format_units`], used for rate-delta display.
pub fn format_units_signed(amount: I256, decimals: u8, max_fraction: u8) -> String {
    let unsigned = format_units(amount.unsigned_abs(), decimals, max_fraction);
    if amount.is_negative() {
        format!("-{}", unsigned)
    } else {
        unsigned
    }
}
