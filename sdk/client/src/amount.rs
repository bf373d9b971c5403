//! UI amount <-> base-unit string conversion.
//!
//! The SDK takes amounts as base-unit integer strings ("100000" is 0.1 of a
//! 6-decimal token). Conversion is done on decimal digits, never through floats.

use crate::error::{DefiError, DefiResult};

/// Converts a UI amount such as `"0.1"` into base units for `decimals`.
pub fn to_base_units(ui_amount: &str, decimals: u8) -> DefiResult<String> {
    let invalid = || DefiError::InvalidAmount(ui_amount.to_string());
    let trimmed = ui_amount.trim();

    let (whole, frac) = match trimmed.split_once('.') {
        Some((w, f)) => (w, f),
        None => (trimmed, ""),
    };

    let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if whole.is_empty() && frac.is_empty() {
        return Err(invalid());
    }
    if !all_digits(whole) || !all_digits(frac) || frac.len() > decimals as usize {
        return Err(invalid());
    }

    let mut digits = String::with_capacity(whole.len() + decimals as usize);
    digits.push_str(whole);
    digits.push_str(frac);
    digits.extend(std::iter::repeat_n('0', decimals as usize - frac.len()));

    let value: u128 = digits.parse().map_err(|_| invalid())?;
    Ok(value.to_string())
}

/// Formats a base-unit string as a UI amount, dropping trailing zeros.
pub fn to_ui_amount(base_units: &str, decimals: u8) -> DefiResult<String> {
    let value: u128 = base_units
        .trim()
        .parse()
        .map_err(|_| DefiError::InvalidAmount(base_units.to_string()))?;

    let scale = 10u128
        .checked_pow(decimals as u32)
        .ok_or_else(|| DefiError::InvalidAmount(base_units.to_string()))?;
    let whole = value / scale;
    let frac = value % scale;

    if frac == 0 {
        return Ok(whole.to_string());
    }
    let frac = format!("{:0width$}", frac, width = decimals as usize);
    Ok(format!("{}.{}", whole, frac.trim_end_matches('0')))
}
