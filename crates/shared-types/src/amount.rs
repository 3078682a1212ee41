//! # Display-Unit Amount Parsing
//!
//! Exact conversion between user-facing decimal strings ("1.5") and the
//! smallest indivisible unit as `U256`. No floating point is involved at any
//! step, so amounts round-trip exactly at any magnitude.

use crate::errors::AmountParseError;
use primitive_types::U256;

/// Fractional digits of the native asset (wei-style scaling).
pub const NATIVE_DECIMALS: u32 = 18;

/// Parses a decimal string into smallest units.
///
/// Accepts an optional fractional part of at most [`NATIVE_DECIMALS`] digits.
/// Signs, exponents, separators, and whitespace inside the number are all
/// rejected; the caller decides whether zero is acceptable.
pub fn parse_native_amount(input: &str) -> Result<U256, AmountParseError> {
    let s = input.trim();

    let (int_part, frac_part) = match s.find('.') {
        None => (s, ""),
        Some(i) => {
            let (head, tail) = s.split_at(i);
            let tail = &tail[1..];
            if tail.contains('.') {
                return Err(AmountParseError::MultiplePoints);
            }
            (head, tail)
        }
    };

    if int_part.is_empty() && frac_part.is_empty() {
        return Err(AmountParseError::Empty);
    }
    if let Some(c) = int_part
        .chars()
        .chain(frac_part.chars())
        .find(|c| !c.is_ascii_digit())
    {
        return Err(AmountParseError::InvalidCharacter(c));
    }
    if frac_part.len() > NATIVE_DECIMALS as usize {
        return Err(AmountParseError::TooManyDecimals {
            got: frac_part.len(),
            max: NATIVE_DECIMALS,
        });
    }

    let base = U256::from(10u64).pow(U256::from(NATIVE_DECIMALS));
    let int_value = if int_part.is_empty() {
        U256::zero()
    } else {
        U256::from_dec_str(int_part).map_err(|_| AmountParseError::Overflow)?
    };
    let frac_value = if frac_part.is_empty() {
        U256::zero()
    } else {
        let digits = U256::from_dec_str(frac_part).map_err(|_| AmountParseError::Overflow)?;
        let scale =
            U256::from(10u64).pow(U256::from(NATIVE_DECIMALS as usize - frac_part.len()));
        digits * scale
    };

    int_value
        .checked_mul(base)
        .and_then(|v| v.checked_add(frac_value))
        .ok_or(AmountParseError::Overflow)
}

/// Formats smallest units as a decimal string, trimming trailing zeros.
#[must_use]
pub fn format_native_amount(value: U256) -> String {
    let base = U256::from(10u64).pow(U256::from(NATIVE_DECIMALS));
    let int_part = value / base;
    let frac_part = value % base;

    if frac_part.is_zero() {
        return int_part.to_string();
    }

    let mut frac = format!("{:0>width$}", frac_part, width = NATIVE_DECIMALS as usize);
    while frac.ends_with('0') {
        frac.pop();
    }
    format!("{}.{}", int_part, frac)
}
