//! # Error Types
//!
//! Parse errors for the shared value types.

use thiserror::Error;

/// Errors from parsing a 20-byte account address.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressParseError {
    /// The `0x` prefix is missing.
    #[error("Address must start with 0x")]
    MissingPrefix,

    /// The hex body is not exactly 40 characters.
    #[error("Address hex body must be 40 characters, got {len}")]
    BadLength { len: usize },

    /// The body contains non-hex characters.
    #[error("Address contains non-hex characters")]
    InvalidHex,
}

/// Errors from parsing a display-unit decimal amount.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountParseError {
    /// The input is empty or contains no digits.
    #[error("Amount is empty")]
    Empty,

    /// A character other than digits and a single decimal point was found.
    #[error("Amount contains an invalid character: {0:?}")]
    InvalidCharacter(char),

    /// More than one decimal point.
    #[error("Amount has more than one decimal point")]
    MultiplePoints,

    /// More fractional digits than the asset can represent.
    #[error("Amount has {got} fractional digits, maximum is {max}")]
    TooManyDecimals { got: usize, max: u32 },

    /// The scaled value does not fit in 256 bits.
    #[error("Amount does not fit in 256 bits")]
    Overflow,
}
