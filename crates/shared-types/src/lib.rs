//! # Shared Types
//!
//! Core domain entities shared by all gateway subsystems.
//!
//! ## Clusters
//!
//! - **Identity**: `Address`, `TxHash`
//! - **Ledger**: `LedgerRecord`, `PaymentSummary`, `WindowTotals`
//! - **Amounts**: `U256` re-export, display-unit parsing/formatting

pub mod amount;
pub mod entities;
pub mod errors;

pub use amount::{format_native_amount, parse_native_amount, NATIVE_DECIMALS};
pub use entities::{Address, LedgerRecord, PaymentSummary, TxHash, WindowTotals, U256};
pub use errors::{AddressParseError, AmountParseError};

/// Maximum accepted slug length in bytes; longer slugs are truncated at
/// normalization time.
pub const MAX_SLUG_LEN: usize = 64;

/// Maximum accepted memo length in bytes; longer memos are truncated at
/// normalization time.
pub const MAX_MEMO_LEN: usize = 256;

/// Seconds in the 7-day summary window.
pub const WINDOW_7D_SECS: u64 = 7 * 24 * 60 * 60;

/// Seconds in the 30-day summary window.
pub const WINDOW_30D_SECS: u64 = 30 * 24 * 60 * 60;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_constants() {
        assert_eq!(WINDOW_7D_SECS, 604_800);
        assert_eq!(WINDOW_30D_SECS, 2_592_000);
    }

    #[test]
    fn test_memo_bound_exceeds_slug_bound() {
        assert!(MAX_MEMO_LEN > MAX_SLUG_LEN);
    }
}
