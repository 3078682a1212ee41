//! # Core Domain Entities
//!
//! Defines the entities that flow between the indexer, the ledger store,
//! and the submission pipeline.

use serde::{Deserialize, Serialize};
use sha3::{Digest, Keccak256};
use std::fmt;
use std::str::FromStr;

use crate::errors::AddressParseError;

// Re-export U256 from primitive-types for use across all subsystems
pub use primitive_types::U256;

/// A 20-byte account address.
///
/// Opaque to the gateway beyond equality and formatting. Displayed as
/// `0x`-prefixed lowercase hex; parsed from `0x` plus exactly 40 hex digits.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
pub struct Address(pub [u8; 20]);

impl Address {
    /// The all-zero address. Used as the native-asset sentinel in the
    /// `token` field of payment events.
    pub const ZERO: Self = Self([0u8; 20]);

    /// Returns true for the all-zero (native-asset sentinel) address.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 20]
    }

    /// Returns the raw bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Checks that a string is a well-formed address without constructing one.
    #[must_use]
    pub fn is_well_formed(s: &str) -> bool {
        let Some(body) = s.strip_prefix("0x") else {
            return false;
        };
        body.len() == 40 && body.bytes().all(|b| b.is_ascii_hexdigit())
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl FromStr for Address {
    type Err = AddressParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let body = s
            .strip_prefix("0x")
            .ok_or(AddressParseError::MissingPrefix)?;
        if body.len() != 40 {
            return Err(AddressParseError::BadLength { len: body.len() });
        }
        let bytes = hex::decode(body).map_err(|_| AddressParseError::InvalidHex)?;
        let mut out = [0u8; 20];
        out.copy_from_slice(&bytes);
        Ok(Self(out))
    }
}

/// A 32-byte transaction hash.
///
/// The unique identity of an on-chain transaction; the ledger's dedup key.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
pub struct TxHash(pub [u8; 32]);

impl TxHash {
    /// Derives a transaction hash as the Keccak-256 of arbitrary bytes.
    #[must_use]
    pub fn keccak(data: &[u8]) -> Self {
        let mut hasher = Keccak256::new();
        hasher.update(data);
        Self(hasher.finalize().into())
    }

    /// Returns the raw bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

/// One confirmed on-chain transfer, recorded exactly once.
///
/// Records are immutable after insertion. The `slug` is a point-in-time
/// label: renaming a payee's slug later does not rewrite historic records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerRecord {
    /// Account that sent the transfer.
    pub payer: Address,
    /// Account that received the transfer.
    pub receiver: Address,
    /// Asset transferred; `Address::ZERO` denotes the chain's native asset.
    pub token: Address,
    /// Amount in the smallest indivisible unit. Round-trips exactly.
    pub amount: U256,
    /// Payee's routing key at the time the event was emitted.
    pub slug: String,
    /// Free-text annotation, author-supplied and untrusted.
    pub memo: String,
    /// Identity of the originating transaction; unique across the ledger.
    pub tx_identity: TxHash,
    /// Chain-reported timestamp in seconds since epoch.
    pub occurred_at: u64,
}

/// Count and amount totals over one aggregation window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WindowTotals {
    /// Number of records in the window.
    pub count: u64,
    /// Exact sum of record amounts in the window.
    pub amount: U256,
}

impl WindowTotals {
    /// Folds one record amount into the totals.
    ///
    /// Saturates at `U256::MAX` rather than wrapping; the ledger would need
    /// more value than the chain can represent to ever reach it.
    pub fn add(&mut self, amount: U256) {
        self.count += 1;
        self.amount = self.amount.saturating_add(amount);
    }
}

/// Aggregate summary of a payee's ledger records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PaymentSummary {
    /// Totals over all records.
    pub total: WindowTotals,
    /// Totals over the trailing 7-day window.
    pub last_7d: WindowTotals,
    /// Totals over the trailing 30-day window.
    pub last_30d: WindowTotals,
}
