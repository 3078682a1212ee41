//! # Payment Logs
//!
//! Wire types for the gateway contract's `Payment` event and the transport
//! envelope it is delivered in.

use serde::{Deserialize, Serialize};
use shared_types::{Address, TxHash, U256};

/// Decoded body of one `Payment` event.
///
/// Field order mirrors the contract event:
/// `Payment(payer, receiver, token, amount, slug, memo, timestamp)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentLog {
    /// Account that sent the transfer.
    pub payer: Address,
    /// Account that received the transfer.
    pub receiver: Address,
    /// Asset transferred; the zero address denotes the native asset.
    pub token: Address,
    /// Amount in smallest units.
    pub amount: U256,
    /// Payee routing key the payment was addressed through.
    pub slug: String,
    /// Payer-supplied annotation.
    pub memo: String,
    /// Chain-reported seconds since epoch.
    pub timestamp: u64,
}

impl PaymentLog {
    /// Encodes the log body into wire bytes.
    pub fn encode(&self) -> Result<Vec<u8>, bincode::Error> {
        bincode::serialize(self)
    }

    /// Decodes a log body from wire bytes.
    ///
    /// Failure means the event is malformed; the transport never retries a
    /// decode.
    pub fn decode(data: &[u8]) -> Result<Self, bincode::Error> {
        bincode::deserialize(data)
    }
}

/// Transport envelope for one emitted log.
///
/// `tx_hash` is supplied by the transport and identifies the originating
/// transaction; `sequence` is transport-local bookkeeping for the replay
/// buffer and carries no chain meaning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawLog {
    /// Contract that emitted the log.
    pub contract: Address,
    /// Identity of the originating transaction.
    pub tx_hash: TxHash,
    /// Transport-local monotone sequence number.
    pub sequence: u64,
    /// Encoded [`PaymentLog`] body.
    pub data: Vec<u8>,
}

/// Filter for subscribing to logs from specific contracts.
#[derive(Debug, Clone, Default)]
pub struct LogFilter {
    /// Contracts to include. Empty means all contracts.
    pub contracts: Vec<Address>,
}

impl LogFilter {
    /// Create a filter that accepts every log.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Create a filter for a single contract address.
    #[must_use]
    pub fn contract(address: Address) -> Self {
        Self {
            contracts: vec![address],
        }
    }

    /// Check whether a log matches this filter.
    #[must_use]
    pub fn matches(&self, log: &RawLog) -> bool {
        self.contracts.is_empty() || self.contracts.contains(&log.contract)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_log() -> PaymentLog {
        PaymentLog {
            payer: Address([0xAA; 20]),
            receiver: Address([0xBB; 20]),
            token: Address::ZERO,
            amount: U256::from(1_000_000_000_000_000_000u128),
            slug: "alice".to_string(),
            memo: "thanks".to_string(),
            timestamp: 1_700_000_000,
        }
    }

    #[test]
    fn test_payment_log_codec_roundtrip() {
        let log = sample_log();
        let bytes = log.encode().unwrap();
        let back = PaymentLog::decode(&bytes).unwrap();
        assert_eq!(back, log);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(PaymentLog::decode(&[0xFF, 0x00, 0x01]).is_err());
    }

    #[test]
    fn test_filter_all_matches_everything() {
        let raw = RawLog {
            contract: Address([0x01; 20]),
            tx_hash: TxHash([0x02; 32]),
            sequence: 0,
            data: vec![],
        };
        assert!(LogFilter::all().matches(&raw));
    }

    #[test]
    fn test_filter_by_contract() {
        let gateway = Address([0x01; 20]);
        let other = Address([0x02; 20]);
        let filter = LogFilter::contract(gateway);

        let from_gateway = RawLog {
            contract: gateway,
            tx_hash: TxHash([0x02; 32]),
            sequence: 0,
            data: vec![],
        };
        let from_other = RawLog {
            contract: other,
            ..from_gateway.clone()
        };

        assert!(filter.matches(&from_gateway));
        assert!(!filter.matches(&from_other));
    }
}
