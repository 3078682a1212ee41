//! # Log Normalization
//!
//! Converts a transport envelope into a canonical ledger record.

use chain_events::{PaymentLog, RawLog};
use shared_types::{LedgerRecord, MAX_MEMO_LEN, MAX_SLUG_LEN};
use thiserror::Error;

/// Errors from normalizing a delivered log.
#[derive(Debug, Clone, Error)]
pub enum IndexError {
    /// The log body could not be decoded. Fatal to this event only.
    #[error("Malformed event in tx {tx}: {message}")]
    MalformedEvent { tx: String, message: String },
}

/// Decodes and normalizes one delivered log.
///
/// The transaction identity comes from the envelope, the rest from the
/// decoded body. Slug and memo are clamped to their bounds rather than
/// rejected: the contract, not the indexer, defines event validity, and an
/// observed transfer must not be lost to a local length policy.
pub fn normalize_log(raw: &RawLog) -> Result<LedgerRecord, IndexError> {
    let body = PaymentLog::decode(&raw.data).map_err(|e| IndexError::MalformedEvent {
        tx: raw.tx_hash.to_string(),
        message: e.to_string(),
    })?;

    Ok(LedgerRecord {
        payer: body.payer,
        receiver: body.receiver,
        token: body.token,
        amount: body.amount,
        slug: clamp_utf8(body.slug, MAX_SLUG_LEN),
        memo: clamp_utf8(body.memo, MAX_MEMO_LEN),
        tx_identity: raw.tx_hash,
        occurred_at: body.timestamp,
    })
}

/// Truncates a string to at most `max` bytes on a character boundary.
fn clamp_utf8(mut s: String, max: usize) -> String {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    s.truncate(end);
    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::{Address, TxHash, U256};

    fn raw(log: &PaymentLog) -> RawLog {
        RawLog {
            contract: Address([0x01; 20]),
            tx_hash: TxHash([0x42; 32]),
            sequence: 0,
            data: log.encode().unwrap(),
        }
    }

    fn payment() -> PaymentLog {
        PaymentLog {
            payer: Address([0xAA; 20]),
            receiver: Address([0xBB; 20]),
            token: Address::ZERO,
            amount: U256::from(1_000_000_000_000_000_000u128),
            slug: "alice".to_string(),
            memo: "coffee".to_string(),
            timestamp: 1_700_000_000,
        }
    }

    #[test]
    fn test_normalize_happy_path() {
        let record = normalize_log(&raw(&payment())).unwrap();
        assert_eq!(record.tx_identity, TxHash([0x42; 32]));
        assert_eq!(record.slug, "alice");
        assert_eq!(record.amount, U256::from(1_000_000_000_000_000_000u128));
        assert_eq!(record.occurred_at, 1_700_000_000);
    }

    #[test]
    fn test_normalize_accepts_zero_amount() {
        let mut log = payment();
        log.amount = U256::zero();
        let record = normalize_log(&raw(&log)).unwrap();
        assert_eq!(record.amount, U256::zero());
    }

    #[test]
    fn test_normalize_rejects_garbage() {
        let garbage = RawLog {
            contract: Address([0x01; 20]),
            tx_hash: TxHash([0x42; 32]),
            sequence: 0,
            data: vec![0xDE, 0xAD, 0xBE, 0xEF],
        };
        let err = normalize_log(&garbage).unwrap_err();
        assert!(matches!(err, IndexError::MalformedEvent { .. }));
    }

    #[test]
    fn test_normalize_clamps_long_memo() {
        let mut log = payment();
        log.memo = "x".repeat(MAX_MEMO_LEN + 100);
        let record = normalize_log(&raw(&log)).unwrap();
        assert_eq!(record.memo.len(), MAX_MEMO_LEN);
    }

    #[test]
    fn test_clamp_respects_char_boundaries() {
        // Multibyte character straddling the cut point.
        let s = "é".repeat(40); // 2 bytes each
        let clamped = clamp_utf8(s, 63);
        assert_eq!(clamped.len(), 62);
        assert!(clamped.chars().all(|c| c == 'é'));
    }
}
