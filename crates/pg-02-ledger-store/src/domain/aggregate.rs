//! # Window Aggregation
//!
//! Pure summary computation over ledger records. The caller supplies `now`,
//! so the same inputs always produce the same summary.

use shared_types::{LedgerRecord, PaymentSummary, WINDOW_30D_SECS, WINDOW_7D_SECS};

/// Computes a [`PaymentSummary`] over an iterator of records.
///
/// Windows are half-open `[now - window, now)` compared in seconds against
/// each record's chain timestamp; the all-time totals include every record
/// regardless of timestamp. Amount sums are exact `U256` accumulation.
///
/// An empty iterator yields all-zero totals.
pub fn summarize_records<'a, I>(records: I, now: u64) -> PaymentSummary
where
    I: IntoIterator<Item = &'a LedgerRecord>,
{
    let cutoff_7d = now.saturating_sub(WINDOW_7D_SECS);
    let cutoff_30d = now.saturating_sub(WINDOW_30D_SECS);

    let mut summary = PaymentSummary::default();
    for record in records {
        summary.total.add(record.amount);

        let ts = record.occurred_at;
        if ts >= cutoff_30d && ts < now {
            summary.last_30d.add(record.amount);
        }
        if ts >= cutoff_7d && ts < now {
            summary.last_7d.add(record.amount);
        }
    }
    summary
}
