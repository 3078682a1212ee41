//! # Event Source
//!
//! Defines the subscription side of the log transport.

use crate::log::{LogFilter, RawLog};
use std::collections::VecDeque;
use std::pin::Pin;
use std::task::{Context, Poll};
use thiserror::Error;
use tokio::sync::broadcast;
use tokio_stream::Stream;
use tracing::warn;

/// Errors from subscription operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SubscriptionError {
    /// The transport connection was closed.
    #[error("Event source connection closed")]
    Closed,
}

/// Trait for subscribing to contract logs.
///
/// An implementation is an external, address-addressable event stream; the
/// reference implementation is [`crate::InMemoryChain`].
pub trait EventSource: Send + Sync {
    /// Subscribe to logs matching a filter.
    ///
    /// The subscription starts with the source's retained backlog, so a
    /// resubscribe after a disconnect re-delivers recent logs rather than
    /// losing them.
    fn subscribe(&self, filter: LogFilter) -> LogSubscription;
}

/// A subscription handle for receiving logs.
pub struct LogSubscription {
    /// Replayed backlog, drained before live delivery.
    backlog: VecDeque<RawLog>,

    /// Live receiver.
    receiver: broadcast::Receiver<RawLog>,

    /// Filter for this subscription.
    filter: LogFilter,

    /// Total logs this subscriber missed by lagging.
    lagged_total: u64,
}

impl LogSubscription {
    /// Create a new subscription over a backlog and a live receiver.
    pub(crate) fn new(
        backlog: VecDeque<RawLog>,
        receiver: broadcast::Receiver<RawLog>,
        filter: LogFilter,
    ) -> Self {
        Self {
            backlog,
            receiver,
            filter,
            lagged_total: 0,
        }
    }

    /// Receive the next log that matches the filter.
    ///
    /// # Returns
    ///
    /// - `Some(log)` - The next matching log (backlog first, then live)
    /// - `None` - The connection was closed; resubscribe to resume
    pub async fn recv(&mut self) -> Option<RawLog> {
        if let Some(log) = self.backlog.pop_front() {
            return Some(log);
        }
        loop {
            let log = match self.receiver.recv().await {
                Ok(l) => l,
                Err(broadcast::error::RecvError::Closed) => return None,
                Err(broadcast::error::RecvError::Lagged(count)) => {
                    self.lagged_total += count;
                    warn!(lagged = count, "Subscriber lagged, logs dropped");
                    continue;
                }
            };

            if self.filter.matches(&log) {
                return Some(log);
            }
            // Log from another contract, keep waiting
        }
    }

    /// Try to receive the next log without blocking.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(log))` - A log was available and matched
    /// - `Ok(None)` - No log available (would block)
    /// - `Err(SubscriptionError::Closed)` - The connection was closed
    pub fn try_recv(&mut self) -> Result<Option<RawLog>, SubscriptionError> {
        if let Some(log) = self.backlog.pop_front() {
            return Ok(Some(log));
        }
        loop {
            let log = match self.receiver.try_recv() {
                Ok(l) => l,
                Err(broadcast::error::TryRecvError::Empty) => return Ok(None),
                Err(broadcast::error::TryRecvError::Closed) => {
                    return Err(SubscriptionError::Closed)
                }
                Err(broadcast::error::TryRecvError::Lagged(count)) => {
                    self.lagged_total += count;
                    continue;
                }
            };

            if self.filter.matches(&log) {
                return Ok(Some(log));
            }
        }
    }

    /// Get the filter for this subscription.
    #[must_use]
    pub fn filter(&self) -> &LogFilter {
        &self.filter
    }

    /// Total logs missed by lagging since this subscription started.
    ///
    /// A nonzero value is a recorded gap: those logs will only come back
    /// through a resubscribe replay or an external re-scan.
    #[must_use]
    pub fn lagged_total(&self) -> u64 {
        self.lagged_total
    }
}

/// A stream wrapper for subscriptions.
///
/// Implements `tokio_stream::Stream` for use with stream combinators.
pub struct LogStream {
    subscription: LogSubscription,
}

impl LogStream {
    /// Create a new log stream from a subscription.
    #[must_use]
    pub fn new(subscription: LogSubscription) -> Self {
        Self { subscription }
    }

    /// Get the filter for this stream.
    #[must_use]
    pub fn filter(&self) -> &LogFilter {
        self.subscription.filter()
    }
}

impl Stream for LogStream {
    type Item = RawLog;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        match self.subscription.try_recv() {
            Ok(Some(log)) => Poll::Ready(Some(log)),
            Ok(None) => {
                // No log ready; re-poll after yielding
                cx.waker().wake_by_ref();
                Poll::Pending
            }
            Err(SubscriptionError::Closed) => Poll::Ready(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::InMemoryChain;
    use crate::log::PaymentLog;
    use shared_types::{Address, U256};
    use std::time::Duration;
    use tokio::time::timeout;
    use tokio_stream::StreamExt;

    fn payment(slug: &str) -> PaymentLog {
        PaymentLog {
            payer: Address([0xAA; 20]),
            receiver: Address([0xBB; 20]),
            token: Address::ZERO,
            amount: U256::from(1u64),
            slug: slug.to_string(),
            memo: String::new(),
            timestamp: 1_700_000_000,
        }
    }

    #[tokio::test]
    async fn test_subscription_receives_live_log() {
        let chain = InMemoryChain::new(80_002, Address([0x01; 20]));
        let mut sub = chain.subscribe(LogFilter::all());

        chain.emit_payment(payment("alice")).unwrap();

        let log = timeout(Duration::from_millis(100), sub.recv())
            .await
            .expect("timeout")
            .expect("log");
        assert_eq!(log.contract, Address([0x01; 20]));
    }

    #[tokio::test]
    async fn test_subscription_replays_backlog() {
        let chain = InMemoryChain::new(80_002, Address([0x01; 20]));
        chain.emit_payment(payment("early")).unwrap();

        // Subscribed after the emit; the backlog still delivers it.
        let mut sub = chain.subscribe(LogFilter::all());
        let log = timeout(Duration::from_millis(100), sub.recv())
            .await
            .expect("timeout")
            .expect("log");
        let body = PaymentLog::decode(&log.data).unwrap();
        assert_eq!(body.slug, "early");
    }

    #[tokio::test]
    async fn test_subscription_filters_other_contracts() {
        let gateway = Address([0x01; 20]);
        let chain = InMemoryChain::new(80_002, gateway);
        let mut sub = chain.subscribe(LogFilter::contract(Address([0x99; 20])));

        chain.emit_payment(payment("alice")).unwrap();

        let result = timeout(Duration::from_millis(50), sub.recv()).await;
        assert!(result.is_err(), "log from another contract must not match");
    }

    #[tokio::test]
    async fn test_try_recv_empty() {
        let chain = InMemoryChain::new(80_002, Address([0x01; 20]));
        let mut sub = chain.subscribe(LogFilter::all());
        assert!(matches!(sub.try_recv(), Ok(None)));
    }

    #[tokio::test]
    async fn test_recv_returns_none_after_interrupt() {
        let chain = InMemoryChain::new(80_002, Address([0x01; 20]));
        let mut sub = chain.subscribe(LogFilter::all());

        chain.interrupt();

        let closed = timeout(Duration::from_millis(100), sub.recv())
            .await
            .expect("timeout");
        assert!(closed.is_none());
    }

    #[tokio::test]
    async fn test_log_stream_yields_logs() {
        let chain = InMemoryChain::new(80_002, Address([0x01; 20]));
        chain.emit_payment(payment("a")).unwrap();
        chain.emit_payment(payment("b")).unwrap();

        let mut stream = LogStream::new(chain.subscribe(LogFilter::all()));
        let first = timeout(Duration::from_millis(100), stream.next())
            .await
            .expect("timeout")
            .expect("log");
        let second = timeout(Duration::from_millis(100), stream.next())
            .await
            .expect("timeout")
            .expect("log");
        assert!(first.sequence < second.sequence);
    }
}
