//! # Chain Events - Log-Subscription Transport
//!
//! The transport layer between the gateway contract's event stream and the
//! local subsystems. Everything downstream of this crate sees the chain only
//! as an append-only sequence of [`RawLog`] envelopes delivered through an
//! [`EventSource`] subscription.
//!
//! ## Delivery Semantics
//!
//! ```text
//! ┌──────────────┐                     ┌──────────────┐
//! │   Contract   │    emit Payment     │   Indexer    │
//! │  (external)  │ ──────┐             │              │
//! └──────────────┘       │             └──────────────┘
//!                        ▼                     ↑
//!                  ┌──────────────┐           │
//!                  │ Event Source │ ──────────┘
//!                  │ (replay buf) │  subscribe()
//!                  └──────────────┘
//! ```
//!
//! A fresh subscription replays the source's retained backlog before going
//! live, so a reconnect re-delivers recent logs instead of losing them.
//! Duplicate delivery is therefore expected and must be resolved downstream;
//! loss is only possible when a live subscriber lags past the channel
//! capacity, which the subscription surfaces as a counted gap.

// Nursery lints that are too strict
#![allow(clippy::missing_const_for_fn)]
// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod chain;
pub mod log;
pub mod source;

// Re-export main types
pub use chain::{ChainError, InMemoryChain, SubmitReceipt};
pub use log::{LogFilter, PaymentLog, RawLog};
pub use source::{EventSource, LogStream, LogSubscription, SubscriptionError};

/// Maximum live events buffered per subscriber before lag sets in.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1024;

/// Number of recent logs retained for replay to fresh subscriptions.
pub const DEFAULT_REPLAY_CAPACITY: usize = 512;
