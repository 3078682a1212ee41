//! # PayLink Gateway Test Suite
//!
//! Cross-subsystem tests exercising the full choreography:
//!
//! ```text
//! submit → gateway contract → Payment log → indexer → ledger → queries
//! ```
//!
//! Single-subsystem behavior is covered by each crate's own tests; this
//! crate only holds scenarios that need more than one subsystem wired
//! together.

pub mod integration;
