//! Adapters layer: port implementations over the emulated chain.

pub mod chain;

pub use chain::{ChainGateway, ChainWallet};
