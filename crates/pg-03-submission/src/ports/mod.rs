//! Ports layer: external collaborators of the submission pipeline.

pub mod outbound;

pub use outbound::{
    AccountDirectory, DirectoryError, GatewayClient, GatewayError, ReceiverProfile,
    WalletConnector, WalletError,
};
