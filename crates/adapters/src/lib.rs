//! Launchpad Adapters
//!
//! Outbound collaborators of the omnichain launchpad: the LI.FI bridge
//! aggregator and per-family chain wallets.

pub mod lifi_adapter;
pub mod rpc_client;
pub mod wallets;

pub use launchpad_types::{AdapterError, AdapterResult, BridgeApi, ChainWallet};
pub use lifi_adapter::{LifiAdapter, LifiConfig, DEFAULT_LIFI_ENDPOINT};
pub use rpc_client::JsonRpcClient;
pub use wallets::{EvmWallet, EvmWalletConfig, SolanaWallet, SolanaWalletConfig};
