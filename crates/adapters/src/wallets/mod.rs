//! Chain wallets
//!
//! Each wallet submits transactions for one chain family. Signing is
//! delegated to a remote signer endpoint so no key material lives in the
//! launchpad process.

pub mod evm;
pub mod solana;

pub use evm::{EvmWallet, EvmWalletConfig};
pub use solana::{SolanaWallet, SolanaWalletConfig};
