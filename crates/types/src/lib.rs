//! Launchpad Types
//!
//! Shared models and traits for the omnichain launchpad.
//! Domain models are organized by business entity; collaborator
//! traits (aggregator API, chain wallets) live next to their models.

pub mod adapters;
pub mod bridge;
pub mod errors;
pub mod models;
pub mod provisioning;
pub mod transfers;

// Re-export chrono and serde_json for convenience
pub use chrono;
pub use serde_json;

pub use adapters::{AdapterError, AdapterResult};
pub use errors::ErrorKind;
pub use models::{ChainDescriptor, ChainFamily, SecretString};

pub use bridge::{
	BridgeApi, BridgeOutcome, BridgeRequest, BridgeResponse, ChainInfo, ChainWallet, Connection,
	PreparedTransaction, Quote, QuoteRequest, StatusQuery, StatusResponse, TokenInfo,
	TransferStatus,
};

pub use provisioning::{
	ConnectionConfig, CrossChainConfig, DestinationEndpoint, EnforcedOption, OriginEndpoint,
	ProvisioningProgress, ProvisioningRequest, ProvisioningResponse,
	ProvisioningValidationError,
};

pub use transfers::{
	TransferExtras, TransferReceipt, TransferRequest, TransferResponse, TransferRoute,
	TransferValidationError,
};
