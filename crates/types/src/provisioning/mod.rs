//! Provisioning domain: requests, progress records and cross-chain configuration

pub mod config;
pub mod progress;
pub mod request;
pub mod response;

pub use config::{
	ConnectionConfig, CrossChainConfig, DestinationEndpoint, EnforcedOption, OriginEndpoint,
};
pub use progress::ProvisioningProgress;
pub use request::{ProvisioningRequest, ProvisioningValidationError};
pub use response::ProvisioningResponse;
