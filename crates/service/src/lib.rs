//! Launchpad Service
//!
//! Token provisioning, aggregated bridging and transfer dispatch.

pub mod bridge;
pub mod chain_registry;
pub mod command_runner;
pub mod provisioning;
pub mod tooling;
pub mod transfer;

#[cfg(test)]
mod test_support;

pub use bridge::{BridgeError, BridgeService, PollingConfig};
pub use chain_registry::{ChainRegistry, ChainRegistryError};
pub use command_runner::{
	run_with_retry, CommandError, CommandInvocation, CommandOutput, CommandRunner,
	ProcessCommandRunner, PromptResponder, RetryPolicy, DEFAULT_PROMPTS, DEFAULT_TRANSIENT_MARKERS,
};
pub use provisioning::{
	parse_deployed_address, parse_origin_addresses, OriginParams, PipelineConfig,
	PipelineFailure, ProvisioningError, ProvisioningPipeline, ProvisioningStep,
};
pub use tooling::{Tooling, ToolingTasks};
pub use transfer::{
	parse_tx_hash, CommandNativeSender, NativeSender, NativeTransfer, TransferDispatcher,
	TransferError,
};
