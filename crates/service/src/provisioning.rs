//! Provisioning pipeline
//!
//! Drives one token through four strictly ordered steps:
//!
//! 1. create the token on the origin chain
//! 2. deploy a mirror contract on every destination, in request order
//! 3. build the cross-chain configuration and run the init action
//! 4. wire every destination with that configuration, one at a time
//!
//! Each run owns its `ProvisioningProgress` and its configuration value.
//! A failing step aborts the run and the failure carries the progress made
//! so far. Nothing is rolled back.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use launchpad_types::{
	ChainDescriptor, CrossChainConfig, DestinationEndpoint, EnforcedOption, ErrorKind,
	OriginEndpoint, ProvisioningProgress, ProvisioningRequest, ProvisioningValidationError,
};
use serde_json::Value;
use thiserror::Error;
use tracing::{error, info, warn, Instrument};
use uuid::Uuid;

use crate::chain_registry::{ChainRegistry, ChainRegistryError};
use crate::command_runner::{
	run_with_retry, CommandError, CommandInvocation, CommandRunner, RetryPolicy,
};
use crate::tooling::Tooling;

/// Origin chain parameters for token creation
#[derive(Debug, Clone)]
pub struct OriginParams {
	/// Logical id of the origin chain
	pub chain: String,
	/// Token program the origin token is created under
	pub program_id: String,
	pub store_only: bool,
	pub fee_scale: u32,
}

#[derive(Debug, Clone)]
pub struct PipelineConfig {
	pub tooling: Tooling,
	pub origin: OriginParams,
	/// Deployment tag of the mirror contract
	pub mirror_contract: String,
	/// Directory receiving the per-run configuration artifact
	pub artifact_dir: PathBuf,
	pub to_destination_options: Vec<EnforcedOption>,
	pub to_origin_options: Vec<EnforcedOption>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProvisioningStep {
	CreateOrigin,
	DeployMirror,
	InitConfig,
	Wire,
}

impl ProvisioningStep {
	pub fn number(&self) -> u8 {
		match self {
			Self::CreateOrigin => 1,
			Self::DeployMirror => 2,
			Self::InitConfig => 3,
			Self::Wire => 4,
		}
	}
}

impl fmt::Display for ProvisioningStep {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let action = match self {
			Self::CreateOrigin => "origin token creation",
			Self::DeployMirror => "mirror deployment",
			Self::InitConfig => "cross-chain configuration",
			Self::Wire => "configuration wiring",
		};
		write!(f, "Step {} ({})", self.number(), action)
	}
}

/// A failed step together with everything completed before it
#[derive(Debug, Clone)]
pub struct PipelineFailure {
	pub step: ProvisioningStep,
	pub chain: Option<String>,
	/// Step-specific message naming the step and chain
	pub error: String,
	/// Root cause
	pub details: String,
	pub kind: ErrorKind,
	pub progress: ProvisioningProgress,
}

#[derive(Debug, Error)]
pub enum ProvisioningError {
	#[error("Invalid provisioning request: {0}")]
	InvalidRequest(#[from] ProvisioningValidationError),

	#[error(transparent)]
	Registry(#[from] ChainRegistryError),

	#[error("{}", .0.error)]
	Step(Box<PipelineFailure>),
}

impl ProvisioningError {
	pub fn kind(&self) -> ErrorKind {
		match self {
			ProvisioningError::InvalidRequest(_) => ErrorKind::Validation,
			ProvisioningError::Registry(error) => error.kind(),
			ProvisioningError::Step(failure) => failure.kind,
		}
	}

	/// Progress at the time of failure. Validation failures happen before step 1.
	pub fn progress(&self) -> ProvisioningProgress {
		match self {
			ProvisioningError::Step(failure) => failure.progress.clone(),
			_ => ProvisioningProgress::new(),
		}
	}

	pub fn details(&self) -> String {
		match self {
			ProvisioningError::Step(failure) => failure.details.clone(),
			other => other.to_string(),
		}
	}
}

/// Cause of a step failure before progress is attached
#[derive(Debug, Error)]
enum StepError {
	#[error(transparent)]
	Command(#[from] CommandError),
	#[error("{0}")]
	Output(String),
	#[error("configuration artifact: {0}")]
	Artifact(String),
}

/// Configuration written for the external tool, unique to one run
#[derive(Debug)]
struct ConfigArtifact {
	path: PathBuf,
}

impl ConfigArtifact {
	async fn write(dir: &Path, config: &CrossChainConfig) -> Result<Self, StepError> {
		let path = dir.join(format!("launchpad-config-{}.json", Uuid::new_v4()));
		let contents = serde_json::to_vec_pretty(config)
			.map_err(|e| StepError::Artifact(e.to_string()))?;
		tokio::fs::create_dir_all(dir)
			.await
			.map_err(|e| StepError::Artifact(format!("{}: {}", dir.display(), e)))?;
		tokio::fs::write(&path, contents)
			.await
			.map_err(|e| StepError::Artifact(format!("{}: {}", path.display(), e)))?;
		Ok(Self { path })
	}

	fn path(&self) -> String {
		self.path.display().to_string()
	}

	/// Best effort; a leftover file is only logged
	async fn remove(self) {
		if let Err(e) = tokio::fs::remove_file(&self.path).await {
			warn!(
				target: "provisioning",
				path = %self.path.display(),
				error = %e,
				"Failed to remove configuration artifact"
			);
		}
	}
}

pub struct ProvisioningPipeline {
	runner: Arc<dyn CommandRunner>,
	registry: Arc<ChainRegistry>,
	retry: RetryPolicy,
	config: PipelineConfig,
}

impl ProvisioningPipeline {
	pub fn new(
		runner: Arc<dyn CommandRunner>,
		registry: Arc<ChainRegistry>,
		retry: RetryPolicy,
		config: PipelineConfig,
	) -> Self {
		Self {
			runner,
			registry,
			retry,
			config,
		}
	}

	pub fn origin_chain(&self) -> &str {
		&self.config.origin.chain
	}

	/// Run all four steps for `request`
	pub async fn provision(
		&self,
		request: &ProvisioningRequest,
	) -> Result<ProvisioningProgress, ProvisioningError> {
		request.validate()?;
		self.registry.validate_all(&request.destination_chains)?;
		let origin = self.registry.resolve(&self.config.origin.chain)?;

		let run_id = Uuid::new_v4();
		let span = tracing::info_span!("provision", %run_id, symbol = %request.token_symbol);
		self.run_steps(request, origin).instrument(span).await
	}

	async fn run_steps(
		&self,
		request: &ProvisioningRequest,
		origin: &ChainDescriptor,
	) -> Result<ProvisioningProgress, ProvisioningError> {
		info!(
			target: "provisioning",
			destinations = ?request.destination_chains,
			"Starting provisioning run"
		);

		let mut progress = ProvisioningProgress::new();

		let (token_address, store_address) = self
			.create_origin(request, origin)
			.await
			.map_err(|e| {
				self.fail(
					ProvisioningStep::CreateOrigin,
					Some(origin.logical_id.as_str()),
					e,
					&progress,
				)
			})?;
		info!(target: "provisioning", %token_address, %store_address, "Step 1 complete");
		progress.complete_origin(token_address, store_address.clone());

		let mut destinations = Vec::with_capacity(request.destination_chains.len());
		for logical_id in &request.destination_chains {
			let chain = self.registry.resolve(logical_id)?;
			let address = self
				.deploy_mirror(request, chain)
				.await
				.map_err(|e| {
					self.fail(
						ProvisioningStep::DeployMirror,
						Some(logical_id.as_str()),
						e,
						&progress,
					)
				})?;
			info!(target: "provisioning", chain = %logical_id, %address, "Mirror deployed");
			progress.complete_deployment(logical_id);
			destinations.push(DestinationEndpoint {
				logical_id: chain.logical_id.clone(),
				endpoint_id: chain.protocol_endpoint_id,
				network_name: chain.network_name.clone(),
				address,
			});
		}

		let config = CrossChainConfig::hub(
			OriginEndpoint {
				logical_id: origin.logical_id.clone(),
				endpoint_id: origin.protocol_endpoint_id,
				address: store_address,
			},
			destinations,
			self.config.to_destination_options.clone(),
			self.config.to_origin_options.clone(),
		);

		let artifact = ConfigArtifact::write(&self.config.artifact_dir, &config)
			.await
			.map_err(|e| self.fail(ProvisioningStep::InitConfig, None, e, &progress))?;
		let outcome = self
			.configure_and_wire(&config, &artifact, origin, &mut progress)
			.await;
		artifact.remove().await;
		outcome?;

		info!(target: "provisioning", "Provisioning run complete");
		Ok(progress)
	}

	async fn configure_and_wire(
		&self,
		config: &CrossChainConfig,
		artifact: &ConfigArtifact,
		origin: &ChainDescriptor,
		progress: &mut ProvisioningProgress,
	) -> Result<(), ProvisioningError> {
		let tooling = &self.config.tooling;

		let init = tooling
			.task(&tooling.tasks.init_config)
			.flag("oapp-config", artifact.path())
			.flag("network", origin.network_name.as_str());
		self.run(&init)
			.await
			.map_err(|e| self.fail(ProvisioningStep::InitConfig, None, e, progress))?;
		progress.complete_configuration();
		info!(target: "provisioning", "Step 3 complete");

		for destination in &config.destinations {
			let wire = tooling
				.task(&tooling.tasks.wire)
				.flag("oapp-config", artifact.path())
				.flag("network", destination.network_name.as_str());
			self.run(&wire).await.map_err(|e| {
				self.fail(
					ProvisioningStep::Wire,
					Some(destination.logical_id.as_str()),
					e,
					progress,
				)
			})?;
			info!(target: "provisioning", chain = %destination.logical_id, "Wired");
		}
		progress.complete_wiring();
		info!(target: "provisioning", "Step 4 complete");

		Ok(())
	}

	async fn create_origin(
		&self,
		request: &ProvisioningRequest,
		origin: &ChainDescriptor,
	) -> Result<(String, String), StepError> {
		let tooling = &self.config.tooling;
		let params = &self.config.origin;

		let mut invocation = tooling
			.task(&tooling.tasks.create_origin)
			.flag("eid", origin.protocol_endpoint_id.to_string());
		if !params.program_id.is_empty() {
			invocation = invocation.flag("program-id", params.program_id.as_str());
		}
		let invocation = invocation
			.flag("name", request.token_name.as_str())
			.flag("symbol", request.token_symbol.as_str())
			.flag("amount", request.total_supply.as_str())
			.flag("uri", request.metadata_uri.as_str())
			.flag("only-oft-store", params.store_only.to_string())
			.flag("compute-unit-price-scale-factor", params.fee_scale.to_string());

		let output = self.run(&invocation).await?;
		parse_origin_addresses(&output).ok_or_else(|| {
			StepError::Output("token creation output carries no mint and store addresses".to_string())
		})
	}

	async fn deploy_mirror(
		&self,
		request: &ProvisioningRequest,
		chain: &ChainDescriptor,
	) -> Result<String, StepError> {
		let tooling = &self.config.tooling;
		let invocation = tooling
			.task(&tooling.tasks.deploy_mirror)
			.flag("network", chain.network_name.as_str())
			.flag("tags", self.config.mirror_contract.as_str())
			.env("TOKEN_NAME", request.token_name.as_str())
			.env("TOKEN_SYMBOL", request.token_symbol.as_str())
			.env("RPC_URL", chain.rpc_url.as_str());

		let output = self.run(&invocation).await?;
		parse_deployed_address(&output).ok_or_else(|| {
			StepError::Output(format!(
				"deployment output on {} carries no contract address",
				chain.logical_id
			))
		})
	}

	async fn run(&self, invocation: &CommandInvocation) -> Result<String, StepError> {
		let output = run_with_retry(self.runner.as_ref(), invocation, &self.retry).await?;
		Ok(output.stdout)
	}

	fn fail(
		&self,
		step: ProvisioningStep,
		chain: Option<&str>,
		cause: StepError,
		progress: &ProvisioningProgress,
	) -> ProvisioningError {
		let kind = match &cause {
			StepError::Command(error) if self.retry.is_transient(error) => {
				ErrorKind::TransientExternal
			},
			StepError::Command(error) => error.kind(),
			StepError::Output(_) => ErrorKind::PermanentExternal,
			StepError::Artifact(_) => ErrorKind::Unexpected,
		};
		let message = match chain {
			Some(chain) => format!("{} failed on {}", step, chain),
			None => format!("{} failed", step),
		};

		error!(target: "provisioning", %step, chain = ?chain, error = %cause, "{}", message);

		ProvisioningError::Step(Box::new(PipelineFailure {
			step,
			chain: chain.map(str::to_string),
			error: message,
			details: cause.to_string(),
			kind,
			progress: progress.clone(),
		}))
	}
}

/// Mint and store accounts from token-creation output.
///
/// Accepts a JSON object line (`{"mint": .., "oftStore": ..}`) or
/// `mint: ..` / `oftStore: ..` lines. The last occurrence wins.
pub fn parse_origin_addresses(output: &str) -> Option<(String, String)> {
	let mut mint = None;
	let mut store = None;

	for line in output.lines().map(str::trim) {
		if line.starts_with('{') {
			if let Ok(Value::Object(object)) = serde_json::from_str::<Value>(line) {
				if let Some(value) = object.get("mint").and_then(Value::as_str) {
					mint = Some(value.to_string());
				}
				if let Some(value) = ["oftStore", "store"]
					.iter()
					.find_map(|key| object.get(*key).and_then(Value::as_str))
				{
					store = Some(value.to_string());
				}
			}
			continue;
		}

		if let Some((key, value)) = line.split_once(':') {
			let key = key.trim().trim_matches('"').to_ascii_lowercase();
			let value = value.trim().trim_end_matches(',').trim_matches('"');
			if value.is_empty() {
				continue;
			}
			match key.as_str() {
				"mint" => mint = Some(value.to_string()),
				"oftstore" | "store" => store = Some(value.to_string()),
				_ => {},
			}
		}
	}

	Some((mint?, store?))
}

/// Deployed contract address from mirror deployment output.
///
/// Prefers a JSON line with `address`, otherwise the last `0x` followed by
/// 40 hex digits.
pub fn parse_deployed_address(output: &str) -> Option<String> {
	let from_json = output.lines().rev().map(str::trim).find_map(|line| {
		if !line.starts_with('{') {
			return None;
		}
		serde_json::from_str::<Value>(line)
			.ok()?
			.get("address")?
			.as_str()
			.filter(|address| is_evm_address(address))
			.map(str::to_string)
	});
	if from_json.is_some() {
		return from_json;
	}

	let bytes = output.as_bytes();
	let mut found = None;
	let mut index = 0;
	while index + 42 <= bytes.len() {
		let candidate = &bytes[index..index + 42];
		let bounded = bytes.get(index + 42).map_or(true, |b| !b.is_ascii_hexdigit());
		if bounded && candidate.starts_with(b"0x") && candidate[2..].iter().all(u8::is_ascii_hexdigit)
		{
			found = Some(String::from_utf8_lossy(candidate).into_owned());
			index += 42;
		} else {
			index += 1;
		}
	}
	found
}

fn is_evm_address(candidate: &str) -> bool {
	candidate.len() == 42
		&& candidate.starts_with("0x")
		&& candidate[2..].chars().all(|c| c.is_ascii_hexdigit())
}
