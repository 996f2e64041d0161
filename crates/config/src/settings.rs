//! Configuration settings structures

use crate::configurable_value::ConfigurableValue;
use launchpad_types::{ChainDescriptor, ChainFamily, EnforcedOption};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// Main application settings
///
/// Every section has defaults, so a config file only needs the values it changes.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Settings {
	pub server: ServerSettings,
	pub logging: LoggingSettings,
	pub origin: OriginSettings,
	/// Chain registry contents. Empty means the built-in testnet table.
	pub chains: Vec<ChainConfig>,
	pub tooling: ToolingSettings,
	pub aggregator: AggregatorSettings,
	pub wallets: WalletSettings,
	pub enforced_options: EnforcedOptionsSettings,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct ServerSettings {
	pub host: String,
	pub port: u16,
	/// Maximum accepted request body in bytes
	pub body_limit_bytes: usize,
}

impl Default for ServerSettings {
	fn default() -> Self {
		Self {
			host: "0.0.0.0".to_string(),
			port: 3000,
			body_limit_bytes: 1024 * 1024,
		}
	}
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct LoggingSettings {
	pub level: String,
	pub format: LogFormat,
	pub structured: bool,
}

impl Default for LoggingSettings {
	fn default() -> Self {
		Self {
			level: "info".to_string(),
			format: LogFormat::Pretty,
			structured: false,
		}
	}
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
	Json,
	Pretty,
	Compact,
}

/// The origin (hub) chain and its token program
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct OriginSettings {
	/// Logical id of the origin chain; must be present in the registry
	pub chain: String,
	/// Token program the origin token is created under
	pub program_id: String,
	/// Create only the store account for an existing mint
	pub store_only: bool,
	/// Compute unit price scale factor passed to the creation command
	pub fee_scale: u32,
}

impl Default for OriginSettings {
	fn default() -> Self {
		Self {
			chain: "solana-testnet".to_string(),
			program_id: String::new(),
			store_only: false,
			fee_scale: 1,
		}
	}
}

/// One chain registry entry
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ChainConfig {
	pub logical_id: String,
	pub endpoint_id: u32,
	pub network_name: String,
	pub rpc_url: String,
	pub family: ChainFamily,
	/// Aggregator chain key or id used when the chain is bridged through the aggregator
	#[serde(default)]
	pub aggregator_chain: Option<String>,
}

impl From<ChainConfig> for ChainDescriptor {
	fn from(config: ChainConfig) -> Self {
		let descriptor = ChainDescriptor::new(
			config.logical_id,
			config.endpoint_id,
			config.network_name,
			config.rpc_url,
			config.family,
		);
		match config.aggregator_chain {
			Some(identifier) => descriptor.with_aggregator_chain(identifier),
			None => descriptor,
		}
	}
}

/// Substring to reply mapping for interactive tooling prompts
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PromptResponseConfig {
	pub pattern: String,
	pub reply: String,
}

/// Task names invoked on the provisioning tool
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct ToolingTasks {
	pub create_origin: String,
	pub deploy_mirror: String,
	pub init_config: String,
	pub wire: String,
	pub send: String,
}

impl Default for ToolingTasks {
	fn default() -> Self {
		Self {
			create_origin: "lz:oft:solana:create".to_string(),
			deploy_mirror: "lz:deploy".to_string(),
			init_config: "lz:oft:solana:init-config".to_string(),
			wire: "lz:oapp:wire".to_string(),
			send: "lz:oft:send".to_string(),
		}
	}
}

/// External provisioning tool invocation
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct ToolingSettings {
	pub program: String,
	/// Arguments placed before the task name
	pub base_args: Vec<String>,
	pub working_dir: Option<String>,
	pub tasks: ToolingTasks,
	/// Deployment tag of the mirror contract
	pub mirror_contract: String,
	pub max_retries: u32,
	pub retry_base_delay_ms: u64,
	/// Empty means the built-in prompt set
	pub prompt_responses: Vec<PromptResponseConfig>,
	/// Empty means the built-in transient error markers
	pub transient_markers: Vec<String>,
	/// Directory receiving per-run configuration artifacts. Defaults to the system temp dir.
	pub artifact_dir: Option<String>,
}

impl Default for ToolingSettings {
	fn default() -> Self {
		Self {
			program: "pnpm".to_string(),
			base_args: vec!["hardhat".to_string()],
			working_dir: None,
			tasks: ToolingTasks::default(),
			mirror_contract: "MyOFT".to_string(),
			max_retries: 3,
			retry_base_delay_ms: 5_000,
			prompt_responses: Vec::new(),
			transient_markers: Vec::new(),
			artifact_dir: None,
		}
	}
}

/// Bridge aggregator API
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct AggregatorSettings {
	pub endpoint: String,
	pub api_key: Option<ConfigurableValue>,
	/// Integrator tag sent with quotes
	pub integrator: Option<String>,
	pub request_timeout_ms: u64,
	pub poll_interval_ms: u64,
	/// Give up polling a transfer after this long. `None` polls until terminal.
	pub poll_timeout_secs: Option<u64>,
}

impl Default for AggregatorSettings {
	fn default() -> Self {
		Self {
			endpoint: "https://li.quest/v1".to_string(),
			api_key: None,
			integrator: None,
			request_timeout_ms: 30_000,
			poll_interval_ms: 5_000,
			poll_timeout_secs: Some(30 * 60),
		}
	}
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct WalletSettings {
	pub evm: Option<EvmWalletSettings>,
	pub solana: Option<SolanaWalletSettings>,
}

/// EVM wallet: JSON-RPC node for reads, signer endpoint for `eth_sendTransaction`
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct EvmWalletSettings {
	pub address: String,
	pub rpc_url: String,
	pub signer_url: String,
	#[serde(default)]
	pub signer_token: Option<ConfigurableValue>,
	#[serde(default = "default_confirmation_poll_ms")]
	pub confirmation_poll_ms: u64,
	#[serde(default = "default_confirmation_attempts")]
	pub max_confirmation_attempts: u32,
}

/// Solana wallet: signer endpoint re-signs serialized transactions, RPC submits them
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SolanaWalletSettings {
	pub address: String,
	pub rpc_url: String,
	pub signer_url: String,
	#[serde(default)]
	pub signer_token: Option<ConfigurableValue>,
	#[serde(default = "default_confirmation_poll_ms")]
	pub confirmation_poll_ms: u64,
	#[serde(default = "default_confirmation_attempts")]
	pub max_confirmation_attempts: u32,
}

fn default_confirmation_poll_ms() -> u64 {
	2_000
}

fn default_confirmation_attempts() -> u32 {
	60
}

/// Enforced options for generated messaging routes
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct EnforcedOptionsSettings {
	/// Options on origin -> destination routes
	pub to_destination: Vec<EnforcedOption>,
	/// Options on destination -> origin routes
	pub to_origin: Vec<EnforcedOption>,
}

impl Default for EnforcedOptionsSettings {
	fn default() -> Self {
		Self {
			to_destination: vec![
				EnforcedOption {
					msg_type: 1,
					gas: 80_000,
					value: 0,
				},
				EnforcedOption {
					msg_type: 2,
					gas: 80_000,
					value: 0,
				},
			],
			to_origin: vec![
				EnforcedOption {
					msg_type: 1,
					gas: 200_000,
					value: 2_039_280,
				},
				EnforcedOption {
					msg_type: 2,
					gas: 200_000,
					value: 2_039_280,
				},
			],
		}
	}
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigValidationError {
	#[error("Duplicate chain logical id: {0}")]
	DuplicateChain(String),

	#[error("Origin chain '{0}' is not in the chain registry")]
	UnknownOrigin(String),

	#[error("Origin chain '{0}' must be a solana-family chain")]
	OriginFamily(String),

	#[error("tooling.max_retries must be at least 1")]
	NoAttempts,

	#[error("aggregator.poll_interval_ms must be greater than zero")]
	ZeroPollInterval,
}

impl Settings {
	/// Get server bind address
	pub fn bind_address(&self) -> String {
		format!("{}:{}", self.server.host, self.server.port)
	}

	/// Chain registry entries, falling back to the built-in testnet table
	pub fn chain_descriptors(&self) -> Vec<ChainDescriptor> {
		if self.chains.is_empty() {
			default_chains()
		} else {
			self.chains.iter().cloned().map(ChainDescriptor::from).collect()
		}
	}

	pub fn validate(&self) -> Result<(), ConfigValidationError> {
		let chains = self.chain_descriptors();

		let mut seen = HashSet::new();
		for chain in &chains {
			if !seen.insert(chain.logical_id.as_str()) {
				return Err(ConfigValidationError::DuplicateChain(
					chain.logical_id.clone(),
				));
			}
		}

		let origin = chains
			.iter()
			.find(|chain| chain.logical_id == self.origin.chain)
			.ok_or_else(|| ConfigValidationError::UnknownOrigin(self.origin.chain.clone()))?;
		if origin.family != ChainFamily::Solana {
			return Err(ConfigValidationError::OriginFamily(origin.logical_id.clone()));
		}

		if self.tooling.max_retries == 0 {
			return Err(ConfigValidationError::NoAttempts);
		}
		if self.aggregator.poll_interval_ms == 0 {
			return Err(ConfigValidationError::ZeroPollInterval);
		}

		Ok(())
	}
}

/// Testnet endpoints of the messaging protocol
pub fn default_chains() -> Vec<ChainDescriptor> {
	vec![
		ChainDescriptor::new(
			"solana-testnet",
			40168,
			"solana-testnet",
			"https://api.devnet.solana.com",
			ChainFamily::Solana,
		),
		ChainDescriptor::new(
			"arbitrum-sepolia",
			40231,
			"arbitrum-sepolia",
			"https://sepolia-rollup.arbitrum.io/rpc",
			ChainFamily::Evm,
		)
		.with_aggregator_chain("421614"),
		ChainDescriptor::new(
			"bsc-v2-testnet",
			40102,
			"bsc-testnet",
			"https://data-seed-prebsc-1-s1.binance.org:8545",
			ChainFamily::Evm,
		)
		.with_aggregator_chain("97"),
		ChainDescriptor::new(
			"base-sepolia",
			40245,
			"base-sepolia",
			"https://sepolia.base.org",
			ChainFamily::Evm,
		)
		.with_aggregator_chain("84532"),
		ChainDescriptor::new(
			"optimism-sepolia",
			40232,
			"optimism-sepolia",
			"https://sepolia.optimism.io",
			ChainFamily::Evm,
		)
		.with_aggregator_chain("11155420"),
		ChainDescriptor::new(
			"ethereum-sepolia",
			40161,
			"sepolia",
			"https://rpc.sepolia.org",
			ChainFamily::Evm,
		)
		.with_aggregator_chain("11155111"),
		ChainDescriptor::new(
			"avalanche-fuji",
			40106,
			"fuji",
			"https://api.avax-test.network/ext/bc/C/rpc",
			ChainFamily::Evm,
		)
		.with_aggregator_chain("43113"),
		ChainDescriptor::new(
			"polygon-amoy",
			40267,
			"amoy",
			"https://rpc-amoy.polygon.technology",
			ChainFamily::Evm,
		)
		.with_aggregator_chain("80002"),
	]
}
