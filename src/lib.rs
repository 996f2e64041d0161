//! Omnichain Launchpad Library
//!
//! Provisions a token on the origin chain, deploys and wires its mirrors on
//! destination chains, and moves tokens between them either natively or
//! through a bridge aggregator.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

pub use launchpad_types::{
	chrono, serde_json, BridgeApi, BridgeRequest, BridgeResponse, ChainDescriptor, ChainFamily,
	ChainWallet, ErrorKind, ProvisioningProgress, ProvisioningRequest, ProvisioningResponse,
	TransferExtras, TransferReceipt, TransferRequest, TransferResponse, TransferRoute,
	TransferStatus,
};

pub use launchpad_service::{
	BridgeService, ChainRegistry, CommandError, CommandInvocation, CommandNativeSender,
	CommandOutput, CommandRunner, NativeSender, NativeTransfer, PollingConfig,
	ProcessCommandRunner, PromptResponder, ProvisioningPipeline, RetryPolicy, TransferDispatcher,
	TransferError,
};

pub use launchpad_api::{create_router, AppState};

pub use launchpad_adapters::{
	EvmWallet, EvmWalletConfig, LifiAdapter, LifiConfig, SolanaWallet, SolanaWalletConfig,
};

pub use launchpad_config::{load_config, log_service_info, log_startup_complete, Settings};

pub mod config {
	pub use launchpad_config::*;
}

pub mod service {
	pub use launchpad_service::*;
}

pub mod adapters {
	pub use launchpad_adapters::*;
}

// Re-export external dependencies for embedding
pub use async_trait;
pub use reqwest;

type BoxError = Box<dyn std::error::Error>;

/// Builder wiring settings and collaborators into a ready router
///
/// Collaborators not supplied are built from the settings: a process
/// command runner, the LI.FI adapter, configured wallets, and the
/// tooling-backed native sender.
#[derive(Default)]
pub struct LaunchpadBuilder {
	settings: Option<Settings>,
	command_runner: Option<Arc<dyn CommandRunner>>,
	bridge_api: Option<Arc<dyn BridgeApi>>,
	wallets: Vec<Arc<dyn ChainWallet>>,
	native_sender: Option<Arc<dyn NativeSender>>,
}

impl LaunchpadBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	/// Set custom settings
	pub fn with_settings(mut self, settings: Settings) -> Self {
		self.settings = Some(settings);
		self
	}

	/// Get the current settings
	pub fn settings(&self) -> Option<&Settings> {
		self.settings.as_ref()
	}

	pub fn with_command_runner(mut self, runner: Arc<dyn CommandRunner>) -> Self {
		self.command_runner = Some(runner);
		self
	}

	pub fn with_bridge_api(mut self, api: Arc<dyn BridgeApi>) -> Self {
		self.bridge_api = Some(api);
		self
	}

	/// Register a wallet. Any registered wallet replaces the configured ones.
	pub fn with_wallet(mut self, wallet: Arc<dyn ChainWallet>) -> Self {
		self.wallets.push(wallet);
		self
	}

	pub fn with_native_sender(mut self, sender: Arc<dyn NativeSender>) -> Self {
		self.native_sender = Some(sender);
		self
	}

	/// Initialize tracing with configuration-based settings
	fn init_tracing_from_settings(settings: &Settings) -> Result<(), BoxError> {
		use launchpad_config::LogFormat;

		let log_level = &settings.logging.level;
		let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
			.unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));

		let result = match settings.logging.format {
			LogFormat::Json => {
				let subscriber = tracing_subscriber::fmt().json().with_env_filter(env_filter);
				if settings.logging.structured {
					subscriber.with_target(true).with_thread_ids(true).try_init()
				} else {
					subscriber.try_init()
				}
			},
			LogFormat::Pretty => {
				let subscriber = tracing_subscriber::fmt()
					.pretty()
					.with_env_filter(env_filter);
				if settings.logging.structured {
					subscriber.with_target(true).with_thread_ids(true).try_init()
				} else {
					subscriber.try_init()
				}
			},
			LogFormat::Compact => {
				let subscriber = tracing_subscriber::fmt()
					.compact()
					.with_env_filter(env_filter);
				if settings.logging.structured {
					subscriber.with_target(true).with_thread_ids(true).try_init()
				} else {
					subscriber.try_init()
				}
			},
		};
		result.map_err(|e| format!("Failed to initialize tracing: {}", e))?;

		info!(
			"Logging configuration applied: level={}, format={:?}, structured={}",
			settings.logging.level, settings.logging.format, settings.logging.structured
		);

		Ok(())
	}

	/// Build every service and return the configured router with state
	pub async fn start(self) -> Result<(axum::Router, AppState), BoxError> {
		let settings = self.settings.unwrap_or_default();
		settings
			.validate()
			.map_err(|e| format!("Invalid configuration: {}", e))?;

		let registry = Arc::new(ChainRegistry::from_descriptors(settings.chain_descriptors())?);
		info!("Chain registry loaded with {} chain(s)", registry.len());

		let tooling = tooling_from(&settings.tooling);
		let retry = retry_policy_from(&settings.tooling);

		let runner = self.command_runner.unwrap_or_else(|| {
			Arc::new(ProcessCommandRunner::new(responder_from(&settings.tooling)))
		});

		let pipeline = ProvisioningPipeline::new(
			Arc::clone(&runner),
			Arc::clone(&registry),
			retry.clone(),
			launchpad_service::PipelineConfig {
				tooling: tooling.clone(),
				origin: launchpad_service::OriginParams {
					chain: settings.origin.chain.clone(),
					program_id: settings.origin.program_id.clone(),
					store_only: settings.origin.store_only,
					fee_scale: settings.origin.fee_scale,
				},
				mirror_contract: settings.tooling.mirror_contract.clone(),
				artifact_dir: settings
					.tooling
					.artifact_dir
					.as_ref()
					.map(PathBuf::from)
					.unwrap_or_else(std::env::temp_dir),
				to_destination_options: settings.enforced_options.to_destination.clone(),
				to_origin_options: settings.enforced_options.to_origin.clone(),
			},
		);

		let bridge_api = match self.bridge_api {
			Some(api) => api,
			None => Arc::new(LifiAdapter::new(lifi_config_from(&settings)?)?),
		};
		let wallets = if self.wallets.is_empty() {
			wallets_from(&settings)?
		} else {
			self.wallets
		};
		let polling = PollingConfig {
			interval: Duration::from_millis(settings.aggregator.poll_interval_ms),
			timeout: settings.aggregator.poll_timeout_secs.map(Duration::from_secs),
		};
		let bridge = Arc::new(
			wallets
				.into_iter()
				.fold(BridgeService::new(bridge_api, polling), |bridge, wallet| {
					bridge.with_wallet(wallet)
				}),
		);

		let native_sender = self.native_sender.unwrap_or_else(|| {
			Arc::new(CommandNativeSender::new(
				Arc::clone(&runner),
				tooling,
				retry,
			))
		});
		let dispatcher = TransferDispatcher::new(
			Arc::clone(&registry),
			Arc::clone(&bridge),
			native_sender,
			settings.origin.chain.clone(),
		);

		let app_state = AppState {
			pipeline: Arc::new(pipeline),
			dispatcher: Arc::new(dispatcher),
			bridge,
			registry,
		};

		let router = create_router(settings.server.body_limit_bytes).with_state(app_state.clone());

		Ok((router, app_state))
	}

	/// Start the complete server with all defaults and setup
	/// This method handles everything needed to run the server, including:
	/// - Loading .env file
	/// - Loading configuration with defaults
	/// - Initializing tracing
	/// - Warming the aggregator cache
	/// - Binding and serving the application
	pub async fn start_server(mut self) -> Result<(), BoxError> {
		dotenvy::dotenv().ok();

		let using_provided_settings = self.settings.is_some();
		let settings = match self.settings.take() {
			Some(settings) => settings,
			None => load_config()?,
		};

		Self::init_tracing_from_settings(&settings)?;
		log_service_info();

		info!(
			"Using configuration: loaded from {}",
			if using_provided_settings {
				"provided settings"
			} else {
				"config file or defaults"
			}
		);

		info!("🔧 Configuring Omnichain Launchpad server");
		info!(
			"Origin chain: {} ({} registered chain(s))",
			settings.origin.chain,
			settings.chain_descriptors().len()
		);
		info!("Aggregator endpoint: {}", settings.aggregator.endpoint);

		let bind_addr = settings.bind_address();
		let addr: SocketAddr = bind_addr
			.parse()
			.map_err(|e| format!("Invalid bind address '{}': {}", bind_addr, e))?;

		self.settings = Some(settings);
		let (app, state) = self.start().await?;

		if let Err(e) = state.bridge.initialize().await {
			warn!("Aggregator cache not warmed, will load on first use: {}", e);
		}

		let listener = tokio::net::TcpListener::bind(addr).await?;

		log_startup_complete(&bind_addr);
		info!("API endpoints available:");
		info!("  GET  /health");
		info!("  GET  /api/v1/chains");
		info!("  POST /api/v1/tokens");
		info!("  POST /api/v1/transfers");
		info!("  POST /api/v1/bridge");
		info!("  GET  /api/v1/bridge/status");
		info!("  GET  /api/v1/bridge/connections");

		axum::serve(listener, app)
			.with_graceful_shutdown(shutdown_signal())
			.await?;

		launchpad_config::log_service_shutdown();
		Ok(())
	}
}

async fn shutdown_signal() {
	if let Err(e) = tokio::signal::ctrl_c().await {
		warn!("Failed to listen for shutdown signal: {}", e);
		std::future::pending::<()>().await;
	}
}

fn tooling_from(settings: &launchpad_config::ToolingSettings) -> launchpad_service::Tooling {
	launchpad_service::Tooling {
		program: settings.program.clone(),
		base_args: settings.base_args.clone(),
		working_dir: settings.working_dir.as_ref().map(PathBuf::from),
		tasks: launchpad_service::ToolingTasks {
			create_origin: settings.tasks.create_origin.clone(),
			deploy_mirror: settings.tasks.deploy_mirror.clone(),
			init_config: settings.tasks.init_config.clone(),
			wire: settings.tasks.wire.clone(),
			send: settings.tasks.send.clone(),
		},
	}
}

fn retry_policy_from(settings: &launchpad_config::ToolingSettings) -> RetryPolicy {
	let mut policy = RetryPolicy {
		max_retries: settings.max_retries,
		base_delay: Duration::from_millis(settings.retry_base_delay_ms),
		..RetryPolicy::default()
	};
	if !settings.transient_markers.is_empty() {
		policy.transient_markers = settings.transient_markers.clone();
	}
	policy
}

fn responder_from(settings: &launchpad_config::ToolingSettings) -> PromptResponder {
	if settings.prompt_responses.is_empty() {
		return PromptResponder::default();
	}
	PromptResponder::new(
		settings
			.prompt_responses
			.iter()
			.map(|rule| (rule.pattern.clone(), rule.reply.clone()))
			.collect(),
	)
}

fn lifi_config_from(settings: &Settings) -> Result<LifiConfig, BoxError> {
	let aggregator = &settings.aggregator;
	let api_key = aggregator
		.api_key
		.as_ref()
		.map(|key| key.resolve_secret())
		.transpose()
		.map_err(|e| format!("Failed to resolve aggregator API key: {}", e))?;

	Ok(LifiConfig {
		endpoint: aggregator.endpoint.clone(),
		api_key,
		integrator: aggregator.integrator.clone(),
		timeout_ms: aggregator.request_timeout_ms,
	})
}

fn wallets_from(settings: &Settings) -> Result<Vec<Arc<dyn ChainWallet>>, BoxError> {
	let mut wallets: Vec<Arc<dyn ChainWallet>> = Vec::new();

	if let Some(evm) = &settings.wallets.evm {
		let signer_token = evm
			.signer_token
			.as_ref()
			.map(|token| token.resolve_secret())
			.transpose()
			.map_err(|e| format!("Failed to resolve EVM signer token: {}", e))?;
		wallets.push(Arc::new(EvmWallet::new(EvmWalletConfig {
			address: evm.address.clone(),
			rpc_url: evm.rpc_url.clone(),
			signer_url: evm.signer_url.clone(),
			signer_token,
			confirmation_poll: Duration::from_millis(evm.confirmation_poll_ms),
			max_confirmation_attempts: evm.max_confirmation_attempts,
		})?));
	}

	if let Some(solana) = &settings.wallets.solana {
		let signer_token = solana
			.signer_token
			.as_ref()
			.map(|token| token.resolve_secret())
			.transpose()
			.map_err(|e| format!("Failed to resolve Solana signer token: {}", e))?;
		wallets.push(Arc::new(SolanaWallet::new(SolanaWalletConfig {
			address: solana.address.clone(),
			rpc_url: solana.rpc_url.clone(),
			signer_url: solana.signer_url.clone(),
			signer_token,
			confirmation_poll: Duration::from_millis(solana.confirmation_poll_ms),
			max_confirmation_attempts: solana.max_confirmation_attempts,
		})));
	}

	if wallets.is_empty() {
		warn!("No wallets configured; aggregated bridging is unavailable");
	}
	Ok(wallets)
}
