//! Launchpad Configuration
//!
//! Configuration management and startup utilities for the omnichain launchpad.

pub mod configurable_value;
pub mod loader;
pub mod settings;
pub mod startup_logger;

pub use configurable_value::{ConfigurableValue, ConfigurableValueError, ValueType};
pub use loader::{load_config, load_config_from, ConfigLoadError};
pub use settings::{
	AggregatorSettings, ChainConfig, ConfigValidationError, EnforcedOptionsSettings,
	EvmWalletSettings, LogFormat, LoggingSettings, OriginSettings, PromptResponseConfig,
	ServerSettings, Settings, SolanaWalletSettings, default_chains, ToolingSettings, ToolingTasks,
	WalletSettings,
};
pub use startup_logger::{log_service_info, log_service_shutdown, log_startup_complete};
