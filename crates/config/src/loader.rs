//! Configuration loading utilities

use crate::settings::{ConfigValidationError, Settings};
use config::{Config, ConfigError, Environment, File};
use thiserror::Error;

/// Default config file location, relative to the working directory
pub const DEFAULT_CONFIG_PATH: &str = "config/config";

#[derive(Debug, Error)]
pub enum ConfigLoadError {
	#[error("Failed to read configuration: {0}")]
	Source(#[from] ConfigError),

	#[error("Invalid configuration: {0}")]
	Validation(#[from] ConfigValidationError),
}

/// Load configuration from `CONFIG_PATH` (or `config/config`) plus `LAUNCHPAD__*` overrides
pub fn load_config() -> Result<Settings, ConfigLoadError> {
	let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
	load_config_from(&path)
}

/// Load configuration from a given file stem. Missing files fall back to defaults.
pub fn load_config_from(path: &str) -> Result<Settings, ConfigLoadError> {
	let s = Config::builder()
		.add_source(File::with_name(path).required(false))
		.add_source(
			Environment::with_prefix("LAUNCHPAD")
				.prefix_separator("__")
				.separator("__"),
		)
		.build()?;

	let settings: Settings = s.try_deserialize()?;
	settings.validate()?;
	Ok(settings)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_missing_file_falls_back_to_defaults() {
		let settings = load_config_from("does/not/exist/config").unwrap();
		assert_eq!(settings.server.port, 3000);
		assert_eq!(settings.origin.chain, "solana-testnet");
	}

	#[test]
	fn test_example_config_loads() {
		let settings = load_config_from("../../config/config.example").unwrap();
		assert_eq!(settings.chains.len(), 3);
		assert_eq!(settings.tooling.working_dir.as_deref(), Some("./oft-workspace"));
		assert_eq!(settings.enforced_options.to_origin[0].value, 2_039_280);
		assert!(settings.wallets.solana.unwrap().signer_token.is_none());
	}
}
