//! Configurable value types that can load from environment variables or plain values

use launchpad_types::SecretString;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A configurable value that can be loaded from environment variables or used as plain text
///
/// Used for aggregator API keys and signer credentials:
/// - `{"type": "env", "value": "LIFI_API_KEY"}`
/// - `{"type": "plain", "value": "..."}`
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ConfigurableValue {
	#[serde(rename = "type")]
	pub value_type: ValueType,
	/// Either the environment variable name or the value itself
	pub value: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
	Env,
	Plain,
}

impl ConfigurableValue {
	pub fn from_env(env_var_name: &str) -> Self {
		Self {
			value_type: ValueType::Env,
			value: env_var_name.to_string(),
		}
	}

	pub fn from_plain(plain_value: &str) -> Self {
		Self {
			value_type: ValueType::Plain,
			value: plain_value.to_string(),
		}
	}

	/// Resolve the actual value based on the type
	pub fn resolve(&self) -> Result<String, ConfigurableValueError> {
		match self.value_type {
			ValueType::Env => std::env::var(&self.value).map_err(|_| {
				ConfigurableValueError::EnvironmentVariableNotFound(self.value.clone())
			}),
			ValueType::Plain => Ok(self.value.clone()),
		}
	}

	pub fn resolve_secret(&self) -> Result<SecretString, ConfigurableValueError> {
		self.resolve().map(SecretString::from)
	}

	/// Description safe for logs
	pub fn description(&self) -> String {
		match self.value_type {
			ValueType::Env => format!("environment variable '{}'", self.value),
			ValueType::Plain => "configured plain value".to_string(),
		}
	}
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigurableValueError {
	#[error("Environment variable '{0}' not found")]
	EnvironmentVariableNotFound(String),
}

impl fmt::Display for ConfigurableValue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self.value_type {
			ValueType::Env => write!(f, "env:{}", self.value),
			ValueType::Plain => write!(f, "plain:[REDACTED]"),
		}
	}
}

/// "env:NAME" becomes an environment reference, anything else a plain value
impl From<&str> for ConfigurableValue {
	fn from(value: &str) -> Self {
		if let Some(env_var) = value.strip_prefix("env:") {
			Self::from_env(env_var)
		} else {
			Self::from_plain(value)
		}
	}
}
