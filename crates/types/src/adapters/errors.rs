//! Error types for adapter operations

use thiserror::Error;

use crate::errors::ErrorKind;

/// Adapter operation errors
#[derive(Error, Debug)]
pub enum AdapterError {
	#[error("HTTP request failed: {0}")]
	HttpError(#[from] reqwest::Error),

	#[error("HTTP {status_code}: {reason}")]
	HttpStatusError { status_code: u16, reason: String },

	#[error("Timeout occurred after {timeout_ms}ms")]
	Timeout { timeout_ms: u64 },

	#[error("Invalid response format: {reason}")]
	InvalidResponse { reason: String },

	#[error("Invalid request: {reason}")]
	InvalidRequest { reason: String },

	#[error("RPC transport error: {reason}")]
	Transport { reason: String },

	#[error("RPC error {code}: {message}")]
	Rpc { code: i64, message: String },

	#[error("Signer rejected transaction: {reason}")]
	Signer { reason: String },

	#[error("Transaction {tx_hash} reverted")]
	TransactionReverted { tx_hash: String },

	#[error("Transaction {tx_hash} not confirmed after {attempts} attempts")]
	ConfirmationTimeout { tx_hash: String, attempts: u32 },

	#[error("Configuration error: {reason}")]
	ConfigError { reason: String },

	#[error("Serialization error: {0}")]
	Serialization(#[from] serde_json::Error),
}

impl AdapterError {
	/// Extract HTTP status code from the error if available
	pub fn status_code(&self) -> Option<u16> {
		match self {
			AdapterError::HttpStatusError { status_code, .. } => Some(*status_code),
			AdapterError::HttpError(reqwest_error) => {
				reqwest_error.status().map(|status| status.as_u16())
			},
			_ => None,
		}
	}

	/// Create an HTTP failure error with the given status code and reason
	pub fn http_failure(status_code: u16, reason: impl Into<String>) -> Self {
		Self::HttpStatusError {
			status_code,
			reason: reason.into(),
		}
	}

	/// Create an HTTP failure error from response status with default reason
	pub fn from_http_failure(status_code: u16) -> Self {
		let reason = match status_code {
			400 => "Bad Request".to_string(),
			401 => "Unauthorized".to_string(),
			403 => "Forbidden".to_string(),
			404 => "Not Found".to_string(),
			429 => "Too Many Requests".to_string(),
			500 => "Internal Server Error".to_string(),
			502 => "Bad Gateway".to_string(),
			503 => "Service Unavailable".to_string(),
			_ => format!("HTTP Error {}", status_code),
		};

		Self::http_failure(status_code, reason)
	}

	/// Transport failures, timeouts, 5xx and 429 are transient. Other HTTP
	/// statuses and well-formed RPC errors are not.
	pub fn kind(&self) -> ErrorKind {
		match self {
			AdapterError::InvalidRequest { .. } => ErrorKind::Validation,
			AdapterError::ConfigError { .. } => ErrorKind::Unexpected,
			AdapterError::Timeout { .. } | AdapterError::Transport { .. } => {
				ErrorKind::TransientExternal
			},
			AdapterError::HttpError(_) | AdapterError::HttpStatusError { .. } => {
				match self.status_code() {
					None => ErrorKind::TransientExternal,
					Some(status) if status >= 500 || status == 429 => {
						ErrorKind::TransientExternal
					},
					Some(_) => ErrorKind::PermanentExternal,
				}
			},
			_ => ErrorKind::PermanentExternal,
		}
	}
}
