//! Error taxonomy shared by every layer

use serde::{Deserialize, Serialize};

/// Coarse classification used to decide retry behavior and HTTP status codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
	/// Bad, missing or unsupported input. Surfaced immediately, nothing attempted.
	Validation,
	/// Chain congestion or expiry class failure, eligible for retry with backoff
	TransientExternal,
	/// Any other external failure. Surfaced without retry.
	PermanentExternal,
	/// Anything not otherwise classified
	Unexpected,
}

impl ErrorKind {
	/// Whether the error is the caller's fault (400-class)
	pub fn is_client_error(&self) -> bool {
		matches!(self, ErrorKind::Validation)
	}

	/// Whether the failure may succeed when attempted again
	pub fn is_retryable(&self) -> bool {
		matches!(self, ErrorKind::TransientExternal)
	}
}
