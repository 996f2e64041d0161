use std::error::Error;

use axum::{extract::rejection::JsonRejection, http::StatusCode, response::Json};
use launchpad_types::ErrorKind;
use serde::Serialize;

/// Error response format for endpoints without a domain response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
	pub error: String,
	pub message: String,
	pub timestamp: i64,
}

impl ErrorResponse {
	pub fn new(error: &str, message: impl Into<String>) -> Self {
		Self {
			error: error.to_string(),
			message: message.into(),
			timestamp: chrono::Utc::now().timestamp(),
		}
	}
}

pub type ApiError = (StatusCode, Json<ErrorResponse>);

/// Validation failures are the caller's; everything else is ours
pub fn status_for(kind: ErrorKind) -> StatusCode {
	if kind.is_client_error() {
		StatusCode::BAD_REQUEST
	} else {
		StatusCode::INTERNAL_SERVER_ERROR
	}
}

/// Display of the innermost cause, or of the error itself when it has none
pub fn root_cause(error: &(dyn Error + 'static)) -> String {
	let mut current = error;
	while let Some(source) = current.source() {
		current = source;
	}
	current.to_string()
}

/// Body text of a rejected JSON payload
pub fn rejection_details(rejection: &JsonRejection) -> String {
	rejection.body_text()
}

#[cfg(test)]
mod tests {
	use super::*;
	use thiserror::Error;

	#[derive(Debug, Error)]
	#[error("outer")]
	struct Outer(#[source] Inner);

	#[derive(Debug, Error)]
	#[error("inner cause")]
	struct Inner;

	#[test]
	fn test_status_mapping() {
		assert_eq!(status_for(ErrorKind::Validation), StatusCode::BAD_REQUEST);
		for kind in [
			ErrorKind::TransientExternal,
			ErrorKind::PermanentExternal,
			ErrorKind::Unexpected,
		] {
			assert_eq!(status_for(kind), StatusCode::INTERNAL_SERVER_ERROR);
		}
	}

	#[test]
	fn test_root_cause_walks_sources() {
		assert_eq!(root_cause(&Outer(Inner)), "inner cause");
		assert_eq!(root_cause(&Inner), "inner cause");
	}
}
