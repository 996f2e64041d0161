//! Bridge outcomes and API response shapes

use serde::{Deserialize, Serialize};

use super::models::TransferStatus;

/// Result of a completed bridge operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BridgeOutcome {
	pub transaction_hash: String,
	pub status: TransferStatus,
}

/// Response body of the bridge entry point
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BridgeResponse {
	pub success: bool,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub tx_hash: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub status: Option<TransferStatus>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub error: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub details: Option<String>,
}

impl BridgeResponse {
	pub fn success(outcome: BridgeOutcome) -> Self {
		Self {
			success: true,
			tx_hash: Some(outcome.transaction_hash),
			status: Some(outcome.status),
			error: None,
			details: None,
		}
	}

	pub fn failure(error: impl Into<String>, details: impl Into<String>) -> Self {
		Self {
			success: false,
			tx_hash: None,
			status: None,
			error: Some(error.into()),
			details: Some(details.into()),
		}
	}
}
