//! Provisioning entry point response

use serde::{Deserialize, Serialize};

use super::progress::ProvisioningProgress;

/// Response body of the provisioning entry point
///
/// Progress is always present so callers can see how far provisioning got.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvisioningResponse {
	pub success: bool,
	pub progress: ProvisioningProgress,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub error: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub details: Option<String>,
}

impl ProvisioningResponse {
	pub fn success(progress: ProvisioningProgress) -> Self {
		Self {
			success: true,
			progress,
			error: None,
			details: None,
		}
	}

	pub fn failure(
		error: impl Into<String>,
		details: impl Into<String>,
		progress: ProvisioningProgress,
	) -> Self {
		Self {
			success: false,
			progress,
			error: Some(error.into()),
			details: Some(details.into()),
		}
	}
}
