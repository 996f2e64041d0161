//! Per-run provisioning progress record

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// How far a provisioning run got
///
/// Owned by exactly one pipeline run. Completion flags only move from false
/// to true, and origin addresses are written at most once.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvisioningProgress {
	pub step1_completed: bool,
	pub step2_completed: BTreeMap<String, bool>,
	pub step3_completed: bool,
	pub step4_completed: bool,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub origin_token_address: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub origin_store_address: Option<String>,
}

impl ProvisioningProgress {
	pub fn new() -> Self {
		Self::default()
	}

	/// Record origin token creation. Existing addresses are kept.
	pub fn complete_origin(&mut self, token_address: String, store_address: String) {
		self.origin_token_address.get_or_insert(token_address);
		self.origin_store_address.get_or_insert(store_address);
		self.step1_completed = true;
	}

	/// Record a successful mirror deployment on `chain`
	pub fn complete_deployment(&mut self, chain: &str) {
		self.step2_completed.insert(chain.to_string(), true);
	}

	pub fn complete_configuration(&mut self) {
		self.step3_completed = true;
	}

	pub fn complete_wiring(&mut self) {
		self.step4_completed = true;
	}

	pub fn is_deployed(&self, chain: &str) -> bool {
		self.step2_completed.get(chain).copied().unwrap_or(false)
	}

	pub fn is_complete(&self) -> bool {
		self.step1_completed && self.step3_completed && self.step4_completed
	}
}
