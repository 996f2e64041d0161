//! Provisioning request model and validation

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// Validation errors for provisioning requests
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProvisioningValidationError {
	#[error("Missing required field: {field}")]
	MissingRequiredField { field: String },

	#[error("Invalid total supply '{value}': must be a positive integer")]
	InvalidTotalSupply { value: String },

	#[error("At least one destination chain is required")]
	NoDestinations,

	#[error("Destination chain listed more than once: {chain}")]
	DuplicateDestination { chain: String },
}

/// Request to create a token on the origin chain and mirror it on destinations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvisioningRequest {
	pub token_name: String,
	pub token_symbol: String,
	/// Total supply in base units, as a decimal string
	pub total_supply: String,
	pub metadata_uri: String,
	/// Logical chain ids, processed in this order
	pub destination_chains: Vec<String>,
}

impl ProvisioningRequest {
	pub fn validate(&self) -> Result<(), ProvisioningValidationError> {
		if self.token_name.trim().is_empty() {
			return Err(ProvisioningValidationError::MissingRequiredField {
				field: "tokenName".to_string(),
			});
		}
		if self.token_symbol.trim().is_empty() {
			return Err(ProvisioningValidationError::MissingRequiredField {
				field: "tokenSymbol".to_string(),
			});
		}
		if self.metadata_uri.trim().is_empty() {
			return Err(ProvisioningValidationError::MissingRequiredField {
				field: "metadataUri".to_string(),
			});
		}

		let supply_is_valid = !self.total_supply.is_empty()
			&& self.total_supply.chars().all(|c| c.is_ascii_digit())
			&& self.total_supply.chars().any(|c| c != '0');
		if !supply_is_valid {
			return Err(ProvisioningValidationError::InvalidTotalSupply {
				value: self.total_supply.clone(),
			});
		}

		if self.destination_chains.is_empty() {
			return Err(ProvisioningValidationError::NoDestinations);
		}

		let mut seen = HashSet::new();
		for chain in &self.destination_chains {
			if !seen.insert(chain.as_str()) {
				return Err(ProvisioningValidationError::DuplicateDestination {
					chain: chain.clone(),
				});
			}
		}

		Ok(())
	}
}
