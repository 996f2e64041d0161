//! Transfer requests, receipts and validation

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::bridge::TransferStatus;

/// Validation errors for transfer requests
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransferValidationError {
	#[error("Missing required field: {field}")]
	MissingRequiredField { field: String },

	#[error("Invalid amount '{value}': must be a positive integer")]
	InvalidAmount { value: String },

	#[error("Missing required extra '{extra}' for {direction} transfer")]
	MissingExtra { extra: String, direction: String },

	#[error("Native transfers need distinct chains, got '{chain}' twice")]
	SameChain { chain: String },
}

/// Chain-specific parameters accompanying a transfer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferExtras {
	/// Origin token mint, required when sending from the origin chain
	#[serde(default)]
	pub mint: Option<String>,
	/// Origin escrow/store account, required when sending from the origin chain
	#[serde(default)]
	pub escrow: Option<String>,
	/// Mirror contract on the source chain, required when sending toward the origin
	#[serde(default)]
	pub oapp_address: Option<String>,
	/// Source token for aggregated routing
	#[serde(default)]
	pub from_token: Option<String>,
	/// Destination token for aggregated routing
	#[serde(default)]
	pub to_token: Option<String>,
	/// Force the aggregated bridge path
	#[serde(default)]
	pub aggregated: bool,
}

/// Request to move tokens between two registered chains
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferRequest {
	pub from_chain: String,
	pub to_chain: String,
	/// Amount in base units
	pub amount: String,
	/// Recipient on the destination chain
	pub to: String,
	#[serde(default, alias = "chainSpecificExtras")]
	pub extras: TransferExtras,
}

impl TransferRequest {
	/// Field-level validation. Routing-dependent extras are checked by the dispatcher.
	pub fn validate(&self) -> Result<(), TransferValidationError> {
		for (field, value) in [
			("fromChain", &self.from_chain),
			("toChain", &self.to_chain),
			("to", &self.to),
		] {
			if value.trim().is_empty() {
				return Err(TransferValidationError::MissingRequiredField {
					field: field.to_string(),
				});
			}
		}

		let amount_is_valid = !self.amount.is_empty()
			&& self.amount.chars().all(|c| c.is_ascii_digit())
			&& self.amount.chars().any(|c| c != '0');
		if !amount_is_valid {
			return Err(TransferValidationError::InvalidAmount {
				value: self.amount.clone(),
			});
		}

		Ok(())
	}
}

/// Which path carried a transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransferRoute {
	/// Native cross-chain messaging send
	Native,
	/// Aggregated bridge provider
	Aggregated,
}

impl fmt::Display for TransferRoute {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Native => write!(f, "native"),
			Self::Aggregated => write!(f, "aggregated"),
		}
	}
}

/// Handle returned once a transfer has been submitted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferReceipt {
	pub route: TransferRoute,
	pub tx_hash: String,
	pub status: TransferStatus,
}

/// Response body of the transfer entry point
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferResponse {
	pub success: bool,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub route: Option<TransferRoute>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub tx_hash: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub status: Option<TransferStatus>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub error: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub details: Option<String>,
}

impl TransferResponse {
	pub fn success(receipt: TransferReceipt) -> Self {
		Self {
			success: true,
			route: Some(receipt.route),
			tx_hash: Some(receipt.tx_hash),
			status: Some(receipt.status),
			error: None,
			details: None,
		}
	}

	pub fn failure(error: impl Into<String>, details: impl Into<String>) -> Self {
		Self {
			success: false,
			route: None,
			tx_hash: None,
			status: None,
			error: Some(error.into()),
			details: Some(details.into()),
		}
	}
}
