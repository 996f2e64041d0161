//! Bridge request as received at the entry point

use serde::{Deserialize, Serialize};

/// Request to move value through the aggregated bridge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BridgeRequest {
	/// Human chain identifier (key, name or aggregator id)
	pub from_chain: String,
	pub to_chain: String,
	/// Token symbol or address on the source chain
	pub from_token: String,
	/// Token symbol or address on the destination chain
	pub to_token: String,
	/// Amount in the source token's base units
	pub amount: String,
	/// Sender; defaults to the source family's wallet address
	#[serde(default)]
	pub from_address: Option<String>,
	/// Recipient; defaults to the sender
	#[serde(default)]
	pub to: Option<String>,
}
