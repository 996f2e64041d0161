//! Chain descriptors and chain families

use serde::{Deserialize, Serialize};
use std::fmt;

/// Transaction model of a chain
///
/// Determines how a prepared transaction is signed and submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChainFamily {
	/// Account-nonce based chains submitting native transaction requests
	Evm,
	/// Chains submitting precomputed serialized transactions that must be re-signed
	Solana,
}

impl ChainFamily {
	/// Parse the aggregator's chain type label ("EVM", "SVM")
	pub fn from_chain_type(chain_type: &str) -> Option<Self> {
		match chain_type.to_ascii_uppercase().as_str() {
			"EVM" => Some(Self::Evm),
			"SVM" | "SOLANA" => Some(Self::Solana),
			_ => None,
		}
	}

	/// Addresses the aggregator uses to denote the family's native asset
	pub fn native_asset_addresses(&self) -> &'static [&'static str] {
		match self {
			Self::Evm => &[
				"0x0000000000000000000000000000000000000000",
				"0xeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeee",
			],
			Self::Solana => &[
				"11111111111111111111111111111111",
				"So11111111111111111111111111111111111111112",
			],
		}
	}

	/// Whether the given token address denotes the native asset
	pub fn is_native_asset(&self, token_address: &str) -> bool {
		self.native_asset_addresses()
			.iter()
			.any(|native| native.eq_ignore_ascii_case(token_address))
	}
}

impl fmt::Display for ChainFamily {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Evm => write!(f, "evm"),
			Self::Solana => write!(f, "solana"),
		}
	}
}

/// Network parameters of a chain known to the launchpad
///
/// Immutable once loaded; keyed by `logical_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainDescriptor {
	/// Logical identifier used in requests (e.g. "arbitrum-sepolia")
	pub logical_id: String,
	/// Messaging protocol endpoint identifier
	pub protocol_endpoint_id: u32,
	/// Network name understood by the deployment tooling
	pub network_name: String,
	/// RPC target for the chain
	pub rpc_url: String,
	/// Transaction family of the chain
	pub family: ChainFamily,
	/// Key, name or id the bridge aggregator knows this chain by
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub aggregator_chain: Option<String>,
}

impl ChainDescriptor {
	pub fn new(
		logical_id: impl Into<String>,
		protocol_endpoint_id: u32,
		network_name: impl Into<String>,
		rpc_url: impl Into<String>,
		family: ChainFamily,
	) -> Self {
		Self {
			logical_id: logical_id.into(),
			protocol_endpoint_id,
			network_name: network_name.into(),
			rpc_url: rpc_url.into(),
			family,
			aggregator_chain: None,
		}
	}

	pub fn with_aggregator_chain(mut self, identifier: impl Into<String>) -> Self {
		self.aggregator_chain = Some(identifier.into());
		self
	}
}
