//! Models exchanged with the bridge aggregator

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::ChainFamily;

/// Chain metadata as reported by the aggregator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainInfo {
	/// Aggregator canonical chain id
	pub id: u64,
	/// Short key (e.g. "arb", "sol")
	pub key: String,
	/// Human name (e.g. "Arbitrum")
	pub name: String,
	/// Transaction family, when the aggregator reports one we support
	pub family: Option<ChainFamily>,
	/// Native asset of the chain
	pub native_token: Option<TokenInfo>,
}

impl ChainInfo {
	/// Whether a human-given identifier refers to this chain
	pub fn matches(&self, identifier: &str) -> bool {
		self.key.eq_ignore_ascii_case(identifier)
			|| self.name.eq_ignore_ascii_case(identifier)
			|| self.id.to_string() == identifier
	}
}

/// Token metadata as reported by the aggregator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenInfo {
	pub address: String,
	pub symbol: String,
	pub decimals: u8,
	pub chain_id: u64,
	#[serde(default)]
	pub name: String,
}

/// Canonical quote request sent to the aggregator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRequest {
	pub from_chain: u64,
	pub to_chain: u64,
	pub from_token: String,
	pub to_token: String,
	pub from_amount: String,
	pub from_address: String,
	pub to_address: Option<String>,
}

/// Unsigned transaction carried by a quote, in the source chain's native representation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum PreparedTransaction {
	/// Account-based transaction request
	#[serde(rename_all = "camelCase")]
	Evm {
		to: String,
		data: String,
		value: Option<String>,
		gas_limit: Option<String>,
		gas_price: Option<String>,
		chain_id: Option<u64>,
	},
	/// Precomputed serialized transaction (base64) to be re-signed by the wallet
	Serialized { data: String },
}

impl PreparedTransaction {
	/// Family able to submit this transaction
	pub fn family(&self) -> ChainFamily {
		match self {
			PreparedTransaction::Evm { .. } => ChainFamily::Evm,
			PreparedTransaction::Serialized { .. } => ChainFamily::Solana,
		}
	}
}

/// An executable quote. Fetched immediately before use and never cached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
	pub quote_id: String,
	/// Bridge/tool selected by the aggregator, needed for status lookups
	pub provider_id: String,
	pub from_chain_id: u64,
	pub to_chain_id: u64,
	pub source_token_address: String,
	pub dest_token_address: String,
	/// Spender that must hold an allowance before submission
	pub approval_address: Option<String>,
	pub source_amount: String,
	pub dest_amount: String,
	pub unsigned_transaction: PreparedTransaction,
}

/// Lookup key of a cross-chain transfer status
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusQuery {
	pub provider_id: String,
	pub from_chain: u64,
	pub to_chain: u64,
	pub tx_hash: String,
}

/// Transfer status of a submitted bridge transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransferStatus {
	Pending,
	Done,
	Failed,
}

impl TransferStatus {
	/// Map the aggregator's status label. Unknown and not-yet-indexed transfers are pending.
	pub fn from_label(label: &str) -> Self {
		match label.to_ascii_uppercase().as_str() {
			"DONE" => Self::Done,
			"FAILED" | "INVALID" => Self::Failed,
			_ => Self::Pending,
		}
	}

	pub fn is_terminal(&self) -> bool {
		matches!(self, Self::Done | Self::Failed)
	}
}

impl fmt::Display for TransferStatus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Pending => write!(f, "PENDING"),
			Self::Done => write!(f, "DONE"),
			Self::Failed => write!(f, "FAILED"),
		}
	}
}

/// Status lookup result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
	pub status: TransferStatus,
	pub substatus: Option<String>,
	pub receiving_tx_hash: Option<String>,
}

impl StatusResponse {
	pub fn new(status: TransferStatus) -> Self {
		Self {
			status,
			substatus: None,
			receiving_tx_hash: None,
		}
	}
}

/// Token connectivity between two chains
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
	pub from_chain_id: u64,
	pub to_chain_id: u64,
	pub from_tokens: Vec<TokenInfo>,
	pub to_tokens: Vec<TokenInfo>,
}
