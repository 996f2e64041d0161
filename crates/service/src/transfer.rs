//! Transfer dispatcher
//!
//! Transfers touching the origin chain go over the native messaging path
//! unless the caller asks for aggregated routing; all others go through the
//! bridge client.

use std::sync::Arc;

use async_trait::async_trait;
use launchpad_types::{
	BridgeRequest, ChainDescriptor, ChainFamily, ErrorKind, TransferReceipt, TransferRequest,
	TransferRoute, TransferStatus, TransferValidationError,
};
use serde_json::Value;
use thiserror::Error;
use tracing::info;

use crate::bridge::{BridgeError, BridgeService};
use crate::chain_registry::{ChainRegistry, ChainRegistryError};
use crate::command_runner::{run_with_retry, CommandError, CommandRunner, RetryPolicy};
use crate::tooling::Tooling;

#[derive(Debug, Error)]
pub enum TransferError {
	#[error("Invalid transfer request: {0}")]
	Validation(#[from] TransferValidationError),
	#[error(transparent)]
	Registry(#[from] ChainRegistryError),
	#[error("Aggregated transfer failed: {0}")]
	Bridge(#[from] BridgeError),
	#[error("Native send failed: {0}")]
	Command(#[from] CommandError),
	#[error("Native send output unreadable: {0}")]
	Output(String),
}

impl TransferError {
	pub fn kind(&self) -> ErrorKind {
		match self {
			TransferError::Validation(_) => ErrorKind::Validation,
			TransferError::Registry(error) => error.kind(),
			TransferError::Bridge(error) => error.kind(),
			TransferError::Command(error) => error.kind(),
			TransferError::Output(_) => ErrorKind::PermanentExternal,
		}
	}
}

/// A resolved native messaging send
#[derive(Debug, Clone, PartialEq)]
pub struct NativeTransfer {
	pub from: ChainDescriptor,
	pub to: ChainDescriptor,
	pub amount: String,
	pub recipient: String,
	pub mint: Option<String>,
	pub escrow: Option<String>,
	pub oapp_address: Option<String>,
}

/// Native message-passing send path
#[async_trait]
#[cfg_attr(test, mockall::automock)]
pub trait NativeSender: Send + Sync {
	/// Submit the send, returning the source transaction hash or signature
	async fn send(&self, transfer: &NativeTransfer) -> Result<String, TransferError>;
}

/// `NativeSender` running the tooling's send task
pub struct CommandNativeSender {
	runner: Arc<dyn CommandRunner>,
	tooling: Tooling,
	retry: RetryPolicy,
}

impl CommandNativeSender {
	pub fn new(runner: Arc<dyn CommandRunner>, tooling: Tooling, retry: RetryPolicy) -> Self {
		Self {
			runner,
			tooling,
			retry,
		}
	}
}

#[async_trait]
impl NativeSender for CommandNativeSender {
	async fn send(&self, transfer: &NativeTransfer) -> Result<String, TransferError> {
		let mut invocation = self
			.tooling
			.task(&self.tooling.tasks.send)
			.flag("src-eid", transfer.from.protocol_endpoint_id.to_string())
			.flag("dst-eid", transfer.to.protocol_endpoint_id.to_string())
			.flag("amount", transfer.amount.as_str())
			.flag("to", transfer.recipient.as_str());

		if transfer.from.family == ChainFamily::Evm {
			invocation = invocation.flag("network", transfer.from.network_name.as_str());
		}
		for (name, value) in [
			("mint", &transfer.mint),
			("escrow", &transfer.escrow),
			("oapp-address", &transfer.oapp_address),
		] {
			if let Some(value) = value {
				invocation = invocation.flag(name, value.as_str());
			}
		}

		let output = run_with_retry(self.runner.as_ref(), &invocation, &self.retry).await?;
		parse_tx_hash(&output.stdout).ok_or_else(|| {
			TransferError::Output("no transaction hash or signature in send output".to_string())
		})
	}
}

/// Transaction hash from send output: a JSON line, a labelled line, or the
/// last 32-byte `0x` hash
pub fn parse_tx_hash(output: &str) -> Option<String> {
	const KEYS: &[&str] = &["txhash", "transactionhash", "tx hash", "transaction hash", "signature"];

	for line in output.lines().rev().map(str::trim) {
		if line.starts_with('{') {
			if let Ok(Value::Object(object)) = serde_json::from_str::<Value>(line) {
				let found = ["txHash", "transactionHash", "signature"]
					.iter()
					.find_map(|key| object.get(*key).and_then(Value::as_str));
				if let Some(hash) = found {
					return Some(hash.to_string());
				}
			}
			continue;
		}

		if let Some((key, value)) = line.split_once(':') {
			let key = key.trim().to_ascii_lowercase();
			let value = value.trim().trim_matches('"');
			if KEYS.contains(&key.as_str()) && !value.is_empty() {
				return value.split_whitespace().next().map(str::to_string);
			}
		}
	}

	output
		.split(|c: char| !c.is_ascii_alphanumeric())
		.filter(|token| {
			token.len() == 66
				&& token.starts_with("0x")
				&& token[2..].chars().all(|c| c.is_ascii_hexdigit())
		})
		.last()
		.map(str::to_string)
}

pub struct TransferDispatcher {
	registry: Arc<ChainRegistry>,
	bridge: Arc<BridgeService>,
	native: Arc<dyn NativeSender>,
	origin_chain: String,
}

impl TransferDispatcher {
	pub fn new(
		registry: Arc<ChainRegistry>,
		bridge: Arc<BridgeService>,
		native: Arc<dyn NativeSender>,
		origin_chain: impl Into<String>,
	) -> Self {
		Self {
			registry,
			bridge,
			native,
			origin_chain: origin_chain.into(),
		}
	}

	/// Route chosen for a validated request
	pub fn route_for(&self, request: &TransferRequest) -> TransferRoute {
		let touches_origin =
			request.from_chain == self.origin_chain || request.to_chain == self.origin_chain;
		if touches_origin && !request.extras.aggregated {
			TransferRoute::Native
		} else {
			TransferRoute::Aggregated
		}
	}

	pub async fn transfer(&self, request: &TransferRequest) -> Result<TransferReceipt, TransferError> {
		request.validate()?;

		let route = self.route_for(request);
		info!(
			target: "transfer",
			from = %request.from_chain,
			to = %request.to_chain,
			%route,
			"Dispatching transfer"
		);

		match route {
			TransferRoute::Native => self.send_native(request).await,
			TransferRoute::Aggregated => self.send_aggregated(request).await,
		}
	}

	async fn send_native(&self, request: &TransferRequest) -> Result<TransferReceipt, TransferError> {
		let from = self.registry.resolve(&request.from_chain)?;
		let to = self.registry.resolve(&request.to_chain)?;
		if from.logical_id == to.logical_id {
			return Err(TransferValidationError::SameChain {
				chain: from.logical_id.clone(),
			}
			.into());
		}

		let extras = &request.extras;
		if from.logical_id == self.origin_chain {
			require_extra(&extras.mint, "mint", "origin-outbound")?;
			require_extra(&extras.escrow, "escrow", "origin-outbound")?;
		} else if from.family == ChainFamily::Evm {
			require_extra(&extras.oapp_address, "oappAddress", "origin-inbound")?;
		}

		let transfer = NativeTransfer {
			from: from.clone(),
			to: to.clone(),
			amount: request.amount.clone(),
			recipient: request.to.clone(),
			mint: extras.mint.clone(),
			escrow: extras.escrow.clone(),
			oapp_address: extras.oapp_address.clone(),
		};
		let tx_hash = self.native.send(&transfer).await?;
		info!(target: "transfer", %tx_hash, "Native send submitted");

		Ok(TransferReceipt {
			route: TransferRoute::Native,
			tx_hash,
			status: TransferStatus::Pending,
		})
	}

	async fn send_aggregated(
		&self,
		request: &TransferRequest,
	) -> Result<TransferReceipt, TransferError> {
		let extras = &request.extras;
		let from_token = require_extra(&extras.from_token, "fromToken", "aggregated")?;
		let to_token = require_extra(&extras.to_token, "toToken", "aggregated")?;

		let outcome = self
			.bridge
			.bridge(&BridgeRequest {
				from_chain: self.aggregator_chain(&request.from_chain),
				to_chain: self.aggregator_chain(&request.to_chain),
				from_token: from_token.to_string(),
				to_token: to_token.to_string(),
				amount: request.amount.clone(),
				from_address: None,
				to: Some(request.to.clone()),
			})
			.await?;

		Ok(TransferReceipt {
			route: TransferRoute::Aggregated,
			tx_hash: outcome.transaction_hash,
			status: outcome.status,
		})
	}

	/// Registry chains carrying an aggregator mapping are bridged under that
	/// identifier. Anything else reaches the aggregator unchanged.
	fn aggregator_chain(&self, identifier: &str) -> String {
		self.registry
			.resolve(identifier)
			.ok()
			.and_then(|chain| chain.aggregator_chain.clone())
			.unwrap_or_else(|| identifier.to_string())
	}
}

fn require_extra<'a>(
	value: &'a Option<String>,
	extra: &str,
	direction: &str,
) -> Result<&'a str, TransferValidationError> {
	value
		.as_deref()
		.filter(|value| !value.trim().is_empty())
		.ok_or_else(|| TransferValidationError::MissingExtra {
			extra: extra.to_string(),
			direction: direction.to_string(),
		})
}
