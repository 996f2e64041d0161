//! Solana wallet
//!
//! Aggregator quotes for Solana arrive as base64 serialized transactions. The
//! remote signer re-signs them with the wallet key and the result is submitted
//! through the cluster RPC.

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use launchpad_types::{
	AdapterError, AdapterResult, ChainFamily, ChainWallet, PreparedTransaction, SecretString,
};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, info};

use crate::rpc_client::JsonRpcClient;

#[derive(Debug, Clone)]
pub struct SolanaWalletConfig {
	pub address: String,
	pub rpc_url: String,
	/// Signer accepting `{"transaction": base64}` and returning `{"signedTransaction": base64}`
	pub signer_url: String,
	pub signer_token: Option<SecretString>,
	pub confirmation_poll: Duration,
	pub max_confirmation_attempts: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SignRequest<'a> {
	transaction: &'a str,
	signer: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignResponse {
	signed_transaction: String,
}

#[derive(Debug, Deserialize)]
struct SignatureStatuses {
	value: Vec<Option<SignatureStatus>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignatureStatus {
	#[serde(default)]
	err: Option<Value>,
	#[serde(default)]
	confirmation_status: Option<String>,
}

#[derive(Debug)]
pub struct SolanaWallet {
	address: String,
	client: Client,
	rpc: JsonRpcClient,
	signer_url: String,
	signer_token: Option<SecretString>,
	confirmation_poll: Duration,
	max_confirmation_attempts: u32,
}

impl SolanaWallet {
	pub fn new(config: SolanaWalletConfig) -> Self {
		let client = Client::new();
		Self {
			address: config.address,
			rpc: JsonRpcClient::new(client.clone(), config.rpc_url, None),
			client,
			signer_url: config.signer_url,
			signer_token: config.signer_token,
			confirmation_poll: config.confirmation_poll,
			max_confirmation_attempts: config.max_confirmation_attempts,
		}
	}

	async fn sign(&self, transaction: &str) -> AdapterResult<String> {
		let mut request = self.client.post(&self.signer_url).json(&SignRequest {
			transaction,
			signer: &self.address,
		});
		if let Some(token) = &self.signer_token {
			request = request.bearer_auth(token.expose_secret());
		}

		let response = request.send().await?;
		let status = response.status();
		if !status.is_success() {
			let reason = response.text().await.unwrap_or_default();
			return Err(AdapterError::Signer {
				reason: format!("signer returned {}: {}", status.as_u16(), reason),
			});
		}

		let signed: SignResponse = response.json().await?;
		Ok(signed.signed_transaction)
	}
}

#[async_trait]
impl ChainWallet for SolanaWallet {
	fn family(&self) -> ChainFamily {
		ChainFamily::Solana
	}

	fn address(&self) -> &str {
		&self.address
	}

	/// Token transfers are authorized by the transaction signature itself
	fn requires_approval(&self) -> bool {
		false
	}

	async fn allowance(&self, _token: &str, _spender: &str) -> AdapterResult<u128> {
		Ok(u128::MAX)
	}

	async fn approve(&self, token: &str, _spender: &str, _amount: u128) -> AdapterResult<String> {
		Err(AdapterError::InvalidRequest {
			reason: format!("Solana tokens need no approval (token {})", token),
		})
	}

	async fn wait_for_confirmation(&self, tx_hash: &str) -> AdapterResult<()> {
		for attempt in 1..=self.max_confirmation_attempts {
			let statuses: SignatureStatuses = self
				.rpc
				.call(
					"getSignatureStatuses",
					json!([[tx_hash], {"searchTransactionHistory": true}]),
				)
				.await?;

			match statuses.value.into_iter().next().flatten() {
				Some(SignatureStatus { err: Some(err), .. }) if !err.is_null() => {
					debug!(target: "wallet", %tx_hash, error = %err, "Transaction failed");
					return Err(AdapterError::TransactionReverted {
						tx_hash: tx_hash.to_string(),
					});
				},
				Some(SignatureStatus {
					confirmation_status: Some(level),
					..
				}) if level == "confirmed" || level == "finalized" => {
					debug!(target: "wallet", %tx_hash, attempt, "Transaction confirmed");
					return Ok(());
				},
				_ => tokio::time::sleep(self.confirmation_poll).await,
			}
		}

		Err(AdapterError::ConfirmationTimeout {
			tx_hash: tx_hash.to_string(),
			attempts: self.max_confirmation_attempts,
		})
	}

	async fn submit(&self, transaction: &PreparedTransaction) -> AdapterResult<String> {
		let PreparedTransaction::Serialized { data } = transaction else {
			return Err(AdapterError::InvalidRequest {
				reason: "Solana wallet requires a serialized transaction".to_string(),
			});
		};

		STANDARD
			.decode(data)
			.map_err(|e| AdapterError::InvalidRequest {
				reason: format!("Serialized transaction is not valid base64: {}", e),
			})?;

		let signed = self.sign(data).await?;
		let signature: String = self
			.rpc
			.call(
				"sendTransaction",
				json!([signed, {"encoding": "base64", "preflightCommitment": "confirmed"}]),
			)
			.await?;

		info!(target: "wallet", %signature, "Submitted Solana transaction");
		Ok(signature)
	}
}
