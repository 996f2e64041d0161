//! LI.FI aggregator adapter
//!
//! Thin request/response client over the LI.FI REST API. Responses are mapped
//! into the launchpad's bridge models; no retries and no caching happen here.

use async_trait::async_trait;
use launchpad_types::{
	AdapterError, AdapterResult, BridgeApi, ChainFamily, ChainInfo, Connection,
	PreparedTransaction, Quote, QuoteRequest, SecretString, StatusQuery, StatusResponse,
	TokenInfo, TransferStatus,
};
use reqwest::{
	header::{HeaderMap, HeaderValue},
	Client,
};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;
use url::Url;

pub const DEFAULT_LIFI_ENDPOINT: &str = "https://li.quest/v1";

/// Connection parameters of the LI.FI adapter
#[derive(Debug, Clone)]
pub struct LifiConfig {
	pub endpoint: String,
	pub api_key: Option<SecretString>,
	/// Integrator tag attached to quote requests
	pub integrator: Option<String>,
	pub timeout_ms: u64,
}

impl Default for LifiConfig {
	fn default() -> Self {
		Self {
			endpoint: DEFAULT_LIFI_ENDPOINT.to_string(),
			api_key: None,
			integrator: None,
			timeout_ms: 30_000,
		}
	}
}

#[derive(Debug, Deserialize)]
struct LifiChainsResponse {
	chains: Vec<LifiChain>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LifiChain {
	id: u64,
	key: String,
	name: String,
	#[serde(default)]
	chain_type: Option<String>,
	#[serde(default)]
	native_token: Option<TokenInfo>,
}

impl From<LifiChain> for ChainInfo {
	fn from(chain: LifiChain) -> Self {
		ChainInfo {
			id: chain.id,
			key: chain.key,
			name: chain.name,
			family: chain
				.chain_type
				.as_deref()
				.and_then(ChainFamily::from_chain_type),
			native_token: chain.native_token,
		}
	}
}

#[derive(Debug, Deserialize)]
struct LifiTokensResponse {
	tokens: HashMap<String, Vec<TokenInfo>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LifiQuote {
	id: String,
	tool: String,
	action: LifiAction,
	estimate: LifiEstimate,
	transaction_request: Option<LifiTransactionRequest>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LifiAction {
	from_chain_id: u64,
	to_chain_id: u64,
	from_token: TokenInfo,
	to_token: TokenInfo,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LifiEstimate {
	#[serde(default)]
	approval_address: Option<String>,
	from_amount: String,
	to_amount: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LifiTransactionRequest {
	#[serde(default)]
	to: Option<String>,
	data: String,
	#[serde(default)]
	value: Option<String>,
	#[serde(default)]
	gas_limit: Option<String>,
	#[serde(default)]
	gas_price: Option<String>,
	#[serde(default)]
	chain_id: Option<u64>,
}

impl From<LifiTransactionRequest> for PreparedTransaction {
	fn from(request: LifiTransactionRequest) -> Self {
		// SVM quotes carry only a serialized transaction, no recipient
		match request.to {
			Some(to) => PreparedTransaction::Evm {
				to,
				data: request.data,
				value: request.value,
				gas_limit: request.gas_limit,
				gas_price: request.gas_price,
				chain_id: request.chain_id,
			},
			None => PreparedTransaction::Serialized { data: request.data },
		}
	}
}

#[derive(Debug, Deserialize)]
struct LifiStatus {
	status: String,
	#[serde(default)]
	substatus: Option<String>,
	#[serde(default)]
	receiving: Option<LifiReceiving>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LifiReceiving {
	#[serde(default)]
	tx_hash: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LifiConnectionsResponse {
	connections: Vec<Connection>,
}

/// LI.FI adapter
#[derive(Debug)]
pub struct LifiAdapter {
	config: LifiConfig,
	client: Client,
}

impl LifiAdapter {
	pub fn new(config: LifiConfig) -> AdapterResult<Self> {
		let mut headers = HeaderMap::new();
		headers.insert("Content-Type", HeaderValue::from_static("application/json"));
		headers.insert("Accept", HeaderValue::from_static("application/json"));
		headers.insert(
			"User-Agent",
			HeaderValue::from_static("Omnichain-Launchpad/1.0"),
		);

		if let Some(api_key) = &config.api_key {
			let value = HeaderValue::from_str(api_key.expose_secret()).map_err(|_| {
				AdapterError::ConfigError {
					reason: "LI.FI api key is not a valid header value".to_string(),
				}
			})?;
			headers.insert("x-lifi-api-key", value);
		}

		let client = Client::builder()
			.default_headers(headers)
			.timeout(Duration::from_millis(config.timeout_ms))
			.build()
			.map_err(AdapterError::HttpError)?;

		Ok(Self { config, client })
	}

	pub fn with_default_config() -> AdapterResult<Self> {
		Self::new(LifiConfig::default())
	}

	/// Join a resource path onto the configured endpoint
	fn build_url(&self, path: &str) -> AdapterResult<Url> {
		let mut base = Url::parse(&self.config.endpoint).map_err(|e| AdapterError::ConfigError {
			reason: format!("Invalid base URL '{}': {}", self.config.endpoint, e),
		})?;

		if !base.path().ends_with('/') {
			base.set_path(&format!("{}/", base.path()));
		}

		base.join(path).map_err(|e| AdapterError::ConfigError {
			reason: format!(
				"Failed to join URL path '{}' to base '{}': {}",
				path, self.config.endpoint, e
			),
		})
	}

	async fn get_json<T: DeserializeOwned>(
		&self,
		path: &str,
		query: &[(&str, String)],
	) -> AdapterResult<T> {
		let url = self.build_url(path)?;
		debug!(target: "lifi", url = %url, "GET {}", path);

		let response = self
			.client
			.get(url)
			.query(query)
			.send()
			.await
			.map_err(|e| self.map_transport_error(e))?;

		let status = response.status();
		let body = response
			.text()
			.await
			.map_err(|e| self.map_transport_error(e))?;

		if !status.is_success() {
			return Err(if body.trim().is_empty() {
				AdapterError::from_http_failure(status.as_u16())
			} else {
				AdapterError::http_failure(status.as_u16(), body)
			});
		}

		serde_json::from_str(&body).map_err(|e| AdapterError::InvalidResponse {
			reason: format!("Failed to parse LI.FI {} response: {}", path, e),
		})
	}

	fn map_transport_error(&self, error: reqwest::Error) -> AdapterError {
		if error.is_timeout() {
			AdapterError::Timeout {
				timeout_ms: self.config.timeout_ms,
			}
		} else {
			AdapterError::HttpError(error)
		}
	}
}

#[async_trait]
impl BridgeApi for LifiAdapter {
	fn id(&self) -> &str {
		"lifi"
	}

	async fn get_chains(&self) -> AdapterResult<Vec<ChainInfo>> {
		let response: LifiChainsResponse = self.get_json("chains", &[]).await?;
		debug!(target: "lifi", count = response.chains.len(), "Fetched chains");
		Ok(response.chains.into_iter().map(ChainInfo::from).collect())
	}

	async fn get_tokens(&self, chain_ids: &[u64]) -> AdapterResult<HashMap<u64, Vec<TokenInfo>>> {
		let mut query = Vec::new();
		if !chain_ids.is_empty() {
			let chains = chain_ids
				.iter()
				.map(|id| id.to_string())
				.collect::<Vec<_>>()
				.join(",");
			query.push(("chains", chains));
		}

		let response: LifiTokensResponse = self.get_json("tokens", &query).await?;
		response
			.tokens
			.into_iter()
			.map(|(chain_id, tokens)| {
				chain_id
					.parse::<u64>()
					.map(|id| (id, tokens))
					.map_err(|_| AdapterError::InvalidResponse {
						reason: format!("Non-numeric chain id '{}' in tokens response", chain_id),
					})
			})
			.collect()
	}

	async fn get_token(&self, chain_id: u64, token: &str) -> AdapterResult<TokenInfo> {
		self.get_json(
			"token",
			&[("chain", chain_id.to_string()), ("token", token.to_string())],
		)
		.await
	}

	async fn get_quote(&self, request: &QuoteRequest) -> AdapterResult<Quote> {
		let mut query = vec![
			("fromChain", request.from_chain.to_string()),
			("toChain", request.to_chain.to_string()),
			("fromToken", request.from_token.clone()),
			("toToken", request.to_token.clone()),
			("fromAmount", request.from_amount.clone()),
			("fromAddress", request.from_address.clone()),
		];
		if let Some(to_address) = &request.to_address {
			query.push(("toAddress", to_address.clone()));
		}
		if let Some(integrator) = &self.config.integrator {
			query.push(("integrator", integrator.clone()));
		}

		let quote: LifiQuote = self.get_json("quote", &query).await?;
		let transaction =
			quote
				.transaction_request
				.ok_or_else(|| AdapterError::InvalidResponse {
					reason: format!("Quote {} has no transactionRequest", quote.id),
				})?;

		debug!(
			target: "lifi",
			quote_id = %quote.id,
			tool = %quote.tool,
			"Received quote {} -> {}",
			quote.action.from_chain_id,
			quote.action.to_chain_id
		);

		Ok(Quote {
			quote_id: quote.id,
			provider_id: quote.tool,
			from_chain_id: quote.action.from_chain_id,
			to_chain_id: quote.action.to_chain_id,
			source_token_address: quote.action.from_token.address,
			dest_token_address: quote.action.to_token.address,
			approval_address: quote.estimate.approval_address,
			source_amount: quote.estimate.from_amount,
			dest_amount: quote.estimate.to_amount,
			unsigned_transaction: transaction.into(),
		})
	}

	async fn get_status(&self, query: &StatusQuery) -> AdapterResult<StatusResponse> {
		let status: LifiStatus = self
			.get_json(
				"status",
				&[
					("bridge", query.provider_id.clone()),
					("fromChain", query.from_chain.to_string()),
					("toChain", query.to_chain.to_string()),
					("txHash", query.tx_hash.clone()),
				],
			)
			.await?;

		Ok(StatusResponse {
			status: TransferStatus::from_label(&status.status),
			substatus: status.substatus,
			receiving_tx_hash: status.receiving.and_then(|receiving| receiving.tx_hash),
		})
	}

	async fn get_connections(
		&self,
		from_chain: u64,
		to_chain: u64,
	) -> AdapterResult<Vec<Connection>> {
		let response: LifiConnectionsResponse = self
			.get_json(
				"connections",
				&[
					("fromChain", from_chain.to_string()),
					("toChain", to_chain.to_string()),
				],
			)
			.await?;
		Ok(response.connections)
	}
}
