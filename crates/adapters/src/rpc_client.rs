//! Minimal JSON-RPC 2.0 client for the Solana wallet

use launchpad_types::{AdapterError, AdapterResult, SecretString};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::trace;

#[derive(Debug, Deserialize)]
struct RpcResponse {
	#[serde(default)]
	result: Option<Value>,
	#[serde(default)]
	error: Option<RpcErrorBody>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorBody {
	code: i64,
	message: String,
}

/// JSON-RPC endpoint, optionally authenticated with a bearer token
#[derive(Debug)]
pub struct JsonRpcClient {
	client: Client,
	url: String,
	bearer: Option<SecretString>,
	next_id: AtomicU64,
}

impl JsonRpcClient {
	pub fn new(client: Client, url: impl Into<String>, bearer: Option<SecretString>) -> Self {
		Self {
			client,
			url: url.into(),
			bearer,
			next_id: AtomicU64::new(1),
		}
	}

	/// Call `method`, returning the raw `result` (`null` when absent)
	pub async fn call_raw(&self, method: &str, params: Value) -> AdapterResult<Value> {
		let id = self.next_id.fetch_add(1, Ordering::Relaxed);
		let body = json!({
			"jsonrpc": "2.0",
			"id": id,
			"method": method,
			"params": params,
		});
		trace!(target: "rpc", url = %self.url, method, id, "JSON-RPC call");

		let mut request = self.client.post(&self.url).json(&body);
		if let Some(token) = &self.bearer {
			request = request.bearer_auth(token.expose_secret());
		}

		let response = request.send().await?;
		let status = response.status();
		if !status.is_success() {
			let reason = response.text().await.unwrap_or_default();
			return Err(if reason.trim().is_empty() {
				AdapterError::from_http_failure(status.as_u16())
			} else {
				AdapterError::http_failure(status.as_u16(), reason)
			});
		}

		let parsed: RpcResponse = response.json().await?;
		if let Some(error) = parsed.error {
			return Err(AdapterError::Rpc {
				code: error.code,
				message: error.message,
			});
		}
		Ok(parsed.result.unwrap_or(Value::Null))
	}

	pub async fn call<T: DeserializeOwned>(&self, method: &str, params: Value) -> AdapterResult<T> {
		let result = self.call_raw(method, params).await?;
		serde_json::from_value(result).map_err(|e| AdapterError::InvalidResponse {
			reason: format!("Unexpected {} result: {}", method, e),
		})
	}
}
