//! EVM wallet over alloy providers
//!
//! Reads go to the chain node, writes go to a remote signer that accepts
//! `eth_sendTransaction` for the configured account.

use alloy::{
	network::{ReceiptResponse, TransactionBuilder},
	primitives::{Address, Bytes, TxHash, U256},
	providers::{Provider, RootProvider},
	rpc::{client::RpcClient, types::TransactionRequest},
	sol,
	sol_types::SolCall,
	transports::{http::Http, RpcError, TransportError, TransportErrorKind},
};
use async_trait::async_trait;
use launchpad_types::{
	AdapterError, AdapterResult, ChainFamily, ChainWallet, PreparedTransaction, SecretString,
};
use reqwest::{
	header::{HeaderMap, HeaderValue, AUTHORIZATION},
	Client, Url,
};
use std::time::Duration;
use tracing::{debug, info};

sol! {
	interface IERC20 {
		function allowance(address owner, address spender) external view returns (uint256);
		function approve(address spender, uint256 amount) external returns (bool);
	}
}

#[derive(Debug, Clone)]
pub struct EvmWalletConfig {
	pub address: String,
	/// Node used for reads and receipts
	pub rpc_url: String,
	/// Signer accepting `eth_sendTransaction` for `address`
	pub signer_url: String,
	pub signer_token: Option<SecretString>,
	pub confirmation_poll: Duration,
	pub max_confirmation_attempts: u32,
}

#[derive(Debug)]
pub struct EvmWallet {
	label: String,
	address: Address,
	rpc: RootProvider,
	signer: RootProvider,
	confirmation_poll: Duration,
	max_confirmation_attempts: u32,
}

impl EvmWallet {
	pub fn new(config: EvmWalletConfig) -> AdapterResult<Self> {
		let address = parse_address(&config.address)?;
		Ok(Self {
			label: config.address,
			address,
			rpc: http_provider(&config.rpc_url, None)?,
			signer: http_provider(&config.signer_url, config.signer_token.as_ref())?,
			confirmation_poll: config.confirmation_poll,
			max_confirmation_attempts: config.max_confirmation_attempts,
		})
	}

	async fn send_transaction(&self, request: TransactionRequest) -> AdapterResult<String> {
		let pending = self
			.signer
			.send_transaction(request)
			.await
			.map_err(|e| match rpc_error(e) {
				AdapterError::Rpc { message, .. } => AdapterError::Signer { reason: message },
				other => other,
			})?;
		Ok(format!("{:#x}", pending.tx_hash()))
	}
}

fn http_provider(url: &str, bearer: Option<&SecretString>) -> AdapterResult<RootProvider> {
	let url: Url = url.parse().map_err(|e| AdapterError::ConfigError {
		reason: format!("Invalid RPC url '{}': {}", url, e),
	})?;

	let mut builder = Client::builder();
	if let Some(token) = bearer {
		let mut value = HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
			.map_err(|e| AdapterError::ConfigError {
				reason: format!("Invalid signer token: {}", e),
			})?;
		value.set_sensitive(true);
		let mut headers = HeaderMap::new();
		headers.insert(AUTHORIZATION, value);
		builder = builder.default_headers(headers);
	}

	let transport = Http::with_client(builder.build()?, url);
	Ok(RootProvider::new(RpcClient::new(transport, false)))
}

fn rpc_error(error: TransportError) -> AdapterError {
	match error {
		RpcError::ErrorResp(payload) => AdapterError::Rpc {
			code: payload.code,
			message: payload.message.to_string(),
		},
		RpcError::Transport(TransportErrorKind::HttpError(http)) => {
			AdapterError::http_failure(http.status, http.body)
		},
		RpcError::DeserError { err, .. } => AdapterError::InvalidResponse {
			reason: err.to_string(),
		},
		other => AdapterError::Transport {
			reason: other.to_string(),
		},
	}
}

fn parse_address(value: &str) -> AdapterResult<Address> {
	value.parse().map_err(|e| AdapterError::InvalidRequest {
		reason: format!("Invalid EVM address '{}': {}", value, e),
	})
}

/// Decimal or `0x` hex quantity
fn parse_quantity(value: &str) -> AdapterResult<U256> {
	value.parse().map_err(|_| AdapterError::InvalidRequest {
		reason: format!("Invalid quantity '{}'", value),
	})
}

fn narrow<T: TryFrom<U256>>(value: &str) -> AdapterResult<T> {
	T::try_from(parse_quantity(value)?).map_err(|_| AdapterError::InvalidRequest {
		reason: format!("Quantity '{}' out of range", value),
	})
}

#[async_trait]
impl ChainWallet for EvmWallet {
	fn family(&self) -> ChainFamily {
		ChainFamily::Evm
	}

	fn address(&self) -> &str {
		&self.label
	}

	/// Allowances above `u128::MAX` cover any amount the launchpad requests
	async fn allowance(&self, token: &str, spender: &str) -> AdapterResult<u128> {
		let call = IERC20::allowanceCall {
			owner: self.address,
			spender: parse_address(spender)?,
		};
		let request = TransactionRequest::default()
			.with_to(parse_address(token)?)
			.with_input(call.abi_encode());

		let output = self.rpc.call(request).await.map_err(rpc_error)?;
		let allowance = IERC20::allowanceCall::abi_decode_returns(&output).map_err(|e| {
			AdapterError::InvalidResponse {
				reason: format!("Invalid allowance result: {}", e),
			}
		})?;
		Ok(allowance.saturating_to::<u128>())
	}

	async fn approve(&self, token: &str, spender: &str, amount: u128) -> AdapterResult<String> {
		let call = IERC20::approveCall {
			spender: parse_address(spender)?,
			amount: U256::from(amount),
		};
		let request = TransactionRequest::default()
			.with_from(self.address)
			.with_to(parse_address(token)?)
			.with_input(call.abi_encode());

		let tx_hash = self.send_transaction(request).await?;
		info!(target: "wallet", %token, %spender, %tx_hash, "Submitted approval");
		Ok(tx_hash)
	}

	async fn wait_for_confirmation(&self, tx_hash: &str) -> AdapterResult<()> {
		let hash: TxHash = tx_hash.parse().map_err(|e| AdapterError::InvalidRequest {
			reason: format!("Invalid transaction hash '{}': {}", tx_hash, e),
		})?;

		for attempt in 1..=self.max_confirmation_attempts {
			match self
				.rpc
				.get_transaction_receipt(hash)
				.await
				.map_err(rpc_error)?
			{
				Some(receipt) if receipt.status() => {
					debug!(target: "wallet", %tx_hash, attempt, "Transaction confirmed");
					return Ok(());
				},
				Some(_) => {
					return Err(AdapterError::TransactionReverted {
						tx_hash: tx_hash.to_string(),
					});
				},
				None => tokio::time::sleep(self.confirmation_poll).await,
			}
		}

		Err(AdapterError::ConfirmationTimeout {
			tx_hash: tx_hash.to_string(),
			attempts: self.max_confirmation_attempts,
		})
	}

	async fn submit(&self, transaction: &PreparedTransaction) -> AdapterResult<String> {
		let PreparedTransaction::Evm {
			to,
			data,
			value,
			gas_limit,
			gas_price,
			chain_id,
		} = transaction
		else {
			return Err(AdapterError::InvalidRequest {
				reason: "EVM wallet cannot submit a serialized transaction".to_string(),
			});
		};

		let input: Bytes = data.parse().map_err(|e| AdapterError::InvalidRequest {
			reason: format!("Invalid calldata: {}", e),
		})?;
		let mut request = TransactionRequest::default()
			.with_from(self.address)
			.with_to(parse_address(to)?)
			.with_input(input);
		if let Some(value) = value {
			request.set_value(parse_quantity(value)?);
		}
		if let Some(gas) = gas_limit {
			request.set_gas_limit(narrow::<u64>(gas)?);
		}
		if let Some(gas_price) = gas_price {
			request.set_gas_price(narrow::<u128>(gas_price)?);
		}
		if let Some(chain_id) = chain_id {
			request.set_chain_id(*chain_id);
		}

		let tx_hash = self.send_transaction(request).await?;
		info!(target: "wallet", %to, %tx_hash, "Submitted EVM transaction");
		Ok(tx_hash)
	}
}
