//! Aggregator, wallet and native-send stand-ins

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use launchpad_types::{
	AdapterError, AdapterResult, BridgeApi, ChainFamily, ChainInfo, ChainWallet, Connection,
	PreparedTransaction, Quote, QuoteRequest, StatusQuery, StatusResponse, TokenInfo,
	TransferStatus,
};
use omnichain_launchpad::{NativeSender, NativeTransfer, TransferError};

fn usdc(chain_id: u64) -> TokenInfo {
	TokenInfo {
		address: format!("0xusdc{}", chain_id),
		symbol: "USDC".to_string(),
		decimals: 6,
		chain_id,
		name: "USD Coin".to_string(),
	}
}

fn chain(id: u64, key: &str, name: &str) -> ChainInfo {
	ChainInfo {
		id,
		key: key.to_string(),
		name: name.to_string(),
		family: Some(ChainFamily::Evm),
		native_token: None,
	}
}

/// Aggregator with Arbitrum (42161) and Optimism (10), USDC on both
#[derive(Debug, Clone)]
pub struct StubBridgeApi {
	final_status: TransferStatus,
	quotes: Arc<Mutex<Vec<QuoteRequest>>>,
}

impl StubBridgeApi {
	pub fn new() -> Self {
		Self::finishing_with(TransferStatus::Done)
	}

	/// Every status lookup reports `status`
	pub fn finishing_with(status: TransferStatus) -> Self {
		Self {
			final_status: status,
			quotes: Arc::new(Mutex::new(Vec::new())),
		}
	}

	pub fn quote_requests(&self) -> Vec<QuoteRequest> {
		self.quotes.lock().unwrap().clone()
	}
}

#[async_trait]
impl BridgeApi for StubBridgeApi {
	fn id(&self) -> &str {
		"stub"
	}

	async fn get_chains(&self) -> AdapterResult<Vec<ChainInfo>> {
		Ok(vec![chain(42161, "arb", "Arbitrum"), chain(10, "opt", "Optimism")])
	}

	async fn get_tokens(&self, _chain_ids: &[u64]) -> AdapterResult<HashMap<u64, Vec<TokenInfo>>> {
		Ok(HashMap::from([(42161, vec![usdc(42161)]), (10, vec![usdc(10)])]))
	}

	async fn get_token(&self, chain_id: u64, token: &str) -> AdapterResult<TokenInfo> {
		if token.eq_ignore_ascii_case("USDC") {
			Ok(usdc(chain_id))
		} else {
			Err(AdapterError::http_failure(404, "Token not found"))
		}
	}

	async fn get_quote(&self, request: &QuoteRequest) -> AdapterResult<Quote> {
		self.quotes.lock().unwrap().push(request.clone());
		Ok(Quote {
			quote_id: "stub-quote".to_string(),
			provider_id: "across".to_string(),
			from_chain_id: request.from_chain,
			to_chain_id: request.to_chain,
			source_token_address: request.from_token.clone(),
			dest_token_address: request.to_token.clone(),
			approval_address: Some("0xapprovalspender".to_string()),
			source_amount: request.from_amount.clone(),
			dest_amount: request.from_amount.clone(),
			unsigned_transaction: PreparedTransaction::Evm {
				to: "0xrouter".to_string(),
				data: "0x1234".to_string(),
				value: Some("0".to_string()),
				gas_limit: None,
				gas_price: None,
				chain_id: Some(request.from_chain),
			},
		})
	}

	async fn get_status(&self, _query: &StatusQuery) -> AdapterResult<StatusResponse> {
		let mut response = StatusResponse::new(self.final_status);
		if self.final_status == TransferStatus::Failed {
			response.substatus = Some("REFUNDED".to_string());
		}
		Ok(response)
	}

	async fn get_connections(&self, from_chain: u64, to_chain: u64) -> AdapterResult<Vec<Connection>> {
		Ok(vec![Connection {
			from_chain_id: from_chain,
			to_chain_id: to_chain,
			from_tokens: vec![usdc(from_chain)],
			to_tokens: vec![usdc(to_chain)],
		}])
	}
}

/// EVM wallet with unlimited allowance
#[derive(Debug, Clone, Default)]
pub struct StubWallet {
	submitted: Arc<Mutex<Vec<PreparedTransaction>>>,
}

impl StubWallet {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn submitted(&self) -> Vec<PreparedTransaction> {
		self.submitted.lock().unwrap().clone()
	}
}

#[async_trait]
impl ChainWallet for StubWallet {
	fn family(&self) -> ChainFamily {
		ChainFamily::Evm
	}

	fn address(&self) -> &str {
		"0x00000000000000000000000000000000000000aa"
	}

	async fn allowance(&self, _token: &str, _spender: &str) -> AdapterResult<u128> {
		Ok(u128::MAX)
	}

	async fn approve(&self, _token: &str, _spender: &str, _amount: u128) -> AdapterResult<String> {
		Ok("0xapproval".to_string())
	}

	async fn wait_for_confirmation(&self, _tx_hash: &str) -> AdapterResult<()> {
		Ok(())
	}

	async fn submit(&self, transaction: &PreparedTransaction) -> AdapterResult<String> {
		self.submitted.lock().unwrap().push(transaction.clone());
		Ok("0xbridgetx".to_string())
	}
}

/// Native sender recording every transfer
#[derive(Debug, Clone, Default)]
pub struct StubNativeSender {
	sent: Arc<Mutex<Vec<NativeTransfer>>>,
}

impl StubNativeSender {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn sent(&self) -> Vec<NativeTransfer> {
		self.sent.lock().unwrap().clone()
	}
}

#[async_trait]
impl NativeSender for StubNativeSender {
	async fn send(&self, transfer: &NativeTransfer) -> Result<String, TransferError> {
		self.sent.lock().unwrap().push(transfer.clone());
		Ok("4nativeSignature".to_string())
	}
}
