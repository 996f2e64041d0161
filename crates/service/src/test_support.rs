//! In-memory collaborators for service tests

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use launchpad_types::{
	AdapterError, AdapterResult, BridgeApi, ChainDescriptor, ChainFamily, ChainInfo, ChainWallet,
	Connection, PreparedTransaction, Quote, QuoteRequest, StatusQuery, StatusResponse, TokenInfo,
	TransferStatus,
};

use crate::chain_registry::ChainRegistry;
use crate::command_runner::{CommandError, CommandInvocation, CommandOutput, CommandRunner};

/// Origin plus three EVM testnets; arbitrum and base map to the fake aggregator's `arb` and `op`
pub fn test_registry() -> ChainRegistry {
	ChainRegistry::from_descriptors([
		ChainDescriptor::new(
			"solana-testnet",
			40168,
			"solana-testnet",
			"https://api.devnet.solana.com",
			ChainFamily::Solana,
		),
		ChainDescriptor::new(
			"arbitrum-sepolia",
			40231,
			"arbitrum-sepolia",
			"https://sepolia-rollup.arbitrum.io/rpc",
			ChainFamily::Evm,
		)
		.with_aggregator_chain("arb"),
		ChainDescriptor::new(
			"bsc-v2-testnet",
			40102,
			"bsc-testnet",
			"https://data-seed-prebsc-1-s1.binance.org:8545",
			ChainFamily::Evm,
		),
		ChainDescriptor::new(
			"base-sepolia",
			40245,
			"base-sepolia",
			"https://sepolia.base.org",
			ChainFamily::Evm,
		)
		.with_aggregator_chain("op"),
	])
	.unwrap()
}

impl CommandInvocation {
	pub fn has_task(&self, task: &str) -> bool {
		self.args.iter().any(|arg| arg == task)
	}

	pub fn flag_value(&self, name: &str) -> Option<&str> {
		let flag = format!("--{}", name);
		self.args
			.iter()
			.position(|arg| *arg == flag)
			.and_then(|index| self.args.get(index + 1))
			.map(String::as_str)
	}

	fn task_name(&self) -> Option<&str> {
		self.args
			.iter()
			.find(|arg| arg.starts_with("lz:"))
			.map(String::as_str)
	}
}

type Script = Box<dyn FnMut(&CommandInvocation) -> Result<String, CommandError> + Send>;

/// Runner answering from a script and recording every invocation.
///
/// When an invocation carries `--oapp-config`, the file is read on the spot so
/// tests can inspect the configuration after the run removed it.
pub struct ScriptedRunner {
	script: Mutex<Script>,
	invocations: Mutex<Vec<CommandInvocation>>,
	configs: Mutex<Vec<(String, String)>>,
}

impl ScriptedRunner {
	pub fn new<F>(script: F) -> Self
	where
		F: FnMut(&CommandInvocation) -> Result<String, CommandError> + Send + 'static,
	{
		Self {
			script: Mutex::new(Box::new(script)),
			invocations: Mutex::new(Vec::new()),
			configs: Mutex::new(Vec::new()),
		}
	}

	pub fn invocations(&self) -> Vec<CommandInvocation> {
		self.invocations.lock().unwrap().clone()
	}

	pub fn tasks(&self) -> Vec<String> {
		self.invocations()
			.iter()
			.filter_map(|invocation| invocation.task_name().map(str::to_string))
			.collect()
	}

	pub fn config_seen_by(&self, task: &str) -> Option<String> {
		self.configs
			.lock()
			.unwrap()
			.iter()
			.find(|(seen_task, _)| seen_task == task)
			.map(|(_, contents)| contents.clone())
	}
}

#[async_trait]
impl CommandRunner for ScriptedRunner {
	async fn run(&self, invocation: &CommandInvocation) -> Result<CommandOutput, CommandError> {
		self.invocations.lock().unwrap().push(invocation.clone());
		if let Some(path) = invocation.flag_value("oapp-config") {
			let contents = std::fs::read_to_string(path).unwrap_or_default();
			let task = invocation.task_name().unwrap_or_default().to_string();
			self.configs.lock().unwrap().push((task, contents));
		}

		let result = {
			let mut script = self.script.lock().unwrap();
			(*script)(invocation)
		};
		result.map(|stdout| CommandOutput {
			stdout,
			..CommandOutput::default()
		})
	}
}

pub fn evm_chain(id: u64, key: &str) -> ChainInfo {
	ChainInfo {
		id,
		key: key.to_string(),
		name: key.to_uppercase(),
		family: Some(ChainFamily::Evm),
		native_token: Some(token(id, "ETH", "0x0000000000000000000000000000000000000000")),
	}
}

pub fn token(chain_id: u64, symbol: &str, address: &str) -> TokenInfo {
	TokenInfo {
		address: address.to_string(),
		symbol: symbol.to_string(),
		decimals: 6,
		chain_id,
		name: symbol.to_string(),
	}
}

#[derive(Debug)]
struct ApiState {
	fail_tokens: bool,
	lookup_tokens: HashMap<(u64, String), TokenInfo>,
	quote_requests: Vec<QuoteRequest>,
	/// `Err` carries an HTTP status to fail the lookup with
	statuses: VecDeque<Result<TransferStatus, u16>>,
	status_calls: usize,
	transaction: PreparedTransaction,
}

/// Aggregator serving `arb` (42161) and `op` (10) with USDC on both
#[derive(Debug)]
pub struct FakeBridgeApi {
	state: Mutex<ApiState>,
}

impl Default for FakeBridgeApi {
	fn default() -> Self {
		Self {
			state: Mutex::new(ApiState {
				fail_tokens: false,
				lookup_tokens: HashMap::new(),
				quote_requests: Vec::new(),
				statuses: VecDeque::new(),
				status_calls: 0,
				transaction: PreparedTransaction::Evm {
					to: "0xrouter".to_string(),
					data: "0xdeadbeef".to_string(),
					value: None,
					gas_limit: None,
					gas_price: None,
					chain_id: None,
				},
			}),
		}
	}
}

impl FakeBridgeApi {
	pub fn fail_tokens(&self) {
		self.state.lock().unwrap().fail_tokens = true;
	}

	pub fn add_lookup_token(&self, chain_id: u64, symbol: &str, address: &str) {
		self.state
			.lock()
			.unwrap()
			.lookup_tokens
			.insert((chain_id, symbol.to_string()), token(chain_id, symbol, address));
	}

	/// Statuses returned in order; pending once exhausted
	pub fn push_statuses(&self, statuses: &[TransferStatus]) {
		self.state
			.lock()
			.unwrap()
			.statuses
			.extend(statuses.iter().copied().map(Ok));
	}

	/// Status lookups failing with the given HTTP statuses, in order
	pub fn push_status_failures(&self, codes: &[u16]) {
		self.state
			.lock()
			.unwrap()
			.statuses
			.extend(codes.iter().copied().map(Err));
	}

	pub fn set_transaction(&self, transaction: PreparedTransaction) {
		self.state.lock().unwrap().transaction = transaction;
	}

	pub fn last_quote_request(&self) -> Option<QuoteRequest> {
		self.state.lock().unwrap().quote_requests.last().cloned()
	}

	pub fn status_calls(&self) -> usize {
		self.state.lock().unwrap().status_calls
	}
}

#[async_trait]
impl BridgeApi for FakeBridgeApi {
	fn id(&self) -> &str {
		"fake"
	}

	async fn get_chains(&self) -> AdapterResult<Vec<ChainInfo>> {
		Ok(vec![evm_chain(42161, "arb"), evm_chain(10, "op")])
	}

	async fn get_tokens(&self, _chain_ids: &[u64]) -> AdapterResult<HashMap<u64, Vec<TokenInfo>>> {
		if self.state.lock().unwrap().fail_tokens {
			return Err(AdapterError::from_http_failure(503));
		}
		Ok(HashMap::from([
			(42161, vec![token(42161, "USDC", "0xusdc-arb")]),
			(10, vec![token(10, "USDC", "0xusdc-op")]),
		]))
	}

	async fn get_token(&self, chain_id: u64, symbol: &str) -> AdapterResult<TokenInfo> {
		self.state
			.lock()
			.unwrap()
			.lookup_tokens
			.get(&(chain_id, symbol.to_string()))
			.cloned()
			.ok_or_else(|| AdapterError::http_failure(404, "token not found"))
	}

	async fn get_quote(&self, request: &QuoteRequest) -> AdapterResult<Quote> {
		let mut state = self.state.lock().unwrap();
		state.quote_requests.push(request.clone());
		Ok(Quote {
			quote_id: "quote-1".to_string(),
			provider_id: "stargate".to_string(),
			from_chain_id: request.from_chain,
			to_chain_id: request.to_chain,
			source_token_address: request.from_token.clone(),
			dest_token_address: request.to_token.clone(),
			approval_address: Some("0xspender".to_string()),
			source_amount: request.from_amount.clone(),
			dest_amount: request.from_amount.clone(),
			unsigned_transaction: state.transaction.clone(),
		})
	}

	async fn get_status(&self, _query: &StatusQuery) -> AdapterResult<StatusResponse> {
		let mut state = self.state.lock().unwrap();
		state.status_calls += 1;
		match state.statuses.pop_front().unwrap_or(Ok(TransferStatus::Pending)) {
			Ok(status) => Ok(StatusResponse::new(status)),
			Err(code) => Err(AdapterError::from_http_failure(code)),
		}
	}

	async fn get_connections(&self, _from: u64, _to: u64) -> AdapterResult<Vec<Connection>> {
		Ok(Vec::new())
	}
}

/// Wallet recording every call it receives
#[derive(Debug)]
pub struct FakeWallet {
	family: ChainFamily,
	allowance: u128,
	calls: Mutex<Vec<String>>,
}

impl FakeWallet {
	pub fn evm() -> Self {
		Self {
			family: ChainFamily::Evm,
			allowance: 0,
			calls: Mutex::new(Vec::new()),
		}
	}

	pub fn with_allowance(mut self, allowance: u128) -> Self {
		self.allowance = allowance;
		self
	}

	pub fn calls(&self) -> Vec<String> {
		self.calls.lock().unwrap().clone()
	}

	fn record(&self, call: String) {
		self.calls.lock().unwrap().push(call);
	}
}

#[async_trait]
impl ChainWallet for FakeWallet {
	fn family(&self) -> ChainFamily {
		self.family
	}

	fn address(&self) -> &str {
		"0xwallet"
	}

	async fn allowance(&self, token: &str, _spender: &str) -> AdapterResult<u128> {
		self.record(format!("allowance:{}", token));
		Ok(self.allowance)
	}

	async fn approve(&self, token: &str, _spender: &str, amount: u128) -> AdapterResult<String> {
		self.record(format!("approve:{}:{}", token, amount));
		Ok("0xapprove".to_string())
	}

	async fn wait_for_confirmation(&self, tx_hash: &str) -> AdapterResult<()> {
		self.record(format!("confirm:{}", tx_hash));
		Ok(())
	}

	async fn submit(&self, _transaction: &PreparedTransaction) -> AdapterResult<String> {
		self.record("submit".to_string());
		Ok("0xsubmitted".to_string())
	}
}
