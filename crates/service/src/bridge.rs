//! Bridge client
//!
//! Wraps the aggregator API with a chain/token cache, allowance handling and
//! status polling, and routes submission to the wallet of the source chain's
//! family.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use launchpad_types::{
	AdapterError, BridgeApi, BridgeOutcome, BridgeRequest, ChainFamily, ChainInfo, ChainWallet,
	Connection, ErrorKind, Quote, QuoteRequest, StatusQuery, StatusResponse, TokenInfo,
	TransferStatus,
};
use thiserror::Error;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum BridgeError {
	#[error("invalid bridge request: {0}")]
	Validation(String),
	#[error("chain not supported by the aggregator: {0}")]
	ChainNotFound(String),
	#[error("token {token} not found on chain {chain}")]
	TokenNotFound { token: String, chain: String },
	#[error("no wallet configured for {0} chains")]
	WalletMissing(ChainFamily),
	#[error("aggregator error: {0}")]
	Adapter(#[from] AdapterError),
	#[error("transfer {tx_hash} failed{}", substatus_suffix(.substatus))]
	TransferFailed {
		tx_hash: String,
		substatus: Option<String>,
	},
	#[error("transfer {tx_hash} still pending after {waited_secs}s")]
	TimedOut { tx_hash: String, waited_secs: u64 },
}

fn substatus_suffix(substatus: &Option<String>) -> String {
	substatus
		.as_ref()
		.map(|substatus| format!(" ({})", substatus))
		.unwrap_or_default()
}

impl BridgeError {
	pub fn kind(&self) -> ErrorKind {
		match self {
			BridgeError::Validation(_)
			| BridgeError::ChainNotFound(_)
			| BridgeError::TokenNotFound { .. } => ErrorKind::Validation,
			BridgeError::WalletMissing(_) => ErrorKind::Unexpected,
			BridgeError::Adapter(error) => error.kind(),
			BridgeError::TransferFailed { .. } => ErrorKind::PermanentExternal,
			BridgeError::TimedOut { .. } => ErrorKind::TransientExternal,
		}
	}
}

/// Status polling cadence for cross-chain transfers
#[derive(Debug, Clone, Copy)]
pub struct PollingConfig {
	pub interval: Duration,
	/// `None` polls until the transfer reaches a terminal status
	pub timeout: Option<Duration>,
}

impl Default for PollingConfig {
	fn default() -> Self {
		Self {
			interval: Duration::from_secs(5),
			timeout: Some(Duration::from_secs(30 * 60)),
		}
	}
}

#[derive(Debug, Default)]
struct BridgeCache {
	chains: Vec<ChainInfo>,
	tokens: HashMap<u64, Vec<TokenInfo>>,
}

impl BridgeCache {
	fn chain(&self, identifier: &str) -> Option<&ChainInfo> {
		self.chains.iter().find(|chain| chain.matches(identifier))
	}

	fn token(&self, chain_id: u64, token: &str) -> Option<&TokenInfo> {
		self.tokens.get(&chain_id).and_then(|tokens| {
			tokens.iter().find(|candidate| {
				candidate.symbol.eq_ignore_ascii_case(token)
					|| candidate.address.eq_ignore_ascii_case(token)
			})
		})
	}
}

pub struct BridgeService {
	api: Arc<dyn BridgeApi>,
	wallets: HashMap<ChainFamily, Arc<dyn ChainWallet>>,
	cache: RwLock<Option<BridgeCache>>,
	/// Tokens resolved individually after the bulk fetch missed them
	resolved_tokens: DashMap<(u64, String), TokenInfo>,
	polling: PollingConfig,
}

impl BridgeService {
	pub fn new(api: Arc<dyn BridgeApi>, polling: PollingConfig) -> Self {
		Self {
			api,
			wallets: HashMap::new(),
			cache: RwLock::new(None),
			resolved_tokens: DashMap::new(),
			polling,
		}
	}

	pub fn with_wallet(mut self, wallet: Arc<dyn ChainWallet>) -> Self {
		self.wallets.insert(wallet.family(), wallet);
		self
	}

	/// Load chains and tokens. On any failure the cache stays empty.
	pub async fn initialize(&self) -> Result<(), BridgeError> {
		let chains = self.api.get_chains().await?;
		let tokens = self.api.get_tokens(&[]).await?;

		info!(
			target: "bridge",
			aggregator = self.api.id(),
			chains = chains.len(),
			token_lists = tokens.len(),
			"Bridge cache initialized"
		);
		*self.cache.write().await = Some(BridgeCache { chains, tokens });
		Ok(())
	}

	pub async fn is_initialized(&self) -> bool {
		self.cache.read().await.is_some()
	}

	/// Chains supported by the aggregator, loading the cache when empty
	pub async fn supported_chains(&self) -> Result<Vec<ChainInfo>, BridgeError> {
		if !self.is_initialized().await {
			self.initialize().await?;
		}
		Ok(self
			.cache
			.read()
			.await
			.as_ref()
			.map(|cache| cache.chains.clone())
			.unwrap_or_default())
	}

	async fn resolve_chain(&self, identifier: &str) -> Result<ChainInfo, BridgeError> {
		if let Some(chain) = self
			.cache
			.read()
			.await
			.as_ref()
			.and_then(|cache| cache.chain(identifier))
		{
			return Ok(chain.clone());
		}

		debug!(target: "bridge", %identifier, "Chain not cached, refetching chain list");
		let chains = self.api.get_chains().await?;
		let found = chains.iter().find(|chain| chain.matches(identifier)).cloned();

		if let Some(cache) = self.cache.write().await.as_mut() {
			cache.chains = chains;
		}

		found.ok_or_else(|| BridgeError::ChainNotFound(identifier.to_string()))
	}

	async fn resolve_token(&self, chain: &ChainInfo, token: &str) -> Result<TokenInfo, BridgeError> {
		if let Some(native) = chain
			.native_token
			.as_ref()
			.filter(|native| native.symbol.eq_ignore_ascii_case(token))
		{
			return Ok(native.clone());
		}

		if let Some(found) = self
			.cache
			.read()
			.await
			.as_ref()
			.and_then(|cache| cache.token(chain.id, token))
		{
			return Ok(found.clone());
		}

		let key = (chain.id, token.to_ascii_lowercase());
		if let Some(found) = self.resolved_tokens.get(&key) {
			return Ok(found.clone());
		}

		match self.api.get_token(chain.id, token).await {
			Ok(found) => {
				self.resolved_tokens.insert(key, found.clone());
				Ok(found)
			},
			Err(error) if matches!(error.status_code(), Some(400) | Some(404)) => {
				Err(BridgeError::TokenNotFound {
					token: token.to_string(),
					chain: chain.name.clone(),
				})
			},
			Err(error) => Err(error.into()),
		}
	}

	fn wallet(&self, family: ChainFamily) -> Result<&Arc<dyn ChainWallet>, BridgeError> {
		self.wallets
			.get(&family)
			.ok_or(BridgeError::WalletMissing(family))
	}

	/// Fresh quote for a transfer. Quotes are never cached.
	pub async fn get_quote(
		&self,
		request: &BridgeRequest,
		from_address: &str,
	) -> Result<Quote, BridgeError> {
		if request.amount.parse::<u128>().map_or(true, |amount| amount == 0) {
			return Err(BridgeError::Validation(format!(
				"amount must be a positive integer in base units, got '{}'",
				request.amount
			)));
		}

		let from_chain = self.resolve_chain(&request.from_chain).await?;
		let to_chain = self.resolve_chain(&request.to_chain).await?;
		let from_token = self.resolve_token(&from_chain, &request.from_token).await?;
		let to_token = self.resolve_token(&to_chain, &request.to_token).await?;

		let quote_request = QuoteRequest {
			from_chain: from_chain.id,
			to_chain: to_chain.id,
			from_token: from_token.address,
			to_token: to_token.address,
			from_amount: request.amount.clone(),
			from_address: from_address.to_string(),
			to_address: request.to.clone(),
		};

		let quote = self.api.get_quote(&quote_request).await?;
		debug!(
			target: "bridge",
			quote_id = %quote.quote_id,
			provider = %quote.provider_id,
			dest_amount = %quote.dest_amount,
			"Quote received"
		);
		Ok(quote)
	}

	/// Make sure `spender` may move `amount` of `token`, approving when short.
	///
	/// Returns the approval transaction hash when one was needed.
	pub async fn ensure_allowance(
		&self,
		family: ChainFamily,
		token: &str,
		spender: &str,
		amount: u128,
	) -> Result<Option<String>, BridgeError> {
		let wallet = self.wallet(family)?;
		if family.is_native_asset(token) || !wallet.requires_approval() {
			return Ok(None);
		}

		let current = wallet.allowance(token, spender).await?;
		if current >= amount {
			debug!(target: "bridge", %token, %spender, current, "Allowance sufficient");
			return Ok(None);
		}

		info!(target: "bridge", %token, %spender, current, amount, "Approving token spend");
		let approval = wallet.approve(token, spender, amount).await?;
		wallet.wait_for_confirmation(&approval).await?;
		Ok(Some(approval))
	}

	/// Quote, approve, submit and follow a transfer to completion
	pub async fn bridge(&self, request: &BridgeRequest) -> Result<BridgeOutcome, BridgeError> {
		let from_chain = self.resolve_chain(&request.from_chain).await?;
		let family = from_chain.family.ok_or_else(|| {
			BridgeError::Validation(format!(
				"chain {} has no supported transaction family",
				from_chain.name
			))
		})?;
		let wallet = self.wallet(family)?;
		let from_address = match &request.from_address {
			Some(requested) if !same_address(family, requested, wallet.address()) => {
				return Err(BridgeError::Validation(format!(
					"fromAddress {} does not match the {} wallet {}",
					requested,
					family,
					wallet.address()
				)));
			},
			_ => wallet.address().to_string(),
		};

		let quote = self.get_quote(request, &from_address).await?;
		if quote.unsigned_transaction.family() != family {
			return Err(BridgeError::Validation(format!(
				"quote carries a {} transaction for a {} source chain",
				quote.unsigned_transaction.family(),
				family
			)));
		}

		if let Some(spender) = &quote.approval_address {
			let amount = quote.source_amount.parse::<u128>().map_err(|_| {
				BridgeError::Validation(format!(
					"quote source amount '{}' is not an integer",
					quote.source_amount
				))
			})?;
			self.ensure_allowance(family, &quote.source_token_address, spender, amount)
				.await?;
		}

		let tx_hash = wallet.submit(&quote.unsigned_transaction).await?;
		info!(
			target: "bridge",
			%tx_hash,
			provider = %quote.provider_id,
			from_chain = quote.from_chain_id,
			to_chain = quote.to_chain_id,
			"Bridge transaction submitted"
		);

		if quote.from_chain_id == quote.to_chain_id {
			wallet.wait_for_confirmation(&tx_hash).await?;
			return Ok(BridgeOutcome {
				transaction_hash: tx_hash,
				status: TransferStatus::Done,
			});
		}

		let query = StatusQuery {
			provider_id: quote.provider_id,
			from_chain: quote.from_chain_id,
			to_chain: quote.to_chain_id,
			tx_hash,
		};
		let status = self.wait_for_completion(&query).await?;
		Ok(BridgeOutcome {
			transaction_hash: query.tx_hash,
			status: status.status,
		})
	}

	async fn wait_for_completion(&self, query: &StatusQuery) -> Result<StatusResponse, BridgeError> {
		let started = Instant::now();

		loop {
			match self.api.get_status(query).await {
				Ok(status) if status.status == TransferStatus::Done => {
					info!(target: "bridge", tx_hash = %query.tx_hash, "Transfer completed");
					return Ok(status);
				},
				Ok(status) if status.status == TransferStatus::Failed => {
					return Err(BridgeError::TransferFailed {
						tx_hash: query.tx_hash.clone(),
						substatus: status.substatus,
					});
				},
				Ok(status) => {
					debug!(
						target: "bridge",
						tx_hash = %query.tx_hash,
						substatus = ?status.substatus,
						"Transfer pending"
					);
				},
				Err(error) if error.kind().is_retryable() => {
					warn!(target: "bridge", tx_hash = %query.tx_hash, %error, "Status lookup failed");
				},
				Err(error) => return Err(error.into()),
			}

			let elapsed = started.elapsed();
			if let Some(timeout) = self.polling.timeout {
				if elapsed >= timeout {
					return Err(BridgeError::TimedOut {
						tx_hash: query.tx_hash.clone(),
						waited_secs: elapsed.as_secs(),
					});
				}
			}
			tokio::time::sleep(self.polling.interval).await;
		}
	}

	/// Single status lookup
	pub async fn get_status(&self, query: &StatusQuery) -> Result<StatusResponse, BridgeError> {
		Ok(self.api.get_status(query).await?)
	}

	/// Token connections between two chains given by name, key or id
	pub async fn get_connections(
		&self,
		from_chain: &str,
		to_chain: &str,
	) -> Result<Vec<Connection>, BridgeError> {
		let from = self.resolve_chain(from_chain).await?;
		let to = self.resolve_chain(to_chain).await?;
		Ok(self.api.get_connections(from.id, to.id).await?)
	}
}

/// EVM addresses compare case-insensitively, base58 addresses exactly
fn same_address(family: ChainFamily, left: &str, right: &str) -> bool {
	match family {
		ChainFamily::Evm => left.eq_ignore_ascii_case(right),
		ChainFamily::Solana => left == right,
	}
}
