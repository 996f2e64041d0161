//! Collaborator traits: the aggregator HTTP API and per-family chain wallets

use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt::Debug;

use super::models::{
	ChainInfo, Connection, PreparedTransaction, Quote, QuoteRequest, StatusQuery, StatusResponse,
	TokenInfo,
};
use crate::adapters::AdapterResult;
use crate::models::ChainFamily;

/// Bridge aggregator service
///
/// Implementations are plain request/response clients. No retries, no caching.
#[async_trait]
pub trait BridgeApi: Send + Sync + Debug {
	/// Identifier of the aggregator (e.g. "lifi")
	fn id(&self) -> &str;

	/// All chains supported by the aggregator
	async fn get_chains(&self) -> AdapterResult<Vec<ChainInfo>>;

	/// Tokens per chain id. An empty filter requests every supported chain.
	async fn get_tokens(&self, chain_ids: &[u64]) -> AdapterResult<HashMap<u64, Vec<TokenInfo>>>;

	/// Resolve a single token by symbol or address on a chain
	async fn get_token(&self, chain_id: u64, token: &str) -> AdapterResult<TokenInfo>;

	/// Request an executable quote
	async fn get_quote(&self, request: &QuoteRequest) -> AdapterResult<Quote>;

	/// Look up the status of a submitted transfer
	async fn get_status(&self, query: &StatusQuery) -> AdapterResult<StatusResponse>;

	/// Token connections available between two chains
	async fn get_connections(&self, from_chain: u64, to_chain: u64)
		-> AdapterResult<Vec<Connection>>;
}

/// Signing and submission capability for one chain family
///
/// Key material stays behind the implementation; callers only hand over
/// prepared transactions and receive transaction hashes.
#[async_trait]
pub trait ChainWallet: Send + Sync + Debug {
	fn family(&self) -> ChainFamily;

	/// Address transactions are sent from
	fn address(&self) -> &str;

	/// Whether token spending needs an explicit approval on this family
	fn requires_approval(&self) -> bool {
		true
	}

	/// Current allowance granted by the wallet to `spender` on `token`
	async fn allowance(&self, token: &str, spender: &str) -> AdapterResult<u128>;

	/// Submit an approval transaction, returning its hash
	async fn approve(&self, token: &str, spender: &str, amount: u128) -> AdapterResult<String>;

	/// Wait until the transaction is included and succeeded
	async fn wait_for_confirmation(&self, tx_hash: &str) -> AdapterResult<()>;

	/// Sign and submit a prepared transaction, returning its hash
	async fn submit(&self, transaction: &PreparedTransaction) -> AdapterResult<String>;
}
