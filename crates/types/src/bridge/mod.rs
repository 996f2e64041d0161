//! Aggregated bridge domain: quotes, statuses, and the collaborator traits

pub mod models;
pub mod request;
pub mod response;
pub mod traits;

pub use models::{
	ChainInfo, Connection, PreparedTransaction, Quote, QuoteRequest, StatusQuery, StatusResponse,
	TokenInfo, TransferStatus,
};
pub use request::BridgeRequest;
pub use response::{BridgeOutcome, BridgeResponse};
pub use traits::{BridgeApi, ChainWallet};
