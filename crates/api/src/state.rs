use std::sync::Arc;

use launchpad_service::{BridgeService, ChainRegistry, ProvisioningPipeline, TransferDispatcher};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
	pub pipeline: Arc<ProvisioningPipeline>,
	pub dispatcher: Arc<TransferDispatcher>,
	pub bridge: Arc<BridgeService>,
	pub registry: Arc<ChainRegistry>,
}
