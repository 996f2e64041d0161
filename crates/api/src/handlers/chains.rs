use axum::{extract::State, response::Json};
use launchpad_types::ChainDescriptor;
use serde::Serialize;

use crate::state::AppState;

/// Registry listing
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainsResponse {
	pub origin_chain: String,
	pub chains: Vec<ChainDescriptor>,
}

/// GET /api/v1/chains - Every chain the launchpad can provision to
pub async fn get_chains(State(state): State<AppState>) -> Json<ChainsResponse> {
	Json(ChainsResponse {
		origin_chain: state.pipeline.origin_chain().to_string(),
		chains: state.registry.all().into_iter().cloned().collect(),
	})
}
