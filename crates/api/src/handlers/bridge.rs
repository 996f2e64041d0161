use axum::{
	extract::{rejection::JsonRejection, Query, State},
	http::StatusCode,
	response::Json,
};
use launchpad_types::{BridgeRequest, BridgeResponse, Connection, StatusQuery, StatusResponse};
use serde::Deserialize;
use tracing::{info, warn};

use crate::handlers::common::{
	rejection_details, root_cause, status_for, ApiError, ErrorResponse,
};
use crate::state::AppState;

/// POST /api/v1/bridge - Bridge through the aggregator and wait for completion
pub async fn post_bridge(
	State(state): State<AppState>,
	payload: Result<Json<BridgeRequest>, JsonRejection>,
) -> Result<Json<BridgeResponse>, (StatusCode, Json<BridgeResponse>)> {
	let Json(request) = payload.map_err(|rejection| {
		(
			StatusCode::BAD_REQUEST,
			Json(BridgeResponse::failure(
				"Invalid request body",
				rejection_details(&rejection),
			)),
		)
	})?;

	info!(
		from = %request.from_chain,
		to = %request.to_chain,
		token = %request.from_token,
		"Received bridge request"
	);

	match state.bridge.bridge(&request).await {
		Ok(outcome) => Ok(Json(BridgeResponse::success(outcome))),
		Err(e) => {
			warn!(error = %e, "Bridge request failed");
			Err((
				status_for(e.kind()),
				Json(BridgeResponse::failure(e.to_string(), root_cause(&e))),
			))
		},
	}
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusParams {
	pub provider: String,
	pub from_chain: u64,
	pub to_chain: u64,
	pub tx_hash: String,
}

/// GET /api/v1/bridge/status - Single status lookup
pub async fn get_bridge_status(
	State(state): State<AppState>,
	Query(params): Query<StatusParams>,
) -> Result<Json<StatusResponse>, ApiError> {
	let query = StatusQuery {
		provider_id: params.provider,
		from_chain: params.from_chain,
		to_chain: params.to_chain,
		tx_hash: params.tx_hash,
	};

	state.bridge.get_status(&query).await.map(Json).map_err(|e| {
		(
			status_for(e.kind()),
			Json(ErrorResponse::new("STATUS_ERROR", e.to_string())),
		)
	})
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionParams {
	pub from_chain: String,
	pub to_chain: String,
}

/// GET /api/v1/bridge/connections - Token routes between two chains
pub async fn get_bridge_connections(
	State(state): State<AppState>,
	Query(params): Query<ConnectionParams>,
) -> Result<Json<Vec<Connection>>, ApiError> {
	state
		.bridge
		.get_connections(&params.from_chain, &params.to_chain)
		.await
		.map(Json)
		.map_err(|e| {
			(
				status_for(e.kind()),
				Json(ErrorResponse::new("CONNECTIONS_ERROR", e.to_string())),
			)
		})
}
