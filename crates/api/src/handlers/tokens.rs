use axum::{
	extract::{rejection::JsonRejection, State},
	http::StatusCode,
	response::Json,
};
use launchpad_types::{ProvisioningProgress, ProvisioningRequest, ProvisioningResponse};
use tracing::{info, warn};

use crate::handlers::common::{rejection_details, status_for};
use crate::state::AppState;

/// POST /api/v1/tokens - Provision a token on the origin chain and its mirrors
pub async fn post_tokens(
	State(state): State<AppState>,
	payload: Result<Json<ProvisioningRequest>, JsonRejection>,
) -> Result<Json<ProvisioningResponse>, (StatusCode, Json<ProvisioningResponse>)> {
	let Json(request) = payload.map_err(|rejection| {
		(
			StatusCode::BAD_REQUEST,
			Json(ProvisioningResponse::failure(
				"Invalid request body",
				rejection_details(&rejection),
				ProvisioningProgress::new(),
			)),
		)
	})?;

	info!(
		symbol = %request.token_symbol,
		destinations = request.destination_chains.len(),
		"Received token provisioning request"
	);

	match state.pipeline.provision(&request).await {
		Ok(progress) => Ok(Json(ProvisioningResponse::success(progress))),
		Err(e) => {
			warn!(symbol = %request.token_symbol, error = %e, "Token provisioning failed");
			Err((
				status_for(e.kind()),
				Json(ProvisioningResponse::failure(e.to_string(), e.details(), e.progress())),
			))
		},
	}
}
