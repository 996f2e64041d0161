use axum::{
	extract::{rejection::JsonRejection, State},
	http::StatusCode,
	response::Json,
};
use launchpad_types::{TransferRequest, TransferResponse};
use tracing::{info, warn};

use crate::handlers::common::{rejection_details, root_cause, status_for};
use crate::state::AppState;

/// POST /api/v1/transfers - Move tokens between two chains
///
/// Transfers touching the origin chain use the native messaging send unless
/// `extras.aggregated` is set. Aggregated transfers name chains either by
/// aggregator key, name or id, or by a registry id whose entry carries an
/// `aggregatorChain`. A registry chain without one is unknown to the
/// aggregator and rejected with 400.
pub async fn post_transfers(
	State(state): State<AppState>,
	payload: Result<Json<TransferRequest>, JsonRejection>,
) -> Result<Json<TransferResponse>, (StatusCode, Json<TransferResponse>)> {
	let Json(request) = payload.map_err(|rejection| {
		(
			StatusCode::BAD_REQUEST,
			Json(TransferResponse::failure(
				"Invalid request body",
				rejection_details(&rejection),
			)),
		)
	})?;

	info!(
		from = %request.from_chain,
		to = %request.to_chain,
		"Received transfer request"
	);

	match state.dispatcher.transfer(&request).await {
		Ok(receipt) => Ok(Json(TransferResponse::success(receipt))),
		Err(e) => {
			warn!(error = %e, "Transfer failed");
			Err((
				status_for(e.kind()),
				Json(TransferResponse::failure(e.to_string(), root_cause(&e))),
			))
		},
	}
}
