use std::any::Any;

use axum::{
	http::StatusCode,
	response::{IntoResponse, Json, Response},
	routing::{get, post},
	Router,
};
use serde_json::json;
use tower::ServiceBuilder;
use tower_http::{
	catch_panic::CatchPanicLayer,
	compression::CompressionLayer,
	cors::CorsLayer,
	limit::RequestBodyLimitLayer,
	request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
	trace::TraceLayer,
};
use tracing::{error, Level};

use crate::handlers::{
	get_bridge_connections, get_bridge_status, get_chains, health, post_bridge, post_tokens,
	post_transfers,
};
use crate::security::add_security_headers;
use crate::state::AppState;

pub const DEFAULT_BODY_LIMIT: usize = 1024 * 1024;

pub fn create_router(body_limit: usize) -> Router<AppState> {
	let cors = CorsLayer::permissive();
	let body_limit = RequestBodyLimitLayer::new(body_limit);
	let trace = TraceLayer::new_for_http()
		.make_span_with(|req: &axum::http::Request<_>| {
			let req_id = req
				.headers()
				.get("x-request-id")
				.and_then(|v| v.to_str().ok())
				.unwrap_or("-");
			tracing::info_span!(
				"http_request",
				method = %req.method(),
				uri = %req.uri(),
				req_id
			)
		})
		.on_request(tower_http::trace::DefaultOnRequest::new().level(Level::INFO))
		.on_response(
			tower_http::trace::DefaultOnResponse::new()
				.level(Level::INFO)
				.latency_unit(tower_http::LatencyUnit::Millis),
		);
	let req_id = ServiceBuilder::new()
		.layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
		.layer(PropagateRequestIdLayer::x_request_id());

	let router = Router::new()
		.route("/health", get(health))
		.route("/health/", get(health))
		.route("/api/v1/tokens", post(post_tokens))
		.route("/api/v1/tokens/", post(post_tokens))
		.route("/api/v1/transfers", post(post_transfers))
		.route("/api/v1/transfers/", post(post_transfers))
		.route("/api/v1/bridge", post(post_bridge))
		.route("/api/v1/bridge/", post(post_bridge))
		.route("/api/v1/bridge/status", get(get_bridge_status))
		.route("/api/v1/bridge/connections", get(get_bridge_connections))
		.route("/api/v1/chains", get(get_chains))
		.route("/api/v1/chains/", get(get_chains));

	let router = router
		.layer(CatchPanicLayer::custom(panic_response))
		.layer(cors)
		.layer(CompressionLayer::new())
		.layer(trace)
		.layer(req_id)
		.layer(body_limit);

	add_security_headers(router)
}

/// A panicking handler is answered with the generic failure body
fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
	let details = panic
		.downcast_ref::<String>()
		.cloned()
		.or_else(|| panic.downcast_ref::<&str>().map(|s| s.to_string()))
		.unwrap_or_else(|| "unknown panic".to_string());
	error!(%details, "Request handler panicked");

	(
		StatusCode::INTERNAL_SERVER_ERROR,
		Json(json!({
			"success": false,
			"error": "Internal server error",
			"details": details,
		})),
	)
		.into_response()
}
