//! Default security response headers

use axum::{
	http::header::{HeaderName, HeaderValue},
	Router,
};
use tower::ServiceBuilder;
use tower_http::set_header::SetResponseHeaderLayer;

/// Attach the security header stack, leaving headers a handler already set
pub fn add_security_headers<S>(router: Router<S>) -> Router<S>
where
	S: Clone + Send + Sync + 'static,
{
	router.layer(
		ServiceBuilder::new()
			.layer(SetResponseHeaderLayer::if_not_present(
				HeaderName::from_static("strict-transport-security"),
				HeaderValue::from_static("max-age=31536000; includeSubDomains; preload"),
			))
			.layer(SetResponseHeaderLayer::if_not_present(
				HeaderName::from_static("x-content-type-options"),
				HeaderValue::from_static("nosniff"),
			))
			.layer(SetResponseHeaderLayer::if_not_present(
				HeaderName::from_static("x-frame-options"),
				HeaderValue::from_static("DENY"),
			))
			.layer(SetResponseHeaderLayer::if_not_present(
				HeaderName::from_static("referrer-policy"),
				HeaderValue::from_static("no-referrer"),
			))
			.layer(SetResponseHeaderLayer::if_not_present(
				HeaderName::from_static("content-security-policy"),
				HeaderValue::from_static("default-src 'none'; frame-ancestors 'none'"),
			))
			.layer(SetResponseHeaderLayer::if_not_present(
				HeaderName::from_static("cache-control"),
				HeaderValue::from_static("no-store"),
			)),
	)
}
