/// E2E tests for the registry listing and health
use crate::e2e::TestServer;
use reqwest::Client;
use serde_json::Value;

#[tokio::test]
async fn test_health_endpoint() {
	let server = TestServer::spawn().await.expect("Failed to start test server");

	let resp = Client::new()
		.get(server.url("/health"))
		.send()
		.await
		.unwrap();
	assert_eq!(resp.status(), reqwest::StatusCode::OK);
	assert_eq!(resp.text().await.unwrap(), "OK");

	server.abort();
}

#[tokio::test]
async fn test_chains_lists_default_registry() {
	let server = TestServer::spawn().await.expect("Failed to start test server");

	let resp = Client::new()
		.get(server.url("/api/v1/chains"))
		.send()
		.await
		.unwrap();
	assert_eq!(resp.status(), reqwest::StatusCode::OK);

	let body: Value = resp.json().await.unwrap();
	assert_eq!(body["originChain"], "solana-testnet");
	let chains = body["chains"].as_array().unwrap();
	assert_eq!(chains.len(), 8);

	let bsc = chains
		.iter()
		.find(|chain| chain["logicalId"] == "bsc-v2-testnet")
		.unwrap();
	assert_eq!(bsc["protocolEndpointId"], 40102);
	assert_eq!(bsc["networkName"], "bsc-testnet");
	assert_eq!(bsc["aggregatorChain"], "97");

	server.abort();
}

#[tokio::test]
async fn test_unknown_endpoint_404() {
	let server = TestServer::spawn().await.expect("Failed to start test server");

	let resp = Client::new()
		.get(server.url("/unknown-endpoint"))
		.send()
		.await
		.unwrap();
	assert_eq!(resp.status(), reqwest::StatusCode::NOT_FOUND);

	server.abort();
}

#[tokio::test]
async fn test_responses_carry_request_id_and_security_headers() {
	let server = TestServer::spawn().await.expect("Failed to start test server");

	let resp = Client::new()
		.get(server.url("/health"))
		.send()
		.await
		.unwrap();
	let headers = resp.headers();
	assert!(headers.contains_key("x-request-id"));
	assert_eq!(headers["x-content-type-options"], "nosniff");

	server.abort();
}
