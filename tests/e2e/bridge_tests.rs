/// E2E tests for aggregated bridging
use crate::e2e::TestServer;
use crate::mocks::{StubBridgeApi, ToolingStub};
use launchpad_types::TransferStatus;
use reqwest::Client;
use serde_json::{json, Value};

fn bridge_request() -> Value {
	json!({
		"fromChain": "arb",
		"toChain": "opt",
		"fromToken": "USDC",
		"toToken": "USDC",
		"amount": "2500000"
	})
}

#[tokio::test]
async fn test_bridge_completes() {
	let server = TestServer::spawn().await.expect("Failed to start test server");

	let resp = Client::new()
		.post(server.url("/api/v1/bridge"))
		.json(&bridge_request())
		.send()
		.await
		.unwrap();
	assert_eq!(resp.status(), reqwest::StatusCode::OK);

	let body: Value = resp.json().await.unwrap();
	assert_eq!(body["success"], true);
	assert_eq!(body["txHash"], "0xbridgetx");
	assert_eq!(body["status"], "DONE");

	let quotes = server.bridge_api.quote_requests();
	assert_eq!(quotes.len(), 1);
	assert_eq!(quotes[0].from_chain, 42161);
	assert_eq!(quotes[0].to_chain, 10);
	assert_eq!(quotes[0].from_token, "0xusdc42161");

	server.abort();
}

#[tokio::test]
async fn test_failed_bridge_is_server_error() {
	let server = TestServer::spawn_with(
		ToolingStub::new(),
		StubBridgeApi::finishing_with(TransferStatus::Failed),
	)
	.await
	.expect("Failed to start test server");

	let resp = Client::new()
		.post(server.url("/api/v1/bridge"))
		.json(&bridge_request())
		.send()
		.await
		.unwrap();
	assert_eq!(resp.status(), reqwest::StatusCode::INTERNAL_SERVER_ERROR);

	let body: Value = resp.json().await.unwrap();
	assert_eq!(body["success"], false);
	assert!(body["error"].as_str().unwrap().contains("REFUNDED"));

	server.abort();
}

#[tokio::test]
async fn test_foreign_from_address_is_client_error() {
	let server = TestServer::spawn().await.expect("Failed to start test server");

	let mut request = bridge_request();
	request["fromAddress"] = json!("0x00000000000000000000000000000000000000bb");

	let resp = Client::new()
		.post(server.url("/api/v1/bridge"))
		.json(&request)
		.send()
		.await
		.unwrap();
	assert_eq!(resp.status(), reqwest::StatusCode::BAD_REQUEST);

	let body: Value = resp.json().await.unwrap();
	assert_eq!(body["success"], false);
	assert!(server.bridge_api.quote_requests().is_empty());

	server.abort();
}

#[tokio::test]
async fn test_unknown_chain_is_client_error() {
	let server = TestServer::spawn().await.expect("Failed to start test server");

	let mut request = bridge_request();
	request["fromChain"] = json!("atlantis");

	let resp = Client::new()
		.post(server.url("/api/v1/bridge"))
		.json(&request)
		.send()
		.await
		.unwrap();
	assert_eq!(resp.status(), reqwest::StatusCode::BAD_REQUEST);

	server.abort();
}

#[tokio::test]
async fn test_status_lookup() {
	let server = TestServer::spawn().await.expect("Failed to start test server");

	let resp = Client::new()
		.get(server.url(
			"/api/v1/bridge/status?provider=across&fromChain=42161&toChain=10&txHash=0xbridgetx",
		))
		.send()
		.await
		.unwrap();
	assert_eq!(resp.status(), reqwest::StatusCode::OK);

	let body: Value = resp.json().await.unwrap();
	assert_eq!(body["status"], "DONE");

	server.abort();
}

#[tokio::test]
async fn test_connections_lookup() {
	let server = TestServer::spawn().await.expect("Failed to start test server");

	let resp = Client::new()
		.get(server.url("/api/v1/bridge/connections?fromChain=arb&toChain=opt"))
		.send()
		.await
		.unwrap();
	assert_eq!(resp.status(), reqwest::StatusCode::OK);

	let body: Value = resp.json().await.unwrap();
	assert_eq!(body[0]["fromChainId"], 42161);
	assert_eq!(body[0]["toChainId"], 10);

	server.abort();
}
