/// E2E tests for transfer dispatch
use crate::e2e::TestServer;
use reqwest::Client;
use serde_json::{json, Value};

#[tokio::test]
async fn test_origin_outbound_transfer_goes_native() {
	let server = TestServer::spawn().await.expect("Failed to start test server");

	let resp = Client::new()
		.post(server.url("/api/v1/transfers"))
		.json(&json!({
			"fromChain": "solana-testnet",
			"toChain": "arbitrum-sepolia",
			"amount": "1000",
			"to": "0x00000000000000000000000000000000000000bb",
			"extras": {"mint": "MintTOFT", "escrow": "EscrowTOFT"}
		}))
		.send()
		.await
		.unwrap();
	assert_eq!(resp.status(), reqwest::StatusCode::OK);

	let body: Value = resp.json().await.unwrap();
	assert_eq!(body["success"], true);
	assert_eq!(body["route"], "native");
	assert_eq!(body["txHash"], "4nativeSignature");
	assert_eq!(body["status"], "PENDING");

	let sent = server.native.sent();
	assert_eq!(sent.len(), 1);
	assert_eq!(sent[0].from.protocol_endpoint_id, 40168);
	assert_eq!(sent[0].to.protocol_endpoint_id, 40231);

	server.abort();
}

#[tokio::test]
async fn test_inbound_transfer_without_oapp_address_is_rejected() {
	let server = TestServer::spawn().await.expect("Failed to start test server");

	let resp = Client::new()
		.post(server.url("/api/v1/transfers"))
		.json(&json!({
			"fromChain": "arbitrum-sepolia",
			"toChain": "solana-testnet",
			"amount": "1000",
			"to": "RecipientSolanaAccount"
		}))
		.send()
		.await
		.unwrap();
	assert_eq!(resp.status(), reqwest::StatusCode::BAD_REQUEST);

	let body: Value = resp.json().await.unwrap();
	assert_eq!(body["success"], false);
	assert!(body["error"].as_str().unwrap().contains("oappAddress"));
	assert!(server.native.sent().is_empty());

	server.abort();
}

#[tokio::test]
async fn test_non_origin_transfer_goes_through_aggregator() {
	let server = TestServer::spawn().await.expect("Failed to start test server");

	let resp = Client::new()
		.post(server.url("/api/v1/transfers"))
		.json(&json!({
			"fromChain": "arb",
			"toChain": "opt",
			"amount": "5000000",
			"to": "0x00000000000000000000000000000000000000bb",
			"extras": {"fromToken": "USDC", "toToken": "USDC"}
		}))
		.send()
		.await
		.unwrap();
	assert_eq!(resp.status(), reqwest::StatusCode::OK);

	let body: Value = resp.json().await.unwrap();
	assert_eq!(body["route"], "aggregated");
	assert_eq!(body["txHash"], "0xbridgetx");
	assert_eq!(body["status"], "DONE");
	assert!(server.native.sent().is_empty());

	server.abort();
}

#[tokio::test]
async fn test_zero_amount_is_rejected() {
	let server = TestServer::spawn().await.expect("Failed to start test server");

	let resp = Client::new()
		.post(server.url("/api/v1/transfers"))
		.json(&json!({
			"fromChain": "solana-testnet",
			"toChain": "arbitrum-sepolia",
			"amount": "0",
			"to": "0x00000000000000000000000000000000000000bb"
		}))
		.send()
		.await
		.unwrap();
	assert_eq!(resp.status(), reqwest::StatusCode::BAD_REQUEST);

	server.abort();
}
