/// E2E tests for token provisioning
use crate::e2e::{fixtures, TestServer};
use crate::mocks::runner::{ORIGIN_MINT, ORIGIN_STORE};
use crate::mocks::{StubBridgeApi, ToolingScript, ToolingStub};
use reqwest::Client;
use serde_json::{json, Value};

#[tokio::test]
async fn test_testoft_provisions_both_destinations() {
	let server = TestServer::spawn().await.expect("Failed to start test server");

	let resp = Client::new()
		.post(server.url("/api/v1/tokens"))
		.json(&fixtures::test_oft_request())
		.send()
		.await
		.unwrap();
	assert_eq!(resp.status(), reqwest::StatusCode::OK);

	let body: Value = resp.json().await.unwrap();
	assert_eq!(body["success"], true);
	let progress = &body["progress"];
	assert_eq!(progress["step1Completed"], true);
	assert_eq!(
		progress["step2Completed"],
		json!({"arbitrum-sepolia": true, "bsc-v2-testnet": true})
	);
	assert_eq!(progress["step3Completed"], true);
	assert_eq!(progress["step4Completed"], true);
	assert_eq!(progress["originTokenAddress"], ORIGIN_MINT);
	assert_eq!(progress["originStoreAddress"], ORIGIN_STORE);

	assert_eq!(
		server.tooling.tasks(),
		vec![
			"lz:oft:solana:create",
			"lz:deploy",
			"lz:deploy",
			"lz:oft:solana:init-config",
			"lz:oapp:wire",
			"lz:oapp:wire",
		]
	);

	server.abort();
}

#[tokio::test]
async fn test_second_destination_failure_reports_progress() {
	let tooling = ToolingStub::with_script(ToolingScript {
		fail_deploy_on: Some("bsc-testnet".to_string()),
		failure_stderr: "Error: insufficient funds for gas * price + value".to_string(),
		..ToolingScript::default()
	});
	let server = TestServer::spawn_with(tooling, StubBridgeApi::new())
		.await
		.expect("Failed to start test server");

	let resp = Client::new()
		.post(server.url("/api/v1/tokens"))
		.json(&fixtures::test_oft_request())
		.send()
		.await
		.unwrap();
	assert_eq!(resp.status(), reqwest::StatusCode::INTERNAL_SERVER_ERROR);

	let body: Value = resp.json().await.unwrap();
	assert_eq!(body["success"], false);
	let error = body["error"].as_str().unwrap();
	assert!(error.contains("Step 2"), "unexpected error: {}", error);
	assert!(error.contains("bsc-v2-testnet"));
	assert!(body["details"].as_str().unwrap().contains("insufficient funds"));

	let progress = &body["progress"];
	assert_eq!(progress["step1Completed"], true);
	assert_eq!(progress["step2Completed"], json!({"arbitrum-sepolia": true}));
	assert_eq!(progress["step3Completed"], false);
	assert_eq!(progress["step4Completed"], false);

	let tasks = server.tooling.tasks();
	assert!(!tasks.iter().any(|task| task == "lz:oft:solana:init-config"));
	assert!(!tasks.iter().any(|task| task == "lz:oapp:wire"));

	server.abort();
}

#[tokio::test]
async fn test_wiring_failure_keeps_configuration_progress() {
	let tooling = ToolingStub::with_script(ToolingScript {
		fail_wire_on: Some("arbitrum-sepolia".to_string()),
		failure_stderr: "Error: execution reverted".to_string(),
		..ToolingScript::default()
	});
	let server = TestServer::spawn_with(tooling, StubBridgeApi::new())
		.await
		.expect("Failed to start test server");

	let resp = Client::new()
		.post(server.url("/api/v1/tokens"))
		.json(&fixtures::test_oft_request())
		.send()
		.await
		.unwrap();
	assert_eq!(resp.status(), reqwest::StatusCode::INTERNAL_SERVER_ERROR);

	let body: Value = resp.json().await.unwrap();
	assert!(body["error"].as_str().unwrap().contains("Step 4"));
	assert_eq!(body["progress"]["step3Completed"], true);
	assert_eq!(body["progress"]["step4Completed"], false);

	server.abort();
}

#[tokio::test]
async fn test_unsupported_destination_is_rejected_before_any_step() {
	let server = TestServer::spawn().await.expect("Failed to start test server");

	let mut request = fixtures::test_oft_request();
	request["destinationChains"] = json!(["arbitrum-sepolia", "fantom-testnet"]);

	let resp = Client::new()
		.post(server.url("/api/v1/tokens"))
		.json(&request)
		.send()
		.await
		.unwrap();
	assert_eq!(resp.status(), reqwest::StatusCode::BAD_REQUEST);

	let body: Value = resp.json().await.unwrap();
	assert_eq!(body["success"], false);
	assert!(body["error"].as_str().unwrap().contains("fantom-testnet"));
	assert_eq!(body["progress"]["step1Completed"], false);
	assert!(server.tooling.invocations().is_empty());

	server.abort();
}

#[tokio::test]
async fn test_missing_token_name_is_rejected() {
	let server = TestServer::spawn().await.expect("Failed to start test server");

	let mut request = fixtures::test_oft_request();
	request["tokenName"] = json!("");

	let resp = Client::new()
		.post(server.url("/api/v1/tokens"))
		.json(&request)
		.send()
		.await
		.unwrap();
	assert_eq!(resp.status(), reqwest::StatusCode::BAD_REQUEST);

	let body: Value = resp.json().await.unwrap();
	assert!(body["error"].as_str().unwrap().contains("tokenName"));
	assert!(server.tooling.invocations().is_empty());

	server.abort();
}

#[tokio::test]
async fn test_malformed_body_gets_structured_failure() {
	let server = TestServer::spawn().await.expect("Failed to start test server");

	let resp = Client::new()
		.post(server.url("/api/v1/tokens"))
		.header("content-type", "application/json")
		.body("{\"tokenName\": ")
		.send()
		.await
		.unwrap();
	assert_eq!(resp.status(), reqwest::StatusCode::BAD_REQUEST);

	let body: Value = resp.json().await.unwrap();
	assert_eq!(body["success"], false);
	assert_eq!(body["error"], "Invalid request body");

	server.abort();
}
