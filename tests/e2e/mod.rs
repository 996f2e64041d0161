//! End-to-end test utilities and shared fixtures

use std::sync::Arc;

use omnichain_launchpad::{LaunchpadBuilder, Settings};
use tokio::task::JoinHandle;

use crate::mocks::{StubBridgeApi, StubNativeSender, StubWallet, ToolingStub};

/// Test server instance with the collaborators it was built with
pub struct TestServer {
	pub base_url: String,
	pub handle: JoinHandle<()>,
	#[allow(dead_code)]
	pub tooling: ToolingStub,
	#[allow(dead_code)]
	pub bridge_api: StubBridgeApi,
	#[allow(dead_code)]
	pub native: StubNativeSender,
}

/// Settings for tests: default chain table, fast polling, artifacts in a fresh temp dir
pub fn test_settings() -> Settings {
	let mut settings = Settings::default();
	settings.aggregator.poll_interval_ms = 1;
	settings.aggregator.poll_timeout_secs = Some(2);
	settings.tooling.retry_base_delay_ms = 1;
	settings.tooling.artifact_dir = Some(
		std::env::temp_dir()
			.join(format!("launchpad-e2e-{}", uuid::Uuid::new_v4()))
			.to_string_lossy()
			.into_owned(),
	);
	settings
}

impl TestServer {
	/// Spawn a test server with healthy collaborators
	pub async fn spawn() -> Result<Self, Box<dyn std::error::Error>> {
		Self::spawn_with(ToolingStub::new(), StubBridgeApi::new()).await
	}

	/// Spawn a test server around the given tooling and aggregator stand-ins
	pub async fn spawn_with(
		tooling: ToolingStub,
		bridge_api: StubBridgeApi,
	) -> Result<Self, Box<dyn std::error::Error>> {
		let native = StubNativeSender::new();

		let (app, _state) = LaunchpadBuilder::new()
			.with_settings(test_settings())
			.with_command_runner(Arc::new(tooling.clone()))
			.with_bridge_api(Arc::new(bridge_api.clone()))
			.with_wallet(Arc::new(StubWallet::new()))
			.with_native_sender(Arc::new(native.clone()))
			.start()
			.await?;

		let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
			.await
			.expect("bind test port");
		let addr = listener.local_addr().unwrap();
		let base_url = format!("http://{}:{}", addr.ip(), addr.port());

		let handle = tokio::spawn(async move {
			let _ = axum::serve(listener, app).await;
		});

		// Give server time to start
		tokio::time::sleep(tokio::time::Duration::from_millis(10)).await;

		Ok(Self {
			base_url,
			handle,
			tooling,
			bridge_api,
			native,
		})
	}

	pub fn url(&self, path: &str) -> String {
		format!("{}{}", self.base_url, path)
	}

	pub fn abort(self) {
		self.handle.abort();
	}
}

/// Request bodies shared across suites
#[allow(dead_code)]
pub mod fixtures {
	use serde_json::{json, Value};

	pub fn test_oft_request() -> Value {
		json!({
			"tokenName": "TestOFT",
			"tokenSymbol": "TOFT",
			"totalSupply": "1000000000",
			"metadataUri": "https://example.com/toft.json",
			"destinationChains": ["arbitrum-sepolia", "bsc-v2-testnet"]
		})
	}
}
