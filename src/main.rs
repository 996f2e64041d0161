//! Omnichain Launchpad Server
//!
//! Main entry point for the launchpad server

use omnichain_launchpad::LaunchpadBuilder;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	LaunchpadBuilder::new().start_server().await
}
