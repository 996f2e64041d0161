//! Service startup logging for the omnichain launchpad

use std::env;
use tracing::info;

/// Logs service information at startup
pub fn log_service_info() {
	let service_name = "omnichain-launchpad";
	let service_version = env!("CARGO_PKG_VERSION");

	info!("=== Omnichain Launchpad Service Starting ===");
	info!("🚀 Service: {} v{}", service_name, service_version);
	info!("💻 Platform: {}", env::consts::OS);
	info!("🏗️ Architecture: {}", env::consts::ARCH);

	if let Ok(cwd) = env::current_dir() {
		info!("📁 Working Directory: {}", cwd.display());
	}

	if let Ok(rust_log) = env::var("RUST_LOG") {
		info!("🔧 Log Level: {}", rust_log);
	}

	if let Ok(config_path) = env::var("CONFIG_PATH") {
		info!("📋 Config Path: {}", config_path);
	}

	info!(
		"🕒 Started at: {}",
		chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
	);
}

/// Logs service shutdown information
pub fn log_service_shutdown() {
	info!("🛑 Omnichain Launchpad Service Shutting Down");
	info!(
		"🕒 Shutdown at: {}",
		chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
	);
}

/// Logs startup completion
pub fn log_startup_complete(bind_address: &str) {
	info!("✅ Omnichain Launchpad Service Started Successfully");
	info!("🌐 Server listening on: {}", bind_address);
	info!("📡 Ready to accept requests");
}
