//! Startup and discovery summaries for the anchor transfer client

use crate::Settings;
use std::env;
use tracing::info;

/// Logs service and configuration information at startup
pub fn log_service_info(settings: &Settings) {
	let service_name = "anchor-transfer";
	let service_version = env!("CARGO_PKG_VERSION");

	info!("=== Anchor Transfer Client Starting ===");
	info!("🚀 Service: {} v{}", service_name, service_version);
	info!("💻 Platform: {} ({})", env::consts::OS, env::consts::ARCH);

	if let Ok(cwd) = env::current_dir() {
		info!("📁 Working Directory: {}", cwd.display());
	}

	if let Ok(rust_log) = env::var("RUST_LOG") {
		info!("🔧 Log Level: {}", rust_log);
	}

	info!("🌐 Horizon: {}", settings.network.horizon_url);
	if !settings.network.https_domains {
		info!("⚠️ Domain configuration is fetched over plain http");
	}
	info!("⏱️ Request timeout: {}ms", settings.timeouts.request_ms);

	match &settings.auth.token {
		Some(token) => info!("🔑 Auth token: {}", token.description()),
		None => info!("🔑 Auth token: none (anonymous requests)"),
	}

	info!("📋 Configured assets: {}", settings.assets.len());
	info!(
		"🕒 Started at: {}",
		chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
	);
}

/// Logs the outcome of a discovery and info run
pub fn log_discovery_complete(assets: usize, servers: usize, with_info: usize, tolerated_failures: usize) {
	info!("✅ Discovery complete");
	info!("📡 {} transfer servers for {} assets", servers, assets);
	info!("📄 Transfer info available for {} assets", with_info);
	if tolerated_failures > 0 {
		info!("⚠️ {} lookups failed and were skipped", tolerated_failures);
	}
}
