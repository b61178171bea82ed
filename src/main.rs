//! Anchor Transfer
//!
//! Discovers the transfer servers of the configured assets and logs their capabilities

#[tokio::main]
async fn main() -> Result<(), anchor_transfer::BoxError> {
	anchor_transfer::run_from_config().await
}
