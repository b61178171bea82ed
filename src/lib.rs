//! Anchor Transfer Library
//!
//! Discovers the transfer servers of issued assets, aggregates their
//! deposit/withdrawal capabilities and drives deposit and withdrawal requests.

use std::sync::Arc;
use tracing::{info, warn};

// Core domain types
pub use anchor_types::{
	chrono,
	serde_json,
	AccountLedger,
	AnchorError,
	AnchorResult,
	Asset,
	AssetTransferInfo,
	AuthToken,
	DepositInstructions,
	DepositRequest,
	DepositResult,
	DepositType,
	DomainConfig,
	DomainConfigResolver,
	KycInstructions,
	KycSubtype,
	Memo,
	PaymentOperation,
	RequestFields,
	TransferInfo,
	TransferOptions,
	TransferResult,
	TransferServer,
	TransferServerClient,
	TransferStatus,
	TransferTransaction,
	WithdrawalInstructions,
	WithdrawalRequest,
	WithdrawalResult,
	WithdrawalType,
};

// Service layer
pub use anchor_service::{
	AssetTransferInfos, DiscoveryService, IssuerResolver, ItemFailure, TransferInfoService,
	TransferServerCache, TransferService,
};

// Adapters
pub use anchor_adapters::{HorizonLedger, HttpAdapters, HttpTransferClient, StellarTomlResolver};

// Config
pub use anchor_config::{
	load_config, log_discovery_complete, log_service_info, LogFormat, Settings,
};

pub mod models {
	pub use anchor_types::*;
}

pub mod service {
	pub use anchor_service::*;
}

pub mod adapters {
	pub use anchor_adapters::*;
}

pub mod config {
	pub use anchor_config::*;
}

pub use async_trait;
pub use reqwest;

/// Error type of the builder and the binary entry point
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Entry point for discovery and transfers
///
/// Holds no per-call state: every discovery call builds its association from
/// scratch and hands it back to the caller.
#[derive(Debug, Clone)]
pub struct TransferClient {
	discovery: DiscoveryService,
	info: TransferInfoService,
	transfers: TransferService,
}

impl TransferClient {
	pub fn builder() -> TransferClientBuilder {
		TransferClientBuilder::new()
	}

	/// Resolve the transfer server of every asset
	pub async fn fetch_transfer_servers(&self, assets: &[Asset]) -> AnchorResult<TransferServerCache> {
		self.discovery.build_cache(assets).await
	}

	/// Capability info for every asset of a discovery result
	pub async fn fetch_asset_transfer_infos(
		&self,
		cache: &TransferServerCache,
	) -> AnchorResult<AssetTransferInfos> {
		self.info.fetch_asset_transfer_infos(cache).await
	}

	/// Discovery followed by capability aggregation
	pub async fn discover(
		&self,
		assets: &[Asset],
	) -> AnchorResult<(TransferServerCache, AssetTransferInfos)> {
		let cache = self.fetch_transfer_servers(assets).await?;
		let infos = self.fetch_asset_transfer_infos(&cache).await?;
		Ok((cache, infos))
	}

	pub async fn open_transfer_server(&self, domain: &str) -> AnchorResult<TransferServer> {
		self.discovery.open_transfer_server(domain).await
	}

	pub async fn deposit(&self, request: &DepositRequest) -> AnchorResult<DepositResult> {
		self.transfers.deposit(request).await
	}

	pub async fn withdraw(&self, request: &WithdrawalRequest) -> AnchorResult<WithdrawalResult> {
		self.transfers.withdraw(request).await
	}

	pub async fn fetch_transaction(
		&self,
		server: &TransferServer,
		id: &str,
	) -> AnchorResult<TransferTransaction> {
		self.transfers.fetch_transaction(server, id).await
	}

	pub async fn fetch_transactions(
		&self,
		server: &TransferServer,
		asset_code: &str,
		limit: Option<u32>,
	) -> AnchorResult<Vec<TransferTransaction>> {
		self.transfers
			.fetch_transactions(server, asset_code, limit)
			.await
	}

	/// Server-level defaults merged into requests
	pub fn options(&self) -> &TransferOptions {
		self.discovery.options()
	}
}

/// Builder pattern for configuring the transfer client
///
/// Collaborators that are not injected are backed by the HTTP adapters,
/// configured from the settings.
#[derive(Default)]
pub struct TransferClientBuilder {
	settings: Option<Settings>,
	ledger: Option<Arc<dyn AccountLedger>>,
	domain_resolver: Option<Arc<dyn DomainConfigResolver>>,
	transfer_client: Option<Arc<dyn TransferServerClient>>,
	auth: Option<AuthToken>,
}

impl TransferClientBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_settings(mut self, settings: Settings) -> Self {
		self.settings = Some(settings);
		self
	}

	pub fn with_ledger(mut self, ledger: Arc<dyn AccountLedger>) -> Self {
		self.ledger = Some(ledger);
		self
	}

	pub fn with_domain_resolver(mut self, resolver: Arc<dyn DomainConfigResolver>) -> Self {
		self.domain_resolver = Some(resolver);
		self
	}

	pub fn with_transfer_client(mut self, client: Arc<dyn TransferServerClient>) -> Self {
		self.transfer_client = Some(client);
		self
	}

	/// Bearer token for transfer servers; takes precedence over the configured one
	pub fn with_auth(mut self, token: AuthToken) -> Self {
		self.auth = Some(token);
		self
	}

	pub fn settings(&self) -> Option<&Settings> {
		self.settings.as_ref()
	}

	/// Install a global tracing subscriber as configured in the logging settings
	///
	/// `RUST_LOG` overrides the configured level.
	pub fn init_tracing_from_settings(&self) -> Result<(), BoxError> {
		let default_settings = Settings::default();
		let settings = self.settings.as_ref().unwrap_or(&default_settings);

		let log_level = &settings.logging.level;
		let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
			.unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));

		match settings.logging.format {
			LogFormat::Json => {
				let subscriber = tracing_subscriber::fmt().json().with_env_filter(env_filter);

				if settings.logging.structured {
					subscriber.with_target(true).with_thread_ids(true).try_init()
				} else {
					subscriber.try_init()
				}
			},
			LogFormat::Pretty => {
				let subscriber = tracing_subscriber::fmt()
					.pretty()
					.with_env_filter(env_filter);

				if settings.logging.structured {
					subscriber.with_target(true).with_thread_ids(true).try_init()
				} else {
					subscriber.try_init()
				}
			},
			LogFormat::Compact => {
				let subscriber = tracing_subscriber::fmt()
					.compact()
					.with_env_filter(env_filter);

				if settings.logging.structured {
					subscriber.with_target(true).with_thread_ids(true).try_init()
				} else {
					subscriber.try_init()
				}
			},
		}
	}

	pub fn build(self) -> Result<TransferClient, BoxError> {
		let settings = self.settings.unwrap_or_default();
		settings.validate()?;

		let adapters = HttpAdapters::new(&settings.network.horizon_url, settings.timeouts.request_ms)?
			.allow_http_domains(!settings.network.https_domains);

		let ledger = self
			.ledger
			.unwrap_or_else(|| Arc::new(adapters.ledger.clone()));
		let domain_resolver = self
			.domain_resolver
			.unwrap_or_else(|| Arc::new(adapters.domain_resolver.clone()));
		let transfer_client = self
			.transfer_client
			.unwrap_or_else(|| Arc::new(adapters.transfer_client.clone()));

		let auth = match self.auth {
			Some(token) => Some(token),
			None => settings.auth_token()?,
		};

		let discovery = DiscoveryService::new(
			IssuerResolver::new(ledger, domain_resolver),
			settings.transfer_options(),
		);

		Ok(TransferClient {
			discovery,
			info: TransferInfoService::new(transfer_client.clone()).with_auth(auth.clone()),
			transfers: TransferService::new(transfer_client).with_auth(auth),
		})
	}
}

/// Load settings, discover the configured assets and log what each anchor supports
pub async fn run_from_config() -> Result<(), BoxError> {
	dotenvy::dotenv().ok();

	let settings = load_config()?;
	let builder = TransferClientBuilder::new().with_settings(settings.clone());
	builder.init_tracing_from_settings()?;
	log_service_info(&settings);

	let client = builder.build()?;
	let assets = settings.configured_assets();
	if assets.is_empty() {
		warn!("No assets configured, nothing to discover");
		return Ok(());
	}

	let (cache, infos) = client.discover(&assets).await?;

	for (asset, info) in infos.iter() {
		let server = cache
			.get(asset)
			.map(|server| server.url_str().to_string())
			.unwrap_or_else(|| "no transfer server".to_string());

		info!(
			"{} -> {} | deposit: {} (fee {:?} + {:?}%, min {:?}, max {:?}) | withdraw: {} (fee {:?} + {:?}%, min {:?}, max {:?})",
			asset,
			server,
			info.can_deposit(),
			info.deposit.as_ref().and_then(|d| d.fee_fixed),
			info.deposit.as_ref().and_then(|d| d.fee_percent),
			info.deposit.as_ref().and_then(|d| d.min_amount),
			info.deposit.as_ref().and_then(|d| d.max_amount),
			info.can_withdraw(),
			info.withdraw.as_ref().and_then(|w| w.fee_fixed),
			info.withdraw.as_ref().and_then(|w| w.fee_percent),
			info.withdraw.as_ref().and_then(|w| w.min_amount),
			info.withdraw.as_ref().and_then(|w| w.max_amount),
		);
	}

	log_discovery_complete(
		cache.len(),
		cache.servers().len(),
		infos.iter().filter(|(_, info)| !info.is_empty()).count(),
		cache.failures().len() + infos.failures().len(),
	);

	Ok(())
}
