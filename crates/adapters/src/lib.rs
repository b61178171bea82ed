//! Anchor Adapters
//!
//! HTTP implementations of the ledger, domain configuration and transfer
//! server collaborators.

pub mod client_cache;
pub mod horizon;
pub mod stellar_toml;
pub mod transfer_client;

pub use anchor_types::{
	AccountLedger, AnchorError, AnchorResult, DomainConfigResolver, TransferServerClient,
};
pub use client_cache::{ClientCache, ClientConfig};
pub use horizon::{HorizonLedger, PUBLIC_HORIZON_URL, TESTNET_HORIZON_URL};
pub use stellar_toml::StellarTomlResolver;
pub use transfer_client::{HttpTransferClient, DEFAULT_TIMEOUT_MS};

/// The three HTTP collaborators sharing one connection pool
#[derive(Debug, Clone)]
pub struct HttpAdapters {
	pub ledger: HorizonLedger,
	pub domain_resolver: StellarTomlResolver,
	pub transfer_client: HttpTransferClient,
}

impl HttpAdapters {
	pub fn new(horizon_url: &str, timeout_ms: u64) -> AnchorResult<Self> {
		let cache = ClientCache::new();
		Ok(Self {
			ledger: HorizonLedger::with_cache(horizon_url, cache.clone(), timeout_ms)?,
			domain_resolver: StellarTomlResolver::with_cache(cache.clone(), timeout_ms),
			transfer_client: HttpTransferClient::with_cache(cache, timeout_ms),
		})
	}

	/// Resolve domain configuration over plain http
	pub fn allow_http_domains(mut self, allow_http: bool) -> Self {
		self.domain_resolver = self.domain_resolver.allow_http(allow_http);
		self
	}
}
