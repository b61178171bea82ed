//! Fetches and parses a domain's `stellar.toml`

use anchor_types::{AnchorError, AnchorResult, DomainConfig, DomainConfigResolver, DOMAIN_CONFIG_PATH};
use async_trait::async_trait;
use tracing::debug;
use url::Url;

use crate::client_cache::ClientCache;
use crate::transfer_client::DEFAULT_TIMEOUT_MS;

/// Largest document accepted from a domain
pub const MAX_DOMAIN_CONFIG_BYTES: usize = 100 * 1024;

/// Resolves `https://{domain}/.well-known/stellar.toml`
#[derive(Debug, Clone)]
pub struct StellarTomlResolver {
	cache: ClientCache,
	timeout_ms: u64,
	allow_http: bool,
}

impl StellarTomlResolver {
	pub fn new() -> Self {
		Self::with_cache(ClientCache::new(), DEFAULT_TIMEOUT_MS)
	}

	pub fn with_cache(cache: ClientCache, timeout_ms: u64) -> Self {
		Self {
			cache,
			timeout_ms,
			allow_http: false,
		}
	}

	/// Fetch over plain http; only meant for local test networks
	pub fn allow_http(mut self, allow_http: bool) -> Self {
		self.allow_http = allow_http;
		self
	}

	fn document_url(&self, domain: &str) -> AnchorResult<Url> {
		let scheme = if self.allow_http { "http" } else { "https" };
		let raw = format!("{}://{}{}", scheme, domain, DOMAIN_CONFIG_PATH);
		Url::parse(&raw).map_err(|e| AnchorError::DomainConfig {
			domain: domain.to_string(),
			reason: format!("invalid domain: {}", e),
		})
	}
}

impl Default for StellarTomlResolver {
	fn default() -> Self {
		Self::new()
	}
}

#[async_trait]
impl DomainConfigResolver for StellarTomlResolver {
	async fn resolve(&self, domain: &str) -> AnchorResult<DomainConfig> {
		let url = self.document_url(domain)?;
		let client = self.cache.client_for_url(&url, self.timeout_ms)?;
		let failed = |reason: String| AnchorError::DomainConfig {
			domain: domain.to_string(),
			reason,
		};

		debug!("Fetching domain configuration from {}", url);
		let mut response = client
			.get(url)
			.send()
			.await
			.map_err(|e| failed(e.to_string()))?;

		let status = response.status();
		if !status.is_success() {
			return Err(failed(format!("status {}", status.as_u16())));
		}

		let too_large = |size: u64| {
			failed(format!(
				"document exceeds {} bytes (at least {})",
				MAX_DOMAIN_CONFIG_BYTES, size
			))
		};
		if let Some(length) = response.content_length() {
			if length > MAX_DOMAIN_CONFIG_BYTES as u64 {
				return Err(too_large(length));
			}
		}

		// Content-Length may be absent or wrong; the running total is authoritative
		let mut body = Vec::new();
		while let Some(chunk) = response.chunk().await.map_err(|e| failed(e.to_string()))? {
			body.extend_from_slice(&chunk);
			if body.len() > MAX_DOMAIN_CONFIG_BYTES {
				return Err(too_large(body.len() as u64));
			}
		}

		let document =
			String::from_utf8(body).map_err(|e| failed(format!("document is not UTF-8: {}", e)))?;
		DomainConfig::from_toml(domain, &document)
	}
}
