//! HTTP client cache for anchor connections
//!
//! Provides per-host client instances with connection pooling and keep-alive.
//! Pools are transport state only: no anchor response is ever cached here.

use anchor_types::AnchorResult;
use dashmap::DashMap;
use reqwest::{Client, ClientBuilder};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;
use url::Url;

pub const DEFAULT_USER_AGENT: &str = concat!("anchor-transfer/", env!("CARGO_PKG_VERSION"));

/// Configuration for creating pooled HTTP clients
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClientConfig {
	/// `host[:port]` the client talks to
	pub host: String,
	/// Whole-request timeout
	pub timeout_ms: u64,
	/// Maximum number of idle connections per host
	pub max_idle_per_host: usize,
	/// Connection keep-alive timeout
	pub keep_alive_timeout_ms: u64,
	pub user_agent: String,
}

impl ClientConfig {
	pub fn for_host(host: impl Into<String>, timeout_ms: u64) -> Self {
		Self {
			host: host.into(),
			timeout_ms,
			max_idle_per_host: 10,
			keep_alive_timeout_ms: 90_000,
			user_agent: DEFAULT_USER_AGENT.to_string(),
		}
	}

	pub fn for_url(url: &Url, timeout_ms: u64) -> Self {
		let host = match (url.host_str(), url.port()) {
			(Some(host), Some(port)) => format!("{}:{}", host, port),
			(Some(host), None) => host.to_string(),
			(None, _) => url.as_str().to_string(),
		};
		Self::for_host(host, timeout_ms)
	}
}

/// Cached client with creation timestamp for TTL management
#[derive(Debug, Clone)]
struct CachedClient {
	client: Arc<Client>,
	created_at: Instant,
}

impl CachedClient {
	fn new(client: Client) -> Self {
		Self {
			client: Arc::new(client),
			created_at: Instant::now(),
		}
	}

	fn is_expired(&self, ttl: Duration) -> bool {
		self.created_at.elapsed() > ttl
	}
}

/// Thread-safe cache of HTTP clients keyed by host configuration, with TTL
#[derive(Clone, Debug)]
pub struct ClientCache {
	clients: Arc<DashMap<ClientConfig, CachedClient>>,
	ttl: Duration,
}

impl ClientCache {
	/// Create a new client cache with default 30-minute TTL
	pub fn new() -> Self {
		Self::with_ttl(Duration::from_secs(30 * 60))
	}

	pub fn with_ttl(ttl: Duration) -> Self {
		Self {
			clients: Arc::new(DashMap::new()),
			ttl,
		}
	}

	/// Get or create a pooled client for the given configuration
	///
	/// Expired clients of every host are dropped first.
	pub fn get_client(&self, config: &ClientConfig) -> AnchorResult<Arc<Client>> {
		self.prune_expired();

		if let Some(cached_client_ref) = self.clients.get(config) {
			let cached_client = cached_client_ref.value();
			debug!(
				"Reusing cached client for {} (age: {:?})",
				config.host,
				cached_client.created_at.elapsed()
			);
			return Ok(cached_client.client.clone());
		}

		debug!("Creating new client for {}", config.host);
		let cached_client = CachedClient::new(Self::create_client(config)?);
		let client_arc = cached_client.client.clone();

		use dashmap::mapref::entry::Entry;

		match self.clients.entry(config.clone()) {
			Entry::Occupied(entry) => {
				// Another task raced us here; keep the first client
				return Ok(entry.get().client.clone());
			},
			Entry::Vacant(entry) => {
				entry.insert(cached_client);
			},
		}

		Ok(client_arc)
	}

	/// Client for whatever host `url` points at
	pub fn client_for_url(&self, url: &Url, timeout_ms: u64) -> AnchorResult<Arc<Client>> {
		self.get_client(&ClientConfig::for_url(url, timeout_ms))
	}

	fn create_client(config: &ClientConfig) -> AnchorResult<Client> {
		let client = ClientBuilder::new()
			.timeout(Duration::from_millis(config.timeout_ms))
			.pool_max_idle_per_host(config.max_idle_per_host)
			.pool_idle_timeout(Duration::from_millis(config.keep_alive_timeout_ms))
			.tcp_keepalive(Duration::from_secs(60))
			.user_agent(config.user_agent.clone())
			.build()?;
		Ok(client)
	}

	fn prune_expired(&self) -> usize {
		let mut removed_count = 0;

		self.clients.retain(|config, cached_client| {
			let is_expired = cached_client.is_expired(self.ttl);
			if is_expired {
				removed_count += 1;
				debug!(
					"Client cache expired for {} (age: {:?}), dropping pooled client",
					config.host,
					cached_client.created_at.elapsed()
				);
			}
			!is_expired
		});

		if removed_count > 0 {
			debug!("Pruned {} expired clients from cache", removed_count);
		}

		removed_count
	}
}

impl Default for ClientCache {
	fn default() -> Self {
		Self::new()
	}
}
