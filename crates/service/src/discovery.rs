//! Transfer server discovery for a batch of assets

use anchor_types::{AnchorError, AnchorResult, Asset, TransferOptions, TransferServer};
use indexmap::{IndexMap, IndexSet};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::failures::{apply_partial_failure_policy, ItemFailure};
use crate::mapper::ordered_concurrent_map;
use crate::resolver::{IssuerResolver, ResolvedTransferServer};

/// Asset -> transfer server association produced by one discovery call
///
/// Assets whose issuer declares no anchor, or whose resolution failed and was
/// tolerated, map to `None`.
#[derive(Debug, Default)]
pub struct TransferServerCache {
	entries: IndexMap<Asset, Option<Arc<TransferServer>>>,
	failures: Vec<ItemFailure>,
}

impl TransferServerCache {
	pub fn get(&self, asset: &Asset) -> Option<&Arc<TransferServer>> {
		self.entries.get(asset).and_then(Option::as_ref)
	}

	pub fn contains(&self, asset: &Asset) -> bool {
		self.entries.contains_key(asset)
	}

	/// Entries in the order the assets were passed in
	pub fn iter(&self) -> impl Iterator<Item = (&Asset, Option<&Arc<TransferServer>>)> {
		self.entries
			.iter()
			.map(|(asset, server)| (asset, server.as_ref()))
	}

	pub fn assets(&self) -> impl Iterator<Item = &Asset> {
		self.entries.keys()
	}

	/// Distinct servers, in order of first appearance
	pub fn servers(&self) -> Vec<Arc<TransferServer>> {
		self.entries
			.values()
			.flatten()
			.map(|server| (server.url_str(), server))
			.collect::<IndexMap<_, _>>()
			.into_values()
			.cloned()
			.collect()
	}

	/// Issuer resolutions that failed but did not abort the batch
	pub fn failures(&self) -> &[ItemFailure] {
		&self.failures
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}

/// Builds [`TransferServerCache`] values
#[derive(Debug, Clone)]
pub struct DiscoveryService {
	resolver: IssuerResolver,
	options: TransferOptions,
}

impl DiscoveryService {
	pub fn new(resolver: IssuerResolver, options: TransferOptions) -> Self {
		Self { resolver, options }
	}

	pub fn resolver(&self) -> &IssuerResolver {
		&self.resolver
	}

	pub fn options(&self) -> &TransferOptions {
		&self.options
	}

	/// Transfer server declared by `domain`, listing the currencies it publishes
	pub async fn open_transfer_server(&self, domain: &str) -> AnchorResult<TransferServer> {
		let config = self.resolver.resolve_domain(domain).await?;
		let url = config
			.transfer_server_url()
			.ok_or_else(|| AnchorError::ServerDiscovery {
				target: domain.to_string(),
				reason: "domain declares no TRANSFER_SERVER".to_string(),
			})?;

		let server =
			TransferServer::new(url, domain, self.options.clone())?.with_assets(config.assets());
		debug!(
			"Opened transfer server {} for {} ({} assets)",
			server.url(),
			domain,
			server.assets().len()
		);
		Ok(server)
	}

	/// Resolve the transfer server of every asset, once per distinct issuer
	///
	/// Fails with [`AnchorError::AssetNotIssued`] before any lookup if a native
	/// asset is present, and with [`AnchorError::AllResolutionsFailed`] when
	/// every issuer lookup failed.
	pub async fn build_cache(&self, assets: &[Asset]) -> AnchorResult<TransferServerCache> {
		let mut issuers = IndexSet::new();
		for asset in assets {
			issuers.insert(asset.require_issuer()?.to_string());
		}
		let issuers: Vec<String> = issuers.into_iter().collect();

		info!(
			"Resolving transfer servers for {} assets across {} issuers",
			assets.len(),
			issuers.len()
		);

		let resolver = &self.resolver;
		let outcomes = ordered_concurrent_map(issuers.clone(), |issuer| async move {
			match resolver.resolve(&issuer).await {
				Ok(None) => None,
				Ok(Some(resolved)) => Some(Ok(resolved)),
				Err(e) => Some(Err(e)),
			}
		})
		.await;

		let (resolved, mut failures) =
			apply_partial_failure_policy(outcomes, issuers.len(), |count, source| {
				AnchorError::AllResolutionsFailed {
					count,
					source: Box::new(source),
				}
			})?;

		let (servers_by_issuer, build_failures) = self.build_servers(resolved);
		failures.extend(build_failures);

		let entries = assets
			.iter()
			.map(|asset| {
				let server = asset
					.issuer()
					.and_then(|issuer| servers_by_issuer.get(issuer))
					.cloned();
				(asset.clone(), server)
			})
			.collect::<IndexMap<_, _>>();

		let cache = TransferServerCache { entries, failures };
		info!(
			"Discovered {} transfer servers for {} assets ({} issuer failures tolerated)",
			cache.servers().len(),
			cache.len(),
			cache.failures().len()
		);

		Ok(cache)
	}

	/// One handle per distinct URL, shared by every issuer that declared it
	///
	/// URLs are compared after parsing, so `https://a.example.com` and
	/// `https://a.example.com/` share a handle.
	fn build_servers(
		&self,
		resolved: IndexMap<String, ResolvedTransferServer>,
	) -> (HashMap<String, Arc<TransferServer>>, Vec<ItemFailure>) {
		let mut by_url: HashMap<String, Arc<TransferServer>> = HashMap::new();
		let mut by_issuer = HashMap::new();
		let mut failures = Vec::new();

		for (issuer, resolved) in resolved {
			let server =
				match TransferServer::new(&resolved.url, resolved.domain, self.options.clone()) {
					Ok(server) => server,
					Err(error) => {
						warn!("Tolerating failure for {}: {}", issuer, error);
						failures.push(ItemFailure { key: issuer, error });
						continue;
					},
				};

			let server = match by_url.get(server.url_str()) {
				Some(shared) => {
					debug!("Issuer {} shares transfer server {}", issuer, shared.url());
					shared.clone()
				},
				None => {
					let server = Arc::new(server);
					by_url.insert(server.url_str().to_string(), server.clone());
					server
				},
			};
			by_issuer.insert(issuer, server);
		}

		(by_issuer, failures)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use anchor_types::test_utils::{MockDomainResolver, MockLedger};

	const ANCHOR_URL: &str = "https://anchor.example.com/sep6";

	fn service(ledger: MockLedger, domains: MockDomainResolver) -> DiscoveryService {
		DiscoveryService::new(
			IssuerResolver::new(Arc::new(ledger), Arc::new(domains)),
			TransferOptions::default(),
		)
	}

	#[tokio::test]
	async fn test_assets_sharing_an_issuer_resolve_once() {
		let ledger = MockLedger::new().with_home_domain("GISSUER", "anchor.example.com");
		let domains = MockDomainResolver::new().with_transfer_server("anchor.example.com", ANCHOR_URL);
		let discovery = service(ledger.clone(), domains.clone());

		let assets = vec![
			Asset::issued("USD", "GISSUER"),
			Asset::issued("EUR", "GISSUER"),
			Asset::issued("GBP", "GISSUER"),
		];
		let cache = discovery.build_cache(&assets).await.unwrap();

		assert_eq!(ledger.calls().total(), 1);
		assert_eq!(domains.calls().total(), 1);
		assert_eq!(cache.len(), 3);

		let usd = cache.get(&assets[0]).unwrap();
		let gbp = cache.get(&assets[2]).unwrap();
		assert!(Arc::ptr_eq(usd, gbp));
	}

	#[tokio::test]
	async fn test_issuers_sharing_a_url_share_one_handle() {
		let discovery = service(
			MockLedger::new()
				.with_home_domain("GONE", "one.example.com")
				.with_home_domain("GTWO", "two.example.com"),
			MockDomainResolver::new()
				.with_transfer_server("one.example.com", ANCHOR_URL)
				.with_transfer_server("two.example.com", ANCHOR_URL),
		);

		let assets = vec![Asset::issued("USD", "GONE"), Asset::issued("EUR", "GTWO")];
		let cache = discovery.build_cache(&assets).await.unwrap();

		assert_eq!(cache.servers().len(), 1);
		assert!(Arc::ptr_eq(
			cache.get(&assets[0]).unwrap(),
			cache.get(&assets[1]).unwrap()
		));
		assert_eq!(cache.servers()[0].domain(), "one.example.com");
	}

	#[tokio::test]
	async fn test_trailing_slash_variants_share_one_handle() {
		let discovery = service(
			MockLedger::new()
				.with_home_domain("GBARE", "bare.example.com")
				.with_home_domain("GSLASH", "slash.example.com"),
			MockDomainResolver::new()
				.with_transfer_server("bare.example.com", "https://anchor.example.com")
				.with_transfer_server("slash.example.com", "https://anchor.example.com/"),
		);

		let assets = vec![Asset::issued("USD", "GBARE"), Asset::issued("EUR", "GSLASH")];
		let cache = discovery.build_cache(&assets).await.unwrap();

		let bare = cache.get(&assets[0]).unwrap();
		let slash = cache.get(&assets[1]).unwrap();
		assert!(Arc::ptr_eq(bare, slash));
		assert_eq!(bare.url_str(), "https://anchor.example.com/");
		assert_eq!(cache.servers().len(), 1);
		assert_eq!(bare.domain(), "bare.example.com");
	}

	#[tokio::test]
	async fn test_one_failing_issuer_is_tolerated() {
		let discovery = service(
			MockLedger::new()
				.with_home_domain("GA", "a.example.com")
				.failing("GB")
				.with_home_domain("GC", "c.example.com"),
			MockDomainResolver::new()
				.with_transfer_server("a.example.com", "https://a.example.com")
				.with_transfer_server("c.example.com", "https://c.example.com"),
		);

		let assets = vec![
			Asset::issued("AAA", "GA"),
			Asset::issued("BBB", "GB"),
			Asset::issued("CCC", "GC"),
		];
		let cache = discovery.build_cache(&assets).await.unwrap();

		assert!(cache.get(&assets[0]).is_some());
		assert!(cache.contains(&assets[1]));
		assert!(cache.get(&assets[1]).is_none());
		assert!(cache.get(&assets[2]).is_some());
		assert_eq!(cache.failures().len(), 1);
		assert_eq!(cache.failures()[0].key, "GB");
	}

	#[tokio::test]
	async fn test_all_issuers_failing_raises_first_error() {
		let discovery = service(
			MockLedger::new()
				.failing("GA")
				.failing("GB")
				.with_delay("GA", 30),
			MockDomainResolver::new(),
		);

		let assets = vec![Asset::issued("AAA", "GA"), Asset::issued("BBB", "GB")];
		let err = discovery.build_cache(&assets).await.unwrap_err();

		match err {
			AnchorError::AllResolutionsFailed { count, ref source } => {
				assert_eq!(count, 2);
				assert!(matches!(**source, AnchorError::Ledger { ref issuer, .. } if issuer == "GA"));
			},
			other => panic!("unexpected error: {:?}", other),
		}
	}

	#[tokio::test]
	async fn test_native_asset_fails_before_any_lookup() {
		let ledger = MockLedger::new().with_home_domain("GISSUER", "anchor.example.com");
		let discovery = service(ledger.clone(), MockDomainResolver::new());

		let assets = vec![Asset::issued("USD", "GISSUER"), Asset::native()];
		let err = discovery.build_cache(&assets).await.unwrap_err();

		assert!(matches!(err, AnchorError::AssetNotIssued { .. }));
		assert_eq!(ledger.calls().total(), 0);
	}

	#[tokio::test]
	async fn test_issuer_without_anchor_maps_to_none_without_failing() {
		let discovery = service(
			MockLedger::new().without_home_domain("GA"),
			MockDomainResolver::new(),
		);

		let assets = vec![Asset::issued("AAA", "GA")];
		let cache = discovery.build_cache(&assets).await.unwrap();

		assert!(cache.contains(&assets[0]));
		assert!(cache.get(&assets[0]).is_none());
		assert!(cache.failures().is_empty());
	}

	#[tokio::test]
	async fn test_cache_preserves_input_order() {
		let discovery = service(
			MockLedger::new()
				.with_home_domain("GSLOW", "slow.example.com")
				.with_delay("GSLOW", 50)
				.with_home_domain("GFAST", "fast.example.com"),
			MockDomainResolver::new()
				.with_transfer_server("slow.example.com", "https://slow.example.com")
				.with_transfer_server("fast.example.com", "https://fast.example.com"),
		);

		let assets = vec![Asset::issued("SLOW", "GSLOW"), Asset::issued("FAST", "GFAST")];
		let cache = discovery.build_cache(&assets).await.unwrap();

		assert_eq!(cache.assets().cloned().collect::<Vec<_>>(), assets);
		assert_eq!(
			cache
				.servers()
				.iter()
				.map(|server| server.domain().to_string())
				.collect::<Vec<_>>(),
			vec!["slow.example.com", "fast.example.com"]
		);
	}

	#[tokio::test]
	async fn test_open_transfer_server_by_domain() {
		let config = anchor_types::DomainConfig::from_toml(
			"anchor.example.com",
			r#"
TRANSFER_SERVER_SEP0024 = "https://anchor.example.com/sep24"

[[CURRENCIES]]
code = "USD"
issuer = "GISSUER"

[[CURRENCIES]]
code = "native"
"#,
		)
		.unwrap();
		let discovery = service(
			MockLedger::new(),
			MockDomainResolver::new().with_config("anchor.example.com", config),
		);

		let server = discovery
			.open_transfer_server("anchor.example.com")
			.await
			.unwrap();

		assert_eq!(server.url_str(), "https://anchor.example.com/sep24");
		assert_eq!(server.domain(), "anchor.example.com");
		assert_eq!(server.assets(), &[Asset::issued("USD", "GISSUER")]);
	}

	#[tokio::test]
	async fn test_open_transfer_server_without_declaration_fails() {
		let discovery = service(
			MockLedger::new(),
			MockDomainResolver::new()
				.with_config("plain.example.com", anchor_types::DomainConfig::default()),
		);

		let err = discovery
			.open_transfer_server("plain.example.com")
			.await
			.unwrap_err();

		assert!(matches!(err, AnchorError::ServerDiscovery { ref target, .. } if target == "plain.example.com"));
	}

	#[tokio::test]
	async fn test_empty_asset_list_yields_empty_cache() {
		let discovery = service(MockLedger::new(), MockDomainResolver::new());
		let cache = discovery.build_cache(&[]).await.unwrap();

		assert!(cache.is_empty());
	}
}
