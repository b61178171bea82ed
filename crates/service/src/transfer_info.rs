//! Capability info aggregation across discovered transfer servers

use anchor_types::{
	AnchorError, AnchorResult, Asset, AssetTransferInfo, AuthToken, TransferInfo,
	TransferServer, TransferServerClient,
};
use indexmap::IndexMap;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

use crate::discovery::TransferServerCache;
use crate::failures::{apply_partial_failure_policy, ItemFailure};
use crate::mapper::ordered_concurrent_map;

/// Asset -> capability info association produced by one aggregation call
///
/// Every asset of the input cache has an entry; assets with nothing to report
/// carry the empty record.
#[derive(Debug, Default)]
pub struct AssetTransferInfos {
	entries: IndexMap<Asset, AssetTransferInfo>,
	failures: Vec<ItemFailure>,
}

impl AssetTransferInfos {
	pub fn get(&self, asset: &Asset) -> Option<&AssetTransferInfo> {
		self.entries.get(asset)
	}

	pub fn iter(&self) -> impl Iterator<Item = (&Asset, &AssetTransferInfo)> {
		self.entries.iter()
	}

	/// `/info` fetches that failed but did not abort the batch, keyed by server URL
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

/// Fetches `/info` once per distinct transfer server
#[derive(Debug, Clone)]
pub struct TransferInfoService {
	client: Arc<dyn TransferServerClient>,
	auth: Option<AuthToken>,
}

impl TransferInfoService {
	pub fn new(client: Arc<dyn TransferServerClient>) -> Self {
		Self { client, auth: None }
	}

	/// Send `token` with every `/info` request; anonymous by default
	pub fn with_auth(mut self, token: Option<AuthToken>) -> Self {
		self.auth = token;
		self
	}

	/// Capability info of every asset in `cache`
	///
	/// Fails with [`AnchorError::AllFetchesFailed`] only when every distinct
	/// server failed; otherwise failed servers yield empty records.
	pub async fn fetch_asset_transfer_infos(
		&self,
		cache: &TransferServerCache,
	) -> AnchorResult<AssetTransferInfos> {
		let servers: IndexMap<String, Arc<TransferServer>> = cache
			.servers()
			.into_iter()
			.map(|server| (server.url_str().to_string(), server))
			.collect();
		let urls: Vec<String> = servers.keys().cloned().collect();

		info!(
			"Fetching transfer info from {} servers for {} assets",
			urls.len(),
			cache.len()
		);

		let client = &self.client;
		let auth = self.auth.as_ref();
		let servers_ref = &servers;
		let outcomes = ordered_concurrent_map(urls.clone(), |url| async move {
			let server = servers_ref.get(&url)?;
			Some(client.fetch_info(server, auth).await)
		})
		.await;

		let (fetched, failures) =
			apply_partial_failure_policy(outcomes, urls.len(), |count, source| {
				AnchorError::AllFetchesFailed {
					count,
					source: Box::new(source),
				}
			})?;

		let infos: HashMap<String, Arc<TransferInfo>> = fetched
			.into_iter()
			.map(|(url, info)| (url, Arc::new(info)))
			.collect();

		let entries = cache
			.iter()
			.map(|(asset, server)| {
				let info = server
					.and_then(|server| infos.get(server.url_str()))
					.map(|info| AssetTransferInfo::for_code(info.clone(), asset.code()))
					.unwrap_or_else(AssetTransferInfo::empty);
				(asset.clone(), info)
			})
			.collect::<IndexMap<_, _>>();

		let result = AssetTransferInfos { entries, failures };
		info!(
			"Collected transfer info for {} of {} assets ({} server failures tolerated)",
			result.iter().filter(|(_, info)| !info.is_empty()).count(),
			result.len(),
			result.failures().len()
		);

		Ok(result)
	}
}
