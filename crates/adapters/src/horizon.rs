//! Horizon-backed issuer account lookup

use anchor_types::{AccountLedger, AnchorError, AnchorResult};
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use serde::Deserialize;
use tracing::debug;
use url::Url;

use crate::client_cache::ClientCache;
use crate::transfer_client::DEFAULT_TIMEOUT_MS;

pub const PUBLIC_HORIZON_URL: &str = "https://horizon.stellar.org";
pub const TESTNET_HORIZON_URL: &str = "https://horizon-testnet.stellar.org";

/// The slice of a Horizon account record this client reads
#[derive(Debug, Deserialize)]
struct HorizonAccount {
	#[serde(default)]
	home_domain: Option<String>,
}

/// Loads issuer accounts from a Horizon server
#[derive(Debug, Clone)]
pub struct HorizonLedger {
	horizon_url: Url,
	cache: ClientCache,
	timeout_ms: u64,
}

impl HorizonLedger {
	pub fn new(horizon_url: &str) -> AnchorResult<Self> {
		Self::with_cache(horizon_url, ClientCache::new(), DEFAULT_TIMEOUT_MS)
	}

	pub fn with_cache(horizon_url: &str, cache: ClientCache, timeout_ms: u64) -> AnchorResult<Self> {
		let mut url = Url::parse(horizon_url).map_err(|e| AnchorError::InvalidUrl {
			url: horizon_url.to_string(),
			reason: e.to_string(),
		})?;
		if !url.path().ends_with('/') {
			let with_slash = format!("{}/", url.path());
			url.set_path(&with_slash);
		}

		Ok(Self {
			horizon_url: url,
			cache,
			timeout_ms,
		})
	}

	pub fn horizon_url(&self) -> &Url {
		&self.horizon_url
	}

	fn account_url(&self, issuer: &str) -> AnchorResult<Url> {
		self.horizon_url
			.join(&format!("accounts/{}", issuer))
			.map_err(|e| AnchorError::InvalidUrl {
				url: format!("{}accounts/{}", self.horizon_url, issuer),
				reason: e.to_string(),
			})
	}
}

#[async_trait]
impl AccountLedger for HorizonLedger {
	async fn load_home_domain(&self, issuer: &str) -> AnchorResult<Option<String>> {
		let url = self.account_url(issuer)?;
		let client = self.cache.client_for_url(&url, self.timeout_ms)?;

		debug!("Loading issuer account {}", issuer);
		let response = client
			.get(url)
			.header(ACCEPT, "application/json")
			.send()
			.await
			.map_err(|e| AnchorError::Ledger {
				issuer: issuer.to_string(),
				reason: e.to_string(),
			})?;

		let status = response.status();
		if status.as_u16() == 404 {
			return Err(AnchorError::Ledger {
				issuer: issuer.to_string(),
				reason: "account not found".to_string(),
			});
		}
		if !status.is_success() {
			return Err(AnchorError::Ledger {
				issuer: issuer.to_string(),
				reason: format!("horizon returned status {}", status.as_u16()),
			});
		}

		let account: HorizonAccount = response.json().await.map_err(|e| AnchorError::Ledger {
			issuer: issuer.to_string(),
			reason: format!("malformed account record: {}", e),
		})?;

		Ok(account
			.home_domain
			.map(|domain| domain.trim().to_string())
			.filter(|domain| !domain.is_empty()))
	}
}
