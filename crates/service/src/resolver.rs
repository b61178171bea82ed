//! Issuer to transfer server resolution

use anchor_types::{AccountLedger, AnchorError, AnchorResult, DomainConfig, DomainConfigResolver};
use std::sync::Arc;
use tracing::debug;
use url::Url;

/// Transfer server declared by an issuer's home domain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTransferServer {
	pub url: String,
	pub domain: String,
}

/// Walks issuer account -> home domain -> domain configuration -> transfer server
#[derive(Debug, Clone)]
pub struct IssuerResolver {
	ledger: Arc<dyn AccountLedger>,
	domains: Arc<dyn DomainConfigResolver>,
}

impl IssuerResolver {
	pub fn new(ledger: Arc<dyn AccountLedger>, domains: Arc<dyn DomainConfigResolver>) -> Self {
		Self { ledger, domains }
	}

	/// Resolve the transfer server of `issuer`
	///
	/// `Ok(None)` means the issuer declares no anchor: it has no home domain, or
	/// its domain declares no transfer server. Lookup failures are errors.
	pub async fn resolve(&self, issuer: &str) -> AnchorResult<Option<ResolvedTransferServer>> {
		let Some(domain) = self.ledger.load_home_domain(issuer).await? else {
			debug!("Issuer {} declares no home domain", issuer);
			return Ok(None);
		};

		let config = self.domains.resolve(&domain).await?;
		let Some(url) = config.transfer_server_url() else {
			debug!("Domain {} of issuer {} declares no transfer server", domain, issuer);
			return Ok(None);
		};

		validate_server_url(url)?;
		debug!("Issuer {} resolved to {} via {}", issuer, url, domain);

		Ok(Some(ResolvedTransferServer {
			url: url.to_string(),
			domain,
		}))
	}

	/// Configuration document published by `domain`
	pub async fn resolve_domain(&self, domain: &str) -> AnchorResult<DomainConfig> {
		self.domains.resolve(domain).await
	}
}

fn validate_server_url(url: &str) -> AnchorResult<()> {
	let parsed = Url::parse(url).map_err(|e| AnchorError::InvalidUrl {
		url: url.to_string(),
		reason: e.to_string(),
	})?;

	match parsed.scheme() {
		"http" | "https" => Ok(()),
		scheme => Err(AnchorError::InvalidUrl {
			url: url.to_string(),
			reason: format!("unsupported scheme '{}'", scheme),
		}),
	}
}
