//! Transfer server handles
//!
//! A `TransferServer` is the resolved deposit/withdrawal endpoint of one anchor.
//! It is a plain value: the HTTP operations against it live on
//! [`TransferServerClient`](crate::adapters::TransferServerClient), which takes
//! the server explicitly.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::{AnchorError, AnchorResult, Asset};

/// Server-level defaults merged into every request sent to a transfer server
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TransferOptions {
	/// ISO 639-1 language code anchors should use for messages and hosted pages
	pub lang: Option<String>,
	/// Wallet name anchors display when referring to the wallet
	pub wallet_name: Option<String>,
	/// Wallet URL anchors may link to
	pub wallet_url: Option<String>,
}

impl TransferOptions {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_lang(mut self, lang: impl Into<String>) -> Self {
		self.lang = Some(lang.into());
		self
	}

	pub fn with_wallet(mut self, name: impl Into<String>, url: impl Into<String>) -> Self {
		self.wallet_name = Some(name.into());
		self.wallet_url = Some(url.into());
		self
	}

	/// Defaults as request fields; unset options are left out
	pub fn as_fields(&self) -> Vec<(&'static str, String)> {
		[
			("lang", &self.lang),
			("wallet_name", &self.wallet_name),
			("wallet_url", &self.wallet_url),
		]
		.into_iter()
		.filter_map(|(key, value)| value.as_ref().map(|v| (key, v.clone())))
		.collect()
	}
}

/// A resolved transfer server endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TransferServer {
	url: Url,
	domain: String,
	options: TransferOptions,
	/// Assets the owning domain declares, when known
	assets: Vec<Asset>,
}

impl TransferServer {
	/// Create a handle for the transfer server at `url`, owned by `domain`
	pub fn new(url: &str, domain: impl Into<String>, options: TransferOptions) -> AnchorResult<Self> {
		let parsed = Url::parse(url).map_err(|e| AnchorError::InvalidUrl {
			url: url.to_string(),
			reason: e.to_string(),
		})?;

		if !matches!(parsed.scheme(), "http" | "https") {
			return Err(AnchorError::InvalidUrl {
				url: url.to_string(),
				reason: format!("unsupported scheme '{}'", parsed.scheme()),
			});
		}

		Ok(Self {
			url: parsed,
			domain: domain.into(),
			options,
			assets: Vec::new(),
		})
	}

	pub fn with_assets(mut self, assets: Vec<Asset>) -> Self {
		self.assets = assets;
		self
	}

	pub fn url(&self) -> &Url {
		&self.url
	}

	/// Parsed base URL (an empty path becomes `/`), used as the dedup key
	pub fn url_str(&self) -> &str {
		self.url.as_str()
	}

	pub fn domain(&self) -> &str {
		&self.domain
	}

	pub fn options(&self) -> &TransferOptions {
		&self.options
	}

	pub fn assets(&self) -> &[Asset] {
		&self.assets
	}

	/// Resolve `path` relative to the base URL, keeping any base path prefix
	pub fn endpoint(&self, path: &str) -> AnchorResult<Url> {
		let mut base = self.url.clone();
		if !base.path().ends_with('/') {
			let with_slash = format!("{}/", base.path());
			base.set_path(&with_slash);
		}

		base.join(path.trim_start_matches('/'))
			.map_err(|e| AnchorError::InvalidUrl {
				url: format!("{}{}", base, path),
				reason: e.to_string(),
			})
	}
}
