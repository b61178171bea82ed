//! Domain configuration document (`stellar.toml`) published by an anchor

use serde::{Deserialize, Serialize};

use crate::{AnchorError, AnchorResult, Asset};

/// Well-known path of the configuration document on a home domain
pub const DOMAIN_CONFIG_PATH: &str = "/.well-known/stellar.toml";

/// The subset of an anchor's domain configuration this client reads
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DomainConfig {
	/// SEP-6 transfer server
	#[serde(rename = "TRANSFER_SERVER", default)]
	pub transfer_server: Option<String>,
	/// SEP-24 (interactive) transfer server
	#[serde(rename = "TRANSFER_SERVER_SEP0024", default)]
	pub transfer_server_sep0024: Option<String>,
	#[serde(rename = "WEB_AUTH_ENDPOINT", default)]
	pub web_auth_endpoint: Option<String>,
	#[serde(rename = "SIGNING_KEY", default)]
	pub signing_key: Option<String>,
	#[serde(rename = "NETWORK_PASSPHRASE", default)]
	pub network_passphrase: Option<String>,
	#[serde(rename = "CURRENCIES", default)]
	pub currencies: Vec<CurrencyEntry>,
}

/// One `[[CURRENCIES]]` entry; keys other than `code` and `issuer` are ignored
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CurrencyEntry {
	#[serde(default)]
	pub code: Option<String>,
	#[serde(default)]
	pub issuer: Option<String>,
}

impl CurrencyEntry {
	/// Issued asset this entry describes, `None` for native or incomplete entries
	pub fn issued_asset(&self) -> Option<Asset> {
		match (&self.code, &self.issuer) {
			(Some(code), Some(issuer)) if !code.is_empty() && !issuer.is_empty() => {
				Some(Asset::issued(code.clone(), issuer.clone()))
			},
			_ => None,
		}
	}
}

impl DomainConfig {
	/// Parse the TOML document served by `domain`
	pub fn from_toml(domain: &str, document: &str) -> AnchorResult<Self> {
		toml::from_str(document).map_err(|e| AnchorError::DomainConfig {
			domain: domain.to_string(),
			reason: format!("invalid TOML: {}", e),
		})
	}

	/// Declared transfer server, preferring the SEP-6 entry over the SEP-24 one
	pub fn transfer_server_url(&self) -> Option<&str> {
		[
			self.transfer_server.as_deref(),
			self.transfer_server_sep0024.as_deref(),
		]
		.into_iter()
		.flatten()
		.find(|url| !url.trim().is_empty())
	}

	/// Issued assets listed under `CURRENCIES`, in document order
	pub fn assets(&self) -> Vec<Asset> {
		self.currencies
			.iter()
			.filter_map(CurrencyEntry::issued_asset)
			.collect()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	const TOML: &str = r#"
NETWORK_PASSPHRASE = "Public Global Stellar Network ; September 2015"
TRANSFER_SERVER = "https://api.anchor.example.com/t1"
TRANSFER_SERVER_SEP0024 = "https://api.anchor.example.com/sep24"
WEB_AUTH_ENDPOINT = "https://api.anchor.example.com/auth"

[[CURRENCIES]]
code = "EURT"
issuer = "GAP5LETOV6YIE62YAM56STDANPRDO7ZFDBGSNHJQIYGGKSMOZAHOOS2S"
display_decimals = 2

[[CURRENCIES]]
code = "native"

[[CURRENCIES]]
code = "USD"
issuer = "GDUKMGUGDZQK6YHYA5Z6AY2G4XDSZPSZ3SW5UN3ARVMO6QSRDWP5YLEX"
"#;

	#[test]
	fn test_parses_transfer_server_and_currencies() {
		let config = DomainConfig::from_toml("anchor.example.com", TOML).unwrap();

		assert_eq!(
			config.transfer_server_url(),
			Some("https://api.anchor.example.com/t1")
		);
		let codes: Vec<_> = config.assets().iter().map(|a| a.code().to_string()).collect();
		assert_eq!(codes, vec!["EURT", "USD"]);
	}

	#[test]
	fn test_unusual_currency_metadata_does_not_break_parsing() {
		let document = r#"
TRANSFER_SERVER = "https://anchor.example.com"

[[CURRENCIES]]
code = "USD"
issuer = "GISSUER"
display_decimals = 7.5
status = 1
name = { en = "US Dollar" }
"#;
		let config = DomainConfig::from_toml("anchor.example.com", document).unwrap();

		assert_eq!(config.assets(), vec![Asset::issued("USD", "GISSUER")]);
	}

	#[test]
	fn test_falls_back_to_sep24_server() {
		let config = DomainConfig::from_toml(
			"anchor.example.com",
			"TRANSFER_SERVER_SEP0024 = \"https://sep24.example.com\"",
		)
		.unwrap();
		assert_eq!(config.transfer_server_url(), Some("https://sep24.example.com"));
	}

	#[test]
	fn test_missing_transfer_server_is_none() {
		let config = DomainConfig::from_toml("anchor.example.com", "VERSION = \"2.0.0\"").unwrap();
		assert_eq!(config.transfer_server_url(), None);
	}

	#[test]
	fn test_invalid_toml_is_domain_config_error() {
		let result = DomainConfig::from_toml("anchor.example.com", "TRANSFER_SERVER = ");
		assert!(matches!(result, Err(AnchorError::DomainConfig { .. })));
	}
}
