//! Configuration settings structures

use crate::configurable_value::{ConfigurableValue, ConfigurableValueError};
use anchor_types::{Asset, AuthToken, TransferOptions};
use serde::{Deserialize, Serialize};

pub const DEFAULT_HORIZON_URL: &str = "https://horizon.stellar.org";

/// Main application settings
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct Settings {
	pub network: NetworkSettings,
	pub wallet: WalletSettings,
	pub timeouts: TimeoutSettings,
	pub logging: LoggingSettings,
	pub auth: AuthSettings,
	/// Assets the binary discovers transfer servers for
	pub assets: Vec<AssetConfig>,
}

/// Ledger and domain lookup configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct NetworkSettings {
	pub horizon_url: String,
	/// Fetch stellar.toml over https; only local test networks turn this off
	pub https_domains: bool,
}

/// Server-level defaults sent with every transfer request
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct WalletSettings {
	pub lang: Option<String>,
	pub wallet_name: Option<String>,
	pub wallet_url: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct TimeoutSettings {
	/// Whole-request timeout for every HTTP call
	pub request_ms: u64,
}

/// Logging configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct LoggingSettings {
	pub level: String,
	pub format: LogFormat,
	pub structured: bool,
}

/// Log format options
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
	Json,
	Pretty,
	Compact,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct AuthSettings {
	/// Bearer token for transfer servers
	///
	/// - Environment variable: `{ type = "env", value = "ANCHOR_AUTH_TOKEN" }`
	/// - Plain value: `{ type = "plain", value = "eyJ..." }`
	pub token: Option<ConfigurableValue>,
}

/// An issued asset as written in the config file
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct AssetConfig {
	pub code: String,
	pub issuer: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
	#[error("Horizon URL '{0}' must start with http:// or https://")]
	InvalidHorizonUrl(String),

	#[error("Request timeout must be greater than zero")]
	ZeroTimeout,

	#[error("Asset entry {index} has an empty {field}")]
	EmptyAssetField { index: usize, field: &'static str },
}

impl Default for Settings {
	fn default() -> Self {
		Self {
			network: NetworkSettings::default(),
			wallet: WalletSettings {
				lang: Some("en".to_string()),
				..WalletSettings::default()
			},
			timeouts: TimeoutSettings::default(),
			logging: LoggingSettings::default(),
			auth: AuthSettings::default(),
			assets: Vec::new(),
		}
	}
}

impl Default for NetworkSettings {
	fn default() -> Self {
		Self {
			horizon_url: DEFAULT_HORIZON_URL.to_string(),
			https_domains: true,
		}
	}
}

impl Default for TimeoutSettings {
	fn default() -> Self {
		Self { request_ms: 30_000 }
	}
}

impl Default for LoggingSettings {
	fn default() -> Self {
		Self {
			level: "info".to_string(),
			format: LogFormat::Pretty,
			structured: false,
		}
	}
}

impl Settings {
	pub fn validate(&self) -> Result<(), ConfigValidationError> {
		let horizon = self.network.horizon_url.as_str();
		if !(horizon.starts_with("http://") || horizon.starts_with("https://")) {
			return Err(ConfigValidationError::InvalidHorizonUrl(horizon.to_string()));
		}

		if self.timeouts.request_ms == 0 {
			return Err(ConfigValidationError::ZeroTimeout);
		}

		for (index, asset) in self.assets.iter().enumerate() {
			if asset.code.trim().is_empty() {
				return Err(ConfigValidationError::EmptyAssetField {
					index,
					field: "code",
				});
			}
			if asset.issuer.trim().is_empty() {
				return Err(ConfigValidationError::EmptyAssetField {
					index,
					field: "issuer",
				});
			}
		}

		Ok(())
	}

	/// Wallet defaults as transfer server options
	pub fn transfer_options(&self) -> TransferOptions {
		TransferOptions {
			lang: self.wallet.lang.clone(),
			wallet_name: self.wallet.wallet_name.clone(),
			wallet_url: self.wallet.wallet_url.clone(),
		}
	}

	pub fn configured_assets(&self) -> Vec<Asset> {
		self.assets
			.iter()
			.map(|asset| Asset::issued(asset.code.trim(), asset.issuer.trim()))
			.collect()
	}

	/// Resolve the configured bearer token, if any
	pub fn auth_token(&self) -> Result<Option<AuthToken>, ConfigurableValueError> {
		self.auth
			.token
			.as_ref()
			.map(ConfigurableValue::resolve_token)
			.transpose()
	}
}
