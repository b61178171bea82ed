//! Shared fixtures for integration tests
//!
//! Builds a small anchor landscape on top of the in-memory collaborators:
//! two issuers behind one transfer server, one issuer behind another, and
//! one issuer without a home domain.

use anchor_transfer::config::{AssetConfig, LogFormat, LoggingSettings, Settings, WalletSettings};
use anchor_transfer::{Asset, TransferClient};
use anchor_types::test_utils::{MockDomainResolver, MockLedger, MockTransferClient};
use serde_json::{json, Value};
use std::sync::Arc;

#[allow(dead_code)]
pub const SHARED_URL: &str = "https://shared.example.com/sep24";
#[allow(dead_code)]
pub const OTHER_URL: &str = "https://other.example.com/";

/// In-memory collaborators plus the client built from them
#[allow(dead_code)]
pub struct Fixture {
	pub ledger: MockLedger,
	pub domains: MockDomainResolver,
	pub transfers: MockTransferClient,
	pub client: TransferClient,
}

#[allow(dead_code)]
pub struct MockAnchors;

#[allow(dead_code)]
impl MockAnchors {
	pub fn usd() -> Asset {
		Asset::issued("USD", "GSHARED")
	}

	pub fn eur() -> Asset {
		Asset::issued("EUR", "GSHARED2")
	}

	pub fn brl() -> Asset {
		Asset::issued("BRL", "GOTHER")
	}

	pub fn orphan() -> Asset {
		Asset::issued("XYZ", "GORPHAN")
	}

	pub fn test_settings() -> Settings {
		Settings {
			wallet: WalletSettings {
				lang: Some("en".to_string()),
				wallet_name: Some("Test Wallet".to_string()),
				wallet_url: Some("https://wallet.example.com".to_string()),
			},
			logging: LoggingSettings {
				level: "debug".to_string(),
				format: LogFormat::Compact,
				structured: false,
			},
			assets: vec![AssetConfig {
				code: "USD".to_string(),
				issuer: "GSHARED".to_string(),
			}],
			..Settings::default()
		}
	}

	pub fn ledger() -> MockLedger {
		MockLedger::new()
			.with_home_domain("GSHARED", "shared.example.com")
			.with_home_domain("GSHARED2", "shared.example.com")
			.with_home_domain("GOTHER", "other.example.com")
			.without_home_domain("GORPHAN")
	}

	pub fn domains() -> MockDomainResolver {
		MockDomainResolver::new()
			.with_transfer_server("shared.example.com", SHARED_URL)
			.with_transfer_server("other.example.com", OTHER_URL)
	}

	pub fn shared_info() -> Value {
		json!({
			"deposit": {
				"USD": { "enabled": true, "fee_fixed": 1.0, "min_amount": 5 },
				"EUR": { "enabled": false }
			},
			"withdraw": {
				"USD": { "enabled": true, "types": { "bank_account": {} } }
			}
		})
	}

	pub fn other_info() -> Value {
		json!({
			"deposit": { "BRL": { "enabled": true, "fee_percent": 0.5 } },
			"withdraw": {}
		})
	}

	pub fn transfers() -> MockTransferClient {
		MockTransferClient::new()
			.with_info(SHARED_URL, Self::shared_info())
			.with_info(OTHER_URL, Self::other_info())
	}

	pub fn fixture() -> Fixture {
		Self::fixture_with(Self::ledger(), Self::domains(), Self::transfers())
	}

	pub fn fixture_with(
		ledger: MockLedger,
		domains: MockDomainResolver,
		transfers: MockTransferClient,
	) -> Fixture {
		let client = TransferClient::builder()
			.with_settings(Self::test_settings())
			.with_ledger(Arc::new(ledger.clone()))
			.with_domain_resolver(Arc::new(domains.clone()))
			.with_transfer_client(Arc::new(transfers.clone()))
			.build()
			.expect("fixture client builds");

		Fixture {
			ledger,
			domains,
			transfers,
			client,
		}
	}
}
