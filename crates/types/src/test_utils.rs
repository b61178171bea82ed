//! In-memory collaborators for tests
//!
//! Each fake counts its calls so tests can assert how many lookups a pipeline
//! performed, and can be told to fail or stall for specific keys.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::adapters::{AccountLedger, AnchorResponse, DomainConfigResolver, TransferServerClient};
use crate::{AnchorError, AnchorResult, AuthToken, DomainConfig, RequestFields, TransferServer};

/// Per-key call counter shared between clones of a fake
#[derive(Debug, Clone, Default)]
pub struct CallCounter {
	total: Arc<AtomicUsize>,
	by_key: Arc<Mutex<HashMap<String, usize>>>,
}

impl CallCounter {
	fn record(&self, key: &str) {
		self.total.fetch_add(1, Ordering::SeqCst);
		if let Ok(mut by_key) = self.by_key.lock() {
			*by_key.entry(key.to_string()).or_default() += 1;
		}
	}

	pub fn total(&self) -> usize {
		self.total.load(Ordering::SeqCst)
	}

	pub fn for_key(&self, key: &str) -> usize {
		self.by_key
			.lock()
			.map(|by_key| by_key.get(key).copied().unwrap_or(0))
			.unwrap_or(0)
	}
}

/// Fake ledger mapping issuer accounts to home domains
#[derive(Debug, Clone, Default)]
pub struct MockLedger {
	accounts: HashMap<String, Option<String>>,
	failing: HashSet<String>,
	delays: HashMap<String, Duration>,
	calls: CallCounter,
}

impl MockLedger {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_home_domain(mut self, issuer: &str, domain: &str) -> Self {
		self.accounts
			.insert(issuer.to_string(), Some(domain.to_string()));
		self
	}

	/// Account exists but declares no home domain
	pub fn without_home_domain(mut self, issuer: &str) -> Self {
		self.accounts.insert(issuer.to_string(), None);
		self
	}

	/// Loading this account fails as if the ledger were unreachable
	pub fn failing(mut self, issuer: &str) -> Self {
		self.failing.insert(issuer.to_string());
		self
	}

	pub fn with_delay(mut self, issuer: &str, delay_ms: u64) -> Self {
		self.delays
			.insert(issuer.to_string(), Duration::from_millis(delay_ms));
		self
	}

	pub fn calls(&self) -> &CallCounter {
		&self.calls
	}
}

#[async_trait]
impl AccountLedger for MockLedger {
	async fn load_home_domain(&self, issuer: &str) -> AnchorResult<Option<String>> {
		self.calls.record(issuer);

		if let Some(delay) = self.delays.get(issuer) {
			tokio::time::sleep(*delay).await;
		}

		if self.failing.contains(issuer) {
			return Err(AnchorError::Ledger {
				issuer: issuer.to_string(),
				reason: "simulated ledger outage".to_string(),
			});
		}

		self.accounts
			.get(issuer)
			.cloned()
			.ok_or_else(|| AnchorError::Ledger {
				issuer: issuer.to_string(),
				reason: "account not found".to_string(),
			})
	}
}

/// Fake domain configuration lookup
#[derive(Debug, Clone, Default)]
pub struct MockDomainResolver {
	configs: HashMap<String, DomainConfig>,
	failing: HashSet<String>,
	calls: CallCounter,
}

impl MockDomainResolver {
	pub fn new() -> Self {
		Self::default()
	}

	/// Domain whose document declares `transfer_server`
	pub fn with_transfer_server(mut self, domain: &str, transfer_server: &str) -> Self {
		self.configs.insert(
			domain.to_string(),
			DomainConfig {
				transfer_server: Some(transfer_server.to_string()),
				..DomainConfig::default()
			},
		);
		self
	}

	pub fn with_config(mut self, domain: &str, config: DomainConfig) -> Self {
		self.configs.insert(domain.to_string(), config);
		self
	}

	pub fn failing(mut self, domain: &str) -> Self {
		self.failing.insert(domain.to_string());
		self
	}

	pub fn calls(&self) -> &CallCounter {
		&self.calls
	}
}

#[async_trait]
impl DomainConfigResolver for MockDomainResolver {
	async fn resolve(&self, domain: &str) -> AnchorResult<DomainConfig> {
		self.calls.record(domain);

		if self.failing.contains(domain) {
			return Err(AnchorError::DomainConfig {
				domain: domain.to_string(),
				reason: "simulated network failure".to_string(),
			});
		}

		self.configs
			.get(domain)
			.cloned()
			.ok_or_else(|| AnchorError::DomainConfig {
				domain: domain.to_string(),
				reason: "no configuration document".to_string(),
			})
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MockMethod {
	Get,
	Post,
}

/// A request seen by [`MockTransferClient`]
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
	pub method: MockMethod,
	pub server_url: String,
	pub path: String,
	pub fields: RequestFields,
	pub authorization: Option<String>,
}

/// Fake transfer server transport with canned responses
#[derive(Debug, Clone, Default)]
pub struct MockTransferClient {
	responses: HashMap<(MockMethod, String), AnchorResponse>,
	infos: HashMap<String, Value>,
	failing_infos: HashSet<String>,
	info_delays: HashMap<String, Duration>,
	info_calls: CallCounter,
	requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockTransferClient {
	pub fn new() -> Self {
		Self::default()
	}

	/// Respond to `method path` on any server
	pub fn respond(mut self, method: MockMethod, path: &str, status: u16, body: Option<Value>) -> Self {
		self.responses.insert(
			(method, path.trim_start_matches('/').to_string()),
			AnchorResponse::new(status, body),
		);
		self
	}

	/// `/info` document served by the server at `url`
	pub fn with_info(mut self, url: &str, info: Value) -> Self {
		self.infos.insert(url.to_string(), info);
		self
	}

	/// `/info` at `url` answers with a server error
	pub fn failing_info(mut self, url: &str) -> Self {
		self.failing_infos.insert(url.to_string());
		self
	}

	pub fn with_info_delay(mut self, url: &str, delay_ms: u64) -> Self {
		self.info_delays
			.insert(url.to_string(), Duration::from_millis(delay_ms));
		self
	}

	pub fn info_calls(&self) -> &CallCounter {
		&self.info_calls
	}

	pub fn requests(&self) -> Vec<RecordedRequest> {
		self.requests
			.lock()
			.map(|requests| requests.clone())
			.unwrap_or_default()
	}

	fn record(
		&self,
		method: MockMethod,
		server: &TransferServer,
		path: &str,
		fields: &RequestFields,
		auth: Option<&AuthToken>,
	) {
		if let Ok(mut requests) = self.requests.lock() {
			requests.push(RecordedRequest {
				method,
				server_url: server.url_str().to_string(),
				path: path.to_string(),
				fields: fields.clone(),
				authorization: auth.map(AuthToken::authorization_header),
			});
		}
	}

	fn canned(&self, method: MockMethod, path: &str) -> AnchorResponse {
		self.responses
			.get(&(method, path.to_string()))
			.cloned()
			.unwrap_or_else(|| AnchorResponse::new(404, None))
	}
}

#[async_trait]
impl TransferServerClient for MockTransferClient {
	async fn get(
		&self,
		server: &TransferServer,
		path: &str,
		query: &RequestFields,
		auth: Option<&AuthToken>,
	) -> AnchorResult<AnchorResponse> {
		let path = path.trim_start_matches('/');
		self.record(MockMethod::Get, server, path, query, auth);

		if path != "info" {
			return Ok(self.canned(MockMethod::Get, path));
		}

		let url = server.url_str();
		self.info_calls.record(url);

		if let Some(delay) = self.info_delays.get(url) {
			tokio::time::sleep(*delay).await;
		}

		if self.failing_infos.contains(url) {
			return Ok(AnchorResponse::new(
				503,
				Some(serde_json::json!({ "error": "simulated outage" })),
			));
		}

		Ok(match self.infos.get(url) {
			Some(info) => AnchorResponse::new(200, Some(info.clone())),
			None => AnchorResponse::new(404, None),
		})
	}

	async fn post_form(
		&self,
		server: &TransferServer,
		path: &str,
		fields: &RequestFields,
		auth: Option<&AuthToken>,
	) -> AnchorResult<AnchorResponse> {
		let path = path.trim_start_matches('/');
		self.record(MockMethod::Post, server, path, fields, auth);
		Ok(self.canned(MockMethod::Post, path))
	}
}
