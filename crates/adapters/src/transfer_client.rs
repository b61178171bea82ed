//! reqwest transport for transfer server endpoints

use anchor_types::{
	AnchorResponse, AnchorResult, AuthToken, RequestFields, TransferServer, TransferServerClient,
};
use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::{RequestBuilder, Response};
use tracing::debug;

use crate::client_cache::ClientCache;

pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Read status and body of an anchor response
///
/// Anchors answer errors with JSON too, so the body is decoded regardless of
/// status. Empty or non-JSON bodies become `None`.
pub(crate) async fn read_anchor_response(response: Response) -> AnchorResult<AnchorResponse> {
	let status = response.status().as_u16();
	let text = response.text().await?;

	let body = if text.trim().is_empty() {
		None
	} else {
		match serde_json::from_str(&text) {
			Ok(value) => Some(value),
			Err(e) => {
				debug!("Discarding non-JSON response body (status {}): {}", status, e);
				None
			},
		}
	};

	Ok(AnchorResponse::new(status, body))
}

/// HTTP client for deposit, withdrawal, info and transaction endpoints
#[derive(Debug, Clone)]
pub struct HttpTransferClient {
	cache: ClientCache,
	timeout_ms: u64,
}

impl HttpTransferClient {
	pub fn new(timeout_ms: u64) -> Self {
		Self::with_cache(ClientCache::new(), timeout_ms)
	}

	/// Share connection pools with other adapters
	pub fn with_cache(cache: ClientCache, timeout_ms: u64) -> Self {
		Self { cache, timeout_ms }
	}

	fn prepare(&self, request: RequestBuilder, auth: Option<&AuthToken>) -> RequestBuilder {
		let request = request.header(ACCEPT, "application/json");
		match auth {
			Some(token) if !token.is_empty() => {
				request.header(AUTHORIZATION, token.authorization_header())
			},
			_ => request,
		}
	}
}

impl Default for HttpTransferClient {
	fn default() -> Self {
		Self::new(DEFAULT_TIMEOUT_MS)
	}
}

#[async_trait]
impl TransferServerClient for HttpTransferClient {
	async fn get(
		&self,
		server: &TransferServer,
		path: &str,
		query: &RequestFields,
		auth: Option<&AuthToken>,
	) -> AnchorResult<AnchorResponse> {
		let url = server.endpoint(path)?;
		let client = self.cache.client_for_url(&url, self.timeout_ms)?;

		debug!("GET {} ({} query fields)", url, query.len());
		let request = self.prepare(client.get(url).query(query), auth);
		let response = request.send().await?;

		read_anchor_response(response).await
	}

	async fn post_form(
		&self,
		server: &TransferServer,
		path: &str,
		fields: &RequestFields,
		auth: Option<&AuthToken>,
	) -> AnchorResult<AnchorResponse> {
		let url = server.endpoint(path)?;
		let client = self.cache.client_for_url(&url, self.timeout_ms)?;

		debug!("POST {} ({} form fields)", url, fields.len());
		let request = self.prepare(client.post(url).form(fields), auth);
		let response = request.send().await?;

		read_anchor_response(response).await
	}
}
