//! Collaborator traits for ledger, domain configuration and transfer server access
//!
//! The discovery and transfer services only talk to the outside world through
//! these traits. HTTP implementations live in the adapters crate; tests swap in
//! in-memory fakes.

use async_trait::async_trait;
use serde_json::Value;
use std::fmt::Debug;

use crate::{
	AnchorError, AnchorResult, AuthToken, DomainConfig, RequestFields, TransferInfo,
	TransferServer,
};

/// Read access to issuer accounts on the ledger
#[async_trait]
pub trait AccountLedger: Send + Sync + Debug {
	/// Home domain declared on `issuer`, `None` when the account declares none
	async fn load_home_domain(&self, issuer: &str) -> AnchorResult<Option<String>>;
}

/// Lookup of a domain's published configuration document
#[async_trait]
pub trait DomainConfigResolver: Send + Sync + Debug {
	async fn resolve(&self, domain: &str) -> AnchorResult<DomainConfig>;
}

/// Status and decoded JSON body of a transfer server response
#[derive(Debug, Clone, PartialEq)]
pub struct AnchorResponse {
	pub status: u16,
	/// `None` when the body was empty or not JSON
	pub body: Option<Value>,
}

impl AnchorResponse {
	pub fn new(status: u16, body: Option<Value>) -> Self {
		Self { status, body }
	}

	pub fn is_success(&self) -> bool {
		matches!(self.status, 200 | 201)
	}
}

/// HTTP operations against a transfer server, relative to its base URL
#[async_trait]
pub trait TransferServerClient: Send + Sync + Debug {
	/// `GET {base}/{path}` with `query` as query parameters
	async fn get(
		&self,
		server: &TransferServer,
		path: &str,
		query: &RequestFields,
		auth: Option<&AuthToken>,
	) -> AnchorResult<AnchorResponse>;

	/// `POST {base}/{path}` with `fields` form encoded
	async fn post_form(
		&self,
		server: &TransferServer,
		path: &str,
		fields: &RequestFields,
		auth: Option<&AuthToken>,
	) -> AnchorResult<AnchorResponse>;

	/// Fetch the server's `/info` capability document
	async fn fetch_info(
		&self,
		server: &TransferServer,
		auth: Option<&AuthToken>,
	) -> AnchorResult<TransferInfo> {
		let response = self.get(server, "info", &RequestFields::new(), auth).await?;

		if response.status != 200 {
			return Err(AnchorError::anchor_response(
				server.domain(),
				response.status,
				response.body.as_ref(),
			));
		}

		let body = response.body.ok_or_else(|| AnchorError::AnchorResponse {
			domain: server.domain().to_string(),
			status: response.status,
			message: "info endpoint returned no JSON body".to_string(),
		})?;

		serde_json::from_value(body).map_err(|e| AnchorError::AnchorResponse {
			domain: server.domain().to_string(),
			status: response.status,
			message: format!("malformed info document: {}", e),
		})
	}
}
