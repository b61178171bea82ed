//! Error types for anchor discovery and transfer operations

use thiserror::Error;

/// Result alias used across the anchor crates
pub type AnchorResult<T> = Result<T, AnchorError>;

/// Errors raised while discovering anchors or talking to their transfer servers
#[derive(Error, Debug)]
pub enum AnchorError {
	/// A native asset was passed where an issued asset is required
	#[error("Asset {asset} is not an issued asset and has no issuer account")]
	AssetNotIssued { asset: String },

	/// No anchor could be found for a domain or issuer
	#[error("No transfer server found for {target}: {reason}")]
	ServerDiscovery { target: String, reason: String },

	/// Every issuer in a discovery batch failed to resolve
	#[error("All {count} issuer resolutions failed, first error: {source}")]
	AllResolutionsFailed {
		count: usize,
		#[source]
		source: Box<AnchorError>,
	},

	/// Every transfer server in an info batch failed to respond
	#[error("All {count} transfer info fetches failed, first error: {source}")]
	AllFetchesFailed {
		count: usize,
		#[source]
		source: Box<AnchorError>,
	},

	/// The anchor answered with an unexpected status or an unusable body
	#[error("Request to {domain} failed with status {status}: {message}")]
	AnchorResponse {
		domain: String,
		status: u16,
		message: String,
	},

	/// The anchor asked for KYC but the body carried no recognised discriminator
	#[error("{domain} requires KYC, but did not specify valid KYC instructions")]
	KycFormat { domain: String },

	#[error("Invalid memo: {reason}")]
	MemoFormat { reason: String },

	#[error("Failed to load issuer account {issuer}: {reason}")]
	Ledger { issuer: String, reason: String },

	#[error("Failed to resolve configuration for domain {domain}: {reason}")]
	DomainConfig { domain: String, reason: String },

	#[error("Invalid URL '{url}': {reason}")]
	InvalidUrl { url: String, reason: String },

	#[error("HTTP request failed: {0}")]
	Http(#[from] reqwest::Error),

	#[error("Serialization error: {0}")]
	Serialization(#[from] serde_json::Error),
}

impl AnchorError {
	/// Build an anchor response error, preferring the message the anchor sent in its body
	pub fn anchor_response(
		domain: impl Into<String>,
		status: u16,
		body: Option<&serde_json::Value>,
	) -> Self {
		let text = |key: &str| {
			body.and_then(|body| body.get(key))
				.and_then(|value| value.as_str())
				.filter(|text| !text.is_empty())
		};
		let message = text("error")
			.or_else(|| text("message"))
			.map(str::to_string)
			.unwrap_or_else(|| format!("unexpected status code {}", status));

		Self::AnchorResponse {
			domain: domain.into(),
			status,
			message,
		}
	}

	/// HTTP status code of the failing anchor response, if any
	pub fn status_code(&self) -> Option<u16> {
		match self {
			AnchorError::AnchorResponse { status, .. } => Some(*status),
			AnchorError::Http(error) => error.status().map(|status| status.as_u16()),
			_ => None,
		}
	}

	/// Innermost error, unwrapping batch failures down to the first underlying cause
	pub fn root_cause(&self) -> &AnchorError {
		match self {
			AnchorError::AllResolutionsFailed { source, .. }
			| AnchorError::AllFetchesFailed { source, .. } => source.root_cause(),
			other => other,
		}
	}

	/// Whether this error means every member of a concurrent batch failed
	pub fn is_total_failure(&self) -> bool {
		matches!(
			self,
			AnchorError::AllResolutionsFailed { .. } | AnchorError::AllFetchesFailed { .. }
		)
	}
}
