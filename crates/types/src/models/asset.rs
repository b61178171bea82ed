//! Ledger asset models

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{AnchorError, AnchorResult};

/// An asset on the ledger, identified by its code and issuing account
///
/// The native asset has no issuer and can never be routed to a transfer server.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(tag = "asset_type", rename_all = "snake_case")]
pub enum Asset {
	Native,
	Issued { code: String, issuer: String },
}

impl Asset {
	pub fn native() -> Self {
		Self::Native
	}

	pub fn issued(code: impl Into<String>, issuer: impl Into<String>) -> Self {
		Self::Issued {
			code: code.into(),
			issuer: issuer.into(),
		}
	}

	pub fn is_native(&self) -> bool {
		matches!(self, Self::Native)
	}

	/// Asset code as it appears in anchor info documents ("XLM" for native)
	pub fn code(&self) -> &str {
		match self {
			Self::Native => "XLM",
			Self::Issued { code, .. } => code,
		}
	}

	pub fn issuer(&self) -> Option<&str> {
		match self {
			Self::Native => None,
			Self::Issued { issuer, .. } => Some(issuer),
		}
	}

	/// Issuer account of this asset, failing for the native asset
	pub fn require_issuer(&self) -> AnchorResult<&str> {
		self.issuer().ok_or_else(|| AnchorError::AssetNotIssued {
			asset: self.to_string(),
		})
	}
}

impl fmt::Display for Asset {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Native => write!(f, "native"),
			Self::Issued { code, issuer } => write!(f, "{}:{}", code, issuer),
		}
	}
}
