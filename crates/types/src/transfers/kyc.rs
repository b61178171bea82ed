//! KYC responses returned by anchors that need customer information first

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::{AnchorError, AnchorResult};

/// Body `type` of an interactive KYC response
pub const INTERACTIVE_CUSTOMER_INFO_NEEDED: &str = "interactive_customer_info_needed";
/// Body `type` of a non-interactive KYC response
pub const NON_INTERACTIVE_CUSTOMER_INFO_NEEDED: &str = "non_interactive_customer_info_needed";
/// Body `type` of a KYC status report
pub const CUSTOMER_INFO_STATUS: &str = "customer_info_status";

/// Which kind of KYC the anchor asked for
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum KycSubtype {
	Interactive,
	NonInteractive,
	/// Pending or denied status report
	Status,
}

impl fmt::Display for KycSubtype {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			KycSubtype::Interactive => f.write_str("interactive"),
			KycSubtype::NonInteractive => f.write_str("non-interactive"),
			KycSubtype::Status => f.write_str("status"),
		}
	}
}

/// The user has to complete a hosted flow at `url`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct KycInteractive {
	/// URL hosted by the anchor, shown as popup or iframe
	pub url: String,
	/// Anchor's id for this request, usable with the transaction endpoint
	#[serde(default)]
	pub id: Option<String>,
	/// Whether the hosted flow also completes the deposit
	#[serde(default)]
	pub interactive_deposit: Option<bool>,
}

/// The anchor lists fields to submit through the customer info endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct KycNonInteractive {
	#[serde(default)]
	pub fields: Vec<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum KycStatusValue {
	Pending,
	Denied,
}

/// Status of previously submitted customer information
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct KycStatus {
	pub status: KycStatusValue,
	/// Seconds until the status is expected to change
	#[serde(default)]
	pub eta: Option<f64>,
	#[serde(default)]
	pub more_info_url: Option<String>,
}

/// Classified KYC response
#[derive(Debug, Clone, PartialEq)]
pub enum KycInstructions {
	Interactive(KycInteractive),
	NonInteractive(KycNonInteractive),
	Status(KycStatus),
}

impl KycInstructions {
	/// Classify a KYC body by its `type` discriminator
	///
	/// A body without a recognised discriminator, or whose payload does not match
	/// it, is a protocol violation by `domain`.
	pub fn classify(domain: &str, body: Option<&Value>) -> AnchorResult<Self> {
		let format_error = || AnchorError::KycFormat {
			domain: domain.to_string(),
		};

		let body = body.ok_or_else(format_error)?;
		let kind = body.get("type").and_then(Value::as_str).ok_or_else(format_error)?;

		let instructions = match kind {
			INTERACTIVE_CUSTOMER_INFO_NEEDED => KycInstructions::Interactive(
				serde_json::from_value(body.clone()).map_err(|_| format_error())?,
			),
			NON_INTERACTIVE_CUSTOMER_INFO_NEEDED => KycInstructions::NonInteractive(
				serde_json::from_value(body.clone()).map_err(|_| format_error())?,
			),
			CUSTOMER_INFO_STATUS => KycInstructions::Status(
				serde_json::from_value(body.clone()).map_err(|_| format_error())?,
			),
			_ => return Err(format_error()),
		};

		Ok(instructions)
	}

	/// Whether a success-status body is really the hosted-flow redirect
	pub fn is_interactive_body(body: Option<&Value>) -> bool {
		body.and_then(|b| b.get("type"))
			.and_then(Value::as_str)
			.map(|kind| kind == INTERACTIVE_CUSTOMER_INFO_NEEDED)
			.unwrap_or(false)
	}

	pub fn subtype(&self) -> KycSubtype {
		match self {
			KycInstructions::Interactive(_) => KycSubtype::Interactive,
			KycInstructions::NonInteractive(_) => KycSubtype::NonInteractive,
			KycInstructions::Status(_) => KycSubtype::Status,
		}
	}
}
