//! Capability (`/info`) documents published by transfer servers

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

/// Fields an anchor asks the wallet to pass into a deposit or withdrawal
pub type TransferFields = BTreeMap<String, FieldSpec>;

/// Description of one request field
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FieldSpec {
	/// Description of the field to show to the user
	#[serde(default)]
	pub description: String,
	/// Defaults to false
	#[serde(default)]
	pub optional: bool,
	/// Possible values for the field
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub choices: Option<Vec<String>>,
}

/// Deposit capabilities for one asset code
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DepositCapability {
	#[serde(default)]
	pub enabled: bool,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub authentication_required: Option<bool>,
	/// Flat fee in units of the deposited asset
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub fee_fixed: Option<f64>,
	/// Percentage fee in percentage points
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub fee_percent: Option<f64>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub min_amount: Option<f64>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub max_amount: Option<f64>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub fields: Option<TransferFields>,
}

/// Fields required by one withdrawal method
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct WithdrawalMethod {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub fields: Option<TransferFields>,
}

/// Withdrawal capabilities for one asset code
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct WithdrawCapability {
	#[serde(default)]
	pub enabled: bool,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub authentication_required: Option<bool>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub fee_fixed: Option<f64>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub fee_percent: Option<f64>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub min_amount: Option<f64>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub max_amount: Option<f64>,
	/// Supported withdrawal methods keyed by `type` value (e.g. `bank_account`)
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub types: Option<BTreeMap<String, WithdrawalMethod>>,
}

/// Flag for an optional endpoint
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct EndpointSupport {
	#[serde(default)]
	pub enabled: bool,
}

/// The `/info` document of one transfer server
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TransferInfo {
	#[serde(default)]
	pub deposit: HashMap<String, DepositCapability>,
	#[serde(default)]
	pub withdraw: HashMap<String, WithdrawCapability>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub fee: Option<EndpointSupport>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub transaction: Option<EndpointSupport>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub transactions: Option<EndpointSupport>,
}

impl TransferInfo {
	pub fn deposit_for(&self, code: &str) -> Option<&DepositCapability> {
		self.deposit.get(code)
	}

	pub fn withdraw_for(&self, code: &str) -> Option<&WithdrawCapability> {
		self.withdraw.get(code)
	}

	/// Asset codes with an enabled deposit entry, sorted
	pub fn depositable_codes(&self) -> Vec<&str> {
		let mut codes: Vec<&str> = self
			.deposit
			.iter()
			.filter(|(_, capability)| capability.enabled)
			.map(|(code, _)| code.as_str())
			.collect();
		codes.sort_unstable();
		codes
	}

	/// Asset codes with an enabled withdraw entry, sorted
	pub fn withdrawable_codes(&self) -> Vec<&str> {
		let mut codes: Vec<&str> = self
			.withdraw
			.iter()
			.filter(|(_, capability)| capability.enabled)
			.map(|(code, _)| code.as_str())
			.collect();
		codes.sort_unstable();
		codes
	}

	pub fn supports_transaction_endpoint(&self) -> bool {
		self.transaction.map(|t| t.enabled).unwrap_or(false)
	}

	pub fn supports_transactions_endpoint(&self) -> bool {
		self.transactions.map(|t| t.enabled).unwrap_or(false)
	}
}

/// Capability info for a single asset, cut out of its server's document
///
/// All three fields unset is the explicit "looked up, found nothing" record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssetTransferInfo {
	/// The whole document of the asset's server, shared between assets
	pub transfer_info: Option<Arc<TransferInfo>>,
	pub deposit: Option<DepositCapability>,
	pub withdraw: Option<WithdrawCapability>,
}

impl AssetTransferInfo {
	/// The "no info" record
	pub fn empty() -> Self {
		Self::default()
	}

	/// Cut the entries for `code` out of `info`; no entry under either side yields the empty record
	pub fn for_code(info: Arc<TransferInfo>, code: &str) -> Self {
		let deposit = info.deposit_for(code).cloned();
		let withdraw = info.withdraw_for(code).cloned();

		if deposit.is_none() && withdraw.is_none() {
			return Self::empty();
		}

		Self {
			transfer_info: Some(info),
			deposit,
			withdraw,
		}
	}

	pub fn is_empty(&self) -> bool {
		self.transfer_info.is_none() && self.deposit.is_none() && self.withdraw.is_none()
	}

	pub fn can_deposit(&self) -> bool {
		self.deposit.as_ref().map(|d| d.enabled).unwrap_or(false)
	}

	pub fn can_withdraw(&self) -> bool {
		self.withdraw.as_ref().map(|w| w.enabled).unwrap_or(false)
	}
}
