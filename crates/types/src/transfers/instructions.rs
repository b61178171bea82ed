//! Success bodies of deposit and withdrawal requests

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{AnchorResult, Asset, Memo};

/// How to complete a deposit
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DepositInstructions {
	/// Terse instructions; for crypto assets usually just the address to send to
	pub how: String,
	#[serde(default)]
	pub id: Option<String>,
	/// Seconds until the deposit is expected to be credited
	#[serde(default)]
	pub eta: Option<f64>,
	#[serde(default)]
	pub min_amount: Option<f64>,
	#[serde(default)]
	pub max_amount: Option<f64>,
	#[serde(default)]
	pub fee_fixed: Option<f64>,
	#[serde(default)]
	pub fee_percent: Option<f64>,
	#[serde(default)]
	pub extra_info: Option<Value>,
}

/// Where to send the ledger payment that funds a withdrawal
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WithdrawalInstructions {
	/// Account the user sends the asset to
	pub account_id: String,
	#[serde(default)]
	pub memo_type: Option<String>,
	/// Memo value; base64 for hash memos
	#[serde(default)]
	pub memo: Option<String>,
	#[serde(default)]
	pub id: Option<String>,
	#[serde(default)]
	pub eta: Option<f64>,
	#[serde(default)]
	pub min_amount: Option<f64>,
	#[serde(default)]
	pub max_amount: Option<f64>,
	#[serde(default)]
	pub fee_fixed: Option<f64>,
	#[serde(default)]
	pub fee_percent: Option<f64>,
	#[serde(default)]
	pub extra_info: Option<Value>,
}

impl WithdrawalInstructions {
	/// The memo to attach to the payment, if the anchor asked for one
	pub fn memo(&self) -> AnchorResult<Option<Memo>> {
		Memo::from_anchor_fields(self.memo.as_deref(), self.memo_type.as_deref())
	}

	/// Unsigned payment that hands `amount` of `asset` to the anchor
	pub fn payment_operation(&self, asset: &Asset, amount: impl Into<String>) -> AnchorResult<PaymentOperation> {
		Ok(PaymentOperation {
			destination: self.account_id.clone(),
			asset: asset.clone(),
			amount: amount.into(),
			memo: self.memo()?,
		})
	}
}

/// Description of a payment the caller still has to sign and submit
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaymentOperation {
	pub destination: String,
	pub asset: Asset,
	/// Decimal amount as entered by the user
	pub amount: String,
	pub memo: Option<Memo>,
}
