//! Transfer transaction records returned by the status endpoints

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Processing state of a deposit or withdrawal
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TransferStatus {
	Completed,
	/// Submitted to the external network, not yet confirmed
	PendingExternal,
	/// Being processed internally by the anchor
	PendingAnchor,
	/// Submitted to the ledger, not yet confirmed
	PendingStellar,
	/// The user must add a trustline for the asset
	PendingTrust,
	/// The user must take additional action
	PendingUser,
	/// The user has not yet initiated their transfer to the anchor
	PendingUserTransferStart,
	/// Not enough information yet, e.g. an unfinished interactive flow
	Incomplete,
	NoMarket,
	TooSmall,
	TooLarge,
	Error,
	#[serde(other)]
	Unknown,
}

impl TransferStatus {
	/// Whether the anchor will not move this transaction any further
	pub fn is_final(&self) -> bool {
		matches!(
			self,
			TransferStatus::Completed
				| TransferStatus::NoMarket
				| TransferStatus::TooSmall
				| TransferStatus::TooLarge
				| TransferStatus::Error
		)
	}
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TransferKind {
	Deposit,
	Withdrawal,
}

/// A deposit or withdrawal as reported by the anchor
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TransferTransaction {
	pub id: String,
	pub kind: TransferKind,
	pub status: TransferStatus,
	#[serde(default)]
	pub status_eta: Option<f64>,
	#[serde(default)]
	pub more_info_url: Option<String>,
	#[serde(default)]
	pub amount_in: Option<String>,
	#[serde(default)]
	pub amount_out: Option<String>,
	#[serde(default)]
	pub amount_fee: Option<String>,
	#[serde(default)]
	pub started_at: Option<DateTime<Utc>>,
	#[serde(default)]
	pub completed_at: Option<DateTime<Utc>>,
	#[serde(default)]
	pub stellar_transaction_id: Option<String>,
	#[serde(default)]
	pub external_transaction_id: Option<String>,
	#[serde(default)]
	pub message: Option<String>,
	#[serde(default)]
	pub refunded: Option<bool>,
	#[serde(default)]
	pub from: Option<String>,
	#[serde(default)]
	pub to: Option<String>,
	#[serde(default)]
	pub deposit_memo: Option<String>,
	#[serde(default)]
	pub deposit_memo_type: Option<String>,
	#[serde(default)]
	pub withdraw_anchor_account: Option<String>,
	#[serde(default)]
	pub withdraw_memo: Option<String>,
	#[serde(default)]
	pub withdraw_memo_type: Option<String>,
}

/// Envelope of the single-transaction endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionEnvelope {
	pub transaction: TransferTransaction,
}

/// Envelope of the transaction list endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionsEnvelope {
	#[serde(default)]
	pub transactions: Vec<TransferTransaction>,
}
