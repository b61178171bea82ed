//! Deposit and withdrawal requests

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::{AnchorResult, Asset, TransferServer};

/// Request fields as sent to the anchor, form or query encoded
pub type RequestFields = BTreeMap<String, String>;

/// Direction of a transfer, seen from the ledger
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TransferDirection {
	Deposit,
	Withdraw,
}

impl TransferDirection {
	pub fn as_str(&self) -> &'static str {
		match self {
			TransferDirection::Deposit => "deposit",
			TransferDirection::Withdraw => "withdraw",
		}
	}

	/// Versioned endpoint of the hosted (interactive) flow
	pub fn interactive_path(&self) -> &'static str {
		match self {
			TransferDirection::Deposit => "transactions/deposit/interactive",
			TransferDirection::Withdraw => "transactions/withdraw/interactive",
		}
	}

	/// Unversioned endpoint of the legacy flow
	pub fn legacy_path(&self) -> &'static str {
		match self {
			TransferDirection::Deposit => "deposit",
			TransferDirection::Withdraw => "withdraw",
		}
	}
}

impl fmt::Display for TransferDirection {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Deposit method, sent as the `type` field
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DepositType {
	Sepa,
	Swift,
	Other(String),
}

impl DepositType {
	pub fn as_str(&self) -> &str {
		match self {
			DepositType::Sepa => "SEPA",
			DepositType::Swift => "SWIFT",
			DepositType::Other(value) => value,
		}
	}
}

/// Withdrawal method, sent as the `type` field
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum WithdrawalType {
	BankAccount,
	Cash,
	Crypto,
	Mobile,
	BillPayment,
	Other(String),
}

impl WithdrawalType {
	pub fn as_str(&self) -> &str {
		match self {
			WithdrawalType::BankAccount => "bank_account",
			WithdrawalType::Cash => "cash",
			WithdrawalType::Crypto => "crypto",
			WithdrawalType::Mobile => "mobile",
			WithdrawalType::BillPayment => "bill_payment",
			WithdrawalType::Other(value) => value,
		}
	}
}

/// Common shape of deposit and withdrawal requests
pub trait TransferRequest: Send + Sync {
	fn direction(&self) -> TransferDirection;

	fn server(&self) -> &TransferServer;

	fn asset(&self) -> &Asset;

	/// Fields to send: server defaults < caller options < protocol-mandated fields
	fn fields(&self) -> RequestFields;
}

/// Merge request fields in increasing precedence
fn merge_fields(
	server: &TransferServer,
	options: &RequestFields,
	mandated: Vec<(&'static str, String)>,
) -> RequestFields {
	let mut fields: RequestFields = server
		.options()
		.as_fields()
		.into_iter()
		.map(|(key, value)| (key.to_string(), value))
		.collect();

	fields.extend(options.iter().map(|(k, v)| (k.clone(), v.clone())));
	fields.extend(mandated.into_iter().map(|(k, v)| (k.to_string(), v)));
	fields
}

/// A deposit into the ledger account `account`
#[derive(Debug, Clone)]
pub struct DepositRequest {
	server: Arc<TransferServer>,
	asset: Asset,
	account: String,
	options: RequestFields,
}

impl DepositRequest {
	/// Fails with `AssetNotIssued` for the native asset
	pub fn new(
		server: Arc<TransferServer>,
		asset: Asset,
		account: impl Into<String>,
		options: RequestFields,
	) -> AnchorResult<Self> {
		asset.require_issuer()?;
		Ok(Self {
			server,
			asset,
			account: account.into(),
			options,
		})
	}

	pub fn with_type(mut self, deposit_type: DepositType) -> Self {
		self.options
			.insert("type".to_string(), deposit_type.as_str().to_string());
		self
	}

	pub fn account(&self) -> &str {
		&self.account
	}
}

impl TransferRequest for DepositRequest {
	fn direction(&self) -> TransferDirection {
		TransferDirection::Deposit
	}

	fn server(&self) -> &TransferServer {
		&self.server
	}

	fn asset(&self) -> &Asset {
		&self.asset
	}

	fn fields(&self) -> RequestFields {
		merge_fields(
			&self.server,
			&self.options,
			vec![
				("asset_code", self.asset.code().to_string()),
				("account", self.account.clone()),
			],
		)
	}
}

/// A withdrawal out of the ledger
#[derive(Debug, Clone)]
pub struct WithdrawalRequest {
	server: Arc<TransferServer>,
	asset: Asset,
	account: Option<String>,
	options: RequestFields,
}

impl WithdrawalRequest {
	/// Fails with `AssetNotIssued` for the native asset
	pub fn new(server: Arc<TransferServer>, asset: Asset, options: RequestFields) -> AnchorResult<Self> {
		asset.require_issuer()?;
		Ok(Self {
			server,
			asset,
			account: None,
			options,
		})
	}

	/// Ledger account the withdrawal is sent from; overrides any `account` option
	pub fn with_account(mut self, account: impl Into<String>) -> Self {
		self.account = Some(account.into());
		self
	}

	pub fn with_type(mut self, withdrawal_type: WithdrawalType) -> Self {
		self.options
			.insert("type".to_string(), withdrawal_type.as_str().to_string());
		self
	}

	pub fn account(&self) -> Option<&str> {
		self.account.as_deref()
	}
}

impl TransferRequest for WithdrawalRequest {
	fn direction(&self) -> TransferDirection {
		TransferDirection::Withdraw
	}

	fn server(&self) -> &TransferServer {
		&self.server
	}

	fn asset(&self) -> &Asset {
		&self.asset
	}

	fn fields(&self) -> RequestFields {
		let mut mandated = vec![("asset_code", self.asset.code().to_string())];
		if let Some(account) = &self.account {
			mandated.push(("account", account.clone()));
		}
		merge_fields(&self.server, &self.options, mandated)
	}
}
