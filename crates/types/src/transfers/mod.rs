//! Deposit and withdrawal models

pub mod instructions;
pub mod kyc;
pub mod request;
pub mod result;
pub mod transactions;

pub use instructions::{DepositInstructions, PaymentOperation, WithdrawalInstructions};
pub use kyc::{
	KycInstructions, KycInteractive, KycNonInteractive, KycStatus, KycStatusValue, KycSubtype,
};
pub use request::{
	DepositRequest, DepositType, RequestFields, TransferDirection, TransferRequest,
	WithdrawalRequest, WithdrawalType,
};
pub use result::{DepositResult, TransferResult, WithdrawalResult};
pub use transactions::{TransferKind, TransferStatus, TransferTransaction};
