//! Anchor Types
//!
//! Shared models, errors and collaborator traits for the anchor transfer client.
//! This crate contains all domain models organized by concern.

pub mod adapters;
pub mod errors;
pub mod info;
pub mod models;
pub mod servers;
pub mod transfers;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

// Re-export chrono and serde_json for convenience
pub use chrono;
pub use serde_json;

pub use adapters::{AccountLedger, AnchorResponse, DomainConfigResolver, TransferServerClient};

pub use errors::{AnchorError, AnchorResult};

pub use info::{
	AssetTransferInfo, DepositCapability, EndpointSupport, FieldSpec, TransferFields,
	TransferInfo, WithdrawCapability, WithdrawalMethod,
};

pub use models::{Asset, AuthToken, CurrencyEntry, DomainConfig, Memo, MemoType, DOMAIN_CONFIG_PATH};

pub use servers::{TransferOptions, TransferServer};

pub use transfers::{
	DepositInstructions, DepositRequest, DepositResult, DepositType, KycInstructions,
	KycInteractive, KycNonInteractive, KycStatus, KycStatusValue, KycSubtype, PaymentOperation,
	RequestFields, TransferDirection, TransferKind, TransferRequest, TransferResult,
	TransferStatus, TransferTransaction, WithdrawalInstructions, WithdrawalRequest,
	WithdrawalResult, WithdrawalType,
};
