//! Classified outcome of a transfer request

use super::kyc::{KycInstructions, KycSubtype};
use super::instructions::{DepositInstructions, WithdrawalInstructions};

/// Either instructions to complete the transfer or the KYC the anchor wants first
#[derive(Debug, Clone, PartialEq)]
pub enum TransferResult<T> {
	Success(T),
	Kyc(KycInstructions),
}

pub type DepositResult = TransferResult<DepositInstructions>;
pub type WithdrawalResult = TransferResult<WithdrawalInstructions>;

impl<T> TransferResult<T> {
	pub fn is_success(&self) -> bool {
		matches!(self, TransferResult::Success(_))
	}

	pub fn success(&self) -> Option<&T> {
		match self {
			TransferResult::Success(instructions) => Some(instructions),
			TransferResult::Kyc(_) => None,
		}
	}

	pub fn into_success(self) -> Option<T> {
		match self {
			TransferResult::Success(instructions) => Some(instructions),
			TransferResult::Kyc(_) => None,
		}
	}

	pub fn kyc(&self) -> Option<&KycInstructions> {
		match self {
			TransferResult::Success(_) => None,
			TransferResult::Kyc(kyc) => Some(kyc),
		}
	}

	pub fn kyc_subtype(&self) -> Option<KycSubtype> {
		self.kyc().map(KycInstructions::subtype)
	}
}
