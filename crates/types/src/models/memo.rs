//! Transaction memo encoding

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::{AnchorError, AnchorResult};

/// Maximum length of a text memo in bytes
pub const MAX_TEXT_MEMO_BYTES: usize = 28;

/// Memo encodings an anchor may ask for
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum MemoType {
	Text,
	Id,
	Hash,
}

impl MemoType {
	pub fn as_str(&self) -> &'static str {
		match self {
			MemoType::Text => "text",
			MemoType::Id => "id",
			MemoType::Hash => "hash",
		}
	}
}

impl FromStr for MemoType {
	type Err = AnchorError;

	fn from_str(value: &str) -> Result<Self, Self::Err> {
		match value {
			"text" => Ok(MemoType::Text),
			"id" => Ok(MemoType::Id),
			"hash" => Ok(MemoType::Hash),
			other => Err(AnchorError::MemoFormat {
				reason: format!("unsupported memo type '{}'", other),
			}),
		}
	}
}

/// A memo attached to the payment sent to the anchor
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum Memo {
	Text(String),
	Id(u64),
	/// 32 raw bytes; anchors transmit these base64 encoded
	Hash([u8; 32]),
}

impl Memo {
	/// Decode the `(memo, memo_type)` pair an anchor returned
	///
	/// No memo value means no memo, whatever the type says. A memo value with
	/// a missing or unknown type cannot be encoded and is rejected.
	pub fn from_anchor_fields(memo: Option<&str>, memo_type: Option<&str>) -> AnchorResult<Option<Self>> {
		let Some(value) = memo else {
			return Ok(None);
		};

		let memo_type = memo_type.ok_or_else(|| AnchorError::MemoFormat {
			reason: format!("memo '{}' has no memo type", value),
		})?;

		let memo = match memo_type.parse::<MemoType>()? {
			MemoType::Text => {
				if value.len() > MAX_TEXT_MEMO_BYTES {
					return Err(AnchorError::MemoFormat {
						reason: format!(
							"text memo is {} bytes, limit is {}",
							value.len(),
							MAX_TEXT_MEMO_BYTES
						),
					});
				}
				Memo::Text(value.to_string())
			},
			MemoType::Id => Memo::Id(value.parse::<u64>().map_err(|e| {
				AnchorError::MemoFormat {
					reason: format!("id memo '{}' is not an unsigned integer: {}", value, e),
				}
			})?),
			MemoType::Hash => {
				let bytes = STANDARD.decode(value).map_err(|e| AnchorError::MemoFormat {
					reason: format!("hash memo is not valid base64: {}", e),
				})?;
				let hash: [u8; 32] =
					bytes
						.as_slice()
						.try_into()
						.map_err(|_| AnchorError::MemoFormat {
							reason: format!("hash memo must be 32 bytes, got {}", bytes.len()),
						})?;
				Memo::Hash(hash)
			},
		};

		Ok(Some(memo))
	}

	pub fn memo_type(&self) -> MemoType {
		match self {
			Memo::Text(_) => MemoType::Text,
			Memo::Id(_) => MemoType::Id,
			Memo::Hash(_) => MemoType::Hash,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use base64::Engine as _;

	#[test]
	fn test_no_memo_value_means_no_memo() {
		assert_eq!(Memo::from_anchor_fields(None, Some("id")).unwrap(), None);
		assert_eq!(Memo::from_anchor_fields(None, None).unwrap(), None);
	}

	#[test]
	fn test_decodes_each_memo_type() {
		assert_eq!(
			Memo::from_anchor_fields(Some("hello"), Some("text")).unwrap(),
			Some(Memo::Text("hello".to_string()))
		);
		assert_eq!(
			Memo::from_anchor_fields(Some("123456"), Some("id")).unwrap(),
			Some(Memo::Id(123456))
		);

		let encoded = STANDARD.encode([7u8; 32]);
		assert_eq!(
			Memo::from_anchor_fields(Some(&encoded), Some("hash")).unwrap(),
			Some(Memo::Hash([7u8; 32]))
		);
	}

	#[test]
	fn test_memo_without_type_is_rejected() {
		let result = Memo::from_anchor_fields(Some("123"), None);
		assert!(matches!(result, Err(AnchorError::MemoFormat { .. })));
	}

	#[test]
	fn test_unknown_or_malformed_memo_is_rejected() {
		assert!(Memo::from_anchor_fields(Some("123"), Some("return")).is_err());
		assert!(Memo::from_anchor_fields(Some("abc"), Some("id")).is_err());
		assert!(Memo::from_anchor_fields(Some("not base64!"), Some("hash")).is_err());
		assert!(Memo::from_anchor_fields(Some(&STANDARD.encode([1u8; 16])), Some("hash")).is_err());
		assert!(Memo::from_anchor_fields(Some(&"x".repeat(29)), Some("text")).is_err());
	}
}
