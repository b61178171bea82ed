//! Bearer token handling for authenticated anchor requests
//!
//! Tokens obtained from an anchor's web authentication endpoint are short lived
//! but grant access to the user's transfers, so they are zeroized on drop and
//! never printed or serialized in clear text.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// A bearer token that zeroizes its contents when dropped
///
/// # Examples
///
/// ```rust
/// use anchor_types::AuthToken;
///
/// let token = AuthToken::new("eyJhbGciOi...");
/// assert_eq!(token.authorization_header(), "Bearer eyJhbGciOi...");
/// ```
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct AuthToken {
	inner: String,
}

impl AuthToken {
	pub fn new(token: impl Into<String>) -> Self {
		Self {
			inner: token.into(),
		}
	}

	/// Expose the raw token
	///
	/// Only the HTTP layer should need this.
	pub fn expose_secret(&self) -> &str {
		&self.inner
	}

	/// Value for the `Authorization` header
	pub fn authorization_header(&self) -> String {
		format!("Bearer {}", self.inner)
	}

	pub fn is_empty(&self) -> bool {
		self.inner.is_empty()
	}
}

impl fmt::Debug for AuthToken {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("AuthToken")
			.field("inner", &"[REDACTED]")
			.finish()
	}
}

impl fmt::Display for AuthToken {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "[REDACTED]")
	}
}

impl From<String> for AuthToken {
	fn from(token: String) -> Self {
		Self::new(token)
	}
}

impl From<&str> for AuthToken {
	fn from(token: &str) -> Self {
		Self::new(token)
	}
}

impl Serialize for AuthToken {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		serializer.serialize_str("[REDACTED]")
	}
}

impl<'de> Deserialize<'de> for AuthToken {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: Deserializer<'de>,
	{
		let token = String::deserialize(deserializer)?;
		Ok(AuthToken::new(token))
	}
}

impl PartialEq for AuthToken {
	fn eq(&self, other: &Self) -> bool {
		self.inner == other.inner
	}
}

impl Eq for AuthToken {}
