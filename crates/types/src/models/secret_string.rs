//! Secure string handling for API keys and signer credentials
//!
//! The inner value is zeroized on drop and never printed or serialized.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// A string that zeroizes its contents when dropped
///
/// ```rust
/// use launchpad_types::SecretString;
///
/// let api_key = SecretString::new("lifi-api-key".to_string());
/// assert_eq!(api_key.expose_secret(), "lifi-api-key");
/// assert_eq!(format!("{}", api_key), "[REDACTED]");
/// ```
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SecretString {
	inner: String,
}

impl SecretString {
	pub fn new(secret: String) -> Self {
		Self { inner: secret }
	}

	/// Expose the secret value. Keep the borrowed value short-lived.
	pub fn expose_secret(&self) -> &str {
		&self.inner
	}

	pub fn is_empty(&self) -> bool {
		self.inner.is_empty()
	}
}

impl fmt::Debug for SecretString {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("SecretString").field(&"[REDACTED]").finish()
	}
}

impl fmt::Display for SecretString {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "[REDACTED]")
	}
}

impl From<String> for SecretString {
	fn from(secret: String) -> Self {
		Self::new(secret)
	}
}

impl From<&str> for SecretString {
	fn from(secret: &str) -> Self {
		Self::new(secret.to_string())
	}
}

impl Serialize for SecretString {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		serializer.serialize_str("[REDACTED]")
	}
}

impl<'de> Deserialize<'de> for SecretString {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: Deserializer<'de>,
	{
		String::deserialize(deserializer).map(SecretString::new)
	}
}
