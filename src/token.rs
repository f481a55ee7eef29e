//! Credential material issued by the token endpoint.

// self
use crate::_prelude::*;

/// Redacted token secret wrapper keeping sensitive material out of logs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenSecret(String);
impl TokenSecret {
	/// Wraps a new secret string.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the inner token value. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}
}
impl AsRef<str> for TokenSecret {
	fn as_ref(&self) -> &str {
		self.expose()
	}
}
impl Debug for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("TokenSecret").field(&"<redacted>").finish()
	}
}
impl Display for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

/// Credentials returned by a successful authorization-code exchange.
///
/// `expires_at` is optional because Zendesk access tokens do not expire by default; it is
/// populated only when the token endpoint reports an `expires_in`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
	/// Bearer access token for the tenant API.
	pub access_token: TokenSecret,
	/// Optional refresh token.
	pub refresh_token: Option<TokenSecret>,
	/// Expiry instant, when the provider reported one.
	pub expires_at: Option<OffsetDateTime>,
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn secret_formatters_redact() {
		let secret = TokenSecret::new("super-secret");

		assert_eq!(format!("{secret:?}"), "TokenSecret(\"<redacted>\")");
		assert_eq!(format!("{secret}"), "<redacted>");
	}

	#[test]
	fn credentials_serialize_without_leaking_structure_changes() {
		let credentials = Credentials {
			access_token: TokenSecret::new("token"),
			refresh_token: None,
			expires_at: None,
		};
		let value = serde_json::to_value(&credentials)
			.expect("Credentials should serialize successfully.");

		assert_eq!(value["access_token"], "token");
		assert_eq!(value["refresh_token"], JsonValue::Null);
		assert_eq!(value["expires_at"], JsonValue::Null);
	}
}
