//! Strategy configuration: provider name, scope string, and extra token parameters.

// self
use crate::_prelude::*;

/// Strategy name exposed to the host application.
pub const PROVIDER_NAME: &str = "zendesk";
/// Default scope granting full read/write access to the tenant API.
pub const DEFAULT_SCOPE: &str = "read write";
/// Grant type Zendesk requires on every token request.
pub const TOKEN_GRANT_TYPE: &str = "authorization_code";

/// Host-facing configuration surface of the strategy.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategyOptions {
	/// Provider name stamped onto the normalized auth output.
	pub name: String,
	/// Scope string requested during authorization and repeated on the token request.
	pub scope: String,
	/// Extra token-request parameters merged into the outgoing exchange.
	pub token_params: BTreeMap<String, String>,
}
impl StrategyOptions {
	/// Creates options with the Zendesk defaults.
	pub fn new() -> Self {
		Self::default()
	}

	/// Overrides the requested scope string.
	pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
		self.scope = scope.into();

		self
	}

	/// Adds or replaces an extra token-request parameter.
	pub fn with_token_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.token_params.insert(key.into(), value.into());

		self
	}

	/// Individual scope entries for the authorize request.
	pub fn scopes(&self) -> impl Iterator<Item = &str> {
		self.scope.split_whitespace()
	}

	/// Token-request parameters with the mandatory entries merged in.
	///
	/// The result always carries `grant_type=authorization_code` and the configured scope,
	/// overriding any colliding entries in [`Self::token_params`].
	pub fn token_request_params(&self) -> BTreeMap<String, String> {
		let mut params = self.token_params.clone();

		params.insert("grant_type".into(), TOKEN_GRANT_TYPE.into());
		params.insert("scope".into(), self.scope.clone());

		params
	}
}
impl Default for StrategyOptions {
	fn default() -> Self {
		Self {
			name: PROVIDER_NAME.into(),
			scope: DEFAULT_SCOPE.into(),
			token_params: BTreeMap::from_iter([("grant_type".into(), TOKEN_GRANT_TYPE.into())]),
		}
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn defaults_match_the_provider_contract() {
		let options = StrategyOptions::default();

		assert_eq!(options.name, "zendesk");
		assert_eq!(options.scope, "read write");
		assert_eq!(options.scopes().collect::<Vec<_>>(), ["read", "write"]);
		assert_eq!(
			options.token_params.get("grant_type").map(String::as_str),
			Some("authorization_code")
		);
	}

	#[test]
	fn token_request_params_force_grant_type_and_scope() {
		let options = StrategyOptions::new()
			.with_scope("read")
			.with_token_param("grant_type", "password")
			.with_token_param("scope", "everything")
			.with_token_param("audience", "api");
		let params = options.token_request_params();

		assert_eq!(params.get("grant_type").map(String::as_str), Some("authorization_code"));
		assert_eq!(params.get("scope").map(String::as_str), Some("read"));
		assert_eq!(params.get("audience").map(String::as_str), Some("api"));
	}
}
