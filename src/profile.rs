//! Authenticated profile fetch and normalization.
//!
//! A successful callback yields an [`AuthenticatedUser`] handle. Its first `raw_info` access
//! performs one GET against the tenant's `/api/v2/users/me.json` endpoint with the bearer
//! access token; the parsed body is memoized for the remainder of the handle's life. The
//! normalized [`AuthHash`] exposes the nested `user` object as `info` and the whole parsed
//! body as `extra.raw_info`.

// crates.io
use oauth2::{
	AsyncHttpClient,
	http::{Method, Request, header},
};
// self
use crate::{
	_prelude::*,
	error::{ConfigError, TransientError},
	http::{ProviderHttpClient, ResponseMetadata, ResponseMetadataSlot},
	oauth::TransportErrorMapper,
	obs::{self, PhaseKind, PhaseOutcome},
	tenant::{Account, ClientEndpoints},
	token::Credentials,
};

/// Authenticated outcome of a callback phase, scoped to one tenant account.
pub struct AuthenticatedUser<C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Account the credentials were issued for.
	pub account: Account,
	/// Tenant endpoints the attempt ran against.
	pub endpoints: ClientEndpoints,
	/// Credentials returned by the token endpoint.
	pub credentials: Credentials,
	provider: String,
	http_client: Arc<C>,
	transport_mapper: Arc<M>,
	raw_info: AsyncMutex<Option<JsonValue>>,
}
impl<C, M> AuthenticatedUser<C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	pub(crate) fn new(
		provider: String,
		account: Account,
		endpoints: ClientEndpoints,
		credentials: Credentials,
		http_client: Arc<C>,
		transport_mapper: Arc<M>,
	) -> Self {
		Self {
			account,
			endpoints,
			credentials,
			provider,
			http_client,
			transport_mapper,
			raw_info: AsyncMutex::new(None),
		}
	}

	/// Raw user data returned by the tenant's current-user endpoint.
	///
	/// The first access performs one HTTP GET; subsequent accesses return the memoized body.
	pub async fn raw_info(&self) -> Result<JsonValue> {
		let mut cached = self.raw_info.lock().await;

		if let Some(value) = cached.as_ref() {
			return Ok(value.clone());
		}

		let value = self.fetch_raw_info().await?;

		*cached = Some(value.clone());

		Ok(value)
	}

	/// Normalized authentication output for the host application.
	pub async fn auth_hash(&self) -> Result<AuthHash> {
		let raw_info = self.raw_info().await?;

		Ok(AuthHash::from_raw_info(self.provider.clone(), self.credentials.clone(), raw_info))
	}

	async fn fetch_raw_info(&self) -> Result<JsonValue> {
		const KIND: PhaseKind = PhaseKind::Profile;

		obs::record_phase_outcome(KIND, PhaseOutcome::Attempt);

		let result = KIND.span().wrap(self.get_profile()).await;

		obs::record_phase_result(KIND, &result);

		result
	}

	async fn get_profile(&self) -> Result<JsonValue> {
		let url = self.endpoints.profile_url()?;
		let request = Request::builder()
			.method(Method::GET)
			.uri(url.as_str())
			.header(
				header::AUTHORIZATION,
				format!("Bearer {}", self.credentials.access_token.expose()),
			)
			.header(header::ACCEPT, "application/json")
			.body(Vec::new())
			.map_err(ConfigError::from)?;
		let slot = ResponseMetadataSlot::default();
		let handle = self.http_client.with_metadata(slot.clone());
		let response = handle.call(request).await.map_err(|err| {
			let meta = slot.take();

			self.transport_mapper.map_transport_error(PhaseKind::Profile, meta.as_ref(), err)
		})?;
		let status = response.status();
		let meta = slot.take();

		if !status.is_success() {
			return Err(profile_status_error(status.as_u16(), meta.as_ref()));
		}

		let mut deserializer = serde_json::Deserializer::from_slice(response.body());

		serde_path_to_error::deserialize(&mut deserializer).map_err(|source| {
			TransientError::ProfileResponseParse { source, status: Some(status.as_u16()) }.into()
		})
	}
}
impl<C, M> Debug for AuthenticatedUser<C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AuthenticatedUser")
			.field("provider", &self.provider)
			.field("account", &self.account)
			.field("endpoints", &self.endpoints)
			.field("credentials", &self.credentials)
			.finish()
	}
}

/// Normalized authentication output mirroring the shape host middlewares expect.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AuthHash {
	/// Strategy name, `zendesk` unless reconfigured.
	pub provider: String,
	/// The `user` sub-object of the raw provider response (JSON null when absent).
	pub info: JsonValue,
	/// Credentials issued by the token endpoint.
	pub credentials: Credentials,
	/// Passthrough payloads.
	pub extra: ExtraInfo,
}
impl AuthHash {
	/// Builds the normalized output from the parsed current-user response.
	pub fn from_raw_info(provider: String, credentials: Credentials, raw_info: JsonValue) -> Self {
		let info = raw_info.get("user").cloned().unwrap_or(JsonValue::Null);

		Self { provider, info, credentials, extra: ExtraInfo { raw_info } }
	}
}

/// Raw passthrough section of the normalized output.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExtraInfo {
	/// Full parsed body of the current-user response.
	pub raw_info: JsonValue,
}

fn profile_status_error(status: u16, meta: Option<&ResponseMetadata>) -> Error {
	match status {
		401 | 403 => Error::InvalidGrant {
			reason: format!("Profile endpoint rejected the access token (HTTP {status})"),
		},
		_ => TransientError::ProfileEndpoint {
			message: format!("Profile endpoint returned HTTP {status}"),
			status: Some(status),
			retry_after: meta.and_then(|value| value.retry_after),
		}
		.into(),
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use serde_json::json;
	// self
	use super::*;
	use crate::token::TokenSecret;

	fn credentials() -> Credentials {
		Credentials {
			access_token: TokenSecret::new("token"),
			refresh_token: None,
			expires_at: None,
		}
	}

	#[test]
	fn auth_hash_exposes_the_user_object_as_info() {
		let raw = json!({
			"user": { "id": 1, "name": "Agent Smith", "email": "smith@acme.example" },
			"abilities": { "can_edit": true }
		});
		let hash = AuthHash::from_raw_info("zendesk".into(), credentials(), raw.clone());

		assert_eq!(hash.provider, "zendesk");
		assert_eq!(hash.info, raw["user"]);
		assert_eq!(hash.extra.raw_info, raw);
	}

	#[test]
	fn auth_hash_tolerates_a_missing_user_object() {
		let raw = json!({ "abilities": {} });
		let hash = AuthHash::from_raw_info("zendesk".into(), credentials(), raw.clone());

		assert_eq!(hash.info, JsonValue::Null);
		assert_eq!(hash.extra.raw_info, raw);
	}

	#[test]
	fn profile_status_errors_distinguish_rejection_from_transience() {
		assert!(matches!(profile_status_error(401, None), Error::InvalidGrant { .. }));
		assert!(matches!(
			profile_status_error(429, None),
			Error::Transient(TransientError::ProfileEndpoint { .. })
		));
		assert!(matches!(
			profile_status_error(500, None),
			Error::Transient(TransientError::ProfileEndpoint { .. })
		));
	}
}
