//! Internal facade over the generic `oauth2` authorization-code client.
//!
//! The strategy composes with the generic client instead of reimplementing the grant
//! machinery: the facade configures a [`BasicClient`] from a tenant endpoint triple, builds
//! the authorization redirect, and performs the async code exchange with whatever extra form
//! parameters the strategy options demand.

pub use oauth2;

// crates.io
use oauth2::{
	AuthUrl, AuthorizationCode, ClientId, ClientSecret, CsrfToken, EndpointNotSet, EndpointSet,
	HttpClientError, RedirectUrl, RequestTokenError, Scope, TokenResponse, TokenUrl,
	basic::{BasicClient, BasicErrorResponse, BasicRequestTokenError},
};
// self
use crate::{
	_prelude::*,
	error::{ConfigError, TransientError, TransportError},
	http::{ProviderHttpClient, ResponseMetadata, ResponseMetadataSlot},
	obs::PhaseKind,
	tenant::ClientEndpoints,
	token::{Credentials, TokenSecret},
};

type ConfiguredBasicClient =
	BasicClient<EndpointSet, EndpointNotSet, EndpointNotSet, EndpointNotSet, EndpointSet>;
type FacadeTokenResponse = oauth2::basic::BasicTokenResponse;

/// Maps HTTP transport failures into strategy [`Error`] values.
pub trait TransportErrorMapper<E>
where
	Self: 'static + Send + Sync,
	E: 'static + Send + Sync + StdError,
{
	/// Converts an [`HttpClientError`] emitted by the transport into a strategy error.
	fn map_transport_error(
		&self,
		phase: PhaseKind,
		metadata: Option<&ResponseMetadata>,
		error: HttpClientError<E>,
	) -> Error;
}

/// Default mapper for reqwest-backed transports.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestTransportErrorMapper;
#[cfg(feature = "reqwest")]
impl TransportErrorMapper<ReqwestError> for ReqwestTransportErrorMapper {
	fn map_transport_error(
		&self,
		phase: PhaseKind,
		meta: Option<&ResponseMetadata>,
		err: HttpClientError<ReqwestError>,
	) -> Error {
		match err {
			HttpClientError::Reqwest(inner) => map_reqwest_error(phase, meta, *inner),
			HttpClientError::Http(inner) => ConfigError::from(inner).into(),
			HttpClientError::Io(inner) => TransportError::Io(inner).into(),
			HttpClientError::Other(message) => map_generic_transport_error(phase, meta, message),
			_ => map_unknown_transport_error(phase, meta),
		}
	}
}

pub(crate) struct AuthCodeFacade<C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	oauth_client: ConfiguredBasicClient,
	http_client: Arc<C>,
	error_mapper: Arc<M>,
}
impl<C, M> AuthCodeFacade<C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	pub(crate) fn from_endpoints(
		endpoints: &ClientEndpoints,
		client_id: &str,
		client_secret: Option<&str>,
		redirect_uri: &Url,
		http_client: impl Into<Arc<C>>,
		error_mapper: impl Into<Arc<M>>,
	) -> Result<Self> {
		let auth_url = AuthUrl::new(endpoints.authorize_url.to_string())
			.map_err(|source| ConfigError::InvalidEndpoint { source })?;
		let token_url = TokenUrl::new(endpoints.token_url.to_string())
			.map_err(|source| ConfigError::InvalidEndpoint { source })?;
		let redirect_url = RedirectUrl::new(redirect_uri.to_string())
			.map_err(|source| ConfigError::InvalidRedirect { source })?;
		let mut oauth_client = BasicClient::new(ClientId::new(client_id.to_owned()))
			.set_auth_uri(auth_url)
			.set_token_uri(token_url)
			.set_redirect_uri(redirect_url);

		if let Some(secret) = client_secret {
			oauth_client = oauth_client.set_client_secret(ClientSecret::new(secret.to_owned()));
		}

		Ok(Self {
			oauth_client,
			http_client: http_client.into(),
			error_mapper: error_mapper.into(),
		})
	}

	/// Builds the authorization redirect URL plus the CSRF state the generic client minted.
	///
	/// Pure URL construction; no outbound call happens here.
	pub(crate) fn authorization_redirect<'s, I>(&self, scopes: I) -> (Url, String)
	where
		I: IntoIterator<Item = &'s str>,
	{
		let mut request = self.oauth_client.authorize_url(CsrfToken::new_random);

		for scope in scopes {
			request = request.add_scope(Scope::new(scope.to_owned()));
		}

		let (url, state) = request.url();

		(url, state.secret().clone())
	}

	/// Exchanges the authorization code for credentials, forwarding the augmented token
	/// parameters.
	pub(crate) async fn exchange_code(
		&self,
		code: &str,
		extra_params: &[(String, String)],
	) -> Result<Credentials> {
		let meta = ResponseMetadataSlot::default();
		let handle = self.http_client.with_metadata(meta.clone());
		let mut request =
			self.oauth_client.exchange_code(AuthorizationCode::new(code.to_owned()));

		for (key, value) in extra_params {
			request = request.add_extra_param(key.as_str(), value.as_str());
		}

		let response = request
			.request_async(&handle)
			.await
			.map_err(|err| map_request_error(meta.take(), err, self.error_mapper.as_ref()))?;

		Ok(credentials_from_response(response))
	}
}

fn credentials_from_response(response: FacadeTokenResponse) -> Credentials {
	let access_token = TokenSecret::new(response.access_token().secret().clone());
	let refresh_token = response.refresh_token().map(|token| TokenSecret::new(token.secret().clone()));
	// Zendesk tokens are non-expiring unless the application opted into expiry; only report
	// an instant when the endpoint did.
	let expires_at = response
		.expires_in()
		.and_then(|lifetime| i64::try_from(lifetime.as_secs()).ok())
		.map(|secs| OffsetDateTime::now_utc() + Duration::seconds(secs));

	Credentials { access_token, refresh_token, expires_at }
}

fn map_request_error<E, M>(
	meta: Option<ResponseMetadata>,
	err: BasicRequestTokenError<HttpClientError<E>>,
	mapper: &M,
) -> Error
where
	E: 'static + Send + Sync + StdError,
	M: ?Sized + TransportErrorMapper<E>,
{
	let meta_ref = meta.as_ref();

	match err {
		RequestTokenError::ServerResponse(response) =>
			map_server_response_error(response, meta_ref),
		RequestTokenError::Request(error) =>
			mapper.map_transport_error(PhaseKind::Callback, meta_ref, error),
		RequestTokenError::Parse(error, _body) =>
			TransientError::TokenResponseParse { source: error, status: meta_status(meta_ref) }
				.into(),
		RequestTokenError::Other(message) => TransientError::TokenEndpoint {
			message: format!("Token endpoint returned an unexpected response: {message}."),
			status: meta_status(meta_ref),
			retry_after: meta_retry_after(meta_ref),
		}
		.into(),
	}
}

fn map_server_response_error(
	response: BasicErrorResponse,
	meta: Option<&ResponseMetadata>,
) -> Error {
	let code = response.error().as_ref().to_owned();
	let message = if let Some(description) = response.error_description() {
		format!("Token endpoint returned an OAuth error: {description}.")
	} else {
		format!("Token endpoint returned an OAuth error: {code}.")
	};

	if matches!(code.as_str(), "invalid_grant" | "access_denied" | "invalid_scope") {
		return Error::InvalidGrant { reason: message };
	}
	if matches!(code.as_str(), "invalid_client" | "unauthorized_client") {
		return Error::InvalidClient { reason: message };
	}

	match meta_status(meta) {
		Some(400 | 404 | 410) => Error::InvalidGrant { reason: message },
		Some(401) => Error::InvalidClient { reason: message },
		_ => TransientError::TokenEndpoint {
			message,
			status: meta_status(meta),
			retry_after: meta_retry_after(meta),
		}
		.into(),
	}
}

#[cfg(feature = "reqwest")]
fn map_reqwest_error(
	phase: PhaseKind,
	meta: Option<&ResponseMetadata>,
	err: ReqwestError,
) -> Error {
	if err.is_builder() {
		return ConfigError::from(err).into();
	}
	if err.is_timeout() {
		return transient_endpoint_error(
			phase,
			format!("Request timed out while calling the {phase} endpoint."),
			meta_status(meta).or_else(|| err.status().map(|code| code.as_u16())),
			meta_retry_after(meta),
		);
	}

	TransportError::from(err).into()
}

fn map_generic_transport_error(
	phase: PhaseKind,
	meta: Option<&ResponseMetadata>,
	message: impl Display,
) -> Error {
	transient_endpoint_error(
		phase,
		format!("HTTP client error occurred while calling the {phase} endpoint: {message}."),
		meta_status(meta),
		meta_retry_after(meta),
	)
}

fn map_unknown_transport_error(phase: PhaseKind, meta: Option<&ResponseMetadata>) -> Error {
	transient_endpoint_error(
		phase,
		format!("HTTP client error occurred while calling the {phase} endpoint."),
		meta_status(meta),
		meta_retry_after(meta),
	)
}

fn transient_endpoint_error(
	phase: PhaseKind,
	message: String,
	status: Option<u16>,
	retry_after: Option<Duration>,
) -> Error {
	match phase {
		PhaseKind::Profile =>
			TransientError::ProfileEndpoint { message, status, retry_after }.into(),
		_ => TransientError::TokenEndpoint { message, status, retry_after }.into(),
	}
}

fn meta_status(meta: Option<&ResponseMetadata>) -> Option<u16> {
	meta.and_then(|value| value.status)
}

fn meta_retry_after(meta: Option<&ResponseMetadata>) -> Option<Duration> {
	meta.and_then(|value| value.retry_after)
}

#[cfg(all(test, feature = "reqwest"))]
mod tests {
	// self
	use super::*;
	use crate::{
		http::ReqwestHttpClient,
		tenant::{Account, ClientEndpoints},
	};

	fn endpoints() -> ClientEndpoints {
		ClientEndpoints::for_account(
			&Account::new("acme").expect("Account fixture should be valid."),
		)
		.expect("Endpoint resolution should succeed for the fixture account.")
	}

	fn facade(secret: Option<&str>) -> AuthCodeFacade<ReqwestHttpClient, ReqwestTransportErrorMapper> {
		AuthCodeFacade::from_endpoints(
			&endpoints(),
			"client-id",
			secret,
			&Url::parse("https://app.example.com/callback")
				.expect("Redirect URI fixture should parse."),
			Arc::new(ReqwestHttpClient::default()),
			Arc::new(ReqwestTransportErrorMapper),
		)
		.expect("Facade should build from tenant endpoints.")
	}

	#[test]
	fn builds_confidential_and_public_clients() {
		facade(Some("secret"));
		facade(None);
	}

	#[test]
	fn authorization_redirect_targets_the_tenant_authorize_endpoint() {
		let facade = facade(Some("secret"));
		let (url, state) = facade.authorization_redirect(["read", "write"]);

		assert_eq!(url.host_str(), Some("acme.zendesk.com"));
		assert_eq!(url.path(), "/oauth/authorizations/new");
		assert!(!state.is_empty());

		let pairs: HashMap<_, _> = url.query_pairs().into_owned().collect();

		assert_eq!(pairs.get("response_type"), Some(&"code".into()));
		assert_eq!(pairs.get("client_id"), Some(&"client-id".into()));
		assert_eq!(pairs.get("scope"), Some(&"read write".into()));
		assert_eq!(pairs.get("state"), Some(&state));
	}

	#[test]
	fn server_response_errors_classify_by_oauth_code() {
		let response: BasicErrorResponse = serde_json::from_str(
			"{\"error\":\"invalid_grant\",\"error_description\":\"already used\"}",
		)
		.expect("Error response fixture should deserialize.");

		assert!(matches!(
			map_server_response_error(response, None),
			Error::InvalidGrant { .. }
		));

		let response: BasicErrorResponse = serde_json::from_str("{\"error\":\"invalid_client\"}")
			.expect("Error response fixture should deserialize.");

		assert!(matches!(
			map_server_response_error(response, None),
			Error::InvalidClient { .. }
		));
	}
}
