//! Tenant-aware strategy orchestrating the request and callback phases.

pub mod options;

mod callback;
mod request;

pub use callback::*;
pub use options::*;
pub use request::*;

// self
use crate::{
	_prelude::*,
	http::ProviderHttpClient,
	oauth::TransportErrorMapper,
	tenant::{EndpointResolver, SubdomainResolver},
};
#[cfg(feature = "reqwest")]
use crate::{http::ReqwestHttpClient, oauth::ReqwestTransportErrorMapper};

#[cfg(feature = "reqwest")]
/// Strategy specialized for the crate's default reqwest transport stack.
pub type ReqwestStrategy = ZendeskStrategy<ReqwestHttpClient, ReqwestTransportErrorMapper>;

/// Coordinates a tenant-aware authorization-code attempt against Zendesk.
///
/// The strategy owns the HTTP transport, the endpoint resolver, and the configured options
/// so the two phase implementations can focus on their request-lifecycle duties: the request
/// phase stashes the account and builds the redirect, the callback phase recomputes the
/// tenant endpoints and exchanges the code. Instances are cheap to construct, so hosts may
/// build one per request or share one across requests.
#[derive(Clone)]
pub struct ZendeskStrategy<C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// HTTP client wrapper used for every outbound provider request.
	pub http_client: Arc<C>,
	/// Mapper applied to transport-layer errors before surfacing them to callers.
	pub transport_mapper: Arc<M>,
	/// Resolver that turns the account subdomain into the tenant endpoint triple.
	pub resolver: Arc<dyn EndpointResolver>,
	/// Provider name, scope, and token-params configuration.
	pub options: StrategyOptions,
	/// OAuth 2.0 client identifier registered with Zendesk.
	pub client_id: String,
	/// Optional client secret for confidential clients.
	pub client_secret: Option<String>,
	/// Redirect URI the callback phase is served under.
	pub redirect_uri: Url,
}
impl<C, M> ZendeskStrategy<C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Creates a strategy that reuses the caller-provided transport + mapper pair.
	pub fn with_http_client(
		resolver: Arc<dyn EndpointResolver>,
		options: StrategyOptions,
		client_id: impl Into<String>,
		redirect_uri: Url,
		http_client: impl Into<Arc<C>>,
		mapper: impl Into<Arc<M>>,
	) -> Self {
		Self {
			http_client: http_client.into(),
			transport_mapper: mapper.into(),
			resolver,
			options,
			client_id: client_id.into(),
			client_secret: None,
			redirect_uri,
		}
	}

	/// Sets or replaces the client secret used for confidential client auth.
	pub fn with_client_secret(mut self, secret: impl Into<String>) -> Self {
		self.client_secret = Some(secret.into());

		self
	}

	/// Replaces the configured options.
	pub fn with_options(mut self, options: StrategyOptions) -> Self {
		self.options = options;

		self
	}
}
#[cfg(feature = "reqwest")]
impl ZendeskStrategy<ReqwestHttpClient, ReqwestTransportErrorMapper> {
	/// Creates a new strategy for the provided client identifier and redirect URI.
	///
	/// The strategy provisions its own reqwest-backed transport and resolves endpoints
	/// through the public `{account}.zendesk.com` templates. Use
	/// [`ZendeskStrategy::with_client_secret`] to attach a confidential client secret.
	pub fn new(client_id: impl Into<String>, redirect_uri: Url) -> Self {
		Self::with_http_client(
			Arc::new(SubdomainResolver),
			StrategyOptions::default(),
			client_id,
			redirect_uri,
			ReqwestHttpClient::default(),
			Arc::new(ReqwestTransportErrorMapper),
		)
	}
}
impl<C, M> Debug for ZendeskStrategy<C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ZendeskStrategy")
			.field("options", &self.options)
			.field("client_id", &self.client_id)
			.field("client_secret_set", &self.client_secret.is_some())
			.field("redirect_uri", &self.redirect_uri)
			.finish()
	}
}
