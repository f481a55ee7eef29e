//! Request phase: stash the tenant account and build the authorization redirect.
//!
//! Zendesk serves per-customer endpoints under a unique subdomain, pulled from the `account`
//! query parameter of the inbound request. The phase stashes the account into session state
//! so the callback can retrieve it, resolves the tenant endpoints, and delegates redirect
//! construction to the generic client. No outbound call happens during this phase.

// self
use crate::{
	_prelude::*,
	http::ProviderHttpClient,
	oauth::{AuthCodeFacade, TransportErrorMapper},
	obs::{self, PhaseKind, PhaseOutcome},
	session::{ACCOUNT_SESSION_KEY, STATE_SESSION_KEY, SessionState},
	strategy::ZendeskStrategy,
	tenant::{Account, ClientEndpoints},
};

/// Query parameters extracted from the inbound authentication request.
#[derive(Clone, Debug, Default)]
pub struct AuthRequest {
	pairs: Vec<(String, String)>,
}
impl AuthRequest {
	/// Wraps pre-parsed query pairs.
	pub fn new<I, K, V>(pairs: I) -> Self
	where
		I: IntoIterator<Item = (K, V)>,
		K: Into<String>,
		V: Into<String>,
	{
		Self { pairs: pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect() }
	}

	/// Extracts the query pairs from a request URL.
	pub fn from_url(url: &Url) -> Self {
		Self::new(url.query_pairs().into_owned())
	}

	/// Returns the first value for the provided query key.
	pub fn param(&self, key: &str) -> Option<&str> {
		self.pairs.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
	}

	pub(crate) fn account(&self) -> Result<Account> {
		let raw = self.param("account").ok_or(Error::MissingAccount)?;

		Ok(Account::new(raw)?)
	}
}

/// Redirect produced by the request phase.
///
/// `redirect_url` is the fully-formed tenant authorize URL the host should send the end user
/// to; `state` mirrors the CSRF value already stashed in the session.
#[derive(Clone, Debug)]
pub struct AuthorizationRedirect {
	/// Account the attempt is scoped to.
	pub account: Account,
	/// Tenant endpoints resolved for the attempt.
	pub endpoints: ClientEndpoints,
	/// Authorize URL carrying response_type/client_id/redirect_uri/scope/state.
	pub redirect_url: Url,
	/// CSRF state minted by the generic client.
	pub state: String,
}

impl<C, M> ZendeskStrategy<C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Runs the request phase for one authentication attempt.
	///
	/// Fails with [`Error::MissingAccount`] when the inbound query lacks the `account` key;
	/// nothing is written to the session in that case.
	pub fn request_phase(
		&self,
		session: &dyn SessionState,
		request: &AuthRequest,
	) -> Result<AuthorizationRedirect> {
		const KIND: PhaseKind = PhaseKind::Request;

		obs::record_phase_outcome(KIND, PhaseOutcome::Attempt);

		let result = {
			let _guard = KIND.span().enter();

			self.build_redirect(session, request)
		};

		obs::record_phase_result(KIND, &result);

		result
	}

	fn build_redirect(
		&self,
		session: &dyn SessionState,
		request: &AuthRequest,
	) -> Result<AuthorizationRedirect> {
		let account = request.account()?;

		// Stash the account so the callback phase can recompute the tenant endpoints.
		session.insert(ACCOUNT_SESSION_KEY, account.to_string());

		let endpoints = self.resolver.resolve(&account)?;
		let facade: AuthCodeFacade<C, M> = AuthCodeFacade::from_endpoints(
			&endpoints,
			&self.client_id,
			self.client_secret.as_deref(),
			&self.redirect_uri,
			self.http_client.clone(),
			self.transport_mapper.clone(),
		)?;
		let (redirect_url, state) = facade.authorization_redirect(self.options.scopes());

		session.insert(STATE_SESSION_KEY, state.clone());

		Ok(AuthorizationRedirect { account, endpoints, redirect_url, state })
	}
}
