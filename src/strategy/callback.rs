//! Callback phase: recompute tenant endpoints and exchange the authorization code.
//!
//! The strategy object may be freshly constructed for the callback request, so the tenant
//! endpoints are recomputed from the session-stashed account rather than carried over from
//! the request phase.

// self
use crate::{
	_prelude::*,
	error::ConfigError,
	http::ProviderHttpClient,
	oauth::{AuthCodeFacade, TransportErrorMapper},
	obs::{self, PhaseKind, PhaseOutcome},
	profile::AuthenticatedUser,
	session::{ACCOUNT_SESSION_KEY, STATE_SESSION_KEY, SessionState},
	strategy::ZendeskStrategy,
	tenant::Account,
};

/// Parameters delivered to the redirect URI by the provider.
#[derive(Clone, Debug)]
pub struct CallbackParams {
	/// Authorization code to exchange.
	pub code: String,
	/// State echoed back by the provider, when present.
	pub state: Option<String>,
}
impl CallbackParams {
	/// Wraps a bare authorization code.
	pub fn new(code: impl Into<String>) -> Self {
		Self { code: code.into(), state: None }
	}

	/// Attaches the echoed state parameter.
	pub fn with_state(mut self, state: impl Into<String>) -> Self {
		self.state = Some(state.into());

		self
	}

	/// Extracts callback parameters from the redirect URL Zendesk sent the user back to.
	///
	/// A provider `error` parameter (e.g. the end user denied access) surfaces as
	/// [`Error::InvalidGrant`] without any outbound call.
	pub fn from_url(url: &Url) -> Result<Self> {
		let pairs: HashMap<_, _> = url.query_pairs().into_owned().collect();

		if let Some(error) = pairs.get("error") {
			let reason = match pairs.get("error_description") {
				Some(description) => format!("Provider returned `{error}`: {description}"),
				None => format!("Provider returned `{error}` on the callback"),
			};

			return Err(Error::InvalidGrant { reason });
		}

		let code = pairs.get("code").cloned().ok_or(ConfigError::MissingAuthorizationCode)?;

		Ok(Self { code, state: pairs.get("state").cloned() })
	}
}

impl<C, M> ZendeskStrategy<C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Runs the callback phase for one authentication attempt.
	///
	/// Reads the account stashed during the request phase, validates the echoed state,
	/// recomputes the tenant endpoints, and delegates the code-for-token exchange to the
	/// generic client with the augmented token parameters.
	pub async fn callback_phase(
		&self,
		session: &dyn SessionState,
		params: CallbackParams,
	) -> Result<AuthenticatedUser<C, M>> {
		const KIND: PhaseKind = PhaseKind::Callback;

		obs::record_phase_outcome(KIND, PhaseOutcome::Attempt);

		let result = KIND.span().wrap(self.exchange(session, params)).await;

		obs::record_phase_result(KIND, &result);

		result
	}

	async fn exchange(
		&self,
		session: &dyn SessionState,
		params: CallbackParams,
	) -> Result<AuthenticatedUser<C, M>> {
		let account = stashed_account(session)?;

		validate_state(session, params.state.as_deref())?;

		let endpoints = self.resolver.resolve(&account)?;
		let facade: AuthCodeFacade<C, M> = AuthCodeFacade::from_endpoints(
			&endpoints,
			&self.client_id,
			self.client_secret.as_deref(),
			&self.redirect_uri,
			self.http_client.clone(),
			self.transport_mapper.clone(),
		)?;
		// The generic client emits grant_type itself; everything else rides as extra params.
		let extra_params: Vec<(String, String)> = self
			.options
			.token_request_params()
			.into_iter()
			.filter(|(key, _)| key != "grant_type")
			.collect();
		let credentials = facade.exchange_code(&params.code, &extra_params).await?;

		Ok(AuthenticatedUser::new(
			self.options.name.clone(),
			account,
			endpoints,
			credentials,
			self.http_client.clone(),
			self.transport_mapper.clone(),
		))
	}
}

fn stashed_account(session: &dyn SessionState) -> Result<Account> {
	let raw = session.get(ACCOUNT_SESSION_KEY).ok_or(Error::MissingSessionAccount)?;

	Ok(Account::new(raw)?)
}

// One string comparison; state generation stays with the generic client. Hosts that manage
// CSRF themselves never stash a state and their provider never echoes one, so (None, None)
// stays permissive; a state arriving with nothing stashed fails closed.
fn validate_state(session: &dyn SessionState, returned: Option<&str>) -> Result<()> {
	match (session.remove(STATE_SESSION_KEY), returned) {
		(None, None) => Ok(()),
		(Some(expected), Some(returned)) if expected == returned => Ok(()),
		_ => Err(Error::InvalidGrant { reason: "Authorization state mismatch".into() }),
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::session::MemorySession;

	#[test]
	fn callback_params_parse_the_redirect_url() {
		let url = Url::parse("https://app.example.com/callback?code=abc&state=xyz")
			.expect("Callback URL fixture should parse.");
		let params = CallbackParams::from_url(&url).expect("Parameters should extract.");

		assert_eq!(params.code, "abc");
		assert_eq!(params.state.as_deref(), Some("xyz"));
	}

	#[test]
	fn callback_params_surface_provider_errors() {
		let url = Url::parse(
			"https://app.example.com/callback?error=access_denied&error_description=denied",
		)
		.expect("Callback URL fixture should parse.");
		let err = CallbackParams::from_url(&url)
			.expect_err("Provider errors should short-circuit parsing.");

		assert!(matches!(err, Error::InvalidGrant { .. }));

		let url = Url::parse("https://app.example.com/callback?state=xyz")
			.expect("Callback URL fixture should parse.");
		let err =
			CallbackParams::from_url(&url).expect_err("A missing code should be rejected.");

		assert!(matches!(err, Error::Config(ConfigError::MissingAuthorizationCode)));
	}

	#[test]
	fn state_validation_consumes_the_session_entry() {
		let session = MemorySession::default();

		session.insert(STATE_SESSION_KEY, "expected".into());

		assert!(validate_state(&session, Some("expected")).is_ok());
		assert_eq!(session.get(STATE_SESSION_KEY), None);

		session.insert(STATE_SESSION_KEY, "expected".into());

		let err = validate_state(&session, Some("other"))
			.expect_err("State mismatch should fail.");

		assert!(matches!(err, Error::InvalidGrant { .. }));

		session.insert(STATE_SESSION_KEY, "expected".into());

		let err =
			validate_state(&session, None).expect_err("A swallowed state should also fail.");

		assert!(matches!(err, Error::InvalidGrant { .. }));
	}

	#[test]
	fn state_validation_fails_closed_when_nothing_is_stashed() {
		let session = MemorySession::default();

		// A consumed or never-stashed state must not accept whatever the caller presents.
		let err = validate_state(&session, Some("attacker-state"))
			.expect_err("A state with no stashed counterpart should fail.");

		assert!(matches!(err, Error::InvalidGrant { .. }));

		// Hosts that manage CSRF themselves neither stash nor echo a state.
		assert!(validate_state(&session, None).is_ok());
	}

	#[test]
	fn stashed_account_revalidates_session_input() {
		let session = MemorySession::default();
		let err = stashed_account(&session)
			.expect_err("An empty session should report an expired attempt.");

		assert!(matches!(err, Error::MissingSessionAccount));

		session.insert(ACCOUNT_SESSION_KEY, "not a label".into());

		assert!(matches!(stashed_account(&session), Err(Error::Account(_))));

		session.insert(ACCOUNT_SESSION_KEY, "acme".into());

		assert_eq!(
			stashed_account(&session).expect("A valid stash should round-trip.").as_ref(),
			"acme"
		);
	}
}
