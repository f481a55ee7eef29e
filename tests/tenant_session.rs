// self
use zendesk_oauth2::{
	error::Error,
	session::{ACCOUNT_SESSION_KEY, MemorySession, STATE_SESSION_KEY, SessionState},
	tenant::{Account, AccountError, ClientEndpoints, EndpointResolver, StaticResolver, SubdomainResolver},
	url::Url,
};

fn account(value: &str) -> Account {
	Account::new(value).expect("Failed to build account fixture.")
}

#[test]
fn account_normalizes_and_validates_subdomain_labels() {
	assert_eq!(account("Acme").as_ref(), "acme");
	assert_eq!(account("support-1").as_ref(), "support-1");

	assert!(matches!(Account::new(""), Err(AccountError::Empty)));
	assert!(matches!(Account::new("-acme"), Err(AccountError::HyphenAtEdge)));
	assert!(matches!(Account::new("acme-"), Err(AccountError::HyphenAtEdge)));
	assert!(matches!(
		Account::new("acme.zendesk.com"),
		Err(AccountError::InvalidCharacter { character: '.' })
	));
	assert!(matches!(
		Account::new("evil/../path"),
		Err(AccountError::InvalidCharacter { .. })
	));
	assert!(matches!(Account::new("a".repeat(64)), Err(AccountError::TooLong { .. })));
}

#[test]
fn subdomain_resolver_derives_every_endpoint_beneath_the_tenant_site() {
	let endpoints = SubdomainResolver
		.resolve(&account("acme"))
		.expect("Endpoint resolution should succeed for a valid account.");

	assert_eq!(endpoints.site.as_str(), "https://acme.zendesk.com/");
	assert_eq!(endpoints.authorize_url.as_str(), "https://acme.zendesk.com/oauth/authorizations/new");
	assert_eq!(endpoints.token_url.as_str(), "https://acme.zendesk.com/oauth/tokens");
	assert_eq!(
		endpoints.profile_url().expect("Profile URL should derive from the site.").as_str(),
		"https://acme.zendesk.com/api/v2/users/me.json"
	);
}

#[test]
fn static_resolver_pins_endpoints_for_every_account() {
	let pinned = ClientEndpoints::under_site(
		Url::parse("http://127.0.0.1:8080").expect("Failed to parse pinned site URL."),
	)
	.expect("Endpoints should derive beneath the pinned site.");
	let resolver = StaticResolver::new(pinned.clone());

	assert_eq!(
		resolver.resolve(&account("acme")).expect("Static resolution should succeed."),
		pinned
	);
	assert_eq!(
		resolver.resolve(&account("other")).expect("Static resolution should succeed."),
		pinned
	);
}

#[test]
fn memory_session_round_trips_the_attempt_keys() {
	let session = MemorySession::default();

	assert_eq!(ACCOUNT_SESSION_KEY, "omniauth.zendesk.account");

	session.insert(ACCOUNT_SESSION_KEY, "acme".into());
	session.insert(STATE_SESSION_KEY, "state-123".into());

	assert_eq!(session.get(ACCOUNT_SESSION_KEY).as_deref(), Some("acme"));
	assert_eq!(session.remove(STATE_SESSION_KEY).as_deref(), Some("state-123"));
	assert_eq!(session.get(STATE_SESSION_KEY), None);
}

#[test]
fn account_errors_convert_into_strategy_errors() {
	let err = Error::from(Account::new("no spaces").expect_err("Spaces should be rejected."));

	assert!(matches!(err, Error::Account(AccountError::InvalidCharacter { character: ' ' })));
}
