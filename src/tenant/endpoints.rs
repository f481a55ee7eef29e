//! Tenant-scoped endpoint resolution.
//!
//! Zendesk exposes per-customer endpoints under a unique subdomain instead of a single
//! consistent host, so the endpoint triple is recomputed from the account on both the
//! request and callback phases and never persisted.

// self
use crate::{_prelude::*, error::ConfigError, tenant::Account};

/// Public Zendesk domain that account subdomains are interpolated into.
pub const ZENDESK_DOMAIN: &str = "zendesk.com";
/// Authorization endpoint path relative to the tenant site.
pub const AUTHORIZE_PATH: &str = "/oauth/authorizations/new";
/// Token endpoint path relative to the tenant site.
pub const TOKEN_PATH: &str = "/oauth/tokens";
/// Authenticated current-user endpoint path relative to the tenant site.
pub const PROFILE_PATH: &str = "/api/v2/users/me.json";

/// Endpoint triple derived from an account subdomain.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientEndpoints {
	/// Tenant site root, e.g. `https://acme.zendesk.com`.
	pub site: Url,
	/// Authorization endpoint used to build the redirect.
	pub authorize_url: Url,
	/// Token endpoint used for the code exchange.
	pub token_url: Url,
}
impl ClientEndpoints {
	/// Assembles an endpoint triple from pre-resolved URLs.
	pub fn new(site: Url, authorize_url: Url, token_url: Url) -> Self {
		Self { site, authorize_url, token_url }
	}

	/// Derives the endpoint triple for an account by interpolating it into the fixed
	/// `https://{account}.zendesk.com` templates.
	pub fn for_account(account: &Account) -> Result<Self> {
		let site = Url::parse(&format!("https://{account}.{ZENDESK_DOMAIN}"))
			.map_err(|source| ConfigError::InvalidEndpoint { source })?;

		Self::under_site(site)
	}

	/// Derives the authorize/token endpoints beneath an arbitrary site root.
	pub fn under_site(site: Url) -> Result<Self> {
		let authorize_url =
			site.join(AUTHORIZE_PATH).map_err(|source| ConfigError::InvalidEndpoint { source })?;
		let token_url =
			site.join(TOKEN_PATH).map_err(|source| ConfigError::InvalidEndpoint { source })?;

		Ok(Self { site, authorize_url, token_url })
	}

	/// Authenticated current-user endpoint beneath the tenant site.
	pub fn profile_url(&self) -> Result<Url> {
		self.site.join(PROFILE_PATH).map_err(|source| ConfigError::InvalidEndpoint { source }.into())
	}
}

/// Resolves the endpoint triple for an account subdomain.
///
/// The default [`SubdomainResolver`] covers every hosted Zendesk instance; hosts that pin
/// endpoints (mock servers in tests, host-mapped installs) supply a [`StaticResolver`] or
/// their own implementation.
pub trait EndpointResolver: Send + Sync {
	/// Produces the endpoints the strategy should use for the provided account.
	fn resolve(&self, account: &Account) -> Result<ClientEndpoints>;
}

/// Default resolver interpolating the account into the public Zendesk domain.
#[derive(Clone, Copy, Debug, Default)]
pub struct SubdomainResolver;
impl EndpointResolver for SubdomainResolver {
	fn resolve(&self, account: &Account) -> Result<ClientEndpoints> {
		ClientEndpoints::for_account(account)
	}
}

/// Resolver that returns the same endpoint triple for every account.
#[derive(Clone, Debug)]
pub struct StaticResolver(ClientEndpoints);
impl StaticResolver {
	/// Pins the resolver to the provided endpoints.
	pub fn new(endpoints: ClientEndpoints) -> Self {
		Self(endpoints)
	}
}
impl EndpointResolver for StaticResolver {
	fn resolve(&self, _account: &Account) -> Result<ClientEndpoints> {
		Ok(self.0.clone())
	}
}
