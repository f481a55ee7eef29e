//! Tenant-aware Zendesk OAuth 2.0 strategy: derive per-account endpoints from a subdomain,
//! drive the authorization-code exchange through the generic `oauth2` client, and normalize
//! the Zendesk profile for the host application.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod error;
pub mod http;
pub mod oauth;
pub mod obs;
pub mod profile;
pub mod session;
pub mod strategy;
pub mod tenant;
pub mod token;
#[cfg(all(any(test, feature = "test"), feature = "reqwest"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{
		http::ReqwestHttpClient,
		oauth::ReqwestTransportErrorMapper,
		strategy::{StrategyOptions, ZendeskStrategy},
		tenant::{ClientEndpoints, EndpointResolver, StaticResolver},
	};

	/// Strategy type alias used by reqwest-backed integration tests.
	pub type ReqwestTestStrategy = ZendeskStrategy<ReqwestHttpClient, ReqwestTransportErrorMapper>;

	/// Builds a reqwest HTTP client that accepts the self-signed certificates produced by
	/// `httpmock` during tests.
	pub fn test_reqwest_http_client() -> ReqwestHttpClient {
		let client = ReqwestClient::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.build()
			.expect("Failed to build insecure Reqwest client for tests.");

		ReqwestHttpClient::with_client(client)
	}

	/// Constructs a [`ZendeskStrategy`] pinned to the provided endpoints (typically a mock
	/// server), backed by the reqwest transport used across integration tests.
	pub fn build_reqwest_test_strategy(
		endpoints: ClientEndpoints,
		client_id: &str,
		client_secret: &str,
		redirect_uri: Url,
	) -> ReqwestTestStrategy {
		let resolver: Arc<dyn EndpointResolver> = Arc::new(StaticResolver::new(endpoints));
		let http_client = test_reqwest_http_client();
		let mapper = Arc::new(ReqwestTransportErrorMapper);

		ZendeskStrategy::with_http_client(
			resolver,
			StrategyOptions::default(),
			client_id,
			redirect_uri,
			http_client,
			mapper,
		)
		.with_client_secret(client_secret)
	}
}

mod _prelude {
	pub use std::{
		collections::{BTreeMap, HashMap},
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		str::FromStr,
		sync::Arc,
	};

	pub use async_lock::Mutex as AsyncMutex;
	pub use parking_lot::{Mutex, RwLock};
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use serde_json::Value as JsonValue;
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(all(test, feature = "reqwest"))] use {httpmock as _, tokio as _};
