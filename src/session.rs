//! Session handoff contract between the request and callback phases.
//!
//! The account subdomain (and the CSRF state produced by the generic client) must survive
//! between the redirect-out step and the callback step of a single authentication attempt.
//! Rather than reaching into ambient middleware state, the strategy works against an
//! explicit [`SessionState`] handle the host passes into both phase calls; the handle
//! expires with the host session.

// self
use crate::_prelude::*;

/// Session key under which the account subdomain is stashed between phases.
pub const ACCOUNT_SESSION_KEY: &str = "omniauth.zendesk.account";
/// Session key under which the CSRF state is stashed between phases.
pub const STATE_SESSION_KEY: &str = "omniauth.zendesk.state";

/// Request-scoped session contract implemented over the host framework's session.
pub trait SessionState: Send + Sync {
	/// Stores or replaces a value under the provided key.
	fn insert(&self, key: &str, value: String);

	/// Returns the value stored under the key, if any.
	fn get(&self, key: &str) -> Option<String>;

	/// Removes and returns the value stored under the key, if any.
	fn remove(&self, key: &str) -> Option<String>;
}

/// Thread-safe in-process [`SessionState`] for demos and tests.
#[derive(Clone, Debug, Default)]
pub struct MemorySession(Arc<RwLock<HashMap<String, String>>>);
impl SessionState for MemorySession {
	fn insert(&self, key: &str, value: String) {
		self.0.write().insert(key.to_owned(), value);
	}

	fn get(&self, key: &str) -> Option<String> {
		self.0.read().get(key).cloned()
	}

	fn remove(&self, key: &str) -> Option<String> {
		self.0.write().remove(key)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn memory_session_round_trips_values() {
		let session = MemorySession::default();

		assert_eq!(session.get(ACCOUNT_SESSION_KEY), None);

		session.insert(ACCOUNT_SESSION_KEY, "acme".into());

		assert_eq!(session.get(ACCOUNT_SESSION_KEY), Some("acme".into()));
		assert_eq!(session.remove(ACCOUNT_SESSION_KEY), Some("acme".into()));
		assert_eq!(session.get(ACCOUNT_SESSION_KEY), None);
	}

	#[test]
	fn clones_share_the_backing_map() {
		let session = MemorySession::default();
		let view = session.clone();

		session.insert(STATE_SESSION_KEY, "state-123".into());

		assert_eq!(view.get(STATE_SESSION_KEY), Some("state-123".into()));
	}
}
