//! Validated Zendesk account subdomains.

// std
use std::{borrow::Borrow, ops::Deref};
// self
use crate::_prelude::*;

// DNS hostname label limit (RFC 1035).
const ACCOUNT_MAX_LEN: usize = 63;

/// Error returned when account validation fails.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum AccountError {
	/// The account subdomain was empty.
	#[error("Account subdomain cannot be empty.")]
	Empty,
	/// The account subdomain exceeded the hostname label limit.
	#[error("Account subdomain exceeds {max} characters.")]
	TooLong {
		/// Maximum permitted byte count.
		max: usize,
	},
	/// The account subdomain contains a character outside `[a-z0-9-]`.
	#[error("Account subdomain contains an invalid character: {character:?}.")]
	InvalidCharacter {
		/// The offending character.
		character: char,
	},
	/// Hostname labels cannot start or end with a hyphen.
	#[error("Account subdomain cannot start or end with a hyphen.")]
	HyphenAtEdge,
}

/// Customer-specific subdomain label identifying which Zendesk instance to authenticate
/// against.
///
/// The value is interpolated verbatim into `https://{account}.zendesk.com`, so construction
/// enforces the safe hostname-label character set: non-empty, at most 63 bytes, ASCII
/// alphanumerics plus interior hyphens. Input is normalized to lowercase because DNS labels
/// are case-insensitive.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Account(String);
impl Account {
	/// Creates a new account after validation, lowercasing the input.
	pub fn new(value: impl AsRef<str>) -> Result<Self, AccountError> {
		let view = value.as_ref().to_ascii_lowercase();

		validate_label(&view)?;

		Ok(Self(view))
	}
}
impl Deref for Account {
	type Target = str;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
impl AsRef<str> for Account {
	fn as_ref(&self) -> &str {
		&self.0
	}
}
impl From<Account> for String {
	fn from(value: Account) -> Self {
		value.0
	}
}
impl TryFrom<String> for Account {
	type Error = AccountError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		Self::new(value)
	}
}
impl Borrow<str> for Account {
	fn borrow(&self) -> &str {
		&self.0
	}
}
impl Debug for Account {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "Account({})", self.0)
	}
}
impl Display for Account {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.0)
	}
}
impl FromStr for Account {
	type Err = AccountError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::new(s)
	}
}

fn validate_label(view: &str) -> Result<(), AccountError> {
	if view.is_empty() {
		return Err(AccountError::Empty);
	}
	if view.len() > ACCOUNT_MAX_LEN {
		return Err(AccountError::TooLong { max: ACCOUNT_MAX_LEN });
	}
	if let Some(character) =
		view.chars().find(|c| !c.is_ascii_alphanumeric() && *c != '-')
	{
		return Err(AccountError::InvalidCharacter { character });
	}
	if view.starts_with('-') || view.ends_with('-') {
		return Err(AccountError::HyphenAtEdge);
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn accounts_validate_the_hostname_label_charset() {
		let account = Account::new("acme-support1").expect("Account fixture should be valid.");

		assert_eq!(account.as_ref(), "acme-support1");
		assert!(Account::new("").is_err());
		assert!(matches!(
			Account::new("acme.zendesk.com"),
			Err(AccountError::InvalidCharacter { character: '.' })
		));
		assert!(matches!(
			Account::new("acme/../evil"),
			Err(AccountError::InvalidCharacter { .. })
		));
		assert!(matches!(Account::new("with space"), Err(AccountError::InvalidCharacter { .. })));
		assert!(matches!(Account::new("-acme"), Err(AccountError::HyphenAtEdge)));
		assert!(matches!(Account::new("acme-"), Err(AccountError::HyphenAtEdge)));
	}

	#[test]
	fn accounts_normalize_to_lowercase() {
		let account = Account::new("AcMe").expect("Mixed-case input should be accepted.");

		assert_eq!(account.as_ref(), "acme");
	}

	#[test]
	fn length_limit_matches_dns_labels() {
		let exact = "a".repeat(ACCOUNT_MAX_LEN);

		Account::new(&exact).expect("Exact length should succeed.");

		let too_long = "a".repeat(ACCOUNT_MAX_LEN + 1);

		assert!(matches!(Account::new(&too_long), Err(AccountError::TooLong { .. })));
	}

	#[test]
	fn serde_round_trip_enforces_validation() {
		let account: Account =
			serde_json::from_str("\"acme\"").expect("Account should deserialize successfully.");

		assert_eq!(account.as_ref(), "acme");
		assert!(serde_json::from_str::<Account>("\"not a label\"").is_err());
		assert!(serde_json::from_str::<Account>("\"\"").is_err());
	}

	#[test]
	fn borrow_supports_fast_lookup() {
		let map: HashMap<Account, u8> = HashMap::from_iter([(
			Account::new("acme").expect("Account used for lookup should be valid."),
			7_u8,
		)]);

		assert_eq!(map.get("acme"), Some(&7));
	}
}
