//! Tenant domain: validated account subdomains and the endpoints derived from them.

pub mod account;
pub mod endpoints;

pub use account::*;
pub use endpoints::*;
