//! Optional observability helpers for the strategy phases.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `zendesk_oauth2.phase` tagged with the
//!   `phase` field.
//! - Enable `metrics` to increment the `zendesk_oauth2_phase_total` counter for every
//!   attempt/success/failure, labeled by `phase` + `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Request-lifecycle phases observed by the strategy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PhaseKind {
	/// Request phase (redirect construction).
	Request,
	/// Callback phase (code exchange).
	Callback,
	/// Authenticated profile fetch.
	Profile,
}
impl PhaseKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			PhaseKind::Request => "request",
			PhaseKind::Callback => "callback",
			PhaseKind::Profile => "profile",
		}
	}
}
impl Display for PhaseKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PhaseOutcome {
	/// Entry to a strategy phase.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl PhaseOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			PhaseOutcome::Attempt => "attempt",
			PhaseOutcome::Success => "success",
			PhaseOutcome::Failure => "failure",
		}
	}
}
impl Display for PhaseOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
