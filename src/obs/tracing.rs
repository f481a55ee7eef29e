// self
use crate::{_prelude::*, obs::PhaseKind};

/// Future type produced by [`PhaseSpan::wrap`]; instrumented when tracing is enabled,
/// the bare future otherwise.
#[cfg(feature = "tracing")]
pub type PhaseFuture<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type PhaseFuture<F> = F;

impl PhaseKind {
	/// Opens the span covering one run of this phase.
	pub fn span(self) -> PhaseSpan {
		#[cfg(feature = "tracing")]
		{
			PhaseSpan { span: tracing::info_span!("zendesk_oauth2.phase", phase = self.as_str()) }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = self;

			PhaseSpan {}
		}
	}
}

/// Span scoped to a single request, callback, or profile run.
#[derive(Clone, Debug)]
pub struct PhaseSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl PhaseSpan {
	/// Covers a synchronous section; the span closes when the guard drops.
	pub fn enter(&self) -> PhaseGuard {
		#[cfg(feature = "tracing")]
		{
			PhaseGuard { _entered: self.span.clone().entered() }
		}
		#[cfg(not(feature = "tracing"))]
		{
			PhaseGuard {}
		}
	}

	/// Covers an async section without holding a guard across `.await` points.
	pub fn wrap<Fut>(&self, fut: Fut) -> PhaseFuture<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}

/// RAII guard returned by [`PhaseSpan::enter`].
pub struct PhaseGuard {
	#[cfg(feature = "tracing")]
	_entered: tracing::span::EnteredSpan,
}
impl Debug for PhaseGuard {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("PhaseGuard(..)")
	}
}
