//! Error types for the reactive system.

use thiserror::Error;

/// Errors raised by the signal graph.
///
/// These are kept distinct from component errors so that callers can branch
/// on a reactive cycle without inspecting messages.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReactiveError {
	/// A computed value re-entered its own evaluation, or a write/flush kept
	/// re-triggering itself past the iteration bound.
	#[error("reactive cycle detected (iteration bound {limit})")]
	Cycle {
		/// The iteration bound that was exceeded.
		limit: usize,
	},
}
