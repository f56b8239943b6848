//! Reactive System
//!
//! A fine-grained signal graph in the style of Leptos and Solid.js:
//!
//! - [`Signal`]: a source value with a version stamp. Writes of an equal value are no-ops.
//! - [`Computed`]: a lazily re-evaluated derived value. Its dependency set is rebuilt
//!   on every evaluation.
//! - [`Effect`]: a side effect re-run (cleanup first) when one of its dependencies changes.
//!
//! Dependencies are never declared. Reading a signal or computed while another
//! computation is running records an edge in the runtime's dependency graph.
//!
//! ## Invalidation
//!
//! A write increments the global version counter and eagerly marks every
//! transitive computed dependent stale; recomputation is deferred until the
//! computed is read again. Effects reached by the walk are queued and flushed
//! once the outermost write (or [`batch`]) returns.
//!
//! ## Example
//!
//! ```ignore
//! use tessera_core::reactive::{Computed, Signal};
//!
//! let price = Signal::new(100);
//! let label = Computed::new({
//!     let price = price.clone();
//!     move || format!("{} ₽", price.get())
//! });
//!
//! assert_eq!(label.get()?, "100 ₽");
//! price.set(250)?;
//! assert_eq!(label.get()?, "250 ₽");
//! ```

mod computed;
mod effect;
mod error;
pub mod runtime;
mod signal;

pub use computed::Computed;
pub use effect::{Cleanup, Effect};
pub use error::ReactiveError;
pub use runtime::{NodeId, NodeType, Runtime, with_runtime};
pub use signal::Signal;

/// Iteration bound shared by the effect flush loop and nested evaluation.
///
/// A flush that needs more passes than this, or an evaluation chain nested
/// deeper than this, is reported as [`ReactiveError::Cycle`].
pub const CYCLE_LIMIT: usize = 100;

/// Maximum number of passes of one effect flush.
pub const MAX_FLUSH_ITERATIONS: usize = CYCLE_LIMIT;

/// Creates a new source signal.
pub fn create_source<T: 'static>(initial: T) -> Signal<T> {
	Signal::new(initial)
}

/// Creates a new lazily evaluated computed value.
pub fn create_computed<T, F>(f: F) -> Computed<T>
where
	T: Clone + 'static,
	F: FnMut() -> T + 'static,
{
	Computed::new(f)
}

/// Creates an effect and runs it once. Dropping or disposing the returned
/// handle unsubscribes it.
pub fn create_effect<F>(f: F) -> Effect
where
	F: FnMut() + 'static,
{
	Effect::new(f)
}

/// Groups several writes into a single notification pass.
///
/// Effects scheduled by writes inside `f` run once, after `f` returns and the
/// outermost batch closes.
///
/// # Example
///
/// ```ignore
/// batch(|| {
///     first.set(1)?;
///     second.set(2)
/// })??;
/// ```
pub fn batch<R>(f: impl FnOnce() -> R) -> Result<R, ReactiveError> {
	with_runtime(|rt| rt.begin_batch());
	let out = f();
	let flush = with_runtime(|rt| rt.end_batch());
	if flush {
		with_runtime(|rt| rt.flush_effects())?;
	}
	Ok(out)
}

/// Runs `f` without recording any dependency for the current observer.
pub fn untrack<R>(f: impl FnOnce() -> R) -> R {
	let saved = with_runtime(|rt| rt.take_observers());
	let out = f();
	with_runtime(|rt| rt.restore_observers(saved));
	out
}
