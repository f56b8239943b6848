//! Reactive state for components.
//!
//! - [`hooks`]: positional per-instance state (state, memo, ref, effect)
//! - [`context`]: context keys and the immutable scope threaded through rendering
//!
//! The signal graph itself lives in `tessera-core` and is re-exported here.

pub mod context;
pub mod hooks;

pub use context::{Context, ContextId, ContextScope, ProvidedContext};
pub use hooks::{ByPtr, HookCx, HookStore, StateSetter};
pub use tessera_core::reactive::{
	CYCLE_LIMIT, Cleanup, Computed, Effect, MAX_FLUSH_ITERATIONS, ReactiveError, Signal, batch,
	create_computed, create_effect, create_source, untrack, with_runtime,
};
