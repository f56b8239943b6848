//! # Tessera Core
//!
//! Core primitives shared by the Tessera rendering crates.
//!
//! ## Modules
//!
//! - [`reactive`]: fine-grained signal graph (sources, computed values, effects)
//!   with lazy re-evaluation, version stamping, batched invalidation and
//!   cycle detection.

pub mod reactive;

pub use reactive::{
	Computed, Effect, ReactiveError, Signal, batch, create_computed, create_effect, create_source,
	untrack, with_runtime,
};
