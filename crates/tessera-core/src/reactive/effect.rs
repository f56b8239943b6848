//! Effect - Reactive Side Effects
//!
//! `Effect` represents a side effect that re-runs when its dependencies change.
//! Any Signal or Computed read inside the closure becomes a dependency.
//!
//! ## Key Features
//!
//! - **Automatic Re-execution**: a write to a dependency queues the effect; the queue
//!   is flushed when the outermost write or batch returns
//! - **Cleanup Support**: an optional cleanup runs before each re-run and on disposal
//! - **Bounded Flush**: a flush that keeps re-queueing effects fails with
//!   [`ReactiveError::Cycle`] instead of looping forever
//!
//! ## Example
//!
//! ```ignore
//! use tessera_core::reactive::{Effect, Signal};
//!
//! let count = Signal::new(0);
//! let _effect = Effect::new({
//!     let count = count.clone();
//!     move || tracing::debug!(count = count.get(), "count changed")
//! });
//!
//! count.set(42)?;
//! ```

use core::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;

use super::MAX_FLUSH_ITERATIONS;
use super::error::ReactiveError;
use super::runtime::{NodeId, NodeType, Observer, Runtime, try_with_runtime, with_runtime};

/// Cleanup returned by an effect body, run before the next execution
pub type Cleanup = Box<dyn FnOnce() + 'static>;

type EffectFn = Box<dyn FnMut() -> Option<Cleanup> + 'static>;

struct EffectSlot {
	run: EffectFn,
	cleanup: Option<Cleanup>,
}

// Storage for effect closures, keyed by node
//
// A slot is taken out while its effect runs so the closure may create or
// dispose other effects without re-borrowing the map.
thread_local! {
	static EFFECT_FUNCTIONS: RefCell<BTreeMap<NodeId, EffectSlot>> = const { RefCell::new(BTreeMap::new()) };
}

/// A reactive effect that re-runs when its dependencies change
///
/// Effects run once immediately on creation.
pub struct Effect {
	id: NodeId,
	disposed: Rc<Cell<bool>>,
}

impl Effect {
	/// Create a new Effect that runs the given function
	pub fn new<F>(mut f: F) -> Self
	where
		F: FnMut() + 'static,
	{
		Self::with_cleanup(move || {
			f();
			None
		})
	}

	/// Create an effect whose body may return a cleanup closure.
	///
	/// The cleanup from the previous run is invoked before each re-run and
	/// when the effect is disposed.
	///
	/// # Example
	///
	/// ```ignore
	/// let _effect = Effect::with_cleanup(move || {
	///     let guard = subscribe(topic.get());
	///     Some(Box::new(move || drop(guard)) as Cleanup)
	/// });
	/// ```
	pub fn with_cleanup<F>(f: F) -> Self
	where
		F: FnMut() -> Option<Cleanup> + 'static,
	{
		let id = NodeId::new();
		with_runtime(|rt| rt.register_node(id, NodeType::Effect));
		EFFECT_FUNCTIONS.with(|storage| {
			storage.borrow_mut().insert(
				id,
				EffectSlot {
					run: Box::new(f),
					cleanup: None,
				},
			);
		});

		Self::execute_effect(id);

		Self {
			id,
			disposed: Rc::new(Cell::new(false)),
		}
	}

	/// Execute an effect by its ID
	///
	/// Runs the previous cleanup, then the body with the effect as the current
	/// observer so its dependency set is rebuilt.
	pub(crate) fn execute_effect(effect_id: NodeId) {
		let Some(mut slot) = EFFECT_FUNCTIONS.with(|storage| storage.borrow_mut().remove(&effect_id))
		else {
			return;
		};

		if let Some(cleanup) = slot.cleanup.take() {
			cleanup();
		}

		with_runtime(|rt| {
			rt.clear_dependencies(effect_id);
			rt.push_observer(Observer {
				id: effect_id,
				node_type: NodeType::Effect,
			});
		});

		slot.cleanup = (slot.run)();

		with_runtime(|rt| {
			rt.pop_observer();
		});

		// Disposed while running: the node is gone, so only the cleanup remains
		if with_runtime(|rt| rt.has_node(effect_id)) {
			EFFECT_FUNCTIONS.with(|storage| {
				storage.borrow_mut().insert(effect_id, slot);
			});
		} else if let Some(cleanup) = slot.cleanup.take() {
			cleanup();
		}
	}

	/// Get the NodeId of this effect
	pub fn id(&self) -> NodeId {
		self.id
	}

	/// Dispose this effect
	///
	/// The cleanup (if any) runs once and the effect never runs again.
	/// Disposing twice is a no-op.
	pub fn dispose(&self) {
		if self.disposed.replace(true) {
			return;
		}

		let _ = try_with_runtime(|rt| rt.remove_node(self.id));

		let slot = EFFECT_FUNCTIONS
			.try_with(|storage| storage.borrow_mut().remove(&self.id))
			.ok()
			.flatten();
		if let Some(cleanup) = slot.and_then(|slot| slot.cleanup) {
			cleanup();
		}
	}
}

impl Drop for Effect {
	fn drop(&mut self) {
		self.dispose();
	}
}

impl Runtime {
	/// Runs queued effects until the queue is empty.
	///
	/// Effects queued by writes made during the flush are picked up by the next
	/// pass. Nested calls (from a write inside an effect) return immediately.
	///
	/// # Errors
	///
	/// Returns [`ReactiveError::Cycle`] and drops the remaining queue when the
	/// flush needs more than [`MAX_FLUSH_ITERATIONS`] passes.
	pub fn flush_effects(&self) -> Result<(), ReactiveError> {
		if self.flushing.replace(true) {
			return Ok(());
		}

		let mut passes = 0;
		let result = loop {
			let batch: Vec<NodeId> = core::mem::take(&mut *self.pending_effects.borrow_mut());
			if batch.is_empty() {
				break Ok(());
			}
			passes += 1;
			if passes > MAX_FLUSH_ITERATIONS {
				self.pending_effects.borrow_mut().clear();
				tracing::warn!(limit = MAX_FLUSH_ITERATIONS, "effect flush did not settle");
				break Err(ReactiveError::Cycle {
					limit: MAX_FLUSH_ITERATIONS,
				});
			}
			for effect_id in batch {
				Effect::execute_effect(effect_id);
			}
		};

		self.flushing.set(false);
		result
	}
}
