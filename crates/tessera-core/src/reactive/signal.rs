//! Signal - Source Node of the Reactive Graph
//!
//! `Signal<T>` holds a value, records dependencies when read inside a Computed or
//! Effect, and invalidates dependents when written.
//!
//! ## Key Features
//!
//! - **Automatic Dependency Tracking**: `get()` inside an observer records an edge.
//! - **Equality Short-Circuit**: writing a value equal to the current one is a no-op.
//! - **Version Stamp**: every effective write stamps the signal with the new global version.
//!
//! ## Example
//!
//! ```ignore
//! use tessera_core::reactive::Signal;
//!
//! let count = Signal::new(0);
//! count.set(42)?;
//! assert_eq!(count.get(), 42);
//!
//! count.update(|n| *n += 1)?;
//! assert_eq!(count.get(), 43);
//! ```

use core::cell::{Cell, RefCell};
use core::fmt;
use std::rc::Rc;

use super::error::ReactiveError;
use super::runtime::{NodeId, NodeType, try_with_runtime, with_runtime};

/// A reactive source holding a value of type `T`
///
/// ## Cloning
///
/// `Signal<T>` implements `Clone` and shares the value via `Rc<RefCell<T>>`.
/// All clones refer to the same node; the node leaves the dependency graph
/// when the last clone is dropped.
#[derive(Clone)]
pub struct Signal<T: 'static> {
	id: NodeId,
	value: Rc<RefCell<T>>,
	version: Rc<Cell<u64>>,
}

impl<T: 'static> Signal<T> {
	/// Create a new Signal with the given initial value
	pub fn new(value: T) -> Self {
		let id = NodeId::new();
		let version = with_runtime(|rt| {
			rt.register_node(id, NodeType::Signal);
			rt.global_version()
		});
		Self {
			id,
			value: Rc::new(RefCell::new(value)),
			version: Rc::new(Cell::new(version)),
		}
	}

	/// Get the current value of the signal
	///
	/// This tracks the dependency if called from within a Computed or Effect.
	pub fn get(&self) -> T
	where
		T: Clone,
	{
		with_runtime(|rt| rt.track_dependency(self.id));
		self.get_untracked()
	}

	/// Get the current value without tracking dependencies
	pub fn get_untracked(&self) -> T
	where
		T: Clone,
	{
		self.value.borrow().clone()
	}

	/// Borrow the current value for the duration of `f`, tracking the read.
	pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
		with_runtime(|rt| rt.track_dependency(self.id));
		f(&self.value.borrow())
	}

	/// Set the signal to a new value
	///
	/// Writing a value equal to the current one does nothing. Otherwise the
	/// global version is incremented, dependents are invalidated and any effect
	/// reached is flushed before this returns (unless inside a [`batch`]).
	///
	/// [`batch`]: super::batch
	///
	/// # Errors
	///
	/// Returns [`ReactiveError::Cycle`] if the effect flush does not settle.
	pub fn set(&self, value: T) -> Result<(), ReactiveError>
	where
		T: PartialEq,
	{
		if *self.value.borrow() == value {
			return Ok(());
		}
		*self.value.borrow_mut() = value;
		self.notify()
	}

	/// Update the signal's value using a function
	///
	/// The closure receives a copy of the current value; the result is written
	/// back with the same equality short-circuit as [`Signal::set`].
	pub fn update<F>(&self, f: F) -> Result<(), ReactiveError>
	where
		T: Clone + PartialEq,
		F: FnOnce(&mut T),
	{
		let mut next = self.get_untracked();
		f(&mut next);
		self.set(next)
	}

	/// Global version at this signal's last effective write
	pub fn version(&self) -> u64 {
		self.version.get()
	}

	/// Get the NodeId of this signal
	pub fn id(&self) -> NodeId {
		self.id
	}

	fn notify(&self) -> Result<(), ReactiveError> {
		let flush = with_runtime(|rt| {
			rt.begin_batch();
			self.version.set(rt.notify_write(self.id));
			rt.end_batch()
		});
		if flush {
			with_runtime(|rt| rt.flush_effects())?;
		}
		Ok(())
	}
}

impl<T: 'static> Drop for Signal<T> {
	fn drop(&mut self) {
		// Only the last clone detaches the node
		if Rc::strong_count(&self.value) == 1 {
			let _ = try_with_runtime(|rt| rt.remove_node(self.id));
		}
	}
}

impl<T: fmt::Debug + 'static> fmt::Debug for Signal<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Signal")
			.field("id", &self.id)
			.field("value", &*self.value.borrow())
			.field("version", &self.version.get())
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::reactive::Effect;
	use serial_test::serial;

	#[test]
	#[serial]
	fn test_signal_creation() {
		let signal = Signal::new(42);
		assert_eq!(signal.get(), 42);
		assert!(with_runtime(|rt| rt.has_node(signal.id())));
	}

	#[test]
	#[serial]
	fn test_signal_set_bumps_version() {
		let signal = Signal::new(0);
		let before = signal.version();

		signal.set(100).unwrap();

		assert_eq!(signal.get(), 100);
		assert!(signal.version() > before);
		assert_eq!(signal.version(), with_runtime(|rt| rt.global_version()));
	}

	#[test]
	#[serial]
	fn test_equal_write_is_noop() {
		let signal = Signal::new(String::from("ru"));
		let global_before = with_runtime(|rt| rt.global_version());
		let version_before = signal.version();

		signal.set(String::from("ru")).unwrap();

		assert_eq!(signal.version(), version_before);
		assert_eq!(with_runtime(|rt| rt.global_version()), global_before);
	}

	#[test]
	#[serial]
	fn test_signal_update() {
		let signal = Signal::new(vec![1, 2]);
		signal.update(|v| v.push(3)).unwrap();
		assert_eq!(signal.get(), vec![1, 2, 3]);
	}

	#[test]
	#[serial]
	fn test_write_runs_dependent_effect() {
		let source = Signal::new(1);
		let mirror = Rc::new(Cell::new(0));

		let _effect = Effect::new({
			let (source, mirror) = (source.clone(), mirror.clone());
			move || mirror.set(source.get())
		});
		assert_eq!(mirror.get(), 1);

		source.set(7).unwrap();
		assert_eq!(mirror.get(), 7);
	}

	#[test]
	#[serial]
	fn test_drop_last_clone_removes_node() {
		let signal = Signal::new(1);
		let id = signal.id();
		let clone = signal.clone();

		drop(signal);
		assert!(with_runtime(|rt| rt.has_node(id)));

		drop(clone);
		assert!(!with_runtime(|rt| rt.has_node(id)));
	}
}
