//! Computed - Lazily Re-evaluated Derived Values
//!
//! A `Computed<T>` caches the result of a closure. Reading it inside another
//! observer records a dependency, exactly like a [`Signal`](super::Signal).
//! When a transitive source changes the cache is marked stale; the closure runs
//! again only on the next read.
//!
//! The dependency set is rebuilt on every evaluation, so conditional reads are
//! tracked precisely.
//!
//! ## Example
//!
//! ```ignore
//! let first = Signal::new("Иван".to_string());
//! let last = Signal::new("Петров".to_string());
//! let full = Computed::new({
//!     let (first, last) = (first.clone(), last.clone());
//!     move || format!("{} {}", first.get(), last.get())
//! });
//!
//! assert_eq!(full.get()?, "Иван Петров");
//! ```

use core::cell::{Cell, RefCell};
use core::fmt;
use std::rc::Rc;

use super::CYCLE_LIMIT;
use super::error::ReactiveError;
use super::runtime::{NodeId, NodeType, Observer, try_with_runtime, with_runtime};

type ComputeFn<T> = Box<dyn FnMut() -> Result<T, ReactiveError> + 'static>;

struct ComputedInner<T> {
	compute: RefCell<ComputeFn<T>>,
	value: RefCell<Option<T>>,
	running: Cell<bool>,
	version: Cell<u64>,
}

/// A derived value recomputed on demand
#[derive(Clone)]
pub struct Computed<T: 'static> {
	id: NodeId,
	inner: Rc<ComputedInner<T>>,
}

impl<T: Clone + 'static> Computed<T> {
	/// Creates a computed value from an infallible closure.
	///
	/// The closure does not run until the first [`Computed::get`].
	pub fn new<F>(mut f: F) -> Self
	where
		F: FnMut() -> T + 'static,
	{
		Self::try_new(move || Ok(f()))
	}

	/// Creates a computed value from a closure that may itself fail, typically
	/// by propagating the error of a nested [`Computed::get`].
	pub fn try_new<F>(f: F) -> Self
	where
		F: FnMut() -> Result<T, ReactiveError> + 'static,
	{
		let id = NodeId::new();
		with_runtime(|rt| rt.register_node(id, NodeType::Computed));
		Self {
			id,
			inner: Rc::new(ComputedInner {
				compute: RefCell::new(Box::new(f)),
				value: RefCell::new(None),
				running: Cell::new(false),
				version: Cell::new(0),
			}),
		}
	}

	/// Returns the current value, re-evaluating first if it is stale.
	///
	/// # Errors
	///
	/// Returns [`ReactiveError::Cycle`] when the value (transitively) depends on
	/// itself, or when evaluation nests deeper than [`CYCLE_LIMIT`]. A cycle
	/// detected anywhere in the chain fails the outermost read even if an inner
	/// closure swallowed the error.
	pub fn get(&self) -> Result<T, ReactiveError> {
		with_runtime(|rt| rt.track_dependency(self.id));

		if self.inner.running.get() {
			with_runtime(|rt| rt.flag_cycle());
			return Err(ReactiveError::Cycle { limit: CYCLE_LIMIT });
		}

		if self.is_dirty() {
			self.evaluate()?;
		}

		match &*self.inner.value.borrow() {
			Some(value) => Ok(value.clone()),
			None => Err(ReactiveError::Cycle { limit: CYCLE_LIMIT }),
		}
	}

	fn evaluate(&self) -> Result<(), ReactiveError> {
		with_runtime(|rt| rt.enter_evaluation(CYCLE_LIMIT))?;

		self.inner.running.set(true);
		with_runtime(|rt| {
			rt.clear_dependencies(self.id);
			rt.push_observer(Observer {
				id: self.id,
				node_type: NodeType::Computed,
			});
		});

		let result = (self.inner.compute.borrow_mut())();

		let (outermost, cycle) = with_runtime(|rt| {
			rt.pop_observer();
			let outermost = rt.exit_evaluation();
			let cycle = outermost && rt.take_cycle_flag();
			(outermost, cycle)
		});
		self.inner.running.set(false);

		let value = match result {
			Ok(_) if cycle => Err(ReactiveError::Cycle { limit: CYCLE_LIMIT }),
			other => other,
		};

		match value {
			Ok(value) => {
				*self.inner.value.borrow_mut() = Some(value);
				with_runtime(|rt| {
					rt.mark_fresh(self.id);
					self.inner.version.set(rt.global_version());
				});
				Ok(())
			}
			Err(err) => {
				if outermost {
					with_runtime(|rt| rt.take_cycle_flag());
				}
				*self.inner.value.borrow_mut() = None;
				Err(err)
			}
		}
	}
}

impl<T: 'static> Computed<T> {
	/// Whether the next [`Computed::get`] will re-run the closure
	pub fn is_dirty(&self) -> bool {
		self.inner.value.borrow().is_none() || with_runtime(|rt| rt.is_stale(self.id))
	}

	/// Global version observed by the last successful evaluation
	pub fn version(&self) -> u64 {
		self.inner.version.get()
	}

	/// Get the NodeId of this computed value
	pub fn id(&self) -> NodeId {
		self.id
	}
}

impl<T: 'static> Drop for Computed<T> {
	fn drop(&mut self) {
		if Rc::strong_count(&self.inner) == 1 {
			let _ = try_with_runtime(|rt| rt.remove_node(self.id));
		}
	}
}

impl<T: fmt::Debug + 'static> fmt::Debug for Computed<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Computed")
			.field("id", &self.id)
			.field("value", &*self.inner.value.borrow())
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::reactive::Signal;
	use serial_test::serial;

	#[test]
	#[serial]
	fn test_computed_is_lazy() {
		let runs = Rc::new(Cell::new(0));
		let computed = Computed::new({
			let runs = runs.clone();
			move || {
				runs.set(runs.get() + 1);
				10
			}
		});

		assert_eq!(runs.get(), 0);
		assert!(computed.is_dirty());
		assert_eq!(computed.get().unwrap(), 10);
		assert_eq!(computed.get().unwrap(), 10);
		assert_eq!(runs.get(), 1);
	}

	#[test]
	#[serial]
	fn test_write_marks_stale_without_recomputing() {
		let source = Signal::new(2);
		let runs = Rc::new(Cell::new(0));
		let squared = Computed::new({
			let (source, runs) = (source.clone(), runs.clone());
			move || {
				runs.set(runs.get() + 1);
				source.get() * source.get()
			}
		});

		assert_eq!(squared.get().unwrap(), 4);
		source.set(3).unwrap();

		assert!(squared.is_dirty());
		assert_eq!(runs.get(), 1);
		assert_eq!(squared.get().unwrap(), 9);
		assert_eq!(runs.get(), 2);
	}

	#[test]
	#[serial]
	fn test_transitive_invalidation() {
		let source = Signal::new(1);
		let plus_one = Computed::new({
			let source = source.clone();
			move || source.get() + 1
		});
		let doubled = Computed::try_new({
			let plus_one = plus_one.clone();
			move || Ok(plus_one.get()? * 2)
		});

		assert_eq!(doubled.get().unwrap(), 4);
		source.set(5).unwrap();
		assert!(doubled.is_dirty());
		assert_eq!(doubled.get().unwrap(), 12);
	}

	#[test]
	#[serial]
	fn test_dependencies_follow_latest_evaluation() {
		let use_ru = Signal::new(true);
		let ru = Signal::new("Хлеб".to_string());
		let en = Signal::new("Bread".to_string());
		let name = Computed::new({
			let (use_ru, ru, en) = (use_ru.clone(), ru.clone(), en.clone());
			move || if use_ru.get() { ru.get() } else { en.get() }
		});

		assert_eq!(name.get().unwrap(), "Хлеб");
		assert!(with_runtime(|rt| rt.dependencies_of(name.id())).contains(&ru.id()));

		use_ru.set(false).unwrap();
		assert_eq!(name.get().unwrap(), "Bread");

		let deps = with_runtime(|rt| rt.dependencies_of(name.id()));
		assert!(deps.contains(&en.id()));
		assert!(!deps.contains(&ru.id()));
	}

	#[test]
	#[serial]
	fn test_self_cycle_is_reported() {
		let slot: Rc<RefCell<Option<Computed<i32>>>> = Rc::new(RefCell::new(None));
		let computed = Computed::try_new({
			let slot = slot.clone();
			move || match &*slot.borrow() {
				Some(me) => me.get(),
				None => Ok(0),
			}
		});
		*slot.borrow_mut() = Some(computed.clone());

		assert_eq!(
			computed.get(),
			Err(ReactiveError::Cycle { limit: CYCLE_LIMIT })
		);
		slot.borrow_mut().take();
	}

	#[test]
	#[serial]
	fn test_mutual_cycle_is_reported() {
		let slot: Rc<RefCell<Option<Computed<i32>>>> = Rc::new(RefCell::new(None));
		let b = Computed::try_new({
			let slot = slot.clone();
			move || match &*slot.borrow() {
				Some(a) => Ok(a.get()? + 1),
				None => Ok(0),
			}
		});
		let a = Computed::try_new({
			let b = b.clone();
			move || Ok(b.get()? + 1)
		});
		*slot.borrow_mut() = Some(a.clone());

		assert_eq!(a.get(), Err(ReactiveError::Cycle { limit: CYCLE_LIMIT }));
		slot.borrow_mut().take();
	}

	#[test]
	#[serial]
	fn test_equal_write_keeps_computed_fresh() {
		let source = Signal::new(7);
		let runs = Rc::new(Cell::new(0));
		let label = Computed::new({
			let (source, runs) = (source.clone(), runs.clone());
			move || {
				runs.set(runs.get() + 1);
				format!("{} ₽", source.get())
			}
		});

		assert_eq!(label.get().unwrap(), "7 ₽");
		source.set(7).unwrap();

		assert!(!label.is_dirty());
		assert_eq!(label.get().unwrap(), "7 ₽");
		assert_eq!(runs.get(), 1);
	}

	#[test]
	#[serial]
	fn test_swallowed_cycle_still_fails_outer_read() {
		let slot: Rc<RefCell<Option<Computed<i32>>>> = Rc::new(RefCell::new(None));
		let computed = Computed::new({
			let slot = slot.clone();
			move || match &*slot.borrow() {
				Some(me) => me.get().unwrap_or(-1),
				None => 0,
			}
		});
		*slot.borrow_mut() = Some(computed.clone());

		assert!(computed.get().is_err());
		slot.borrow_mut().take();
	}
}
