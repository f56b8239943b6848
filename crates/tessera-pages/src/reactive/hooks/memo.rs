//! Memoization hook: use_memo
//!
//! The cached value is recomputed only when the dependency value changes. Any
//! `PartialEq` type works as a dependency list; tuples and `Vec`s compare by
//! length and element. Wrap shared values in [`ByPtr`] to compare them by
//! identity instead of by value.

use std::fmt;
use std::ops::Deref;
use std::rc::Rc;

use super::{HookCx, HookSlot};
use crate::error::HookError;

/// Compares an `Rc` by pointer identity.
pub struct ByPtr<T: ?Sized>(pub Rc<T>);

impl<T: ?Sized> Clone for ByPtr<T> {
	fn clone(&self) -> Self {
		Self(Rc::clone(&self.0))
	}
}

impl<T: ?Sized> PartialEq for ByPtr<T> {
	fn eq(&self, other: &Self) -> bool {
		Rc::ptr_eq(&self.0, &other.0)
	}
}

impl<T: ?Sized> Deref for ByPtr<T> {
	type Target = T;

	fn deref(&self) -> &T {
		&self.0
	}
}

impl<T: ?Sized + fmt::Debug> fmt::Debug for ByPtr<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("ByPtr").field(&&*self.0).finish()
	}
}

impl HookCx<'_> {
	/// Memoizes `factory()` until `deps` changes.
	///
	/// The same `Rc` is returned while the dependencies stay equal, so callers
	/// can rely on identity.
	///
	/// # Example
	///
	/// ```ignore
	/// let products = props.get_data::<Vec<Product>>("products").unwrap_or_default();
	/// let visible = cx.use_memo(
	///     || products.iter().filter(|p| p.image().is_some()).cloned().collect::<Vec<_>>(),
	///     ByPtr(products.clone()),
	/// )?;
	/// ```
	pub fn use_memo<T, D, F>(&mut self, factory: F, deps: D) -> Result<Rc<T>, HookError>
	where
		T: 'static,
		D: PartialEq + 'static,
		F: FnOnce() -> T,
	{
		let index = self.next_index();

		if index == self.store.slots.len() {
			let value: Rc<T> = Rc::new(factory());
			self.store.slots.push(HookSlot::Memo {
				value: value.clone(),
				deps: Box::new(deps),
			});
			return Ok(value);
		}

		let (value, previous) = match &mut self.store.slots[index] {
			HookSlot::Memo { value, deps } => (value, deps),
			other => return Err(Self::mismatch(index, "memo", other)),
		};

		let unchanged = previous
			.downcast_ref::<D>()
			.ok_or(HookError::TypeMismatch { index })?
			== &deps;

		if unchanged {
			return Rc::clone(value)
				.downcast::<T>()
				.map_err(|_| HookError::TypeMismatch { index });
		}

		if !value.is::<T>() {
			return Err(HookError::TypeMismatch { index });
		}
		let fresh: Rc<T> = Rc::new(factory());
		*value = fresh.clone();
		*previous = Box::new(deps);
		Ok(fresh)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::reactive::context::ContextScope;
	use crate::reactive::hooks::HookStore;
	use rstest::rstest;
	use std::cell::Cell;

	#[rstest]
	fn test_memo_reuses_value_while_deps_equal() {
		let scope = ContextScope::new();
		let mut store = HookStore::new("Memo");
		let runs = Cell::new(0);

		let mut cx = store.cx(&scope);
		let first = cx
			.use_memo(
				|| {
					runs.set(runs.get() + 1);
					vec![1, 2]
				},
				(1, "ru"),
			)
			.unwrap();
		cx.finish().unwrap();

		let mut cx = store.cx(&scope);
		let second = cx
			.use_memo(
				|| {
					runs.set(runs.get() + 1);
					vec![1, 2]
				},
				(1, "ru"),
			)
			.unwrap();
		cx.finish().unwrap();

		assert!(Rc::ptr_eq(&first, &second));
		assert_eq!(runs.get(), 1);
	}

	#[rstest]
	fn test_memo_recomputes_when_deps_change() {
		let scope = ContextScope::new();
		let mut store = HookStore::new("Memo");

		let mut cx = store.cx(&scope);
		let first = cx.use_memo(|| 10, vec![1]).unwrap();
		cx.finish().unwrap();

		let mut cx = store.cx(&scope);
		let second = cx.use_memo(|| 20, vec![1, 2]).unwrap();
		cx.finish().unwrap();

		assert_eq!(*first, 10);
		assert_eq!(*second, 20);
	}

	#[rstest]
	fn test_by_ptr_compares_identity() {
		let a = Rc::new(vec![1]);
		let b = Rc::new(vec![1]);

		assert!(ByPtr(a.clone()) == ByPtr(a.clone()));
		assert!(ByPtr(a) != ByPtr(b));
	}

	#[rstest]
	fn test_memo_dependency_type_change_is_reported() {
		let scope = ContextScope::new();
		let mut store = HookStore::new("Memo");

		let mut cx = store.cx(&scope);
		cx.use_memo(|| 1, 1_u8).unwrap();
		cx.finish().unwrap();

		let mut cx = store.cx(&scope);
		assert_eq!(
			cx.use_memo(|| 1, "one").unwrap_err(),
			HookError::TypeMismatch { index: 0 }
		);
	}
}
