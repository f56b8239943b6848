//! Hook slot store for function components.
//!
//! Every function component instance owns a [`HookStore`]: an ordered list of
//! typed cells addressed purely by call order. The renderer hands the component a
//! [`HookCx`] with the cursor reset to zero; each `use_*` call consumes the next
//! slot, creating it on first use.
//!
//! ## Slot order invariant
//!
//! A component must request the same sequence of slot kinds, with the same value
//! types, on every invocation. Violations are reported instead of silently
//! reading the wrong cell:
//!
//! - a different kind at an index: [`HookError::KindMismatch`]
//! - a different value type: [`HookError::TypeMismatch`]
//! - a different number of slots: [`HookError::SlotCountMismatch`]
//!
//! ```ignore
//! // Wrong: the memo slot only exists on some invocations
//! if props.contains("expensive") {
//!     cx.use_memo(|| compute(), ())?;
//! }
//! ```

mod context;
mod effect;
mod memo;

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use tessera_core::reactive::Cleanup;

use super::context::{ContextScope, ProvidedContext};
use crate::error::HookError;

pub use memo::ByPtr;

type EffectThunk = Box<dyn FnOnce() -> Option<Cleanup> + 'static>;

pub(crate) struct EffectCell {
	deps: Box<dyn Any>,
	pending: Option<EffectThunk>,
	cleanup: Option<Cleanup>,
}

pub(crate) enum HookSlot {
	/// `Rc<RefCell<T>>` shared with the setters.
	State(Rc<dyn Any>),
	Memo { value: Rc<dyn Any>, deps: Box<dyn Any> },
	/// `Rc<RefCell<T>>` handed out as-is.
	Ref(Rc<dyn Any>),
	Effect(EffectCell),
}

impl HookSlot {
	fn kind(&self) -> &'static str {
		match self {
			Self::State(_) => "state",
			Self::Memo { .. } => "memo",
			Self::Ref(_) => "ref",
			Self::Effect(_) => "effect",
		}
	}
}

/// Per-instance hook storage, persisted across invocations of the same instance.
pub struct HookStore {
	component: String,
	slots: Vec<HookSlot>,
	expected_len: Option<usize>,
	pending_effects: Vec<usize>,
	dirty: Rc<Cell<bool>>,
}

impl HookStore {
	pub fn new(component: impl Into<String>) -> Self {
		Self {
			component: component.into(),
			slots: Vec::new(),
			expected_len: None,
			pending_effects: Vec::new(),
			dirty: Rc::new(Cell::new(false)),
		}
	}

	/// Starts an invocation with the cursor at slot zero.
	pub fn cx<'a>(&'a mut self, scope: &'a ContextScope) -> HookCx<'a> {
		HookCx {
			store: self,
			cursor: 0,
			scope,
			provided: Vec::new(),
		}
	}

	pub fn component(&self) -> &str {
		&self.component
	}

	pub fn len(&self) -> usize {
		self.slots.len()
	}

	pub fn is_empty(&self) -> bool {
		self.slots.is_empty()
	}

	/// Whether a state setter changed a value since the flag was last cleared.
	pub fn is_dirty(&self) -> bool {
		self.dirty.get()
	}

	pub(crate) fn clear_dirty(&self) {
		self.dirty.set(false);
	}

	/// Effects registered but not yet run.
	pub fn pending_effect_count(&self) -> usize {
		self.pending_effects.len()
	}
}

impl fmt::Debug for HookStore {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("HookStore")
			.field("component", &self.component)
			.field(
				"slots",
				&self.slots.iter().map(HookSlot::kind).collect::<Vec<_>>(),
			)
			.field("dirty", &self.dirty.get())
			.finish()
	}
}

impl Drop for HookStore {
	fn drop(&mut self) {
		for slot in &mut self.slots {
			if let HookSlot::Effect(cell) = slot
				&& let Some(cleanup) = cell.cleanup.take()
			{
				cleanup();
			}
		}
	}
}

/// Setter returned by [`HookCx::use_state`].
///
/// Writing a value different from the current one marks the owning instance
/// dirty; during server rendering that makes the renderer invoke the component
/// again before reading its output.
pub struct StateSetter<T> {
	cell: Rc<RefCell<T>>,
	dirty: Rc<Cell<bool>>,
}

impl<T> Clone for StateSetter<T> {
	fn clone(&self) -> Self {
		Self {
			cell: Rc::clone(&self.cell),
			dirty: Rc::clone(&self.dirty),
		}
	}
}

impl<T: Clone + PartialEq> StateSetter<T> {
	pub fn set(&self, value: T) {
		if *self.cell.borrow() == value {
			return;
		}
		*self.cell.borrow_mut() = value;
		self.dirty.set(true);
	}

	/// Computes the next value from the current one.
	pub fn update(&self, f: impl FnOnce(&T) -> T) {
		let next = f(&self.cell.borrow());
		self.set(next);
	}

	/// The value currently stored in the slot.
	pub fn get(&self) -> T {
		self.cell.borrow().clone()
	}
}

impl<T: fmt::Debug> fmt::Debug for StateSetter<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("StateSetter")
			.field("value", &*self.cell.borrow())
			.finish()
	}
}

/// Cursor over a [`HookStore`] for one component invocation.
pub struct HookCx<'a> {
	store: &'a mut HookStore,
	cursor: usize,
	scope: &'a ContextScope,
	provided: Vec<ProvidedContext>,
}

impl<'a> HookCx<'a> {
	fn next_index(&mut self) -> usize {
		let index = self.cursor;
		self.cursor += 1;
		index
	}

	fn mismatch(index: usize, expected: &'static str, found: &HookSlot) -> HookError {
		HookError::KindMismatch {
			index,
			expected,
			found: found.kind(),
		}
	}

	/// Name of the component being invoked.
	pub fn component(&self) -> &str {
		&self.store.component
	}

	/// The ambient context of this invocation.
	pub fn scope(&self) -> &ContextScope {
		self.scope
	}

	/// Local state. Returns the current value and a setter.
	///
	/// # Example
	///
	/// ```ignore
	/// let (count, set_count) = cx.use_state(0)?;
	/// if count < 3 {
	///     set_count.set(count + 1); // the renderer invokes the component again
	/// }
	/// ```
	pub fn use_state<T>(&mut self, initial: T) -> Result<(T, StateSetter<T>), HookError>
	where
		T: Clone + PartialEq + 'static,
	{
		self.use_state_with(|| initial)
	}

	/// Like [`HookCx::use_state`], computing the initial value only on first use.
	pub fn use_state_with<T, F>(&mut self, init: F) -> Result<(T, StateSetter<T>), HookError>
	where
		T: Clone + PartialEq + 'static,
		F: FnOnce() -> T,
	{
		let index = self.next_index();
		if index == self.store.slots.len() {
			let cell: Rc<RefCell<T>> = Rc::new(RefCell::new(init()));
			self.store.slots.push(HookSlot::State(cell));
		}

		let cell = match &self.store.slots[index] {
			HookSlot::State(any) => Rc::clone(any)
				.downcast::<RefCell<T>>()
				.map_err(|_| HookError::TypeMismatch { index })?,
			other => return Err(Self::mismatch(index, "state", other)),
		};

		let value = cell.borrow().clone();
		Ok((
			value,
			StateSetter {
				cell,
				dirty: Rc::clone(&self.store.dirty),
			},
		))
	}

	/// A mutable box that survives re-invocations and never marks the instance dirty.
	pub fn use_ref<T: 'static>(&mut self, initial: T) -> Result<Rc<RefCell<T>>, HookError> {
		let index = self.next_index();
		if index == self.store.slots.len() {
			let cell: Rc<RefCell<T>> = Rc::new(RefCell::new(initial));
			self.store.slots.push(HookSlot::Ref(cell));
		}

		match &self.store.slots[index] {
			HookSlot::Ref(any) => Rc::clone(any)
				.downcast::<RefCell<T>>()
				.map_err(|_| HookError::TypeMismatch { index }),
			other => Err(Self::mismatch(index, "ref", other)),
		}
	}

	/// Ends the invocation, checking the slot count against earlier invocations.
	///
	/// Returns the context values the component provided for its subtree.
	pub(crate) fn finish(self) -> Result<Vec<ProvidedContext>, HookError> {
		match self.store.expected_len {
			Some(expected) if expected != self.cursor => Err(HookError::SlotCountMismatch {
				component: self.store.component.clone(),
				expected,
				found: self.cursor,
			}),
			_ => {
				self.store.expected_len = Some(self.cursor);
				Ok(self.provided)
			}
		}
	}
}
