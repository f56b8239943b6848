//! Effect hook: use_effect
//!
//! Effects are registered during rendering and run later by
//! [`HookStore::flush_effects`]. Server rendering never flushes them; a live
//! host would call it after committing the output.

use tessera_core::reactive::Cleanup;

use super::{EffectCell, HookCx, HookSlot, HookStore};
use crate::error::HookError;

impl HookCx<'_> {
	/// Registers `effect` to run after commit when `deps` changed since the
	/// previous invocation (always on the first).
	///
	/// The effect may return a cleanup which runs before the next execution and
	/// when the instance is dropped.
	///
	/// # Example
	///
	/// ```ignore
	/// cx.use_effect(
	///     move || {
	///         tracing::debug!(%url, "page shown");
	///         None
	///     },
	///     url.clone(),
	/// )?;
	/// ```
	pub fn use_effect<D, F>(&mut self, effect: F, deps: D) -> Result<(), HookError>
	where
		D: PartialEq + 'static,
		F: FnOnce() -> Option<Cleanup> + 'static,
	{
		let index = self.next_index();

		if index == self.store.slots.len() {
			self.store.slots.push(HookSlot::Effect(EffectCell {
				deps: Box::new(deps),
				pending: Some(Box::new(effect)),
				cleanup: None,
			}));
			self.store.pending_effects.push(index);
			return Ok(());
		}

		let cell = match &mut self.store.slots[index] {
			HookSlot::Effect(cell) => cell,
			other => return Err(Self::mismatch(index, "effect", other)),
		};

		let unchanged = cell
			.deps
			.downcast_ref::<D>()
			.ok_or(HookError::TypeMismatch { index })?
			== &deps;
		if unchanged {
			return Ok(());
		}

		cell.deps = Box::new(deps);
		cell.pending = Some(Box::new(effect));
		if !self.store.pending_effects.contains(&index) {
			self.store.pending_effects.push(index);
		}
		Ok(())
	}
}

impl HookStore {
	/// Runs every registered effect in slot order, cleanup first.
	///
	/// Returns the number of effects that ran.
	pub fn flush_effects(&mut self) -> usize {
		let mut ran = 0;
		for index in std::mem::take(&mut self.pending_effects) {
			let Some(HookSlot::Effect(cell)) = self.slots.get_mut(index) else {
				continue;
			};
			let Some(effect) = cell.pending.take() else {
				continue;
			};
			if let Some(cleanup) = cell.cleanup.take() {
				cleanup();
			}
			cell.cleanup = effect();
			ran += 1;
		}
		ran
	}
}
