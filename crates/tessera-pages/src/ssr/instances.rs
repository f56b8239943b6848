//! Component instances kept between render calls.
//!
//! An instance is addressed by its tree position: the chain of element tags,
//! list indices or keys, and component names from the root, plus the
//! component's own name and key.

use std::collections::HashMap;

use crate::component::ClassComponent;
use crate::reactive::hooks::HookStore;

/// A live component instance.
pub(crate) enum Instance {
	Hooks(HookStore),
	Class(Box<dyn ClassComponent>),
}

/// Instances by tree position.
#[derive(Default)]
pub(crate) struct InstanceCache {
	entries: HashMap<String, Instance>,
}

impl InstanceCache {
	/// Removes the instance at `position` for the duration of its render.
	pub(crate) fn take(&mut self, position: &str) -> Option<Instance> {
		self.entries.remove(position)
	}

	pub(crate) fn put(&mut self, position: String, instance: Instance) {
		self.entries.insert(position, instance);
	}

	pub(crate) fn len(&self) -> usize {
		self.entries.len()
	}

	pub(crate) fn clear(&mut self) {
		self.entries.clear();
	}
}
