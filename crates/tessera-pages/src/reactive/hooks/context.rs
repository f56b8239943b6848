//! Context hooks: use_context and provide_context

use std::rc::Rc;

use super::HookCx;
use crate::reactive::context::Context;

impl HookCx<'_> {
	/// Reads a value from the nearest ancestor provider, or the context default.
	///
	/// Context reads do not occupy a hook slot.
	pub fn use_context<T: 'static>(&self, context: &Context<T>) -> Rc<T> {
		self.scope.get(context)
	}

	/// Makes `value` visible to this component's subtree.
	///
	/// The value applies to the output of the current invocation only; the
	/// component's own context and its siblings are unaffected.
	pub fn provide_context<T: 'static>(&mut self, context: &Context<T>, value: T) {
		self.provide_context_rc(context, Rc::new(value));
	}

	pub fn provide_context_rc<T: 'static>(&mut self, context: &Context<T>, value: Rc<T>) {
		self.provided.push(context.provide_rc(value));
	}
}
