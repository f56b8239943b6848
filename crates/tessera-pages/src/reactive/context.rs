//! Context values threaded down the render recursion.
//!
//! A [`Context`] is a typed key with a default value. The renderer carries a
//! [`ContextScope`] into every recursive call; a provider replaces it with an
//! extended copy for its subtree only. Nothing here is global.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::component::{FunctionComponent, Node, NodeType, PropValue, Props, create_node};

/// Unique identifier of a [`Context`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContextId(usize);

impl ContextId {
	fn next() -> Self {
		static COUNTER: AtomicUsize = AtomicUsize::new(0);
		Self(COUNTER.fetch_add(1, Ordering::Relaxed))
	}
}

/// A typed context key with a default value.
///
/// # Example
///
/// ```ignore
/// let currency = Context::new("₽".to_string());
///
/// let tree = currency.provider("€".to_string(), h(&price_tag, Props::new(), vec![]));
/// // inside `price_tag`: cx.use_context(&currency) == "€"
/// ```
pub struct Context<T> {
	id: ContextId,
	default: Rc<T>,
}

impl<T> Clone for Context<T> {
	fn clone(&self) -> Self {
		Self {
			id: self.id,
			default: Rc::clone(&self.default),
		}
	}
}

impl<T: fmt::Debug> fmt::Debug for Context<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Context")
			.field("id", &self.id)
			.field("default", &self.default)
			.finish()
	}
}

impl<T: 'static> Context<T> {
	pub fn new(default: T) -> Self {
		Self {
			id: ContextId::next(),
			default: Rc::new(default),
		}
	}

	pub fn id(&self) -> ContextId {
		self.id
	}

	/// Value used when no provider is in scope.
	pub fn default_value(&self) -> Rc<T> {
		Rc::clone(&self.default)
	}

	/// Pairs this context with a value, for [`ContextScope::extend`].
	pub fn provide(&self, value: T) -> ProvidedContext {
		self.provide_rc(Rc::new(value))
	}

	pub fn provide_rc(&self, value: Rc<T>) -> ProvidedContext {
		ProvidedContext {
			id: self.id,
			value,
		}
	}

	/// A provider node: `children` see `value` for this context.
	pub fn provider(&self, value: T, children: impl Into<Node>) -> Node {
		let context = self.clone();
		let value = Rc::new(value);
		let provider = FunctionComponent::new("ContextProvider", move |props, cx| {
			cx.provide_context_rc(&context, Rc::clone(&value));
			Ok(props.children())
		});
		create_node(
			NodeType::from(provider),
			Props::new().with("children", PropValue::Node(children.into())),
			vec![],
		)
	}
}

/// A context value waiting to be added to a scope.
#[derive(Clone)]
pub struct ProvidedContext {
	id: ContextId,
	value: Rc<dyn Any>,
}

impl fmt::Debug for ProvidedContext {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ProvidedContext")
			.field("id", &self.id)
			.finish_non_exhaustive()
	}
}

/// Immutable mapping of provided context values.
///
/// Cloning is cheap; [`ContextScope::extend`] copies on write.
#[derive(Clone, Default)]
pub struct ContextScope {
	values: Rc<HashMap<ContextId, Rc<dyn Any>>>,
}

impl ContextScope {
	pub fn new() -> Self {
		Self::default()
	}

	/// Builder form of [`ContextScope::extend`] for a single value.
	pub fn with<T: 'static>(&self, context: &Context<T>, value: T) -> Self {
		self.extend([context.provide(value)])
	}

	/// Returns a new scope containing `provided` on top of this one.
	///
	/// When nothing is provided the existing map is shared.
	pub fn extend(&self, provided: impl IntoIterator<Item = ProvidedContext>) -> Self {
		let mut provided = provided.into_iter().peekable();
		if provided.peek().is_none() {
			return self.clone();
		}
		let mut values = (*self.values).clone();
		for entry in provided {
			values.insert(entry.id, entry.value);
		}
		Self {
			values: Rc::new(values),
		}
	}

	/// The provided value, if a provider is in scope.
	pub fn lookup<T: 'static>(&self, context: &Context<T>) -> Option<Rc<T>> {
		self.values
			.get(&context.id)
			.and_then(|value| Rc::clone(value).downcast::<T>().ok())
	}

	/// The provided value, falling back to the context's default.
	pub fn get<T: 'static>(&self, context: &Context<T>) -> Rc<T> {
		self.lookup(context)
			.unwrap_or_else(|| context.default_value())
	}

	pub fn len(&self) -> usize {
		self.values.len()
	}

	pub fn is_empty(&self) -> bool {
		self.values.is_empty()
	}
}

impl fmt::Debug for ContextScope {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ContextScope")
			.field("len", &self.values.len())
			.finish()
	}
}
