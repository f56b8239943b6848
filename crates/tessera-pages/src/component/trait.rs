//! Component definitions: function components and the class component trait.

use std::borrow::Cow;
use std::fmt;

use super::node::Node;
use super::props::Props;
use crate::error::{RenderError, RenderResult};
use crate::reactive::context::{ContextScope, ProvidedContext};
use crate::reactive::hooks::HookCx;

type RenderFn = dyn Fn(&Props, &mut HookCx<'_>) -> RenderResult<Node>;

/// A component defined by a render function.
///
/// The function receives the props and a [`HookCx`] giving positional access
/// to the instance's hook slots.
///
/// # Example
///
/// ```ignore
/// let counter = FunctionComponent::new("Counter", |props, cx| {
///     let (count, _set_count) = cx.use_state(props.get_number("start").unwrap_or(0.0))?;
///     Ok(h("span", Props::new(), vec![count.into()]))
/// });
/// ```
pub struct FunctionComponent {
	name: Cow<'static, str>,
	render: Box<RenderFn>,
	default_props: Props,
}

impl FunctionComponent {
	pub fn new<F>(name: impl Into<Cow<'static, str>>, render: F) -> Self
	where
		F: Fn(&Props, &mut HookCx<'_>) -> RenderResult<Node> + 'static,
	{
		Self {
			name: name.into(),
			render: Box::new(render),
			default_props: Props::new(),
		}
	}

	/// Props merged in for anything the caller leaves missing or undefined.
	pub fn with_default_props(mut self, props: Props) -> Self {
		self.default_props = props;
		self
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn default_props(&self) -> &Props {
		&self.default_props
	}

	pub(crate) fn call(&self, props: &Props, cx: &mut HookCx<'_>) -> RenderResult<Node> {
		(self.render)(props, cx)
	}
}

impl fmt::Debug for FunctionComponent {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("FunctionComponent")
			.field("name", &self.name)
			.field("default_props", &self.default_props)
			.finish_non_exhaustive()
	}
}

/// Trait for stateful class components.
///
/// The struct's fields are the component state. During one render pass the
/// renderer calls, in order: [`construct`](ClassComponent::construct) (or
/// reuses a cached instance), then either
/// [`derive_state_from_props`](ClassComponent::derive_state_from_props) or one
/// of the pre-render hooks, then [`render`](ClassComponent::render).
///
/// A component that overrides
/// [`derive_state_from_error`](ClassComponent::derive_state_from_error) or
/// [`did_catch`](ClassComponent::did_catch) acts as an error boundary for its
/// subtree.
///
/// # Example
///
/// ```ignore
/// struct Fallback {
///     failed: bool,
/// }
///
/// impl ClassComponent for Fallback {
///     fn construct(_props: &Props, _context: &ContextScope) -> Self {
///         Self { failed: false }
///     }
///
///     fn render(&mut self, props: &Props, _context: &ContextScope) -> RenderResult<Node> {
///         if self.failed {
///             return Ok("unavailable".into());
///         }
///         Ok(props.children())
///     }
///
///     fn derive_state_from_error(&mut self, _error: &RenderError) -> bool {
///         self.failed = true;
///         true
///     }
///
///     fn name() -> &'static str {
///         "Fallback"
///     }
/// }
/// ```
pub trait ClassComponent: 'static {
	/// Creates the instance on first encounter of its tree position.
	fn construct(props: &Props, context: &ContextScope) -> Self
	where
		Self: Sized;

	/// Produces the component output.
	fn render(&mut self, props: &Props, context: &ContextScope) -> RenderResult<Node>;

	/// Updates state from the incoming props before every render.
	///
	/// Return `true` when state was derived; the mount/update hooks are then
	/// skipped for this pass.
	fn derive_state_from_props(&mut self, _props: &Props) -> bool {
		false
	}

	/// Called before the first render of a new instance.
	fn will_mount(&mut self) {}

	/// Called before rendering a reused instance.
	fn will_update(&mut self) {}

	/// Context values made visible to the subtree below this component.
	fn child_context(&self) -> Vec<ProvidedContext> {
		Vec::new()
	}

	/// Records an error thrown below this component. Return `true` to render
	/// the updated output in place of the failed subtree.
	fn derive_state_from_error(&mut self, _error: &RenderError) -> bool {
		false
	}

	/// Same contract as `derive_state_from_error`, consulted after it.
	fn did_catch(&mut self, _error: &RenderError) -> bool {
		false
	}

	/// Returns the component's name for diagnostics and instance keys.
	fn name() -> &'static str
	where
		Self: Sized;
}

type ConstructFn = dyn Fn(&Props, &ContextScope) -> Box<dyn ClassComponent>;

/// Type-erased constructor of a [`ClassComponent`], used as a node type.
pub struct ClassType {
	name: &'static str,
	construct: Box<ConstructFn>,
	default_props: Props,
}

impl ClassType {
	/// The node type for `C`.
	pub fn of<C: ClassComponent>() -> Self {
		Self {
			name: C::name(),
			construct: Box::new(|props, context| Box::new(C::construct(props, context))),
			default_props: Props::new(),
		}
	}

	pub fn with_default_props(mut self, props: Props) -> Self {
		self.default_props = props;
		self
	}

	pub fn name(&self) -> &str {
		self.name
	}

	pub fn default_props(&self) -> &Props {
		&self.default_props
	}

	pub(crate) fn construct(&self, props: &Props, context: &ContextScope) -> Box<dyn ClassComponent> {
		(self.construct)(props, context)
	}
}

impl fmt::Debug for ClassType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ClassType")
			.field("name", &self.name)
			.field("default_props", &self.default_props)
			.finish_non_exhaustive()
	}
}
