//! Synchronous renderer: walks a node tree and produces markup.
//!
//! The walk is depth-first. Components run pre-order (so their hooks and
//! context are resolved before their subtree), strings are assembled
//! post-order. Ambient state (context, the enclosing `<select>` value, SVG
//! mode) travels down as an explicit [`Frame`]; the tree position used for
//! instance reuse is a path of segments kept by the walker, never a pointer
//! stored in the nodes.

use std::borrow::Cow;
use std::cell::RefCell;

use tracing::{debug, trace};

use super::attrs::{MappedName, is_valid_name, is_void_element, map_attribute_name, style_to_css};
use super::escape::escape;
use super::instances::{Instance, InstanceCache};
use super::markup::{Markup, MarkupBuilder};
use crate::component::{
	ClassComponent, ClassNode, ElementNode, FunctionNode, Node, PropValue, RawTemplate,
	TemplateExpr, format_number,
};
use crate::error::{RenderError, RenderResult};
use crate::reactive::context::ContextScope;
use crate::reactive::hooks::HookStore;

/// Maximum number of invocations of a function component within one visit.
///
/// A component whose state setters keep changing its state after this many
/// invocations fails with [`RenderError::RenderCycleExceeded`].
pub const MAX_RERENDER_ATTEMPTS: usize = 25;

/// Ambient state passed down the recursion.
#[derive(Clone)]
struct Frame {
	context: ContextScope,
	select_value: Option<String>,
	svg: bool,
}

/// The synchronous renderer.
///
/// # Example
///
/// ```ignore
/// let renderer = SyncRenderer::new();
/// let html = renderer.render_to_string(&h(
///     "p",
///     Props::new().with("className", "note"),
///     vec!["5 < 6".into()],
/// ))?;
/// assert_eq!(html, r#"<p class="note">5 &lt; 6</p>"#);
/// ```
pub struct SyncRenderer {
	error_boundaries: bool,
	instances: Option<RefCell<InstanceCache>>,
}

impl Default for SyncRenderer {
	fn default() -> Self {
		Self::new()
	}
}

impl SyncRenderer {
	/// Creates a renderer that builds fresh component instances on every pass.
	pub fn new() -> Self {
		Self {
			error_boundaries: true,
			instances: None,
		}
	}

	/// Creates a renderer that keeps component instances (hook stores and class
	/// objects) between calls, keyed by tree position and key.
	pub fn with_instance_cache() -> Self {
		Self {
			error_boundaries: true,
			instances: Some(RefCell::new(InstanceCache::default())),
		}
	}

	/// Enables or disables error boundary recovery.
	pub fn error_boundaries(mut self, enabled: bool) -> Self {
		self.error_boundaries = enabled;
		self
	}

	/// Number of cached instances (always zero without a cache).
	pub fn instance_count(&self) -> usize {
		self.instances
			.as_ref()
			.map_or(0, |cache| cache.borrow().len())
	}

	/// Drops every cached instance.
	pub fn clear_instances(&self) {
		if let Some(cache) = &self.instances {
			cache.borrow_mut().clear();
		}
	}

	/// Renders `node` with an empty context.
	pub fn render_to_string(&self, node: &Node) -> RenderResult<String> {
		self.render_with_context(node, &ContextScope::new())
	}

	/// Renders `node` with `context` as the ambient context.
	pub fn render_with_context(&self, node: &Node, context: &ContextScope) -> RenderResult<String> {
		self.render_to_markup(node, context).map(Markup::into_string)
	}

	/// Renders `node` to [`Markup`], which the caller joins.
	pub fn render_to_markup(&self, node: &Node, context: &ContextScope) -> RenderResult<Markup> {
		let frame = Frame {
			context: context.clone(),
			select_value: None,
			svg: false,
		};
		let mut walker = Walker {
			renderer: self,
			path: Vec::new(),
		};
		walker.render_node(node, &frame)
	}
}

struct Walker<'r> {
	renderer: &'r SyncRenderer,
	path: Vec<String>,
}

/// Returns the children of an unkeyed fragment, or the node itself.
fn unwrap_fragment(node: Node) -> Node {
	if let Node::Fragment(fragment) = &node
		&& fragment.meta.key.is_none()
	{
		return fragment.children();
	}
	node
}

impl Walker<'_> {
	fn descend<R>(&mut self, segment: impl Into<String>, f: impl FnOnce(&mut Self) -> R) -> R {
		self.path.push(segment.into());
		let out = f(self);
		self.path.pop();
		out
	}

	/// Cache key of a component at the current position, if caching is on.
	fn position(&self, name: &str, key: Option<&str>) -> Option<String> {
		self.renderer.instances.as_ref()?;
		let mut position = self.path.join("/");
		position.push('/');
		position.push_str(name);
		if let Some(key) = key {
			position.push('[');
			position.push_str(key);
			position.push(']');
		}
		Some(position)
	}

	fn take_instance(&self, position: Option<&str>) -> Option<Instance> {
		let cache = self.renderer.instances.as_ref()?;
		cache.borrow_mut().take(position?)
	}

	fn put_instance(&self, position: Option<String>, instance: Instance) {
		if let (Some(cache), Some(position)) = (&self.renderer.instances, position) {
			cache.borrow_mut().put(position, instance);
		}
	}

	fn render_node(&mut self, node: &Node, frame: &Frame) -> RenderResult<Markup> {
		match node {
			Node::Null | Node::Bool(_) => Ok(Markup::empty()),
			Node::Text(text) => Ok(Markup::Text(escape(text).into_owned())),
			Node::Number(n) => Ok(Markup::Text(format_number(*n))),
			Node::List(items) => self.render_list(items, frame),
			Node::Comment(text) => Ok(Markup::Text(format!("<!--{}-->", escape(text)))),
			Node::RawTemplate(template) => self.render_template(template, frame),
			Node::Fragment(fragment) => {
				let children = fragment.children();
				match &fragment.meta.key {
					Some(key) => self.descend(format!("#{key}"), |w| w.render_node(&children, frame)),
					None => self.render_node(&children, frame),
				}
			}
			Node::Element(element) => self.render_element(element, frame),
			Node::Function(component) => self.render_function(component, frame),
			Node::Class(component) => self.render_class(component, frame),
		}
	}

	fn render_list(&mut self, items: &[Node], frame: &Frame) -> RenderResult<Markup> {
		let mut builder = MarkupBuilder::default();
		for (index, item) in items.iter().enumerate() {
			if matches!(item, Node::Null | Node::Bool(_)) {
				continue;
			}
			let segment = match item.key() {
				Some(key) => format!("#{key}"),
				None => index.to_string(),
			};
			builder.push(self.descend(segment, |w| w.render_node(item, frame))?);
		}
		Ok(builder.finish())
	}

	fn render_template(&mut self, template: &RawTemplate, frame: &Frame) -> RenderResult<Markup> {
		let mut builder = MarkupBuilder::default();
		for (index, segment) in template.statics.iter().enumerate() {
			builder.push_str(segment);
			match template.exprs.get(index) {
				None | Some(TemplateExpr::Null) => {}
				Some(TemplateExpr::Raw(raw)) => builder.push_str(raw),
				Some(TemplateExpr::Markup(markup)) => builder.push(markup.clone()),
				Some(TemplateExpr::Node(node)) => {
					builder.push(self.descend(format!("${index}"), |w| w.render_node(node, frame))?);
				}
			}
		}
		Ok(builder.finish())
	}

	fn render_element(&mut self, element: &ElementNode, frame: &Frame) -> RenderResult<Markup> {
		let tag: &str = &element.tag;
		let props = &element.props;
		let mut open = format!("<{tag}");
		let mut children: Option<&PropValue> = None;
		let mut inner_html: Option<&str> = None;
		let mut select_value = frame.select_value.clone();

		for (prop, value) in props.iter() {
			if matches!(value, PropValue::Handler(_)) {
				continue;
			}

			let mut stringify = false;
			let mut style = None;
			let name: Cow<'_, str> = match prop {
				"children" => {
					children = Some(value);
					continue;
				}
				"key" | "ref" | "__self" | "__source" => continue,
				"htmlFor" => {
					if props.contains("for") {
						continue;
					}
					Cow::Borrowed("for")
				}
				"className" => {
					if props.contains("class") {
						continue;
					}
					Cow::Borrowed("class")
				}
				"defaultChecked" => Cow::Borrowed("checked"),
				"defaultSelected" => Cow::Borrowed("selected"),
				"defaultValue" | "value" => match tag {
					"textarea" => {
						children = Some(value);
						continue;
					}
					"select" => {
						select_value = value.to_text();
						continue;
					}
					"option" => {
						if frame.select_value.is_some()
							&& frame.select_value == value.to_text()
							&& !props.contains("selected")
						{
							open.push_str(" selected");
						}
						Cow::Borrowed("value")
					}
					_ => Cow::Borrowed("value"),
				},
				"dangerouslySetInnerHTML" => {
					inner_html = match value {
						PropValue::InnerHtml(html) | PropValue::Str(html) => Some(html.as_str()),
						_ => None,
					};
					continue;
				}
				"style" => {
					if let PropValue::Style(object) = value {
						style = Some(style_to_css(object));
					}
					Cow::Borrowed("style")
				}
				"acceptCharset" => Cow::Borrowed("accept-charset"),
				"httpEquiv" => Cow::Borrowed("http-equiv"),
				other => match map_attribute_name(other, frame.svg, !value.is_nullish()) {
					MappedName::Skip => continue,
					MappedName::Emit { name, stringify: s } => {
						stringify = s;
						name
					}
				},
			};

			match style {
				Some(None) => {}
				Some(Some(css)) => push_attr(&mut open, &name, &PropValue::Str(css), false),
				None => push_attr(&mut open, &name, value, stringify),
			}
		}

		if !is_valid_name(tag) {
			return Err(RenderError::InvalidTagName {
				tag: tag.to_string(),
				context: format!("{open}>"),
			});
		}

		if is_void_element(tag) {
			open.push_str("/>");
			return Ok(Markup::Text(open));
		}

		let mut out = open;
		out.push('>');
		match (inner_html.filter(|html| !html.is_empty()), children) {
			(Some(html), _) => out.push_str(html),
			(None, Some(PropValue::Str(text))) => out.push_str(&escape(text)),
			(None, Some(PropValue::Number(n))) => out.push_str(&format_number(*n)),
			(None, Some(PropValue::Node(node))) => {
				let child_frame = Frame {
					context: frame.context.clone(),
					select_value,
					svg: tag == "svg" || (tag != "foreignObject" && frame.svg),
				};
				self.descend(tag, |w| w.render_node(node, &child_frame))?
					.write_into(&mut out);
			}
			_ => {}
		}
		out.push_str("</");
		out.push_str(tag);
		out.push('>');
		Ok(Markup::Text(out))
	}

	fn render_function(&mut self, node: &FunctionNode, frame: &Frame) -> RenderResult<Markup> {
		let component = &node.component;
		let name = component.name();
		let position = self.position(name, node.meta.key.as_deref());

		let mut store = match self.take_instance(position.as_deref()) {
			Some(Instance::Hooks(store)) => store,
			_ => HookStore::new(name),
		};

		let mut attempts = 0;
		let (output, provided) = loop {
			attempts += 1;
			store.clear_dirty();
			let mut cx = store.cx(&frame.context);
			let result = component.call(&node.props, &mut cx);
			let finished = cx.finish();
			let output = result?;
			let provided = finished?;
			if !store.is_dirty() {
				break (output, provided);
			}
			if attempts >= MAX_RERENDER_ATTEMPTS {
				return Err(RenderError::RenderCycleExceeded {
					component: name.to_string(),
					limit: MAX_RERENDER_ATTEMPTS,
				});
			}
			trace!(component = name, attempt = attempts, "state changed during render, invoking again");
		};
		self.put_instance(position, Instance::Hooks(store));

		let child_frame = Frame {
			context: frame.context.extend(provided),
			..frame.clone()
		};
		let output = unwrap_fragment(output);
		self.descend(name, |w| w.render_node(&output, &child_frame))
	}

	fn render_class(&mut self, node: &ClassNode, frame: &Frame) -> RenderResult<Markup> {
		let name = node.component.name();
		let position = self.position(name, node.meta.key.as_deref());

		let (mut instance, reused) = match self.take_instance(position.as_deref()) {
			Some(Instance::Class(instance)) => (instance, true),
			_ => (node.component.construct(&node.props, &frame.context), false),
		};

		if !instance.derive_state_from_props(&node.props) {
			if reused {
				instance.will_update();
			} else {
				instance.will_mount();
			}
		}

		let result = self.render_class_output(instance.as_mut(), node, frame);
		let result = match result {
			Err(err) if self.renderer.error_boundaries && err.is_recoverable() => {
				self.recover(instance.as_mut(), err, node, frame)
			}
			other => other,
		};
		self.put_instance(position, Instance::Class(instance));
		result
	}

	fn render_class_output(
		&mut self,
		instance: &mut dyn ClassComponent,
		node: &ClassNode,
		frame: &Frame,
	) -> RenderResult<Markup> {
		let output = unwrap_fragment(instance.render(&node.props, &frame.context)?);
		let child_frame = Frame {
			context: frame.context.extend(instance.child_context()),
			..frame.clone()
		};
		self.descend(node.component.name(), |w| w.render_node(&output, &child_frame))
	}

	/// Gives `err` to `instance`; renders its updated output if it recovers.
	fn recover(
		&mut self,
		instance: &mut dyn ClassComponent,
		err: RenderError,
		node: &ClassNode,
		frame: &Frame,
	) -> RenderResult<Markup> {
		let derived = instance.derive_state_from_error(&err);
		let caught = instance.did_catch(&err);
		if !(derived || caught) {
			return Err(err);
		}
		debug!(component = node.component.name(), error = %err, "error boundary recovered subtree");
		self.render_class_output(instance, node, frame)
	}
}

fn push_attr(out: &mut String, name: &str, value: &PropValue, stringify: bool) {
	let text: Cow<'_, str> = match value {
		PropValue::Undefined | PropValue::Null => return,
		PropValue::Bool(b) if stringify => Cow::Owned(b.to_string()),
		PropValue::Bool(false) => return,
		PropValue::Bool(true) => {
			out.push(' ');
			out.push_str(name);
			return;
		}
		PropValue::Str(s) if s.is_empty() => {
			out.push(' ');
			out.push_str(name);
			return;
		}
		PropValue::Str(s) => escape(s),
		PropValue::Number(n) => Cow::Owned(format_number(*n)),
		PropValue::Style(_)
		| PropValue::Handler(_)
		| PropValue::Data(_)
		| PropValue::Node(_)
		| PropValue::InnerHtml(_) => return,
	};
	out.push(' ');
	out.push_str(name);
	out.push_str("=\"");
	out.push_str(&text);
	out.push('"');
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::component::{Props, Style, h};
	use rstest::rstest;

	fn render(node: &Node) -> String {
		SyncRenderer::new().render_to_string(node).unwrap()
	}

	#[rstest]
	fn test_renders_element_with_attributes() {
		let node = h(
			"input",
			Props::new()
				.with("type", "text")
				.with("className", "input input-search")
				.with("placeholder", "Поиск товаров...")
				.with("disabled", true),
			vec![],
		);

		assert_eq!(
			render(&node),
			r#"<input type="text" class="input input-search" placeholder="Поиск товаров..." disabled/>"#
		);
	}

	#[rstest]
	fn test_primitives() {
		assert_eq!(render(&Node::Null), "");
		assert_eq!(render(&Node::Bool(true)), "");
		assert_eq!(render(&Node::from("")), "");
		assert_eq!(render(&Node::from(100_i32)), "100");
		assert_eq!(render(&Node::from("a<b")), "a&lt;b");
	}

	#[rstest]
	fn test_style_and_false_attributes() {
		let node = h(
			"div",
			Props::new()
				.with("style", Style::new().set("marginTop", 4).set("opacity", 0.5))
				.with("hidden", false)
				.with("title", PropValue::Null),
			vec![],
		);
		assert_eq!(render(&node), r#"<div style="margin-top:4px;opacity:0.5;"></div>"#);
	}

	#[rstest]
	fn test_select_marks_matching_option() {
		let node = h(
			"select",
			Props::new().with("value", "b"),
			vec![
				h("option", Props::new().with("value", "a"), vec!["A".into()]),
				h("option", Props::new().with("value", "b"), vec!["B".into()]),
			],
		);
		assert_eq!(
			render(&node),
			r#"<select><option value="a">A</option><option selected value="b">B</option></select>"#
		);
	}

	#[rstest]
	fn test_invalid_tag_is_an_error() {
		let node = h("my tag", Props::new().with("id", "x"), vec![]);
		let err = SyncRenderer::new().render_to_string(&node).unwrap_err();
		assert_eq!(
			err.to_string(),
			r#"my tag is not a valid HTML tag name in <my tag id="x">"#
		);
	}
}
