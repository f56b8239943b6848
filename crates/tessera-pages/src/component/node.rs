//! Node model: the immutable tree description the renderer walks.
//!
//! Nodes are built fresh for every render pass by [`create_node`] (or its alias
//! [`h`]) and never mutated afterwards. Composite variants are reference
//! counted, so cloning a node is cheap.

use std::borrow::Cow;
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use super::props::{PropValue, Props, format_number};
use super::r#trait::{ClassType, FunctionComponent};
use crate::ssr::Markup;

static NODE_COUNTER: AtomicU64 = AtomicU64::new(0);

fn next_node_id() -> u64 {
	NODE_COUNTER.fetch_add(1, Ordering::Relaxed) + 1
}

/// Identity and bookkeeping shared by composite nodes.
#[derive(Debug, Clone, Default)]
pub struct NodeMeta {
	/// Explicit identity among siblings.
	pub key: Option<String>,
	/// Extracted `ref` prop. Never attached during server rendering.
	pub node_ref: Option<PropValue>,
	/// Creation order, diagnostic only.
	pub id: u64,
}

/// An HTML element such as `<div>`.
#[derive(Debug)]
pub struct ElementNode {
	pub tag: Cow<'static, str>,
	/// Attributes, plus `children` when the element has content.
	pub props: Props,
	pub meta: NodeMeta,
}

/// Children rendered without a wrapping tag.
#[derive(Debug)]
pub struct FragmentNode {
	pub props: Props,
	pub meta: NodeMeta,
}

impl FragmentNode {
	pub fn children(&self) -> Node {
		self.props.children()
	}
}

/// One interpolated slot of a [`RawTemplate`].
#[derive(Debug, Clone)]
pub enum TemplateExpr {
	/// Skipped.
	Null,
	/// Trusted text inserted verbatim.
	Raw(String),
	/// Rendered like any other node.
	Node(Node),
	/// Markup rendered ahead of time by the host, inserted verbatim. Chunked
	/// markup keeps its chunks in the output.
	Markup(Markup),
}

impl From<&str> for TemplateExpr {
	fn from(value: &str) -> Self {
		Self::Raw(value.to_string())
	}
}

impl From<String> for TemplateExpr {
	fn from(value: String) -> Self {
		Self::Raw(value)
	}
}

impl From<Node> for TemplateExpr {
	fn from(value: Node) -> Self {
		Self::Node(value)
	}
}

impl From<Markup> for TemplateExpr {
	fn from(value: Markup) -> Self {
		Self::Markup(value)
	}
}

/// Trusted literal markup with interpolated expressions.
///
/// Serializes as `statics[0] exprs[0] statics[1] exprs[1] ...`; static segments
/// are emitted verbatim.
#[derive(Debug)]
pub struct RawTemplate {
	pub statics: Vec<String>,
	pub exprs: Vec<TemplateExpr>,
	pub meta: NodeMeta,
}

/// A reference to a function component plus the props it is called with.
#[derive(Debug)]
pub struct FunctionNode {
	pub component: Rc<FunctionComponent>,
	pub props: Props,
	pub meta: NodeMeta,
}

/// A reference to a class component plus the props it is constructed with.
#[derive(Debug)]
pub struct ClassNode {
	pub component: Rc<ClassType>,
	pub props: Props,
	pub meta: NodeMeta,
}

/// A node of the UI tree.
#[derive(Clone, Default)]
pub enum Node {
	/// Renders nothing.
	#[default]
	Null,
	/// Renders nothing, whatever the value.
	Bool(bool),
	/// Escaped text.
	Text(Rc<str>),
	Number(f64),
	/// Sibling nodes.
	List(Rc<[Node]>),
	Element(Rc<ElementNode>),
	Fragment(Rc<FragmentNode>),
	RawTemplate(Rc<RawTemplate>),
	/// An HTML comment with escaped content.
	Comment(Rc<str>),
	Function(Rc<FunctionNode>),
	Class(Rc<ClassNode>),
}

/// Discriminant of a [`Node`], for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
	Empty,
	Text,
	List,
	Element,
	Fragment,
	RawTemplate,
	Comment,
	FunctionComponent,
	ClassComponent,
}

impl Node {
	pub fn text(value: impl Into<Rc<str>>) -> Self {
		Self::Text(value.into())
	}

	pub fn list(nodes: impl IntoIterator<Item = Node>) -> Self {
		Self::List(nodes.into_iter().collect())
	}

	pub fn comment(value: impl Into<Rc<str>>) -> Self {
		Self::Comment(value.into())
	}

	/// An unkeyed fragment around `children`.
	pub fn fragment(children: impl IntoIterator<Item = Node>) -> Self {
		create_node(NodeType::Fragment, Props::new(), children.into_iter().collect())
	}

	/// A raw template node. `exprs` may be one shorter than `statics`.
	pub fn raw_template(
		statics: impl IntoIterator<Item = impl Into<String>>,
		exprs: impl IntoIterator<Item = TemplateExpr>,
	) -> Self {
		Self::RawTemplate(Rc::new(RawTemplate {
			statics: statics.into_iter().map(Into::into).collect(),
			exprs: exprs.into_iter().collect(),
			meta: NodeMeta {
				id: next_node_id(),
				..NodeMeta::default()
			},
		}))
	}

	pub fn kind(&self) -> NodeKind {
		match self {
			Self::Null | Self::Bool(_) => NodeKind::Empty,
			Self::Text(_) | Self::Number(_) => NodeKind::Text,
			Self::List(_) => NodeKind::List,
			Self::Element(_) => NodeKind::Element,
			Self::Fragment(_) => NodeKind::Fragment,
			Self::RawTemplate(_) => NodeKind::RawTemplate,
			Self::Comment(_) => NodeKind::Comment,
			Self::Function(_) => NodeKind::FunctionComponent,
			Self::Class(_) => NodeKind::ClassComponent,
		}
	}

	/// Explicit key of a composite node.
	pub fn key(&self) -> Option<&str> {
		self.meta().and_then(|meta| meta.key.as_deref())
	}

	pub fn meta(&self) -> Option<&NodeMeta> {
		match self {
			Self::Element(n) => Some(&n.meta),
			Self::Fragment(n) => Some(&n.meta),
			Self::RawTemplate(n) => Some(&n.meta),
			Self::Function(n) => Some(&n.meta),
			Self::Class(n) => Some(&n.meta),
			_ => None,
		}
	}

	/// `null`, booleans and the empty string render nothing.
	pub fn is_empty(&self) -> bool {
		match self {
			Self::Null | Self::Bool(_) => true,
			Self::Text(text) => text.is_empty(),
			_ => false,
		}
	}
}

impl fmt::Debug for Node {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Null => f.write_str("Null"),
			Self::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
			Self::Text(t) => f.debug_tuple("Text").field(t).finish(),
			Self::Number(n) => f.debug_tuple("Number").field(&format_number(*n)).finish(),
			Self::List(l) => f.debug_list().entries(l.iter()).finish(),
			Self::Element(e) => f
				.debug_struct("Element")
				.field("tag", &e.tag)
				.field("key", &e.meta.key)
				.field("props", &e.props)
				.finish(),
			Self::Fragment(fr) => f
				.debug_struct("Fragment")
				.field("key", &fr.meta.key)
				.field("props", &fr.props)
				.finish(),
			Self::RawTemplate(t) => f
				.debug_struct("RawTemplate")
				.field("statics", &t.statics)
				.field("exprs", &t.exprs)
				.finish(),
			Self::Comment(c) => f.debug_tuple("Comment").field(c).finish(),
			Self::Function(c) => f
				.debug_struct("Function")
				.field("name", &c.component.name())
				.field("key", &c.meta.key)
				.finish(),
			Self::Class(c) => f
				.debug_struct("Class")
				.field("name", &c.component.name())
				.field("key", &c.meta.key)
				.finish(),
		}
	}
}

impl From<&str> for Node {
	fn from(value: &str) -> Self {
		Self::Text(value.into())
	}
}

impl From<String> for Node {
	fn from(value: String) -> Self {
		Self::Text(value.into())
	}
}

impl From<f64> for Node {
	fn from(value: f64) -> Self {
		Self::Number(value)
	}
}

impl From<i64> for Node {
	fn from(value: i64) -> Self {
		Self::Number(value as f64)
	}
}

impl From<i32> for Node {
	fn from(value: i32) -> Self {
		Self::Number(f64::from(value))
	}
}

impl From<bool> for Node {
	fn from(value: bool) -> Self {
		Self::Bool(value)
	}
}

impl From<Vec<Node>> for Node {
	fn from(value: Vec<Node>) -> Self {
		Self::List(value.into())
	}
}

impl<T: Into<Node>> From<Option<T>> for Node {
	fn from(value: Option<T>) -> Self {
		value.map_or(Self::Null, Into::into)
	}
}

/// The type tag passed to [`create_node`].
#[derive(Debug, Clone)]
pub enum NodeType {
	Tag(Cow<'static, str>),
	Fragment,
	Function(Rc<FunctionComponent>),
	Class(Rc<ClassType>),
}

impl From<&'static str> for NodeType {
	fn from(value: &'static str) -> Self {
		Self::Tag(Cow::Borrowed(value))
	}
}

impl From<String> for NodeType {
	fn from(value: String) -> Self {
		Self::Tag(Cow::Owned(value))
	}
}

impl From<FunctionComponent> for NodeType {
	fn from(value: FunctionComponent) -> Self {
		Self::Function(Rc::new(value))
	}
}

impl From<&Rc<FunctionComponent>> for NodeType {
	fn from(value: &Rc<FunctionComponent>) -> Self {
		Self::Function(Rc::clone(value))
	}
}

impl From<ClassType> for NodeType {
	fn from(value: ClassType) -> Self {
		Self::Class(Rc::new(value))
	}
}

impl From<&Rc<ClassType>> for NodeType {
	fn from(value: &Rc<ClassType>) -> Self {
		Self::Class(Rc::clone(value))
	}
}

fn key_from(value: PropValue) -> Option<String> {
	match value {
		PropValue::Str(s) => Some(s),
		PropValue::Number(n) => Some(format_number(n)),
		PropValue::Bool(b) => Some(b.to_string()),
		_ => None,
	}
}

/// Builds a node from a type tag, props and children.
///
/// - `key` and `ref` are moved out of the props into [`NodeMeta`].
/// - A single child is stored as-is; several children become a [`Node::List`];
///   no children leaves any `children` prop untouched.
/// - Default props of a component fill every prop that is missing or undefined.
///
/// # Example
///
/// ```ignore
/// let card = create_node(
///     "div",
///     Props::new().with("className", "product-card").with("key", 7),
///     vec![h("h3", Props::new().with("className", "product-name"), vec!["Хлеб".into()])],
/// );
/// assert_eq!(card.key(), Some("7"));
/// ```
pub fn create_node(ty: impl Into<NodeType>, mut props: Props, children: Vec<Node>) -> Node {
	let key = props.remove("key").and_then(key_from);
	let node_ref = props.remove("ref");

	match children.len() {
		0 => {}
		1 => {
			let mut children = children;
			if let Some(child) = children.pop() {
				props.insert("children", child);
			}
		}
		_ => props.insert("children", Node::from(children)),
	}

	let meta = NodeMeta {
		key,
		node_ref,
		id: next_node_id(),
	};

	match ty.into() {
		NodeType::Tag(tag) => Node::Element(Rc::new(ElementNode { tag, props, meta })),
		NodeType::Fragment => Node::Fragment(Rc::new(FragmentNode { props, meta })),
		NodeType::Function(component) => {
			merge_defaults(&mut props, component.default_props());
			Node::Function(Rc::new(FunctionNode {
				component,
				props,
				meta,
			}))
		}
		NodeType::Class(component) => {
			merge_defaults(&mut props, component.default_props());
			Node::Class(Rc::new(ClassNode {
				component,
				props,
				meta,
			}))
		}
	}
}

/// Short alias for [`create_node`].
pub fn h(ty: impl Into<NodeType>, props: Props, children: Vec<Node>) -> Node {
	create_node(ty, props, children)
}

fn merge_defaults(props: &mut Props, defaults: &Props) {
	for (name, value) in defaults.iter() {
		if props.get(name).is_none_or(PropValue::is_undefined) {
			props.insert(name.to_string(), value.clone());
		}
	}
}
