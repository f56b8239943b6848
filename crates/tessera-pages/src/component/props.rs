//! Props system for component properties.
//!
//! Props are an ordered mapping from names to [`PropValue`]s. Iteration order is
//! insertion order, which is also the order attributes are serialized in.

use std::any::Any;
use std::borrow::Cow;
use std::fmt;
use std::rc::Rc;

use super::node::Node;

/// Name of a prop.
pub type PropName = Cow<'static, str>;

/// A value stored in [`Props`].
#[derive(Clone)]
pub enum PropValue {
	/// Left unset by the caller; replaced by a default prop when one exists.
	Undefined,
	Null,
	Bool(bool),
	Number(f64),
	Str(String),
	/// Inline style object, serialized to `name:value;` pairs.
	Style(Style),
	/// An event handler. Callables never appear in markup.
	Handler(Rc<dyn Fn()>),
	/// Arbitrary data handed to a component. Never serialized.
	Data(Rc<dyn Any>),
	/// A renderable child (used by `children`).
	Node(Node),
	/// Trusted markup inserted verbatim (`dangerouslySetInnerHTML`).
	InnerHtml(String),
}

impl PropValue {
	/// Wraps arbitrary component data.
	pub fn data<T: 'static>(value: T) -> Self {
		Self::Data(Rc::new(value))
	}

	/// Wraps an event handler.
	pub fn handler(f: impl Fn() + 'static) -> Self {
		Self::Handler(Rc::new(f))
	}

	pub fn is_undefined(&self) -> bool {
		matches!(self, Self::Undefined)
	}

	/// `null` or `undefined`.
	pub fn is_nullish(&self) -> bool {
		matches!(self, Self::Undefined | Self::Null)
	}

	pub fn as_str(&self) -> Option<&str> {
		match self {
			Self::Str(s) => Some(s),
			_ => None,
		}
	}

	pub fn as_number(&self) -> Option<f64> {
		match self {
			Self::Number(n) => Some(*n),
			_ => None,
		}
	}

	pub fn as_bool(&self) -> Option<bool> {
		match self {
			Self::Bool(b) => Some(*b),
			_ => None,
		}
	}

	/// String form used for comparisons such as `<option>` selection.
	pub(crate) fn to_text(&self) -> Option<String> {
		match self {
			Self::Str(s) => Some(s.clone()),
			Self::Number(n) => Some(format_number(*n)),
			Self::Bool(b) => Some(b.to_string()),
			_ => None,
		}
	}
}

impl fmt::Debug for PropValue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Undefined => f.write_str("Undefined"),
			Self::Null => f.write_str("Null"),
			Self::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
			Self::Number(n) => f.debug_tuple("Number").field(n).finish(),
			Self::Str(s) => f.debug_tuple("Str").field(s).finish(),
			Self::Style(s) => f.debug_tuple("Style").field(s).finish(),
			Self::Handler(_) => f.write_str("Handler(..)"),
			Self::Data(_) => f.write_str("Data(..)"),
			Self::Node(n) => f.debug_tuple("Node").field(n).finish(),
			Self::InnerHtml(s) => f.debug_tuple("InnerHtml").field(s).finish(),
		}
	}
}

impl From<&str> for PropValue {
	fn from(value: &str) -> Self {
		Self::Str(value.to_string())
	}
}

impl From<String> for PropValue {
	fn from(value: String) -> Self {
		Self::Str(value)
	}
}

impl From<&String> for PropValue {
	fn from(value: &String) -> Self {
		Self::Str(value.clone())
	}
}

impl From<bool> for PropValue {
	fn from(value: bool) -> Self {
		Self::Bool(value)
	}
}

macro_rules! number_prop {
	($($ty:ty),*) => {
		$(
			impl From<$ty> for PropValue {
				fn from(value: $ty) -> Self {
					Self::Number(value as f64)
				}
			}
		)*
	};
}

number_prop!(i32, i64, u32, u64, usize, f32, f64);

impl From<Style> for PropValue {
	fn from(value: Style) -> Self {
		Self::Style(value)
	}
}

impl From<Node> for PropValue {
	fn from(value: Node) -> Self {
		Self::Node(value)
	}
}

impl<T: Into<PropValue>> From<Option<T>> for PropValue {
	fn from(value: Option<T>) -> Self {
		value.map_or(Self::Null, Into::into)
	}
}

/// Ordered property mapping of a node.
///
/// # Example
///
/// ```ignore
/// let props = Props::new()
///     .with("type", "text")
///     .with("className", "input input-search")
///     .with("disabled", true);
/// ```
#[derive(Clone, Default)]
pub struct Props {
	entries: Vec<(PropName, PropValue)>,
}

impl Props {
	pub fn new() -> Self {
		Self::default()
	}

	/// Builder form of [`Props::insert`].
	pub fn with(mut self, name: impl Into<PropName>, value: impl Into<PropValue>) -> Self {
		self.insert(name, value);
		self
	}

	/// Sets a prop. An existing entry keeps its position.
	pub fn insert(&mut self, name: impl Into<PropName>, value: impl Into<PropValue>) {
		let name = name.into();
		let value = value.into();
		match self.entries.iter_mut().find(|(n, _)| *n == name) {
			Some(entry) => entry.1 = value,
			None => self.entries.push((name, value)),
		}
	}

	pub fn get(&self, name: &str) -> Option<&PropValue> {
		self.entries
			.iter()
			.find(|(n, _)| n == name)
			.map(|(_, v)| v)
	}

	/// Whether the name is present at all, even with an undefined value.
	pub fn contains(&self, name: &str) -> bool {
		self.entries.iter().any(|(n, _)| n == name)
	}

	pub fn remove(&mut self, name: &str) -> Option<PropValue> {
		let index = self.entries.iter().position(|(n, _)| n == name)?;
		Some(self.entries.remove(index).1)
	}

	pub fn get_str(&self, name: &str) -> Option<&str> {
		self.get(name).and_then(PropValue::as_str)
	}

	pub fn get_number(&self, name: &str) -> Option<f64> {
		self.get(name).and_then(PropValue::as_number)
	}

	/// Downcasts a [`PropValue::Data`] entry.
	pub fn get_data<T: 'static>(&self, name: &str) -> Option<Rc<T>> {
		match self.get(name)? {
			PropValue::Data(data) => data.clone().downcast::<T>().ok(),
			_ => None,
		}
	}

	/// The `children` prop as a node, or [`Node::Null`].
	pub fn children(&self) -> Node {
		match self.get("children") {
			Some(PropValue::Node(node)) => node.clone(),
			Some(PropValue::Str(s)) => Node::text(s.as_str()),
			Some(PropValue::Number(n)) => Node::Number(*n),
			_ => Node::Null,
		}
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, &PropValue)> {
		self.entries.iter().map(|(n, v)| (n.as_ref(), v))
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}

impl fmt::Debug for Props {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_map().entries(self.iter()).finish()
	}
}

impl<K, V> FromIterator<(K, V)> for Props
where
	K: Into<PropName>,
	V: Into<PropValue>,
{
	fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
		let mut props = Props::new();
		for (name, value) in iter {
			props.insert(name, value);
		}
		props
	}
}

/// A single inline style value.
#[derive(Debug, Clone, PartialEq)]
pub enum StyleValue {
	Null,
	Str(String),
	Number(f64),
}

impl From<&str> for StyleValue {
	fn from(value: &str) -> Self {
		Self::Str(value.to_string())
	}
}

impl From<String> for StyleValue {
	fn from(value: String) -> Self {
		Self::Str(value)
	}
}

impl From<f64> for StyleValue {
	fn from(value: f64) -> Self {
		Self::Number(value)
	}
}

impl From<i32> for StyleValue {
	fn from(value: i32) -> Self {
		Self::Number(f64::from(value))
	}
}

impl<T: Into<StyleValue>> From<Option<T>> for StyleValue {
	fn from(value: Option<T>) -> Self {
		value.map_or(Self::Null, Into::into)
	}
}

/// An inline style object, keyed by camelCase or custom property names.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Style {
	entries: Vec<(String, StyleValue)>,
}

impl Style {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn set(mut self, name: impl Into<String>, value: impl Into<StyleValue>) -> Self {
		let name = name.into();
		let value = value.into();
		match self.entries.iter_mut().find(|(n, _)| *n == name) {
			Some(entry) => entry.1 = value,
			None => self.entries.push((name, value)),
		}
		self
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, &StyleValue)> {
		self.entries.iter().map(|(n, v)| (n.as_str(), v))
	}
}

/// Formats a number the way it appears in markup.
///
/// Integral values print without a fractional part; non-finite values print
/// as `NaN`, `Infinity` and `-Infinity`.
pub fn format_number(n: f64) -> String {
	if n.is_nan() {
		return "NaN".to_string();
	}
	if n.is_infinite() {
		return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
	}
	if n == 0.0 {
		return "0".to_string();
	}
	if n.fract() == 0.0 && n.abs() < 1e21 {
		return format!("{n:.0}");
	}
	n.to_string()
}
