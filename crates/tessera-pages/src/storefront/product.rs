//! Product records as delivered by the catalogue API.
//!
//! The records are shipped back to the client unchanged in the hydration
//! payload, so deserialization is lenient: every field is optional, loosely
//! typed values are kept as they arrived and unknown fields are preserved.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

use crate::component::format_number;

/// Name used when a product has none in the display language.
pub const FALLBACK_NAME: &str = "Товар";

/// A product identifier, numeric or textual.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProductId {
	Number(Number),
	Text(String),
	/// Any other JSON value, displayed as JSON.
	Other(Value),
}

impl fmt::Display for ProductId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Number(n) => write!(f, "{n}"),
			Self::Text(s) => f.write_str(s),
			Self::Other(value) => write!(f, "{value}"),
		}
	}
}

impl From<i64> for ProductId {
	fn from(value: i64) -> Self {
		Self::Number(value.into())
	}
}

/// A product name: a per-language map or a single string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProductName {
	/// Language code to name, e.g. `{"ru": "...", "en": "..."}`. Entries that
	/// are not strings are kept but never displayed.
	Localized(BTreeMap<String, Value>),
	Plain(String),
	/// Any other JSON value, kept for the payload but never displayed.
	Other(Value),
}

impl ProductName {
	/// The name in `lang`, if present and non-empty.
	pub fn get(&self, lang: &str) -> Option<&str> {
		match self {
			Self::Localized(names) => names
				.get(lang)
				.and_then(Value::as_str)
				.filter(|s| !s.is_empty()),
			_ => None,
		}
	}

	/// Builds a localized name from `(language, name)` pairs.
	pub fn localized<'a>(names: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
		Self::Localized(
			names
				.into_iter()
				.map(|(lang, name)| (lang.to_string(), Value::from(name)))
				.collect(),
		)
	}
}

/// Stock level of a product.
///
/// The catalogue encodes "always in stock" as `-1`. Other negative numbers,
/// fractions and non-numeric values have no documented meaning and are kept
/// as [`StockQuantity::Unrecognized`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value", into = "Value")]
pub enum StockQuantity {
	Exact(u64),
	AlwaysInStock,
	Unrecognized(Value),
}

impl StockQuantity {
	pub fn is_available(&self) -> bool {
		match self {
			Self::Exact(n) => *n > 0,
			Self::AlwaysInStock => true,
			Self::Unrecognized(_) => false,
		}
	}
}

impl From<Value> for StockQuantity {
	fn from(value: Value) -> Self {
		if let Some(n) = value.as_u64() {
			return Self::Exact(n);
		}
		match value.as_i64() {
			Some(-1) => Self::AlwaysInStock,
			_ => Self::Unrecognized(value),
		}
	}
}

impl From<i64> for StockQuantity {
	fn from(value: i64) -> Self {
		Self::from(Value::from(value))
	}
}

impl From<StockQuantity> for Value {
	fn from(value: StockQuantity) -> Self {
		match value {
			StockQuantity::Exact(n) => Value::from(n),
			StockQuantity::AlwaysInStock => Value::from(-1),
			StockQuantity::Unrecognized(value) => value,
		}
	}
}

/// One catalogue entry.
///
/// `price`, `step`, `unit` and `image_url` hold whatever JSON value the
/// catalogue sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Product {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub id: Option<ProductId>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub name: Option<ProductName>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub price: Option<Value>,
	#[serde(default)]
	pub image_url: Option<Value>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub unit: Option<Value>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub step: Option<Value>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub stock_quantity: Option<StockQuantity>,
	/// Fields this crate does not interpret.
	#[serde(flatten)]
	pub extra: Map<String, Value>,
}

impl Product {
	/// Creates a product with only an id.
	pub fn new(id: impl Into<ProductId>) -> Self {
		Self {
			id: Some(id.into()),
			..Self::default()
		}
	}

	pub fn with_name(mut self, name: ProductName) -> Self {
		self.name = Some(name);
		self
	}

	pub fn with_price(mut self, price: impl Into<Value>) -> Self {
		self.price = Some(price.into());
		self
	}

	pub fn with_image(mut self, url: impl Into<String>) -> Self {
		self.image_url = Some(Value::String(url.into()));
		self
	}

	/// The placeholder rendered when no data could be obtained.
	pub fn fallback() -> Self {
		Self {
			id: Some(ProductId::from(1_i64)),
			name: Some(ProductName::localized([
				("ru", "Тестовый товар"),
				("en", "Test Product"),
				("geo", "სატესტო პროდუქტი"),
			])),
			price: Some(Value::from(100_i64)),
			image_url: None,
			unit: Some(Value::from("шт")),
			step: Some(Value::from(1_i64)),
			stock_quantity: Some(StockQuantity::Exact(10)),
			extra: Map::new(),
		}
	}

	/// Russian name, else a plain string name, else [`FALLBACK_NAME`].
	pub fn display_name(&self) -> &str {
		match &self.name {
			Some(ProductName::Plain(name)) if !name.is_empty() => name.as_str(),
			Some(name) => name.get("ru").unwrap_or(FALLBACK_NAME),
			None => FALLBACK_NAME,
		}
	}

	/// Image alt text: the Russian name or [`FALLBACK_NAME`].
	pub fn alt_text(&self) -> &str {
		self.name
			.as_ref()
			.and_then(|name| name.get("ru"))
			.unwrap_or(FALLBACK_NAME)
	}

	/// Price as shown on the card, e.g. `250 ₽`.
	///
	/// Numbers and non-empty strings are shown as sent. Missing, zero, empty
	/// and any other values show `0`.
	pub fn price_label(&self) -> String {
		let price = match &self.price {
			Some(Value::Number(n)) => n
				.as_f64()
				.filter(|p| *p != 0.0 && !p.is_nan())
				.map(format_number),
			Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
			_ => None,
		};
		format!("{} ₽", price.as_deref().unwrap_or("0"))
	}

	/// Image URL, if it is a non-empty string.
	pub fn image(&self) -> Option<&str> {
		self.image_url
			.as_ref()
			.and_then(Value::as_str)
			.filter(|url| !url.is_empty())
	}
}
