//! Where product data comes from.
//!
//! The entry point accepts data directly as [`RenderData`], or awaits a
//! [`ProductSource`] before rendering.

use async_trait::async_trait;
use serde_json::Value;

use super::product::Product;
use crate::error::DataError;

/// Caller-supplied application data.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum RenderData {
	/// No data was supplied.
	#[default]
	Absent,
	/// A JSON document, parsed before use.
	Json(String),
	/// Already structured data.
	Value(Value),
}

impl From<&str> for RenderData {
	fn from(value: &str) -> Self {
		Self::Json(value.to_string())
	}
}

impl From<String> for RenderData {
	fn from(value: String) -> Self {
		Self::Json(value)
	}
}

impl From<Value> for RenderData {
	fn from(value: Value) -> Self {
		Self::Value(value)
	}
}

impl<T: Into<RenderData>> From<Option<T>> for RenderData {
	fn from(value: Option<T>) -> Self {
		value.map_or(Self::Absent, Into::into)
	}
}

impl RenderData {
	/// Extracts at most `limit` products.
	///
	/// Accepts `{"products": [...]}` or a bare array. The list is truncated
	/// before the records are decoded, so malformed records past the limit are
	/// ignored. Every field of a record is optional; only a record that is not
	/// an object fails, as [`DataError::Shape`].
	pub fn into_products(self, limit: usize) -> Result<Vec<Product>, DataError> {
		let value = match self {
			Self::Absent => return Err(DataError::Missing),
			Self::Json(json) => serde_json::from_str(&json)?,
			Self::Value(value) => value,
		};
		let mut items = match value {
			Value::Null => return Err(DataError::Missing),
			Value::Array(items) => items,
			Value::Object(mut object) => match object.remove("products") {
				Some(Value::Array(items)) => items,
				Some(other) => {
					return Err(DataError::Shape(format!(
						"`products` must be an array, found {}",
						json_kind(&other)
					)));
				}
				None => return Err(DataError::Shape("object has no `products` field".to_string())),
			},
			other => {
				return Err(DataError::Shape(format!(
					"expected an array or an object, found {}",
					json_kind(&other)
				)));
			}
		};
		items.truncate(limit);
		items
			.into_iter()
			.enumerate()
			.map(|(index, item)| {
				let kind = json_kind(&item);
				serde_json::from_value(item).map_err(|e| {
					DataError::Shape(format!("product {index} is {kind}, not a record: {e}"))
				})
			})
			.collect()
	}
}

fn json_kind(value: &Value) -> &'static str {
	match value {
		Value::Null => "null",
		Value::Bool(_) => "a boolean",
		Value::Number(_) => "a number",
		Value::String(_) => "a string",
		Value::Array(_) => "an array",
		Value::Object(_) => "an object",
	}
}

/// Asynchronous provider of product data for one request.
///
/// # Example
///
/// ```ignore
/// struct Catalogue {
///     client: HttpClient,
/// }
///
/// #[async_trait]
/// impl ProductSource for Catalogue {
///     async fn fetch(&self, _url: &str) -> Result<RenderData, DataError> {
///         let body = self.client.get("/products").await
///             .map_err(|e| DataError::Source(e.to_string()))?;
///         Ok(RenderData::Json(body))
///     }
/// }
/// ```
#[async_trait]
pub trait ProductSource: Send + Sync {
	/// Fetches the data for the page at `url`.
	async fn fetch(&self, url: &str) -> Result<RenderData, DataError>;
}

/// Source returning the same data for every request.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
	data: RenderData,
}

impl StaticSource {
	pub fn new(data: impl Into<RenderData>) -> Self {
		Self { data: data.into() }
	}
}

#[async_trait]
impl ProductSource for StaticSource {
	async fn fetch(&self, _url: &str) -> Result<RenderData, DataError> {
		Ok(self.data.clone())
	}
}

/// Source that always fails with [`DataError::Source`].
#[derive(Debug, Clone)]
pub struct FailingSource {
	message: String,
}

impl FailingSource {
	pub fn new(message: impl Into<String>) -> Self {
		Self {
			message: message.into(),
		}
	}
}

#[async_trait]
impl ProductSource for FailingSource {
	async fn fetch(&self, _url: &str) -> Result<RenderData, DataError> {
		Err(DataError::Source(self.message.clone()))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::storefront::ProductId;
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	#[case(RenderData::from(r#"{"products": [{"id": 1}, {"id": 2}]}"#))]
	#[case(RenderData::from(r#"[{"id": 1}, {"id": 2}]"#))]
	#[case(RenderData::from(json!([{"id": 1}, {"id": 2}])))]
	fn test_accepted_shapes(#[case] data: RenderData) {
		assert_eq!(data.into_products(20).unwrap().len(), 2);
	}

	#[rstest]
	fn test_truncates_before_decoding() {
		let data = RenderData::from(json!([{"id": 1}, {"id": 2}, "not a product"]));
		let products = data.into_products(2).unwrap();

		assert_eq!(products.len(), 2);
		assert_eq!(products[1].id, Some(ProductId::from(2_i64)));
	}

	#[rstest]
	fn test_loose_records_are_accepted() {
		let data = RenderData::from(json!({"products": [
			{"name": {"ru": "Товар"}, "price": 100},
			{"id": "a-1", "price": "45", "stock_quantity": 2.5},
			{"name": {"ru": "Хлеб", "en": null}}
		]}));

		assert_eq!(data.into_products(20).unwrap().len(), 3);
	}

	#[rstest]
	fn test_non_object_record_is_a_shape_error() {
		let result = RenderData::from(r#"[{"id": 1}, 42]"#).into_products(20);

		match result {
			Err(DataError::Shape(message)) => assert!(message.starts_with("product 1 is a number")),
			other => panic!("expected a shape error, got {other:?}"),
		}
	}

	#[rstest]
	fn test_missing_data() {
		assert!(matches!(RenderData::Absent.into_products(20), Err(DataError::Missing)));
		assert!(matches!(
			RenderData::from(None::<String>).into_products(20),
			Err(DataError::Missing)
		));
		assert!(matches!(RenderData::from("null").into_products(20), Err(DataError::Missing)));
	}

	#[rstest]
	#[case(r#"{"items": []}"#)]
	#[case(r#"{"products": "none"}"#)]
	#[case("42")]
	fn test_wrong_shape(#[case] json: &str) {
		assert!(matches!(
			RenderData::from(json).into_products(20),
			Err(DataError::Shape(_))
		));
	}

	#[rstest]
	fn test_invalid_json() {
		assert!(matches!(
			RenderData::from("{not json").into_products(20),
			Err(DataError::Parse(_))
		));
	}

	#[tokio::test]
	async fn test_static_and_failing_sources() {
		let data = StaticSource::new(json!([{"id": 5}])).fetch("/").await.unwrap();
		assert_eq!(data.into_products(20).unwrap().len(), 1);

		let err = FailingSource::new("connection refused")
			.fetch("/")
			.await
			.unwrap_err();
		assert_eq!(err.to_string(), "data source failed: connection refused");
	}
}
