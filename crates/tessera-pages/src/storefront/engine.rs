//! The render entry point.
//!
//! One [`StorefrontEngine`] serves many requests in sequence. Each call seeds
//! the engine's signal sources with the request data, renders the page, and
//! resets the sources before returning, so nothing from one request is visible
//! to the next.

use std::rc::Rc;

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::app::storefront_app;
use super::product::Product;
use super::source::{ProductSource, RenderData};
use crate::component::{FunctionComponent, Props, h};
use crate::error::{DataError, RenderError, RenderResult};
use crate::reactive::{Computed, Context, ReactiveError, Signal, batch};
use crate::settings::RenderSettings;
use crate::ssr::SyncRenderer;

/// Snapshot of the rendered data, shipped to the client for hydration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InitialData {
	pub products: Vec<Product>,
	pub url: String,
	/// Render time, RFC 3339 with milliseconds (`2026-01-01T00:00:00.000Z`).
	pub timestamp: String,
	/// Why the placeholder product was rendered, if it was.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub error: Option<String>,
}

/// Result of one render call.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedPage {
	pub markup: String,
	/// Extra `<head>` content. Always empty for the storefront.
	pub head: String,
	pub initial_data: InitialData,
}

/// Renders storefront pages.
///
/// # Example
///
/// ```ignore
/// let engine = StorefrontEngine::new(RenderSettings::default());
/// let page = engine.render("/", r#"{"products": [{"id": 1, "name": {"ru": "Товар"}, "price": 100}]}"#)?;
/// assert!(page.markup.contains("100 ₽"));
/// assert_eq!(page.initial_data.products.len(), 1);
/// ```
pub struct StorefrontEngine {
	settings: RenderSettings,
	renderer: SyncRenderer,
	app: Rc<FunctionComponent>,
	catalogue: Context<Vec<Product>>,
	products: Signal<Vec<Product>>,
	url: Signal<String>,
	error: Signal<Option<String>>,
	visible: Computed<Vec<Product>>,
}

impl StorefrontEngine {
	pub fn new(settings: RenderSettings) -> Self {
		let catalogue = Context::new(Vec::new());
		let products = Signal::new(Vec::<Product>::new());
		let visible = {
			let products = products.clone();
			let limit = settings.product_limit;
			Computed::new(move || products.with(|all| all.iter().take(limit).cloned().collect()))
		};

		Self {
			renderer: SyncRenderer::new().error_boundaries(settings.error_boundaries),
			app: Rc::new(storefront_app(catalogue.clone())),
			catalogue,
			products,
			url: Signal::new(String::new()),
			error: Signal::new(None),
			visible,
			settings,
		}
	}

	pub fn settings(&self) -> &RenderSettings {
		&self.settings
	}

	/// Products currently held by the engine. Empty outside a render call.
	pub fn products(&self) -> Vec<Product> {
		self.products.get_untracked()
	}

	/// Renders the page at `url` from caller-supplied data.
	///
	/// # Errors
	///
	/// Data failures are downgraded to the placeholder product unless
	/// `fallback_on_data_error` is disabled. Render failures are returned as is.
	pub fn render(&self, url: &str, data: impl Into<RenderData>) -> RenderResult<RenderedPage> {
		let loaded = data.into().into_products(self.settings.product_limit);
		self.render_loaded(url, loaded)
	}

	/// Awaits `source`, then renders the page at `url`.
	pub async fn render_from_source(
		&self,
		url: &str,
		source: &dyn ProductSource,
	) -> RenderResult<RenderedPage> {
		let loaded = source
			.fetch(url)
			.await
			.and_then(|data| data.into_products(self.settings.product_limit));
		self.render_loaded(url, loaded)
	}

	fn render_loaded(
		&self,
		url: &str,
		loaded: Result<Vec<Product>, DataError>,
	) -> RenderResult<RenderedPage> {
		let (products, error) = match loaded {
			Ok(products) => (products, None),
			Err(err) if self.settings.fallback_on_data_error => {
				warn!(url, error = %err, "failed to load products, rendering placeholder");
				(vec![Product::fallback()], Some(err.to_string()))
			}
			Err(err) => return Err(RenderError::component("StorefrontEngine", err.to_string())),
		};
		self.render_products(url, products, error)
	}

	fn render_products(
		&self,
		url: &str,
		products: Vec<Product>,
		error: Option<String>,
	) -> RenderResult<RenderedPage> {
		let _reset = ResetOnDrop(self);
		batch(|| -> Result<(), ReactiveError> {
			self.products.set(products)?;
			self.url.set(url.to_string())?;
			self.error.set(error)
		})??;
		debug!(url, "seeded storefront sources");

		let products = self.visible.get()?;
		let root = self
			.catalogue
			.provider(products.clone(), h(&self.app, Props::new(), vec![]));
		let markup = self.renderer.render_to_string(&root)?;

		let initial_data = InitialData {
			products,
			url: self.url.get_untracked(),
			timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
			error: self.error.get_untracked(),
		};
		debug!(
			url,
			markup_len = markup.len(),
			products = initial_data.products.len(),
			"rendered storefront page"
		);

		Ok(RenderedPage {
			markup,
			head: String::new(),
			initial_data,
		})
	}

	fn reset(&self) -> Result<(), ReactiveError> {
		batch(|| -> Result<(), ReactiveError> {
			self.products.set(Vec::new())?;
			self.url.set(String::new())?;
			self.error.set(None)
		})?
	}
}

/// Clears the engine's sources when the render call ends, on every path.
struct ResetOnDrop<'a>(&'a StorefrontEngine);

impl Drop for ResetOnDrop<'_> {
	fn drop(&mut self) {
		match self.0.reset() {
			Ok(()) => debug!("reset storefront sources"),
			Err(err) => warn!(error = %err, "failed to reset storefront sources"),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;
	use serial_test::serial;

	#[rstest]
	#[serial]
	fn test_render_products() {
		let engine = StorefrontEngine::new(RenderSettings::default());
		let page = engine
			.render(
				"/catalog",
				json!({"products": [
					{"id": 1, "name": {"ru": "Товар"}, "price": 100},
					{"id": 2, "name": {"ru": "Товар"}, "price": 100}
				]}),
			)
			.unwrap();

		assert!(page.markup.contains("Товар"));
		assert!(page.markup.contains("100"));
		assert_eq!(page.head, "");
		assert_eq!(page.initial_data.products.len(), 2);
		assert_eq!(page.initial_data.url, "/catalog");
		assert_eq!(page.initial_data.error, None);
		assert!(page.initial_data.timestamp.ends_with('Z'));
	}

	#[rstest]
	#[serial]
	fn test_sources_are_reset_after_render() {
		let engine = StorefrontEngine::new(RenderSettings::default());
		engine.render("/", json!([{"id": 1}])).unwrap();

		assert!(engine.products().is_empty());
		assert_eq!(engine.url.get_untracked(), "");
		assert_eq!(engine.error.get_untracked(), None);
	}

	#[rstest]
	#[serial]
	fn test_invalid_data_uses_placeholder() {
		let engine = StorefrontEngine::new(RenderSettings::default());
		let page = engine.render("/", "{oops").unwrap();

		assert_eq!(page.initial_data.products, vec![Product::fallback()]);
		assert!(page.markup.contains("Тестовый товар"));
		assert!(
			page.initial_data
				.error
				.as_deref()
				.is_some_and(|e| e.starts_with("invalid JSON payload"))
		);
	}

	#[rstest]
	#[serial]
	fn test_fallback_can_be_disabled() {
		let engine = StorefrontEngine::new(RenderSettings::default().fallback_on_data_error(false));
		let err = engine.render("/", RenderData::Absent).unwrap_err();

		assert!(matches!(err, RenderError::Component { .. }));
		assert!(engine.products().is_empty());
	}

	#[rstest]
	#[serial]
	fn test_product_limit() {
		let engine = StorefrontEngine::new(RenderSettings::default().product_limit(3));
		let products: Vec<_> = (1..=10).map(|id| json!({"id": id})).collect();
		let page = engine.render("/", json!(products)).unwrap();

		assert_eq!(page.initial_data.products.len(), 3);
		assert_eq!(page.markup.matches("product-card").count(), 3);
	}

	#[rstest]
	fn test_initial_data_omits_absent_error() {
		let data = InitialData {
			products: Vec::new(),
			url: "/".to_string(),
			timestamp: "2026-01-01T00:00:00.000Z".to_string(),
			error: None,
		};
		assert_eq!(
			serde_json::to_value(&data).unwrap(),
			json!({"products": [], "url": "/", "timestamp": "2026-01-01T00:00:00.000Z"})
		);
	}
}
