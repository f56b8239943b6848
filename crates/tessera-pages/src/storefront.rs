//! The storefront application and its render entry point.
//!
//! - [`StorefrontEngine`]: seeds request data into signal sources, renders the
//!   page, returns markup plus a hydration payload, and resets the sources
//! - [`render_document`]: wraps a rendered page in the HTML document shell
//! - [`ProductSource`]: asynchronous data providers awaited before rendering

mod app;
mod document;
mod engine;
mod product;
mod source;

pub use app::{product_card, storefront_app};
pub use document::render_document;
pub use engine::{InitialData, RenderedPage, StorefrontEngine};
pub use product::{FALLBACK_NAME, Product, ProductId, ProductName, StockQuantity};
pub use source::{FailingSource, ProductSource, RenderData, StaticSource};
