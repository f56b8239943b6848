//! Tessera Pages - synchronous server-side rendering
//!
//! Renders immutable node trees to HTML strings in one pass, with positional
//! hook state for function components, lifecycle and error boundaries for
//! class components, and a storefront render entry point built on top.
//!
//! ## Architecture
//!
//! - [`component`]: node model, props and the two component shapes
//! - [`reactive`]: hook slot store and context, plus the signal graph from
//!   `tessera-core`
//! - [`ssr`]: the synchronous renderer, escaping and attribute rules
//! - [`storefront`]: the render entry point, product model and document shell
//! - [`settings`]: render settings loaded from code or TOML
//! - [`error`]: render, hook and data errors
//!
//! ## Example
//!
//! ```ignore
//! use tessera_pages::{Props, SyncRenderer, h};
//!
//! let list = h(
//!     "ul",
//!     Props::new(),
//!     vec![
//!         h("li", Props::new().with("key", "a"), vec!["Хлеб".into()]),
//!         h("li", Props::new().with("key", "b"), vec!["Сыр & масло".into()]),
//!     ],
//! );
//!
//! let html = SyncRenderer::new().render_to_string(&list)?;
//! assert_eq!(html, "<ul><li>Хлеб</li><li>Сыр &amp; масло</li></ul>");
//! ```
//!
//! ### Render entry point
//!
//! ```ignore
//! use tessera_pages::{RenderSettings, StorefrontEngine};
//!
//! let engine = StorefrontEngine::new(RenderSettings::default());
//! let page = engine.render("/", r#"[{"id": 1, "name": {"ru": "Товар"}, "price": 100}]"#)?;
//! println!("{}", page.markup);
//! ```

pub mod component;
pub mod error;
pub mod reactive;
pub mod settings;
pub mod ssr;
pub mod storefront;

pub use component::{
	ClassComponent, ClassType, FunctionComponent, Node, NodeType, PropValue, Props, Style,
	create_node, h,
};
pub use error::{DataError, HookError, RenderError, RenderResult};
pub use reactive::{Context, ContextScope, HookCx, HookStore, StateSetter};
pub use settings::{DocumentSettings, RenderSettings, SettingsError};
pub use ssr::{Markup, SyncRenderer, escape};
pub use storefront::{
	InitialData, Product, ProductSource, RenderData, RenderedPage, StorefrontEngine,
	render_document,
};
