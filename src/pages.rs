//! Server-side rendering module.
//!
//! This module provides access to tessera-pages: the node model, the hook slot
//! store, the synchronous renderer and the storefront render entry point.
//!
//! ## Example
//!
//! ```rust,ignore
//! use tessera::pages::component::{FunctionComponent, Props, h};
//! use tessera::pages::ssr::SyncRenderer;
//!
//! let greeting = FunctionComponent::new("Greeting", |props, _cx| {
//!     Ok(h("p", Props::new(), vec![props.get_str("name").unwrap_or("гость").into()]))
//! });
//!
//! let html = SyncRenderer::new().render_to_string(&h(greeting, Props::new(), vec![]))?;
//! assert_eq!(html, "<p>гость</p>");
//! ```

// Re-export all tessera-pages functionality
pub use tessera_pages::*;
