//! # Tessera
//!
//! Synchronous server-side rendering for component trees.
//!
//! Tessera renders an immutable tree of elements and components to an HTML
//! string in a single pass. Function components keep positional hook state
//! (state, memo, ref, effect, context), class components get a lifecycle and
//! can act as error boundaries, and a fine-grained signal graph holds
//! application data between the host and the page.
//!
//! ## Feature Flags
//!
//! - `pages` (default) - renderer, hooks, settings and the storefront entry
//!   point (`tessera::pages`)
//!
//! The signal graph (`tessera::core`) is always available.
//!
//! ## Example
//!
//! ```rust,ignore
//! use tessera::pages::{RenderSettings, StorefrontEngine};
//!
//! let engine = StorefrontEngine::new(RenderSettings::default());
//! let html = engine.render_document("/", r#"{"products": []}"#)?;
//! ```

pub mod core;
#[cfg(feature = "pages")]
pub mod pages;

pub use tessera_core::reactive::{Computed, Effect, ReactiveError, Signal};

#[cfg(feature = "pages")]
pub use tessera_pages::{
	Node, Props, RenderError, RenderResult, RenderSettings, StorefrontEngine, SyncRenderer, h,
};
