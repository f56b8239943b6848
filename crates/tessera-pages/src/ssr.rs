//! Server-side rendering of node trees to HTML strings.
//!
//! ```ignore
//! use tessera_pages::ssr::SyncRenderer;
//!
//! let html = SyncRenderer::new().render_to_string(&node)?;
//! ```

mod attrs;
mod escape;
mod instances;
mod markup;
mod renderer;

pub use attrs::{VOID_ELEMENTS, is_valid_name, is_void_element, style_to_css};
pub use escape::{escape, escape_json_for_script};
pub use markup::Markup;
pub use renderer::{MAX_RERENDER_ATTEMPTS, SyncRenderer};
