//! Component System for tessera-pages
//!
//! This module provides the node model the renderer walks and the two
//! component shapes it can resolve.
//!
//! ## Features
//!
//! - **Node enum**: closed set of node kinds (text, element, fragment, raw
//!   template, comment, function component, class component)
//! - **create_node / h**: the node factory with key/ref extraction and default props
//! - **Props**: ordered property mapping, serialized in insertion order
//! - **FunctionComponent / ClassComponent**: render functions with hooks, and
//!   stateful components with lifecycle and error-boundary hooks
//!
//! ## Usage
//!
//! ```ignore
//! use tessera_pages::component::{Props, h};
//!
//! let page = h(
//!     "div",
//!     Props::new().with("className", "container"),
//!     vec![h("h1", Props::new(), vec!["Магазин".into()])],
//! );
//! ```

mod node;
mod props;
mod r#trait;

pub use node::{
	ClassNode, ElementNode, FragmentNode, FunctionNode, Node, NodeKind, NodeMeta, NodeType,
	RawTemplate, TemplateExpr, create_node, h,
};
pub use props::{PropName, PropValue, Props, Style, StyleValue, format_number};
pub use r#trait::{ClassComponent, ClassType, FunctionComponent};
