//! Signal graph module.
//!
//! Sources, lazily re-evaluated computed values and effects with cleanup,
//! batching and cycle detection.
//!
//! # Examples
//!
//! ```rust,ignore
//! use tessera::core::reactive::{Computed, Signal};
//!
//! let price = Signal::new(100);
//! let label = Computed::new({
//!     let price = price.clone();
//!     move || format!("{} ₽", price.get())
//! });
//! assert_eq!(label.get()?, "100 ₽");
//! ```

pub use tessera_core::*;
