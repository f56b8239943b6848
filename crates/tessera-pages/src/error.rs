//! Error types for rendering, hooks and application data.

use tessera_core::reactive::ReactiveError;
use thiserror::Error;

/// Misuse of the positional hook slot protocol.
///
/// Hooks are addressed by call order, so a component must request the same
/// sequence of slot kinds and types on every invocation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HookError {
	/// The slot at `index` was created by a different hook.
	#[error("hook slot {index} holds a {found} cell but a {expected} cell was requested")]
	KindMismatch {
		index: usize,
		expected: &'static str,
		found: &'static str,
	},

	/// The slot at `index` holds a value of another type.
	#[error("hook slot {index} holds a value of a different type")]
	TypeMismatch { index: usize },

	/// The number of hooks requested changed between invocations.
	#[error("component `{component}` requested {found} hook slots, expected {expected}")]
	SlotCountMismatch {
		component: String,
		expected: usize,
		found: usize,
	},
}

/// Errors raised while walking a node tree.
#[derive(Debug, Error)]
pub enum RenderError {
	/// A component produced a pending result.
	#[error(
		"component `{component}` suspended: synchronous rendering does not support suspension"
	)]
	Suspended { component: String },

	/// An element type failed tag-name validation.
	#[error("{tag} is not a valid HTML tag name in {context}")]
	InvalidTagName { tag: String, context: String },

	/// A function component kept invalidating its own state.
	#[error("component `{component}` did not settle after {limit} render attempts")]
	RenderCycleExceeded { component: String, limit: usize },

	/// The signal graph detected a cycle.
	#[error(transparent)]
	Reactive(#[from] ReactiveError),

	/// Any other failure raised by a component.
	#[error("component `{component}` failed: {message}")]
	Component { component: String, message: String },

	#[error(transparent)]
	Hook(#[from] HookError),

	/// The hydration payload could not be serialized.
	#[error("failed to serialize hydration payload: {0}")]
	Payload(#[from] serde_json::Error),
}

impl RenderError {
	/// Shorthand for [`RenderError::Component`].
	pub fn component(component: impl Into<String>, message: impl Into<String>) -> Self {
		Self::Component {
			component: component.into(),
			message: message.into(),
		}
	}

	/// Shorthand for [`RenderError::Suspended`].
	pub fn suspended(component: impl Into<String>) -> Self {
		Self::Suspended {
			component: component.into(),
		}
	}

	/// Whether an error boundary may intercept this error.
	///
	/// Invalid tag names always reach the caller.
	pub fn is_recoverable(&self) -> bool {
		!matches!(self, Self::InvalidTagName { .. })
	}
}

/// Result alias used throughout the renderer.
pub type RenderResult<T> = Result<T, RenderError>;

/// Failures while obtaining or normalizing application data.
///
/// The entry point downgrades these to the fallback dataset unless configured
/// otherwise.
#[derive(Debug, Error)]
pub enum DataError {
	#[error("no data was supplied")]
	Missing,

	#[error("invalid JSON payload: {0}")]
	Parse(#[from] serde_json::Error),

	#[error("unexpected data shape: {0}")]
	Shape(String),

	#[error("data source failed: {0}")]
	Source(String),
}
