//! Render settings.
//!
//! Settings can be built in code with the fluent setters or loaded from TOML:
//!
//! ```toml
//! product_limit = 12
//! error_boundaries = false
//!
//! [document]
//! lang = "en"
//! title = "Enddel - Shop"
//! ```
//!
//! Every field is optional; missing fields keep their defaults.

use serde::{Deserialize, Serialize};

/// Error loading [`RenderSettings`].
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
	#[error("TOML error: {0}")]
	Toml(#[from] toml::de::Error),

	#[error("Invalid setting `{field}`: {message}")]
	Invalid { field: &'static str, message: String },
}

/// Settings of the storefront render entry point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
	/// Maximum number of products rendered and shipped for hydration.
	pub product_limit: usize,
	/// Render the placeholder product when data cannot be obtained.
	///
	/// When disabled, data failures surface as [`RenderError::Component`].
	///
	/// [`RenderError::Component`]: crate::error::RenderError::Component
	pub fallback_on_data_error: bool,
	/// Let class components recover failed subtrees.
	pub error_boundaries: bool,
	/// Envelope used by full-document rendering.
	pub document: DocumentSettings,
}

impl Default for RenderSettings {
	fn default() -> Self {
		Self {
			product_limit: 20,
			fallback_on_data_error: true,
			error_boundaries: true,
			document: DocumentSettings::default(),
		}
	}
}

impl RenderSettings {
	/// Creates new default settings.
	pub fn new() -> Self {
		Self::default()
	}

	/// Parses settings from a TOML document.
	///
	/// # Example
	///
	/// ```ignore
	/// let settings = RenderSettings::from_toml_str("product_limit = 5")?;
	/// assert_eq!(settings.product_limit, 5);
	/// assert!(settings.fallback_on_data_error);
	/// ```
	pub fn from_toml_str(source: &str) -> Result<Self, SettingsError> {
		let settings: Self = toml::from_str(source)?;
		settings.validate()?;
		Ok(settings)
	}

	fn validate(&self) -> Result<(), SettingsError> {
		if self.product_limit == 0 {
			return Err(SettingsError::Invalid {
				field: "product_limit",
				message: "must be at least 1".to_string(),
			});
		}
		if self.document.root_id.is_empty() {
			return Err(SettingsError::Invalid {
				field: "document.root_id",
				message: "must not be empty".to_string(),
			});
		}
		Ok(())
	}

	/// Sets the product limit.
	pub fn product_limit(mut self, limit: usize) -> Self {
		self.product_limit = limit;
		self
	}

	/// Enables or disables the placeholder product on data errors.
	pub fn fallback_on_data_error(mut self, enabled: bool) -> Self {
		self.fallback_on_data_error = enabled;
		self
	}

	/// Enables or disables error boundary recovery.
	pub fn error_boundaries(mut self, enabled: bool) -> Self {
		self.error_boundaries = enabled;
		self
	}

	/// Replaces the document settings.
	pub fn document(mut self, document: DocumentSettings) -> Self {
		self.document = document;
		self
	}
}

/// The HTML envelope around rendered markup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentSettings {
	/// `lang` attribute of `<html>`.
	pub lang: String,
	pub title: String,
	pub stylesheets: Vec<String>,
	/// Module scripts loaded after the hydration payload.
	pub scripts: Vec<String>,
	/// Id of the element the markup is mounted in.
	pub root_id: String,
	/// Global variable receiving the hydration payload.
	pub hydration_var: String,
}

impl Default for DocumentSettings {
	fn default() -> Self {
		Self {
			lang: "ru".to_string(),
			title: "Enddel - Магазин".to_string(),
			stylesheets: vec!["/assets/index-CXxKVYtV.css".to_string()],
			scripts: vec!["/assets/index-DdBg9HLV.js".to_string()],
			root_id: "app".to_string(),
			hydration_var: "__INITIAL_DATA__".to_string(),
		}
	}
}

impl DocumentSettings {
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets the language.
	pub fn lang(mut self, lang: impl Into<String>) -> Self {
		self.lang = lang.into();
		self
	}

	pub fn title(mut self, title: impl Into<String>) -> Self {
		self.title = title.into();
		self
	}

	/// Appends a stylesheet link.
	pub fn stylesheet(mut self, href: impl Into<String>) -> Self {
		self.stylesheets.push(href.into());
		self
	}

	/// Appends a module script.
	pub fn script(mut self, src: impl Into<String>) -> Self {
		self.scripts.push(src.into());
		self
	}

	pub fn root_id(mut self, id: impl Into<String>) -> Self {
		self.root_id = id.into();
		self
	}

	pub fn hydration_var(mut self, name: impl Into<String>) -> Self {
		self.hydration_var = name.into();
		self
	}
}
