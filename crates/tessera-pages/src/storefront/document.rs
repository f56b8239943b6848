//! Full HTML documents around a rendered page.

use super::engine::{RenderedPage, StorefrontEngine};
use super::source::{ProductSource, RenderData};
use crate::error::RenderResult;
use crate::settings::DocumentSettings;
use crate::ssr::{escape, escape_json_for_script};

/// Wraps `page` in an HTML document.
///
/// The markup is mounted in `<div id="{root_id}" data-preact-root>` and the
/// hydration payload is assigned to `window.{hydration_var}` in an inline
/// script, with `</` escaped so the payload cannot close the script element.
///
/// # Errors
///
/// Returns [`RenderError::Payload`](crate::error::RenderError::Payload) if the
/// payload cannot be serialized.
pub fn render_document(page: &RenderedPage, settings: &DocumentSettings) -> RenderResult<String> {
	let payload = escape_json_for_script(&serde_json::to_string(&page.initial_data)?);

	let mut html = String::with_capacity(page.markup.len() + payload.len() + 512);
	html.push_str("<!DOCTYPE html>\n");
	html.push_str(&format!("<html lang=\"{}\">\n", escape(&settings.lang)));
	html.push_str("<head>\n");
	html.push_str("    <meta charset=\"UTF-8\">\n");
	html.push_str(
		"    <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n",
	);
	html.push_str(&format!("    <title>{}</title>\n", escape(&settings.title)));
	for href in &settings.stylesheets {
		html.push_str(&format!(
			"    <link rel=\"stylesheet\" href=\"{}\">\n",
			escape(href)
		));
	}
	html.push_str(&format!("    {}\n", page.head));
	html.push_str("</head>\n");
	html.push_str("<body>\n");
	html.push_str(&format!(
		"    <div id=\"{}\" data-preact-root>{}</div>\n",
		escape(&settings.root_id),
		page.markup
	));
	html.push_str(&format!(
		"    <script>window.{} = {}</script>\n",
		settings.hydration_var, payload
	));
	for src in &settings.scripts {
		html.push_str(&format!(
			"    <script type=\"module\" src=\"{}\"></script>\n",
			escape(src)
		));
	}
	html.push_str("</body>\n");
	html.push_str("</html>");
	Ok(html)
}

impl StorefrontEngine {
	/// Renders the page at `url` as a complete HTML document.
	pub fn render_document(&self, url: &str, data: impl Into<RenderData>) -> RenderResult<String> {
		let page = self.render(url, data)?;
		render_document(&page, &self.settings().document)
	}

	/// Awaits `source`, then renders a complete HTML document.
	pub async fn render_document_from_source(
		&self,
		url: &str,
		source: &dyn ProductSource,
	) -> RenderResult<String> {
		let page = self.render_from_source(url, source).await?;
		render_document(&page, &self.settings().document)
	}
}
