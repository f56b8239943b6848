//! Rendered output: a single string or a sequence of chunks.

use std::fmt;

/// Output of a render call.
///
/// Lists and templates coalesce adjacent text, so a tree whose leaves all
/// render to text yields [`Markup::Text`]. A tree branches into
/// [`Markup::Chunks`] only where the host splices in chunked markup through
/// [`TemplateExpr::Markup`](crate::component::TemplateExpr::Markup); chunks
/// pass through lists, fragments, templates and components, and an enclosing
/// element joins them. Chunked output is kept flat: joining it gives the same
/// bytes however deeply the source lists were nested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Markup {
	Text(String),
	Chunks(Vec<String>),
}

impl Markup {
	pub fn empty() -> Self {
		Self::Text(String::new())
	}

	/// Joins the chunks into one string.
	pub fn into_string(self) -> String {
		match self {
			Self::Text(text) => text,
			Self::Chunks(chunks) => chunks.concat(),
		}
	}

	/// Appends the full output to `out`.
	pub fn write_into(&self, out: &mut String) {
		match self {
			Self::Text(text) => out.push_str(text),
			Self::Chunks(chunks) => chunks.iter().for_each(|chunk| out.push_str(chunk)),
		}
	}

	/// Total length in bytes.
	pub fn len(&self) -> usize {
		match self {
			Self::Text(text) => text.len(),
			Self::Chunks(chunks) => chunks.iter().map(String::len).sum(),
		}
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}

impl From<String> for Markup {
	fn from(value: String) -> Self {
		Self::Text(value)
	}
}

impl From<Vec<String>> for Markup {
	fn from(value: Vec<String>) -> Self {
		Self::Chunks(value)
	}
}

impl fmt::Display for Markup {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Text(text) => f.write_str(text),
			Self::Chunks(chunks) => chunks.iter().try_for_each(|chunk| f.write_str(chunk)),
		}
	}
}

/// Accumulates sibling output, merging adjacent text.
#[derive(Default)]
pub(crate) struct MarkupBuilder {
	chunks: Option<Vec<String>>,
	current: String,
}

impl MarkupBuilder {
	pub(crate) fn push_str(&mut self, text: &str) {
		self.current.push_str(text);
	}

	pub(crate) fn push(&mut self, markup: Markup) {
		match markup {
			Markup::Text(text) => self.current.push_str(&text),
			Markup::Chunks(chunks) => {
				let mut chunks = chunks.into_iter();
				let Some(first) = chunks.next() else {
					return;
				};
				// Text on either side of a chunk boundary merges into the edge chunks.
				self.current.push_str(&first);
				let target = self.chunks.get_or_insert_with(Vec::new);
				for chunk in chunks {
					target.push(std::mem::replace(&mut self.current, chunk));
				}
			}
		}
	}

	pub(crate) fn finish(self) -> Markup {
		match self.chunks {
			Some(mut chunks) => {
				if !self.current.is_empty() {
					chunks.push(self.current);
				}
				Markup::Chunks(chunks)
			}
			None => Markup::Text(self.current),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_builder_coalesces_text() {
		let mut builder = MarkupBuilder::default();
		builder.push(Markup::Text("<li>a</li>".into()));
		builder.push(Markup::Text("<li>b</li>".into()));

		assert_eq!(builder.finish(), Markup::Text("<li>a</li><li>b</li>".into()));
	}

	#[rstest]
	fn test_builder_ignores_empty_chunks() {
		let mut builder = MarkupBuilder::default();
		builder.push(Markup::Text("a".into()));
		builder.push(Markup::Chunks(Vec::new()));

		assert_eq!(builder.finish(), Markup::Text("a".into()));
	}

	#[rstest]
	fn test_builder_flattens_chunks() {
		let mut builder = MarkupBuilder::default();
		builder.push(Markup::Text("a".into()));
		builder.push(Markup::Chunks(vec!["b".into(), "c".into()]));
		builder.push(Markup::Text("d".into()));
		builder.push(Markup::Text("e".into()));

		let markup = builder.finish();
		assert_eq!(markup, Markup::Chunks(vec!["ab".into(), "cde".into()]));
		assert_eq!(markup.len(), 5);
		assert_eq!(markup.to_string(), "abcde");
		assert_eq!(markup.into_string(), "abcde");
	}
}
