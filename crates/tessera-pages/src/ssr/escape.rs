//! Minimal markup escaping.
//!
//! Exactly three characters are rewritten, in text and attribute values alike:
//! `&` → `&amp;`, `<` → `&lt;`, `"` → `&quot;`. Everything else, including `>`
//! and `'`, passes through untouched.

use std::borrow::Cow;

fn replacement(byte: u8) -> Option<&'static str> {
	match byte {
		b'"' => Some("&quot;"),
		b'&' => Some("&amp;"),
		b'<' => Some("&lt;"),
		_ => None,
	}
}

/// Escapes `input` for text or double-quoted attribute context.
///
/// Input without any of the three characters is returned borrowed and
/// unchanged; otherwise the string is rebuilt in a single pass, copying the
/// runs between replacements.
///
/// # Example
///
/// ```ignore
/// assert_eq!(escape("Tom & \"Jerry\" <3"), "Tom &amp; &quot;Jerry&quot; &lt;3");
/// assert!(matches!(escape("Товар > 0"), Cow::Borrowed(_)));
/// ```
pub fn escape(input: &str) -> Cow<'_, str> {
	let bytes = input.as_bytes();
	let Some(first) = bytes.iter().position(|b| replacement(*b).is_some()) else {
		return Cow::Borrowed(input);
	};

	let mut out = String::with_capacity(input.len() + 8);
	let mut start = 0;
	for (index, byte) in bytes.iter().enumerate().skip(first) {
		if let Some(rep) = replacement(*byte) {
			out.push_str(&input[start..index]);
			out.push_str(rep);
			start = index + 1;
		}
	}
	out.push_str(&input[start..]);
	Cow::Owned(out)
}

/// Escapes serialized JSON for embedding in a `<script>` element.
///
/// `</` becomes `<\/`, which JavaScript reads back as `</` while the HTML
/// parser no longer sees a closing tag.
pub fn escape_json_for_script(json: &str) -> String {
	json.replace("</", "<\\/")
}
