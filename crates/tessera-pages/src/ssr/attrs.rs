//! Attribute naming rules and inline style serialization.
//!
//! These tables are part of the output contract: hand-written templates rely on
//! the exact renamings applied here.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

use crate::component::{Style, StyleValue, format_number};

/// Characters that may not appear in a tag or attribute name.
static FORBIDDEN_NAME: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r#"[\s\\/='"\x00<>]"#).unwrap());

/// `xlinkHref` → `xlink:href`, `xmlLang` → `xml:lang`.
static NAMESPACED: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"^(xlink|xmlns|xml)([A-Z])").unwrap());

/// camelCase HTML attributes serialized in lowercase (`tabIndex` → `tabindex`).
static HTML_LOWERCASE: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(
		r"^(?:accessK|auto[A-Z]|cell|ch|col|cont|cross|dateT|encT|form[A-Z]|frame|hrefL|inputM|maxL|minL|noV|playsI|popoverT|readO|rowS|src[A-Z]|tabI|useM|item[A-Z])",
	)
	.unwrap()
});

/// camelCase SVG presentation attributes serialized in kebab-case.
static SVG_KEBAB: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(
		r"^ac|^ali|arabic|basel|cap|clipPath$|clipRule$|color|dominant|enable|fill|flood|font|glyph[^R]|horiz|image|letter|lighting|marker[^WUH]|overline|panose|pointe|paint|rendering|shape|stop|strikethrough|stroke|text[^L]|transform|underline|unicode|units|^v[^i]|^w|^xH",
	)
	.unwrap()
});

static UPPERCASE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[A-Z]").unwrap());

/// Enumerated attributes whose boolean values are written out as strings.
const STRINGIFIED_BOOLEAN: [&str; 2] = ["draggable", "spellcheck"];

/// CSS properties that take bare numbers.
const UNITLESS_PROPERTIES: [&str; 34] = [
	"animation-iteration-count",
	"border-image-outset",
	"border-image-slice",
	"border-image-width",
	"box-flex",
	"box-flex-group",
	"box-ordinal-group",
	"column-count",
	"fill-opacity",
	"flex",
	"flex-grow",
	"flex-negative",
	"flex-order",
	"flex-positive",
	"flex-shrink",
	"flood-opacity",
	"font-weight",
	"grid-column",
	"grid-row",
	"line-clamp",
	"line-height",
	"opacity",
	"order",
	"orphans",
	"stop-opacity",
	"stroke-dasharray",
	"stroke-dashoffset",
	"stroke-miterlimit",
	"stroke-opacity",
	"stroke-width",
	"tab-size",
	"widows",
	"z-index",
	"zoom",
];

/// Tags rendered as `<tag attrs/>`.
pub const VOID_ELEMENTS: [&str; 16] = [
	"area", "base", "br", "col", "command", "embed", "hr", "img", "input", "keygen", "link",
	"meta", "param", "source", "track", "wbr",
];

pub fn is_void_element(tag: &str) -> bool {
	VOID_ELEMENTS.contains(&tag)
}

/// Whether `name` is usable as a tag or attribute name.
pub fn is_valid_name(name: &str) -> bool {
	!FORBIDDEN_NAME.is_match(name)
}

/// Outcome of mapping a prop name that has no dedicated rule.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum MappedName<'a> {
	/// Drop the attribute silently.
	Skip,
	/// Emit under this name; `stringify` writes boolean values as `"true"`/`"false"`.
	Emit { name: Cow<'a, str>, stringify: bool },
}

/// Applies the generic naming rules to `name`.
///
/// `in_svg` is true below an `<svg>` element until a `<foreignObject>`.
/// `has_value` is false for null or undefined values.
pub(crate) fn map_attribute_name(name: &str, in_svg: bool, has_value: bool) -> MappedName<'_> {
	if NAMESPACED.is_match(name) {
		let replaced = NAMESPACED.replace(name, "$1:$2");
		return MappedName::Emit {
			name: Cow::Owned(replaced.to_lowercase()),
			stringify: false,
		};
	}
	if !is_valid_name(name) {
		return MappedName::Skip;
	}

	let enumerated = name.as_bytes().get(4) == Some(&b'-') || STRINGIFIED_BOOLEAN.contains(&name);
	if enumerated && has_value {
		return MappedName::Emit {
			name: Cow::Borrowed(name),
			stringify: true,
		};
	}

	let name = if in_svg {
		if name == "panose1" {
			Cow::Borrowed("panose-1")
		} else if SVG_KEBAB.is_match(name) {
			Cow::Owned(UPPERCASE.replace_all(name, "-$0").to_lowercase())
		} else {
			Cow::Borrowed(name)
		}
	} else if HTML_LOWERCASE.is_match(name) {
		Cow::Owned(name.to_lowercase())
	} else {
		Cow::Borrowed(name)
	};

	MappedName::Emit {
		name,
		stringify: false,
	}
}

fn kebab_property(name: &str) -> Cow<'_, str> {
	if name.starts_with('-') {
		return Cow::Borrowed(name);
	}
	Cow::Owned(UPPERCASE.replace_all(name, "-$0").to_lowercase())
}

/// Serializes an inline style object to `property:value;` pairs.
///
/// Null and empty values are skipped. Numbers get a `px` suffix unless the
/// property is unitless or a custom property. Returns `None` when nothing was
/// written, in which case the attribute is omitted.
pub fn style_to_css(style: &Style) -> Option<String> {
	let mut css = String::new();
	for (name, value) in style.iter() {
		let (text, numeric) = match value {
			StyleValue::Null => continue,
			StyleValue::Str(s) if s.is_empty() => continue,
			StyleValue::Str(s) => (Cow::Borrowed(s.as_str()), false),
			StyleValue::Number(n) => (Cow::Owned(format_number(*n)), true),
		};
		let property = kebab_property(name);
		let suffix = if numeric
			&& !property.starts_with("--")
			&& !UNITLESS_PROPERTIES.contains(&property.as_ref())
		{
			"px;"
		} else {
			";"
		};
		css.push_str(&property);
		css.push(':');
		css.push_str(&text);
		css.push_str(suffix);
	}
	(!css.is_empty()).then_some(css)
}
