//! HTML escaping for rendered markup
//!
//! Escaped characters:
//! - `<` → `&lt;`
//! - `>` → `&gt;`
//! - `&` → `&amp;`
//! - `"` → `&quot;`
//! - `'` → `&#x27;`
//!
//! Unlike Tera's built-in `escape`, slashes are left alone so URLs in
//! attributes such as `action` stay readable.

use std::collections::HashMap;
use tera::{Filter, Result as TeraResult, Value};

/// Escape HTML special characters
///
/// # Examples
///
/// ```
/// use uniform_templates::escape_html;
///
/// assert_eq!(escape_html("<script>alert('XSS')</script>"),
///            "&lt;script&gt;alert(&#x27;XSS&#x27;)&lt;/script&gt;");
/// assert_eq!(escape_html("/search/?q=a&b"), "/search/?q=a&amp;b");
/// ```
pub fn escape_html(s: &str) -> String {
	let mut escaped = String::with_capacity(s.len());
	for c in s.chars() {
		match c {
			'<' => escaped.push_str("&lt;"),
			'>' => escaped.push_str("&gt;"),
			'&' => escaped.push_str("&amp;"),
			'"' => escaped.push_str("&quot;"),
			'\'' => escaped.push_str("&#x27;"),
			_ => escaped.push(c),
		}
	}
	escaped
}

/// Tera filter wrapping [`escape_html`]
///
/// Null renders as an empty string; numbers and booleans are stringified.
/// The filter output is marked safe, so autoescaping does not escape it a
/// second time.
///
/// ```tera
/// {{ field.label | escape_html }}
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct EscapeHtml;

impl Filter for EscapeHtml {
	fn filter(&self, value: &Value, _args: &HashMap<String, Value>) -> TeraResult<Value> {
		let text = match value {
			Value::Null => String::new(),
			Value::String(s) => s.clone(),
			Value::Bool(_) | Value::Number(_) => value.to_string(),
			_ => {
				return Err(tera::Error::msg(
					"escape_html filter requires a scalar value",
				));
			}
		};
		Ok(Value::String(escape_html(&text)))
	}

	fn is_safe(&self) -> bool {
		true
	}
}
