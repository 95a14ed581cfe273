//! Form field trait, widgets and field-level errors

use serde_json::Value;

/// Errors produced while cleaning a single field value
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
	#[error("This field is required.")]
	Required(String),
	#[error("{0}")]
	Validation(String),
	#[error("Enter a valid value.")]
	Invalid(String),
}

impl FieldError {
	pub fn required(field: impl Into<String>) -> Self {
		Self::Required(field.into())
	}

	pub fn validation(message: impl Into<String>) -> Self {
		Self::Validation(message.into())
	}
}

pub type FieldResult<T> = Result<T, FieldError>;

/// A form field definition.
///
/// Fields describe how a value is labelled, rendered and cleaned. The value
/// itself lives on the [`Form`](crate::Form) and is combined with the field
/// through a [`BoundField`](crate::BoundField).
pub trait FormField: Send + Sync {
	fn name(&self) -> &str;
	fn label(&self) -> Option<&str>;
	fn required(&self) -> bool;
	fn help_text(&self) -> Option<&str>;
	fn widget(&self) -> &Widget;
	fn initial(&self) -> Option<&Value>;
	fn clean(&self, value: Option<&Value>) -> FieldResult<Value>;
}

/// HTML widget used to render a field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Widget {
	TextInput,
	PasswordInput,
	EmailInput,
	HiddenInput,
	CheckboxInput,
	TextArea,
	Select { choices: Vec<(String, String)> },
}

impl Widget {
	/// CSS class attached to the rendered element
	///
	/// # Examples
	///
	/// ```
	/// use uniform_forms::Widget;
	///
	/// assert_eq!(Widget::TextInput.css_class(), "textinput");
	/// assert_eq!(Widget::CheckboxInput.css_class(), "checkboxinput");
	/// ```
	pub fn css_class(&self) -> &'static str {
		match self {
			Widget::TextInput => "textinput",
			Widget::PasswordInput => "passwordinput",
			Widget::EmailInput => "emailinput",
			Widget::HiddenInput => "hiddeninput",
			Widget::CheckboxInput => "checkboxinput",
			Widget::TextArea => "textarea",
			Widget::Select { .. } => "select",
		}
	}

	pub fn is_hidden(&self) -> bool {
		matches!(self, Widget::HiddenInput)
	}

	fn input_type(&self) -> Option<&'static str> {
		match self {
			Widget::TextInput => Some("text"),
			Widget::PasswordInput => Some("password"),
			Widget::EmailInput => Some("email"),
			Widget::HiddenInput => Some("hidden"),
			Widget::CheckboxInput => Some("checkbox"),
			Widget::TextArea | Widget::Select { .. } => None,
		}
	}

	/// Render the widget markup for a field
	///
	/// Password inputs never echo their value back.
	///
	/// # Examples
	///
	/// ```
	/// use uniform_forms::Widget;
	/// use serde_json::json;
	///
	/// let html = Widget::TextInput.render("email", "id_email", Some(&json!("a@b.c")));
	/// assert_eq!(
	///     html,
	///     r#"<input type="text" name="email" id="id_email" class="textinput" value="a@b.c" />"#
	/// );
	///
	/// let html = Widget::PasswordInput.render("secret", "id_secret", Some(&json!("hunter2")));
	/// assert!(!html.contains("hunter2"));
	/// ```
	pub fn render(&self, name: &str, id: &str, value: Option<&Value>) -> String {
		let name = escape_attribute(name);
		let id = escape_attribute(id);
		let class = self.css_class();

		match self {
			Widget::TextArea => {
				let text = value.and_then(value_to_string).unwrap_or_default();
				format!(
					"<textarea name=\"{}\" id=\"{}\" class=\"{}\" cols=\"40\" rows=\"10\">{}</textarea>",
					name,
					id,
					class,
					escape_attribute(&text)
				)
			}
			Widget::Select { choices } => {
				let selected = value.and_then(value_to_string);
				let mut html = format!(
					"<select name=\"{}\" id=\"{}\" class=\"{}\">",
					name, id, class
				);
				for (choice_value, choice_label) in choices {
					let is_selected = selected.as_deref() == Some(choice_value.as_str());
					html.push_str(&format!(
						"<option value=\"{}\"{}>{}</option>",
						escape_attribute(choice_value),
						if is_selected {
							" selected=\"selected\""
						} else {
							""
						},
						escape_attribute(choice_label)
					));
				}
				html.push_str("</select>");
				html
			}
			Widget::CheckboxInput => {
				let checked = value.is_some_and(is_checked);
				format!(
					"<input type=\"checkbox\" name=\"{}\" id=\"{}\" class=\"{}\"{} />",
					name,
					id,
					class,
					if checked { " checked=\"checked\"" } else { "" }
				)
			}
			_ => {
				// Password values are never rendered back to the client
				let rendered_value = if matches!(self, Widget::PasswordInput) {
					None
				} else {
					value.and_then(value_to_string)
				};
				let mut html = format!(
					"<input type=\"{}\" name=\"{}\" id=\"{}\" class=\"{}\"",
					self.input_type().unwrap_or("text"),
					name,
					id,
					class
				);
				if let Some(v) = rendered_value
					&& !v.is_empty()
				{
					html.push_str(&format!(" value=\"{}\"", escape_attribute(&v)));
				}
				html.push_str(" />");
				html
			}
		}
	}
}

fn is_checked(value: &Value) -> bool {
	match value {
		Value::Bool(b) => *b,
		Value::String(s) => matches!(s.to_lowercase().as_str(), "on" | "true" | "1" | "yes"),
		Value::Number(n) => n.as_i64().is_some_and(|n| n != 0),
		_ => false,
	}
}

/// Convert a JSON value into its display form for a widget
pub fn value_to_string(value: &Value) -> Option<String> {
	match value {
		Value::Null => None,
		Value::String(s) => Some(s.clone()),
		Value::Bool(b) => Some(b.to_string()),
		Value::Number(n) => Some(n.to_string()),
		other => Some(other.to_string()),
	}
}

/// Escape a string for use inside an HTML attribute or text node
///
/// # Examples
///
/// ```
/// use uniform_forms::field::escape_attribute;
///
/// assert_eq!(escape_attribute(r#"a"b<c>&'"#), "a&quot;b&lt;c&gt;&amp;&#x27;");
/// ```
pub fn escape_attribute(s: &str) -> String {
	let mut escaped = String::with_capacity(s.len());
	for c in s.chars() {
		match c {
			'&' => escaped.push_str("&amp;"),
			'<' => escaped.push_str("&lt;"),
			'>' => escaped.push_str("&gt;"),
			'"' => escaped.push_str("&quot;"),
			'\'' => escaped.push_str("&#x27;"),
			_ => escaped.push(c),
		}
	}
	escaped
}

/// Derive a human readable label from a field name (`first_name` -> `First name`)
///
/// # Examples
///
/// ```
/// use uniform_forms::field::pretty_name;
///
/// assert_eq!(pretty_name("first_name"), "First name");
/// assert_eq!(pretty_name(""), "");
/// ```
pub fn pretty_name(name: &str) -> String {
	let spaced = name.replace('_', " ");
	let mut chars = spaced.chars();
	match chars.next() {
		Some(first) => first.to_uppercase().chain(chars).collect(),
		None => String::new(),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	#[case(json!(true), true)]
	#[case(json!(false), false)]
	#[case(json!("on"), true)]
	#[case(json!("off"), false)]
	#[case(json!(1), true)]
	#[case(json!(0), false)]
	fn test_checkbox_checked_state(#[case] value: Value, #[case] checked: bool) {
		// Act
		let html = Widget::CheckboxInput.render("agree", "id_agree", Some(&value));

		// Assert
		assert_eq!(html.contains("checked=\"checked\""), checked);
	}

	#[rstest]
	fn test_select_marks_selected_choice() {
		// Arrange
		let widget = Widget::Select {
			choices: vec![
				("a".to_string(), "Alpha".to_string()),
				("b".to_string(), "Beta".to_string()),
			],
		};

		// Act
		let html = widget.render("letter", "id_letter", Some(&json!("b")));

		// Assert
		assert!(html.contains(r#"<option value="a">Alpha</option>"#));
		assert!(html.contains(r#"<option value="b" selected="selected">Beta</option>"#));
	}

	#[rstest]
	fn test_textarea_escapes_content() {
		let html = Widget::TextArea.render("bio", "id_bio", Some(&json!("<b>hi</b>")));

		assert!(html.contains("&lt;b&gt;hi&lt;/b&gt;"));
		assert!(!html.contains("<b>"));
	}

	#[rstest]
	fn test_text_input_escapes_value() {
		let html = Widget::TextInput.render("q", "id_q", Some(&json!("\"><script>")));

		assert!(html.contains("value=\"&quot;&gt;&lt;script&gt;\""));
	}

	#[rstest]
	fn test_empty_value_is_omitted() {
		let html = Widget::TextInput.render("q", "id_q", Some(&json!("")));

		assert!(!html.contains("value="));
	}
}
