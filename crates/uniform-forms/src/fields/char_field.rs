//! Character field for text input

use crate::field::{FieldError, FieldResult, FormField, Widget};
use serde_json::Value;

/// Text field with optional length limits
#[derive(Debug, Clone)]
pub struct CharField {
	pub name: String,
	pub label: Option<String>,
	pub required: bool,
	pub help_text: Option<String>,
	pub widget: Widget,
	pub initial: Option<Value>,
	pub max_length: Option<usize>,
	pub min_length: Option<usize>,
	pub strip: bool,
}

impl CharField {
	/// Create an optional text field rendered with a text input
	///
	/// # Examples
	///
	/// ```
	/// use uniform_forms::CharField;
	///
	/// let field = CharField::new("username");
	/// assert_eq!(field.name, "username");
	/// assert!(!field.required);
	/// ```
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			label: None,
			required: false,
			help_text: None,
			widget: Widget::TextInput,
			initial: None,
			max_length: None,
			min_length: None,
			strip: true,
		}
	}

	pub fn required(mut self) -> Self {
		self.required = true;
		self
	}

	pub fn with_max_length(mut self, max_length: usize) -> Self {
		self.max_length = Some(max_length);
		self
	}

	pub fn with_min_length(mut self, min_length: usize) -> Self {
		self.min_length = Some(min_length);
		self
	}

	pub fn with_label(mut self, label: impl Into<String>) -> Self {
		self.label = Some(label.into());
		self
	}

	/// Set the help text shown under the field
	///
	/// # Examples
	///
	/// ```
	/// use uniform_forms::CharField;
	///
	/// let field = CharField::new("username").with_help_text("Letters and digits only");
	/// assert_eq!(field.help_text.as_deref(), Some("Letters and digits only"));
	/// ```
	pub fn with_help_text(mut self, help_text: impl Into<String>) -> Self {
		self.help_text = Some(help_text.into());
		self
	}

	pub fn with_initial(mut self, initial: impl Into<String>) -> Self {
		self.initial = Some(Value::String(initial.into()));
		self
	}

	pub fn with_widget(mut self, widget: Widget) -> Self {
		self.widget = widget;
		self
	}
}

impl FormField for CharField {
	fn name(&self) -> &str {
		&self.name
	}

	fn label(&self) -> Option<&str> {
		self.label.as_deref()
	}

	fn required(&self) -> bool {
		self.required
	}

	fn help_text(&self) -> Option<&str> {
		self.help_text.as_deref()
	}

	fn widget(&self) -> &Widget {
		&self.widget
	}

	fn initial(&self) -> Option<&Value> {
		self.initial.as_ref()
	}

	fn clean(&self, value: Option<&Value>) -> FieldResult<Value> {
		let text = match value {
			None | Some(Value::Null) => "",
			Some(Value::String(s)) => s.as_str(),
			Some(_) => return Err(FieldError::validation("Value must be a string")),
		};
		let text = if self.strip { text.trim() } else { text };

		if text.is_empty() {
			if self.required {
				return Err(FieldError::required(&self.name));
			}
			return Ok(Value::String(String::new()));
		}

		// Lengths are counted in characters, not bytes
		let char_count = text.chars().count();
		if let Some(max_length) = self.max_length
			&& char_count > max_length
		{
			return Err(FieldError::Validation(format!(
				"Ensure this value has at most {} characters (it has {}).",
				max_length, char_count
			)));
		}
		if let Some(min_length) = self.min_length
			&& char_count < min_length
		{
			return Err(FieldError::Validation(format!(
				"Ensure this value has at least {} characters (it has {}).",
				min_length, char_count
			)));
		}

		Ok(Value::String(text.to_string()))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	fn test_required_rejects_blank() {
		// Arrange
		let field = CharField::new("email").required();

		// Act & Assert
		assert_eq!(field.clean(None), Err(FieldError::required("email")));
		assert!(field.clean(Some(&json!("   "))).is_err());
		assert_eq!(field.clean(Some(&json!(" a@b.c "))), Ok(json!("a@b.c")));
	}

	#[rstest]
	#[case("abcde", true)]
	#[case("abcdef", false)]
	#[case("日本語の文字", false)]
	#[case("日本語", true)]
	fn test_max_length_counts_characters(#[case] input: &str, #[case] ok: bool) {
		let field = CharField::new("name").with_max_length(5);

		assert_eq!(field.clean(Some(&json!(input))).is_ok(), ok);
	}

	#[rstest]
	fn test_non_string_is_rejected() {
		let field = CharField::new("name");

		assert!(field.clean(Some(&json!(42))).is_err());
	}

	#[rstest]
	fn test_required_error_message() {
		let err = FieldError::required("email");

		assert_eq!(err.to_string(), "This field is required.");
	}
}
