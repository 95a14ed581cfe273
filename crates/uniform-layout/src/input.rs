//! Buttons and hidden inputs rendered after the form fields

use serde::Serialize;
use serde_json::{Value, json};
use std::fmt;

/// Kind of input rendered in the button holder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InputType {
	Submit,
	Reset,
	Hidden,
	Button,
}

impl InputType {
	pub fn as_str(&self) -> &'static str {
		match self {
			InputType::Submit => "submit",
			InputType::Reset => "reset",
			InputType::Hidden => "hidden",
			InputType::Button => "button",
		}
	}

	/// CSS classes every input of this kind carries
	pub fn default_classes(&self) -> &'static str {
		match self {
			InputType::Submit => "submit submitButton",
			InputType::Reset => "reset resetButton",
			InputType::Hidden => "hidden",
			InputType::Button => "button",
		}
	}
}

impl fmt::Display for InputType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// An input descriptor attached to a form helper
///
/// The name is slugified into the element id, so `Input::submit("Search the
/// Site", "go")` renders with `id="submit-id-search-the-site"`.
///
/// # Examples
///
/// ```
/// use uniform_layout::Input;
///
/// let submit = Input::submit("my-submit", "Submit").with_css_class("button white");
///
/// assert_eq!(submit.field_classes(), "submit submitButton button white");
/// assert_eq!(submit.input_id(), "submit-id-my-submit");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Input {
	input_type: InputType,
	name: String,
	value: String,
	field_classes: String,
}

impl Input {
	pub fn new(input_type: InputType, name: impl Into<String>, value: impl Into<String>) -> Self {
		Self {
			input_type,
			name: name.into(),
			value: value.into(),
			field_classes: input_type.default_classes().to_string(),
		}
	}

	pub fn submit(name: impl Into<String>, value: impl Into<String>) -> Self {
		Self::new(InputType::Submit, name, value)
	}

	pub fn reset(name: impl Into<String>, value: impl Into<String>) -> Self {
		Self::new(InputType::Reset, name, value)
	}

	pub fn hidden(name: impl Into<String>, value: impl Into<String>) -> Self {
		Self::new(InputType::Hidden, name, value)
	}

	pub fn button(name: impl Into<String>, value: impl Into<String>) -> Self {
		Self::new(InputType::Button, name, value)
	}

	/// Append extra classes after the defaults
	pub fn with_css_class(mut self, css_class: &str) -> Self {
		let css_class = css_class.trim();
		if !css_class.is_empty() {
			self.field_classes.push(' ');
			self.field_classes.push_str(css_class);
		}
		self
	}

	pub fn input_type(&self) -> InputType {
		self.input_type
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn value(&self) -> &str {
		&self.value
	}

	pub fn field_classes(&self) -> &str {
		&self.field_classes
	}

	pub fn input_id(&self) -> String {
		format!("{}-id-{}", self.input_type, slugify(&self.name))
	}

	/// Template variables of this input, including the derived `input_id`
	pub fn to_value(&self) -> Value {
		json!({
			"input_type": self.input_type.as_str(),
			"name": self.name,
			"value": self.value,
			"field_classes": self.field_classes,
			"input_id": self.input_id(),
		})
	}
}

impl Serialize for Input {
	fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		self.to_value().serialize(serializer)
	}
}

/// Lowercase, keep ASCII alphanumerics and collapse everything else into single hyphens
///
/// # Examples
///
/// ```
/// use uniform_layout::input::slugify;
///
/// assert_eq!(slugify("Search the Site"), "search-the-site");
/// assert_eq!(slugify("my_submit!"), "my-submit");
/// ```
pub fn slugify(text: &str) -> String {
	text.to_lowercase()
		.chars()
		.map(|ch| match ch {
			'a'..='z' | '0'..='9' => ch,
			_ => '-',
		})
		.collect::<String>()
		.split('-')
		.filter(|s| !s.is_empty())
		.collect::<Vec<_>>()
		.join("-")
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	#[case(Input::submit("my-submit", "Submit"), "submit submitButton", "submit-id-my-submit")]
	#[case(Input::reset("my-reset", "Reset"), "reset resetButton", "reset-id-my-reset")]
	#[case(Input::hidden("my-hidden", "Hidden"), "hidden", "hidden-id-my-hidden")]
	#[case(Input::button("my-button", "Button"), "button", "button-id-my-button")]
	fn test_default_classes_and_ids(
		#[case] input: Input,
		#[case] classes: &str,
		#[case] id: &str,
	) {
		assert_eq!(input.field_classes(), classes);
		assert_eq!(input.input_id(), id);
	}

	#[rstest]
	fn test_blank_css_class_is_ignored() {
		let input = Input::button("b", "B").with_css_class("  ");

		assert_eq!(input.field_classes(), "button");
	}

	#[rstest]
	fn test_serializes_for_templates() {
		let input = Input::submit("Search the Site", "go");

		assert_eq!(
			serde_json::to_value(&input).unwrap(),
			json!({
				"input_type": "submit",
				"name": "Search the Site",
				"value": "go",
				"field_classes": "submit submitButton",
				"input_id": "submit-id-search-the-site",
			})
		);
	}
}
