//! Boolean field rendered as a checkbox

use crate::field::{FieldError, FieldResult, FormField, Widget};
use serde_json::Value;

#[derive(Debug, Clone)]
pub struct BooleanField {
	pub name: String,
	pub label: Option<String>,
	pub required: bool,
	pub help_text: Option<String>,
	pub widget: Widget,
	pub initial: Option<Value>,
}

impl BooleanField {
	/// Create an optional checkbox field
	///
	/// # Examples
	///
	/// ```
	/// use uniform_forms::{BooleanField, FormField, Widget};
	///
	/// let field = BooleanField::new("is_company");
	/// assert_eq!(field.widget(), &Widget::CheckboxInput);
	/// ```
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			label: None,
			required: false,
			help_text: None,
			widget: Widget::CheckboxInput,
			initial: None,
		}
	}

	/// A required boolean field only accepts a checked box
	pub fn required(mut self) -> Self {
		self.required = true;
		self
	}

	pub fn with_label(mut self, label: impl Into<String>) -> Self {
		self.label = Some(label.into());
		self
	}

	pub fn with_help_text(mut self, help_text: impl Into<String>) -> Self {
		self.help_text = Some(help_text.into());
		self
	}
}

impl FormField for BooleanField {
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
		let checked = match value {
			None | Some(Value::Null) => false,
			Some(Value::Bool(b)) => *b,
			Some(Value::String(s)) => !matches!(
				s.to_lowercase().as_str(),
				"" | "false" | "0" | "off" | "no"
			),
			Some(Value::Number(n)) => n.as_i64().is_some_and(|n| n != 0),
			Some(_) => return Err(FieldError::Invalid(self.name.clone())),
		};

		if self.required && !checked {
			return Err(FieldError::required(&self.name));
		}
		Ok(Value::Bool(checked))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	#[case(None, false)]
	#[case(Some(json!("on")), true)]
	#[case(Some(json!("false")), false)]
	#[case(Some(json!(true)), true)]
	fn test_clean_coerces_to_bool(#[case] input: Option<Value>, #[case] expected: bool) {
		let field = BooleanField::new("agree");

		assert_eq!(field.clean(input.as_ref()), Ok(json!(expected)));
	}

	#[rstest]
	fn test_required_needs_checked_box() {
		let field = BooleanField::new("agree").required();

		assert!(field.clean(Some(&json!(false))).is_err());
		assert!(field.clean(Some(&json!("on"))).is_ok());
	}
}
