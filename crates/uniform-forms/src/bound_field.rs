use crate::field::{FormField, Widget, escape_attribute, pretty_name, value_to_string};
use serde::Serialize;

/// A field combined with its current value and errors for one render
pub struct BoundField<'a> {
	field: &'a dyn FormField,
	data: Option<&'a serde_json::Value>,
	errors: &'a [String],
	prefix: &'a str,
}

/// Template-facing view of a [`BoundField`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoundFieldContext {
	pub name: String,
	pub html_name: String,
	pub auto_id: String,
	pub label: String,
	pub value: Option<String>,
	pub errors: Vec<String>,
	pub help_text: Option<String>,
	pub required: bool,
	pub is_hidden: bool,
	pub css_class: String,
	pub widget_html: String,
}

impl<'a> BoundField<'a> {
	/// Bind a field to its value and errors
	///
	/// # Examples
	///
	/// ```
	/// use uniform_forms::{BoundField, CharField, FormField};
	///
	/// let field = CharField::new("name");
	/// let data = serde_json::json!("John");
	///
	/// let bound = BoundField::new(&field, Some(&data), &[], "");
	/// assert_eq!(bound.name(), "name");
	/// assert_eq!(bound.value(), Some(&data));
	/// ```
	pub fn new(
		field: &'a dyn FormField,
		data: Option<&'a serde_json::Value>,
		errors: &'a [String],
		prefix: &'a str,
	) -> Self {
		Self {
			field,
			data,
			errors,
			prefix,
		}
	}

	pub fn name(&self) -> &str {
		self.field.name()
	}

	/// The `name` attribute, including the form prefix
	///
	/// # Examples
	///
	/// ```
	/// use uniform_forms::{BoundField, CharField};
	///
	/// let field = CharField::new("email");
	/// assert_eq!(BoundField::new(&field, None, &[], "").html_name(), "email");
	/// assert_eq!(BoundField::new(&field, None, &[], "user").html_name(), "user-email");
	/// ```
	pub fn html_name(&self) -> String {
		if self.prefix.is_empty() {
			self.field.name().to_string()
		} else {
			format!("{}-{}", self.prefix, self.field.name())
		}
	}

	/// The `id` attribute of the widget (`id_<html name>`)
	///
	/// # Examples
	///
	/// ```
	/// use uniform_forms::{BoundField, CharField};
	///
	/// let field = CharField::new("username");
	/// let bound = BoundField::new(&field, None, &[], "profile");
	/// assert_eq!(bound.auto_id(), "id_profile-username");
	/// ```
	pub fn auto_id(&self) -> String {
		format!("id_{}", self.html_name())
	}

	/// Explicit label, or one derived from the field name
	pub fn label(&self) -> String {
		self.field
			.label()
			.map(str::to_string)
			.unwrap_or_else(|| pretty_name(self.field.name()))
	}

	pub fn value(&self) -> Option<&serde_json::Value> {
		self.data.or_else(|| self.field.initial())
	}

	pub fn errors(&self) -> &[String] {
		self.errors
	}

	pub fn has_errors(&self) -> bool {
		!self.errors.is_empty()
	}

	pub fn widget(&self) -> &Widget {
		self.field.widget()
	}

	pub fn is_hidden(&self) -> bool {
		self.field.widget().is_hidden()
	}

	pub fn help_text(&self) -> Option<&str> {
		self.field.help_text()
	}

	pub fn is_required(&self) -> bool {
		self.field.required()
	}

	/// Render the widget markup with the current value
	pub fn as_widget(&self) -> String {
		self.widget()
			.render(&self.html_name(), &self.auto_id(), self.value())
	}

	/// Render a `<label>` pointing at the widget
	///
	/// # Examples
	///
	/// ```
	/// use uniform_forms::{BoundField, CharField};
	///
	/// let field = CharField::new("first_name").required();
	/// let bound = BoundField::new(&field, None, &[], "");
	/// assert_eq!(
	///     bound.label_tag(Some("blockLabel")),
	///     r#"<label for="id_first_name" class="blockLabel"><em>*</em> First name</label>"#
	/// );
	/// ```
	pub fn label_tag(&self, label_class: Option<&str>) -> String {
		let class = label_class
			.filter(|c| !c.is_empty())
			.map(|c| format!(" class=\"{}\"", escape_attribute(c)))
			.unwrap_or_default();
		let marker = if self.is_required() { "<em>*</em> " } else { "" };
		format!(
			"<label for=\"{}\"{}>{}{}</label>",
			escape_attribute(&self.auto_id()),
			class,
			marker,
			escape_attribute(&self.label())
		)
	}

	/// Snapshot of everything a field template needs
	pub fn to_context(&self) -> BoundFieldContext {
		BoundFieldContext {
			name: self.name().to_string(),
			html_name: self.html_name(),
			auto_id: self.auto_id(),
			label: self.label(),
			value: self.value().and_then(value_to_string),
			errors: self.errors.to_vec(),
			help_text: self.help_text().map(str::to_string),
			required: self.is_required(),
			is_hidden: self.is_hidden(),
			css_class: self.widget().css_class().to_string(),
			widget_html: self.as_widget(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::fields::CharField;
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	fn test_bound_field_basic() {
		// Arrange
		let field = CharField::new("name");
		let data = json!("John Doe");

		// Act
		let bound = BoundField::new(&field, Some(&data), &[], "");

		// Assert
		assert_eq!(bound.html_name(), "name");
		assert_eq!(bound.auto_id(), "id_name");
		assert_eq!(bound.label(), "Name");
		assert!(!bound.has_errors());
	}

	#[rstest]
	fn test_bound_field_context_carries_errors_and_help() {
		let field = CharField::new("email")
			.with_label("E-mail")
			.with_help_text("We never share it");
		let errors = vec!["This field is required.".to_string()];

		let ctx = BoundField::new(&field, None, &errors, "").to_context();

		assert_eq!(ctx.label, "E-mail");
		assert_eq!(ctx.errors, errors);
		assert_eq!(ctx.help_text.as_deref(), Some("We never share it"));
		assert!(ctx.widget_html.starts_with("<input type=\"text\" name=\"email\""));
	}

	#[rstest]
	fn test_bound_field_initial_fallback() {
		let field = CharField::new("city").with_initial("Paris");

		let bound = BoundField::new(&field, None, &[], "");

		assert_eq!(bound.value(), Some(&json!("Paris")));
		assert!(bound.as_widget().contains("value=\"Paris\""));
	}

	#[rstest]
	fn test_label_tag_without_class() {
		let field = CharField::new("nickname");

		let html = BoundField::new(&field, None, &[], "").label_tag(None);

		assert_eq!(html, r#"<label for="id_nickname">Nickname</label>"#);
	}
}
