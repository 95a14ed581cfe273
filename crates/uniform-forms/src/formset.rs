//! Formsets: several copies of the same form rendered and validated together

use crate::form::Form;

pub const TOTAL_FORM_COUNT: &str = "TOTAL_FORMS";
pub const INITIAL_FORM_COUNT: &str = "INITIAL_FORMS";

/// An ordered collection of forms sharing a prefix
#[derive(Debug)]
pub struct FormSet {
	prefix: String,
	forms: Vec<Form>,
	initial_form_count: usize,
	non_form_errors: Vec<String>,
}

impl FormSet {
	pub fn new(prefix: impl Into<String>) -> Self {
		Self {
			prefix: prefix.into(),
			forms: Vec::new(),
			initial_form_count: 0,
			non_form_errors: Vec::new(),
		}
	}

	/// Build a formset with `extra` blank forms produced by `factory`
	///
	/// Each form gets the prefix `<prefix>-<index>`.
	///
	/// # Examples
	///
	/// ```
	/// use uniform_forms::{CharField, Form, FormSet};
	///
	/// let formset = FormSet::with_extra("form", 3, || Form::new().field(CharField::new("title")));
	///
	/// assert_eq!(formset.total_form_count(), 3);
	/// assert_eq!(formset.forms()[2].prefix(), "form-2");
	/// ```
	pub fn with_extra<F>(prefix: impl Into<String>, extra: usize, factory: F) -> Self
	where
		F: Fn() -> Form,
	{
		let mut formset = Self::new(prefix);
		for _ in 0..extra {
			formset.add_form(factory());
		}
		formset
	}

	/// Append a form, assigning it the next indexed prefix
	pub fn add_form(&mut self, mut form: Form) {
		form.set_prefix(format!("{}-{}", self.prefix, self.forms.len()));
		self.forms.push(form);
	}

	pub fn prefix(&self) -> &str {
		&self.prefix
	}

	pub fn forms(&self) -> &[Form] {
		&self.forms
	}

	pub fn forms_mut(&mut self) -> &mut [Form] {
		&mut self.forms
	}

	pub fn total_form_count(&self) -> usize {
		self.forms.len()
	}

	pub fn initial_form_count(&self) -> usize {
		self.initial_form_count
	}

	pub fn set_initial_form_count(&mut self, count: usize) {
		self.initial_form_count = count;
	}

	pub fn non_form_errors(&self) -> &[String] {
		&self.non_form_errors
	}

	pub fn add_non_form_error(&mut self, error: impl Into<String>) {
		self.non_form_errors.push(error.into());
	}

	/// Validate every form; the formset is valid only if all forms are
	pub fn is_valid(&mut self) -> bool {
		let mut valid = self.non_form_errors.is_empty();
		for form in &mut self.forms {
			valid &= form.is_valid();
		}
		valid
	}

	/// Hidden inputs carrying the form counts back on submit
	///
	/// # Examples
	///
	/// ```
	/// use uniform_forms::{Form, FormSet};
	///
	/// let formset = FormSet::with_extra("form", 2, Form::new);
	/// let html = formset.management_form_html();
	///
	/// assert!(html.contains(r#"name="form-TOTAL_FORMS" value="2""#));
	/// assert!(html.contains(r#"name="form-INITIAL_FORMS" value="0""#));
	/// ```
	pub fn management_form_html(&self) -> String {
		[
			(TOTAL_FORM_COUNT, self.total_form_count()),
			(INITIAL_FORM_COUNT, self.initial_form_count),
		]
		.iter()
		.map(|(key, count)| {
			let name = format!("{}-{}", self.prefix, key);
			format!(
				"<input type=\"hidden\" name=\"{}\" value=\"{}\" id=\"id_{}\" />",
				name, count, name
			)
		})
		.collect::<Vec<_>>()
		.join("\n")
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::fields::CharField;
	use rstest::rstest;
	use std::collections::HashMap;

	fn title_form() -> Form {
		Form::new().field(CharField::new("title").required())
	}

	#[rstest]
	fn test_formset_prefixes_forms() {
		let formset = FormSet::with_extra("books", 2, title_form);

		let prefixes: Vec<&str> = formset.forms().iter().map(|f| f.prefix()).collect();

		assert_eq!(prefixes, vec!["books-0", "books-1"]);
	}

	#[rstest]
	fn test_formset_is_valid_checks_every_form() {
		// Arrange
		let mut formset = FormSet::with_extra("books", 2, title_form);
		let mut good = HashMap::new();
		good.insert("title".to_string(), serde_json::json!("Dune"));
		formset.forms_mut()[0].bind(good);
		formset.forms_mut()[1].bind(HashMap::new());

		// Act & Assert
		assert!(!formset.is_valid());
		assert!(formset.forms()[1].errors().contains_key("title"));
	}
}
