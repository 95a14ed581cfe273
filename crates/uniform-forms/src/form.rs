use crate::bound_field::BoundField;
use crate::field::{FieldError, FormField};
use indexmap::IndexMap;
use std::collections::HashMap;
use std::ops::Index;

#[derive(Debug, thiserror::Error)]
pub enum FormError {
	#[error("Field error in {field}: {error}")]
	Field { field: String, error: FieldError },
	#[error("{0}")]
	Validation(String),
}

pub type FormResult<T> = Result<T, FormError>;

type CleanFunction =
	Box<dyn Fn(&HashMap<String, serde_json::Value>) -> FormResult<()> + Send + Sync>;

/// Key under which form-level (non-field) errors are stored.
pub const ALL_FIELDS_KEY: &str = "_all";

/// A form: an ordered mapping of field names to field definitions plus the
/// data bound to them.
///
/// Field order is insertion order and is the order in which fields are
/// rendered when no explicit layout says otherwise.
pub struct Form {
	fields: IndexMap<String, Box<dyn FormField>>,
	data: HashMap<String, serde_json::Value>,
	initial: HashMap<String, serde_json::Value>,
	errors: HashMap<String, Vec<String>>,
	is_bound: bool,
	clean_functions: Vec<CleanFunction>,
	prefix: String,
}

impl Form {
	/// Create a new empty form
	///
	/// # Examples
	///
	/// ```
	/// use uniform_forms::Form;
	///
	/// let form = Form::new();
	/// assert!(!form.is_bound());
	/// assert_eq!(form.field_count(), 0);
	/// ```
	pub fn new() -> Self {
		Self {
			fields: IndexMap::new(),
			data: HashMap::new(),
			initial: HashMap::new(),
			errors: HashMap::new(),
			is_bound: false,
			clean_functions: vec![],
			prefix: String::new(),
		}
	}

	/// Create a new form whose field names are prefixed (`prefix-name`)
	///
	/// # Examples
	///
	/// ```
	/// use uniform_forms::Form;
	///
	/// let form = Form::with_prefix("user");
	/// assert_eq!(form.add_prefix_to_field_name("email"), "user-email");
	/// ```
	pub fn with_prefix(prefix: impl Into<String>) -> Self {
		let mut form = Self::new();
		form.prefix = prefix.into();
		form
	}

	/// Add a field; a field with the same name is replaced in place
	///
	/// # Examples
	///
	/// ```
	/// use uniform_forms::{CharField, Form};
	///
	/// let mut form = Form::new();
	/// form.add_field(Box::new(CharField::new("username")));
	/// form.add_field(Box::new(CharField::new("email")));
	///
	/// let names: Vec<&str> = form.field_names().collect();
	/// assert_eq!(names, vec!["username", "email"]);
	/// ```
	pub fn add_field(&mut self, field: Box<dyn FormField>) {
		self.fields.insert(field.name().to_string(), field);
	}

	/// Builder variant of [`Form::add_field`]
	pub fn field(mut self, field: impl FormField + 'static) -> Self {
		self.add_field(Box::new(field));
		self
	}

	/// Bind submitted data
	pub fn bind(&mut self, data: HashMap<String, serde_json::Value>) {
		self.data = data;
		self.is_bound = true;
	}

	/// Validate the bound data and collect errors
	///
	/// # Examples
	///
	/// ```
	/// use uniform_forms::{CharField, Form};
	/// use std::collections::HashMap;
	/// use serde_json::json;
	///
	/// let mut form = Form::new().field(CharField::new("email").required());
	/// form.bind(HashMap::new());
	///
	/// assert!(!form.is_valid());
	/// assert_eq!(form.errors()["email"], vec!["This field is required.".to_string()]);
	/// ```
	pub fn is_valid(&mut self) -> bool {
		if !self.is_bound {
			return false;
		}

		self.errors.clear();

		for (name, field) in &self.fields {
			match field.clean(self.data.get(name)) {
				Ok(cleaned) => {
					self.data.insert(name.clone(), cleaned);
				}
				Err(e) => {
					self.errors.entry(name.clone()).or_default().push(e.to_string());
				}
			}
		}

		for clean_fn in &self.clean_functions {
			if let Err(e) = clean_fn(&self.data) {
				match e {
					FormError::Field { field, error } => {
						self.errors.entry(field).or_default().push(error.to_string());
					}
					FormError::Validation(msg) => {
						self.errors
							.entry(ALL_FIELDS_KEY.to_string())
							.or_default()
							.push(msg);
					}
				}
			}
		}

		self.errors.is_empty()
	}

	pub fn cleaned_data(&self) -> &HashMap<String, serde_json::Value> {
		&self.data
	}

	pub fn errors(&self) -> &HashMap<String, Vec<String>> {
		&self.errors
	}

	/// Errors raised by form-wide clean functions
	///
	/// # Examples
	///
	/// ```
	/// use uniform_forms::{Form, FormError};
	/// use std::collections::HashMap;
	///
	/// let mut form = Form::new();
	/// form.add_clean_function(|_| Err(FormError::Validation("Nope".to_string())));
	/// form.bind(HashMap::new());
	/// form.is_valid();
	///
	/// assert_eq!(form.non_field_errors(), &["Nope".to_string()]);
	/// ```
	pub fn non_field_errors(&self) -> &[String] {
		self.errors
			.get(ALL_FIELDS_KEY)
			.map(|e| e.as_slice())
			.unwrap_or(&[])
	}

	pub fn is_bound(&self) -> bool {
		self.is_bound
	}

	pub fn initial(&self) -> &HashMap<String, serde_json::Value> {
		&self.initial
	}

	pub fn set_initial(&mut self, initial: HashMap<String, serde_json::Value>) {
		self.initial = initial;
	}

	/// Iterate over the fields in declaration order
	pub fn fields(&self) -> impl Iterator<Item = &dyn FormField> {
		self.fields.values().map(|f| f.as_ref())
	}

	/// Iterate over the field names in declaration order
	pub fn field_names(&self) -> impl Iterator<Item = &str> {
		self.fields.keys().map(|k| k.as_str())
	}

	pub fn get_field(&self, name: &str) -> Option<&dyn FormField> {
		self.fields.get(name).map(|f| f.as_ref())
	}

	pub fn contains_field(&self, name: &str) -> bool {
		self.fields.contains_key(name)
	}

	/// Remove a field, keeping the order of the remaining ones
	///
	/// # Examples
	///
	/// ```
	/// use uniform_forms::{CharField, Form};
	///
	/// let mut form = Form::new()
	///     .field(CharField::new("a"))
	///     .field(CharField::new("b"))
	///     .field(CharField::new("c"));
	///
	/// assert!(form.remove_field("b").is_some());
	/// assert!(form.remove_field("b").is_none());
	/// assert_eq!(form.field_names().collect::<Vec<_>>(), vec!["a", "c"]);
	/// ```
	pub fn remove_field(&mut self, name: &str) -> Option<Box<dyn FormField>> {
		self.fields.shift_remove(name)
	}

	pub fn field_count(&self) -> usize {
		self.fields.len()
	}

	/// Add a form-wide clean function, run after every field has been cleaned
	pub fn add_clean_function<F>(&mut self, f: F)
	where
		F: Fn(&HashMap<String, serde_json::Value>) -> FormResult<()> + Send + Sync + 'static,
	{
		self.clean_functions.push(Box::new(f));
	}

	pub fn prefix(&self) -> &str {
		&self.prefix
	}

	pub fn set_prefix(&mut self, prefix: impl Into<String>) {
		self.prefix = prefix.into();
	}

	pub fn add_prefix_to_field_name(&self, field_name: &str) -> String {
		if self.prefix.is_empty() {
			field_name.to_string()
		} else {
			format!("{}-{}", self.prefix, field_name)
		}
	}

	/// Combine a field with its data and errors
	///
	/// Unbound forms fall back to the form-level initial data.
	pub fn get_bound_field<'a>(&'a self, name: &str) -> Option<BoundField<'a>> {
		let field = self.get_field(name)?;
		let data = if self.is_bound {
			self.data.get(name)
		} else {
			self.initial.get(name)
		};
		let errors = self.errors.get(name).map(|e| e.as_slice()).unwrap_or(&[]);

		Some(BoundField::new(field, data, errors, &self.prefix))
	}

	/// Bound fields for every field in declaration order
	pub fn bound_fields(&self) -> impl Iterator<Item = BoundField<'_>> {
		self.field_names()
			.filter_map(move |name| self.get_bound_field(name))
	}
}

impl Default for Form {
	fn default() -> Self {
		Self::new()
	}
}

impl std::fmt::Debug for Form {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Form")
			.field("fields", &self.fields.keys().collect::<Vec<_>>())
			.field("is_bound", &self.is_bound)
			.field("prefix", &self.prefix)
			.field("errors", &self.errors)
			.finish()
	}
}

impl Index<&str> for Form {
	type Output = dyn FormField;

	fn index(&self, name: &str) -> &Self::Output {
		self.fields
			.get(name)
			.map(|f| f.as_ref())
			.unwrap_or_else(|| panic!("Field '{}' not found", name))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::field::Widget;
	use crate::fields::{BooleanField, CharField};
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	fn test_form_validation() {
		// Arrange
		let mut form = Form::new().field(CharField::new("name").with_max_length(50));
		let mut data = HashMap::new();
		data.insert("name".to_string(), json!("John Doe"));

		// Act
		form.bind(data);

		// Assert
		assert!(form.is_valid());
		assert!(form.errors().is_empty());
	}

	#[rstest]
	fn test_form_validation_error() {
		let mut form = Form::new().field(CharField::new("name").with_max_length(5));
		let mut data = HashMap::new();
		data.insert("name".to_string(), json!("Very Long Name"));

		form.bind(data);

		assert!(!form.is_valid());
		assert!(form.errors().contains_key("name"));
	}

	#[rstest]
	fn test_form_unbound_is_never_valid() {
		let mut form = Form::new().field(CharField::new("name"));

		assert!(!form.is_bound());
		assert!(!form.is_valid());
	}

	#[rstest]
	fn test_form_clean_function_reports_non_field_error() {
		// Arrange
		let mut form = Form::new()
			.field(CharField::new("password1"))
			.field(CharField::new("password2"));
		form.add_clean_function(|data| {
			if data.get("password1") != data.get("password2") {
				return Err(FormError::Validation("Passwords dont match".to_string()));
			}
			Ok(())
		});
		let mut data = HashMap::new();
		data.insert("password1".to_string(), json!("wargame"));
		data.insert("password2".to_string(), json!("god"));

		// Act
		form.bind(data);

		// Assert
		assert!(!form.is_valid());
		assert_eq!(form.non_field_errors(), &["Passwords dont match".to_string()]);
	}

	#[rstest]
	fn test_form_clean_function_field_error() {
		let mut form = Form::new().field(CharField::new("code"));
		form.add_clean_function(|_| {
			Err(FormError::Field {
				field: "code".to_string(),
				error: FieldError::validation("Bad code"),
			})
		});
		form.bind(HashMap::new());

		assert!(!form.is_valid());
		assert_eq!(form.errors()["code"], vec!["Bad code".to_string()]);
		assert!(form.non_field_errors().is_empty());
	}

	#[rstest]
	fn test_form_field_order_is_preserved() {
		let form = Form::new()
			.field(BooleanField::new("is_company"))
			.field(CharField::new("email"))
			.field(CharField::new("first_name"));

		let names: Vec<&str> = form.field_names().collect();

		assert_eq!(names, vec!["is_company", "email", "first_name"]);
	}

	#[rstest]
	fn test_form_add_field_replaces_same_name() {
		let form = Form::new()
			.field(CharField::new("a"))
			.field(CharField::new("b"))
			.field(CharField::new("a").with_label("Again"));

		assert_eq!(form.field_count(), 2);
		assert_eq!(form.field_names().collect::<Vec<_>>(), vec!["a", "b"]);
		assert_eq!(form["a"].label(), Some("Again"));
	}

	#[rstest]
	fn test_form_index_access_by_name() {
		// Arrange
		let form = Form::new()
			.field(CharField::new("email").required())
			.field(BooleanField::new("is_company"));

		// Act
		let email = &form["email"];
		let is_company = &form["is_company"];

		// Assert
		assert_eq!(email.name(), "email");
		assert!(email.required());
		assert_eq!(is_company.widget(), &Widget::CheckboxInput);
	}

	#[rstest]
	fn test_bound_field_uses_initial_when_unbound() {
		let mut initial = HashMap::new();
		initial.insert("name".to_string(), json!("John"));
		let mut form = Form::new().field(CharField::new("name"));
		form.set_initial(initial);

		let bound = form.get_bound_field("name").unwrap();

		assert_eq!(bound.value(), Some(&json!("John")));
	}

	#[rstest]
	#[should_panic(expected = "Field 'nonexistent' not found")]
	fn test_form_index_access_nonexistent() {
		let form = Form::new();
		let _ = &form["nonexistent"];
	}
}
