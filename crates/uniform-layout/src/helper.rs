//! Form helper
//!
//! A [`FormHelper`] collects the form-level presentation attributes the
//! `uni_form` tag needs: method, action, css id and class, style, inputs,
//! error titles, whether to emit the `<form>` element, and an optional
//! [`Layout`].
//!
//! ```
//! use uniform_layout::{FormHelper, FormMethod, Input};
//! use uniform_urls::NoReverse;
//!
//! let mut helper = FormHelper::new();
//! helper.set_form_id("this-form-rocks");
//! helper.set_form_class("search");
//! helper.set_form_method("GET".parse::<FormMethod>().unwrap());
//! helper.add_input(Input::submit("search", "search this site"));
//!
//! let attrs = helper.get_attributes(&NoReverse);
//! assert_eq!(attrs.form_method, "get");
//! assert_eq!(attrs.id.as_deref(), Some("this-form-rocks"));
//! ```

use crate::error::{UniFormError, UniFormResult};
use crate::field::RenderContext;
use crate::input::Input;
use crate::layout::Layout;
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use uniform_forms::Form;
use uniform_urls::UrlReverser;

/// HTTP method of the rendered form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FormMethod {
	Get,
	#[default]
	Post,
}

impl FormMethod {
	pub fn as_str(&self) -> &'static str {
		match self {
			FormMethod::Get => "get",
			FormMethod::Post => "post",
		}
	}
}

impl FromStr for FormMethod {
	type Err = UniFormError;

	/// Case-insensitive; anything but GET or POST is rejected
	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.trim().to_lowercase().as_str() {
			"get" => Ok(FormMethod::Get),
			"post" => Ok(FormMethod::Post),
			_ => Err(UniFormError::InvalidMethod(s.to_string())),
		}
	}
}

impl fmt::Display for FormMethod {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Label placement style of the rendered form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FormStyle {
	#[default]
	Default,
	Inline,
}

impl FormStyle {
	pub fn as_str(&self) -> &'static str {
		match self {
			FormStyle::Default => "default",
			FormStyle::Inline => "inline",
		}
	}

	/// Class added to fieldsets for this style
	pub fn css_class(&self) -> &'static str {
		match self {
			FormStyle::Default => "",
			FormStyle::Inline => "inlineLabels",
		}
	}
}

impl FromStr for FormStyle {
	type Err = UniFormError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.trim().to_lowercase().as_str() {
			"default" => Ok(FormStyle::Default),
			"inline" => Ok(FormStyle::Inline),
			_ => Err(UniFormError::InvalidStyle(s.to_string())),
		}
	}
}

impl fmt::Display for FormStyle {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Attributes projected from a helper for the tag
///
/// Optional entries are absent when the helper leaves them unset or blank.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HelperAttributes {
	pub form_method: String,
	pub form_tag: bool,
	pub form_style: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub form_action: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub id: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub class: Option<String>,
	#[serde(skip_serializing_if = "Vec::is_empty")]
	pub inputs: Vec<Input>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub form_error_title: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub formset_error_title: Option<String>,
}

impl HelperAttributes {
	/// Ordered mapping of the present attributes
	pub fn to_map(&self) -> IndexMap<String, Value> {
		let mut map = IndexMap::new();
		map.insert("form_method".to_string(), Value::from(self.form_method.as_str()));
		map.insert("form_tag".to_string(), Value::from(self.form_tag));
		map.insert("form_style".to_string(), Value::from(self.form_style.as_str()));

		let optional = [
			("form_action", &self.form_action),
			("id", &self.id),
			("class", &self.class),
		];
		for (key, value) in optional {
			if let Some(value) = value {
				map.insert(key.to_string(), Value::from(value.as_str()));
			}
		}
		if !self.inputs.is_empty() {
			map.insert(
				"inputs".to_string(),
				Value::Array(self.inputs.iter().map(Input::to_value).collect()),
			);
		}
		for (key, value) in [
			("form_error_title", &self.form_error_title),
			("formset_error_title", &self.formset_error_title),
		] {
			if let Some(value) = value {
				map.insert(key.to_string(), Value::from(value.as_str()));
			}
		}
		map
	}
}

fn present(value: &str) -> Option<String> {
	let value = value.trim();
	(!value.is_empty()).then(|| value.to_string())
}

/// Form-level presentation attributes plus an optional layout
///
/// Every helper owns its own input list.
#[derive(Debug, Clone, PartialEq)]
pub struct FormHelper {
	form_method: FormMethod,
	form_action: String,
	form_style: FormStyle,
	form_id: String,
	form_class: String,
	inputs: Vec<Input>,
	layout: Option<Layout>,
	form_tag: bool,
	form_error_title: Option<String>,
	formset_error_title: Option<String>,
}

impl Default for FormHelper {
	fn default() -> Self {
		Self {
			form_method: FormMethod::Post,
			form_action: String::new(),
			form_style: FormStyle::Default,
			form_id: String::new(),
			form_class: String::new(),
			inputs: Vec::new(),
			layout: None,
			form_tag: true,
			form_error_title: None,
			formset_error_title: None,
		}
	}
}

impl FormHelper {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn form_method(&self) -> FormMethod {
		self.form_method
	}

	pub fn set_form_method(&mut self, method: FormMethod) {
		self.form_method = method;
	}

	/// Set the method from text, rejecting anything but GET or POST
	///
	/// # Examples
	///
	/// ```
	/// use uniform_layout::{FormHelper, FormMethod};
	///
	/// let mut helper = FormHelper::new();
	/// assert!(helper.set_form_method_str("superPost").is_err());
	/// assert_eq!(helper.form_method(), FormMethod::Post);
	/// ```
	pub fn set_form_method_str(&mut self, method: &str) -> UniFormResult<()> {
		self.form_method = method.parse()?;
		Ok(())
	}

	/// The action as configured, before route reversal
	pub fn form_action(&self) -> &str {
		&self.form_action
	}

	/// Set the action: a route name or a literal URL
	pub fn set_form_action(&mut self, action: impl Into<String>) {
		self.form_action = action.into();
	}

	/// The action with route names reversed, literal values passed through
	pub fn resolved_form_action(&self, urls: &dyn UrlReverser) -> String {
		let action = self.form_action.trim();
		if action.is_empty() {
			return String::new();
		}
		urls.reverse(action).unwrap_or_else(|| action.to_string())
	}

	pub fn form_style(&self) -> FormStyle {
		self.form_style
	}

	pub fn set_form_style(&mut self, style: FormStyle) {
		self.form_style = style;
	}

	pub fn set_form_style_str(&mut self, style: &str) -> UniFormResult<()> {
		self.form_style = style.parse()?;
		Ok(())
	}

	pub fn form_id(&self) -> &str {
		&self.form_id
	}

	pub fn set_form_id(&mut self, id: impl Into<String>) {
		self.form_id = id.into();
	}

	pub fn form_class(&self) -> &str {
		&self.form_class
	}

	pub fn set_form_class(&mut self, class: impl Into<String>) {
		self.form_class = class.into();
	}

	pub fn form_tag(&self) -> bool {
		self.form_tag
	}

	/// Whether the `<form>` element itself is rendered
	pub fn set_form_tag(&mut self, form_tag: bool) {
		self.form_tag = form_tag;
	}

	pub fn form_error_title(&self) -> Option<&str> {
		self.form_error_title.as_deref()
	}

	pub fn set_form_error_title(&mut self, title: impl Into<String>) {
		self.form_error_title = Some(title.into());
	}

	pub fn formset_error_title(&self) -> Option<&str> {
		self.formset_error_title.as_deref()
	}

	pub fn set_formset_error_title(&mut self, title: impl Into<String>) {
		self.formset_error_title = Some(title.into());
	}

	pub fn inputs(&self) -> &[Input] {
		&self.inputs
	}

	pub fn add_input(&mut self, input: Input) {
		self.inputs.push(input);
	}

	pub fn layout(&self) -> Option<&Layout> {
		self.layout.as_ref()
	}

	pub fn layout_mut(&mut self) -> Option<&mut Layout> {
		self.layout.as_mut()
	}

	/// Attach a layout, replacing any previous one
	pub fn add_layout(&mut self, layout: Layout) {
		self.layout = Some(layout);
	}

	pub fn with_layout(mut self, layout: Layout) -> Self {
		self.add_layout(layout);
		self
	}

	pub fn with_input(mut self, input: Input) -> Self {
		self.add_input(input);
		self
	}

	/// Render the attached layout against a form, `None` without a layout
	pub fn render_layout(&self, form: &Form, ctx: &RenderContext<'_>) -> UniFormResult<Option<String>> {
		self.layout
			.as_ref()
			.map(|layout| layout.render(form, ctx))
			.transpose()
	}

	/// Project the helper into the attributes consumed by the tag
	pub fn get_attributes(&self, urls: &dyn UrlReverser) -> HelperAttributes {
		HelperAttributes {
			form_method: self.form_method.as_str().to_string(),
			form_tag: self.form_tag,
			form_style: self.form_style.css_class().to_string(),
			form_action: present(&self.resolved_form_action(urls)),
			id: present(&self.form_id),
			class: present(&self.form_class),
			inputs: self.inputs.clone(),
			form_error_title: self.form_error_title.as_deref().and_then(present),
			formset_error_title: self.formset_error_title.as_deref().and_then(present),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::settings::UniFormSettings;
	use rstest::rstest;
	use serde_json::json;
	use uniform_forms::CharField;
	use uniform_templates::TeraEngine;
	use uniform_urls::{NoReverse, RouteTable};

	#[rstest]
	#[case("get", FormMethod::Get)]
	#[case("GET", FormMethod::Get)]
	#[case("Post", FormMethod::Post)]
	fn test_method_parses_case_insensitively(#[case] input: &str, #[case] expected: FormMethod) {
		assert_eq!(input.parse::<FormMethod>().unwrap(), expected);
	}

	#[rstest]
	#[case("superPost")]
	#[case("put")]
	#[case("")]
	fn test_invalid_method(#[case] input: &str) {
		let err = input.parse::<FormMethod>().unwrap_err();

		assert!(matches!(err, UniFormError::InvalidMethod(m) if m == input));
	}

	#[rstest]
	fn test_invalid_style() {
		let mut helper = FormHelper::new();

		let err = helper.set_form_style_str("fancy").unwrap_err();

		assert!(matches!(err, UniFormError::InvalidStyle(_)));
		assert_eq!(helper.form_style(), FormStyle::Default);
	}

	#[rstest]
	fn test_default_attributes() {
		let attrs = FormHelper::new().get_attributes(&NoReverse);

		assert_eq!(attrs.form_method, "post");
		assert_eq!(attrs.form_style, "");
		assert!(attrs.form_tag);
		assert_eq!(
			serde_json::to_value(&attrs).unwrap(),
			json!({"form_method": "post", "form_tag": true, "form_style": ""})
		);
	}

	#[rstest]
	fn test_attributes_are_trimmed_and_blank_dropped() {
		// Arrange
		let mut helper = FormHelper::new();
		helper.set_form_id("  this-form-rocks ");
		helper.set_form_class("   ");
		helper.set_form_style(FormStyle::Inline);
		helper.set_form_error_title(" ERRORS ");

		// Act
		let map = helper.get_attributes(&NoReverse).to_map();

		// Assert
		let keys: Vec<&str> = map.keys().map(String::as_str).collect();
		assert_eq!(
			keys,
			vec!["form_method", "form_tag", "form_style", "id", "form_error_title"]
		);
		assert_eq!(map["id"], json!("this-form-rocks"));
		assert_eq!(map["form_style"], json!("inlineLabels"));
		assert_eq!(map["form_error_title"], json!("ERRORS"));
	}

	#[rstest]
	fn test_attribute_map_lists_inputs_with_ids() {
		// Arrange
		let mut helper = FormHelper::new();
		helper.add_input(Input::submit("my-submit", "Submit").with_css_class("button white"));
		helper.add_input(Input::hidden("next", "/home/"));

		// Act
		let map = helper.get_attributes(&NoReverse).to_map();

		// Assert
		assert_eq!(map["inputs"][0]["input_id"], json!("submit-id-my-submit"));
		assert_eq!(
			map["inputs"][0]["field_classes"],
			json!("submit submitButton button white")
		);
		assert_eq!(map["inputs"][1]["value"], json!("/home/"));
	}

	#[rstest]
	fn test_action_is_reversed_with_literal_fallback() {
		let routes = RouteTable::new()
			.with_route("simpleAction", "/simple/action/")
			.unwrap();
		let mut helper = FormHelper::new();

		helper.set_form_action("simpleAction");
		assert_eq!(
			helper.get_attributes(&routes).form_action.as_deref(),
			Some("/simple/action/")
		);

		helper.set_form_action("/search/");
		assert_eq!(helper.get_attributes(&routes).form_action.as_deref(), Some("/search/"));
	}

	#[rstest]
	fn test_helpers_do_not_share_inputs() {
		let mut first = FormHelper::new();
		first.add_input(Input::submit("save", "Save"));

		let second = FormHelper::new();

		assert_eq!(first.inputs().len(), 1);
		assert!(second.inputs().is_empty());
	}

	#[rstest]
	fn test_render_layout_without_layout_is_none() {
		let engine = TeraEngine::new();
		let settings = UniFormSettings::default();
		let ctx = RenderContext::new(&engine, &settings);
		let form = Form::new().field(CharField::new("email"));

		assert_eq!(FormHelper::new().render_layout(&form, &ctx).unwrap(), None);

		let helper = FormHelper::new().with_layout(Layout::new(["email"]).unwrap());
		let html = helper.render_layout(&form, &ctx).unwrap().unwrap();
		assert!(html.contains("id_email"));
	}
}
