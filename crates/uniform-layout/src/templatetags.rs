//! The `uni_form` template tag
//!
//! ```text
//! {% load uni_form_tags %}
//! {% uni_form form_variable [helper_variable] %}
//! ```
//!
//! The tag resolves the form (or formset) and the optional helper from the
//! rendering context, projects the helper attributes into a response mapping,
//! renders the form markup (through the helper's layout when it has one) and
//! hands everything to the wrapper template.

use crate::error::{UniFormError, UniFormResult};
use crate::field::RenderContext;
use crate::filters;
use crate::helper::{FormHelper, HelperAttributes};
use crate::input::Input;
use crate::uni_form::UniForm;
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde_json::{Value, json};
use uniform_forms::{Form, FormSet};
use uniform_templates::Context;

pub const TAG_NAME: &str = "uni_form";

static LOAD_TAG: Lazy<Regex> = Lazy::new(|| {
	Regex::new(r"\{%\s*load\s+uni_form_tags\s*%\}").expect("Invalid load tag pattern")
});

static UNI_FORM_TAG: Lazy<Regex> = Lazy::new(|| {
	Regex::new(r"\{%\s*(uni_form(?:\s+[^%]*?)?)\s*%\}").expect("Invalid uni_form tag pattern")
});

static UNI_FORM_FILTER: Lazy<Regex> = Lazy::new(|| {
	Regex::new(r"\{\{\s*([A-Za-z_][A-Za-z0-9_]*)\s*\|\s*(as_uni_form|as_uni_errors)\s*\}\}")
		.expect("Invalid uni_form filter pattern")
});

/// A value bound to a name in the rendering context
#[derive(Debug)]
pub enum ContextValue {
	Form(Form),
	FormSet(FormSet),
	Helper(FormHelper),
	Text(String),
	Bool(bool),
}

impl ContextValue {
	pub fn type_name(&self) -> &'static str {
		match self {
			ContextValue::Form(_) => "form",
			ContextValue::FormSet(_) => "formset",
			ContextValue::Helper(_) => "helper",
			ContextValue::Text(_) => "text",
			ContextValue::Bool(_) => "bool",
		}
	}
}

impl From<Form> for ContextValue {
	fn from(form: Form) -> Self {
		ContextValue::Form(form)
	}
}

impl From<FormSet> for ContextValue {
	fn from(formset: FormSet) -> Self {
		ContextValue::FormSet(formset)
	}
}

impl From<FormHelper> for ContextValue {
	fn from(helper: FormHelper) -> Self {
		ContextValue::Helper(helper)
	}
}

impl From<String> for ContextValue {
	fn from(text: String) -> Self {
		ContextValue::Text(text)
	}
}

impl From<&str> for ContextValue {
	fn from(text: &str) -> Self {
		ContextValue::Text(text.to_string())
	}
}

impl From<bool> for ContextValue {
	fn from(value: bool) -> Self {
		ContextValue::Bool(value)
	}
}

/// Variables visible to the tag
#[derive(Debug, Default)]
pub struct TagContext {
	values: IndexMap<String, ContextValue>,
}

impl TagContext {
	pub fn new() -> Self {
		Self::default()
	}

	/// Bind a value, returning the one it replaces
	pub fn insert(
		&mut self,
		name: impl Into<String>,
		value: impl Into<ContextValue>,
	) -> Option<ContextValue> {
		self.values.insert(name.into(), value.into())
	}

	pub fn with(mut self, name: impl Into<String>, value: impl Into<ContextValue>) -> Self {
		self.insert(name, value);
		self
	}

	pub fn get(&self, name: &str) -> Option<&ContextValue> {
		self.values.get(name)
	}

	pub fn get_mut(&mut self, name: &str) -> Option<&mut ContextValue> {
		self.values.get_mut(name)
	}

	pub fn remove(&mut self, name: &str) -> Option<ContextValue> {
		self.values.shift_remove(name)
	}

	pub fn contains_key(&self, name: &str) -> bool {
		self.values.contains_key(name)
	}

	/// The CSRF token, when the context carries one as text
	pub fn csrf_token(&self) -> Option<&str> {
		match self.values.get("csrf_token") {
			Some(ContextValue::Text(token)) => Some(token),
			_ => None,
		}
	}

	/// Text and boolean variables as a template context
	pub fn scalar_context(&self) -> Context {
		let mut context = Context::new();
		for (name, value) in &self.values {
			match value {
				ContextValue::Text(text) => context.insert(name.as_str(), text),
				ContextValue::Bool(flag) => context.insert(name.as_str(), flag),
				_ => {}
			}
		}
		context
	}
}

/// Parsed `{% uni_form form [helper] %}` tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniFormNode {
	form: String,
	helper: Option<String>,
}

impl UniFormNode {
	pub fn new(form: impl Into<String>, helper: Option<String>) -> Self {
		Self {
			form: form.into(),
			helper,
		}
	}

	/// Parse the tag contents, with or without the `{% %}` delimiters
	///
	/// # Examples
	///
	/// ```
	/// use uniform_layout::UniFormNode;
	///
	/// let node = UniFormNode::parse("uni_form form form_helper").unwrap();
	/// assert_eq!(node.form_variable(), "form");
	/// assert_eq!(node.helper_variable(), Some("form_helper"));
	///
	/// assert!(UniFormNode::parse("uni_form").is_err());
	/// assert!(UniFormNode::parse("uni_form a b c").is_err());
	/// ```
	pub fn parse(contents: &str) -> UniFormResult<Self> {
		let contents = contents.trim();
		let contents = contents
			.strip_prefix("{%")
			.and_then(|c| c.strip_suffix("%}"))
			.unwrap_or(contents);
		let bits: Vec<&str> = contents.split_whitespace().collect();

		match bits.as_slice() {
			[TAG_NAME, form] => Ok(Self::new(*form, None)),
			[TAG_NAME, form, helper] => Ok(Self::new(*form, Some(helper.to_string()))),
			[TAG_NAME, ..] => Err(UniFormError::TemplateSyntax(format!(
				"'{}' tag takes a form and an optional helper, got {} arguments",
				TAG_NAME,
				bits.len() - 1
			))),
			[other, ..] => Err(UniFormError::TemplateSyntax(format!(
				"expected '{}' tag, got '{}'",
				TAG_NAME, other
			))),
			[] => Err(UniFormError::TemplateSyntax("empty tag".to_string())),
		}
	}

	pub fn form_variable(&self) -> &str {
		&self.form
	}

	pub fn helper_variable(&self) -> Option<&str> {
		self.helper.as_deref()
	}

	fn resolve_helper<'c>(&self, context: &'c TagContext) -> UniFormResult<Option<&'c FormHelper>> {
		let Some(name) = &self.helper else {
			return Ok(None);
		};
		match context.get(name) {
			Some(ContextValue::Helper(helper)) => Ok(Some(helper)),
			Some(other) => Err(UniFormError::InvalidHelper(other.type_name().to_string())),
			None => Err(UniFormError::VariableDoesNotExist(name.clone())),
		}
	}

	/// Build the wrapper template context without rendering it
	pub fn get_render(&self, context: &TagContext, uni_form: &UniForm) -> UniFormResult<Context> {
		let actual_form = context
			.get(&self.form)
			.ok_or_else(|| UniFormError::VariableDoesNotExist(self.form.clone()))?;
		let helper = self.resolve_helper(context)?;
		let attrs = helper.map(|h| h.get_attributes(uni_form.urls()));

		let is_formset = match actual_form {
			ContextValue::Form(_) => false,
			ContextValue::FormSet(_) => true,
			_ => return Err(UniFormError::InvalidForm(self.form.clone())),
		};
		let mut response = get_response_dict(attrs.as_ref(), context, is_formset);

		let form_style = attrs.as_ref().map(|a| a.form_style.as_str()).unwrap_or("");
		let ctx = uni_form.render_context(form_style);

		if let ContextValue::Form(form) = actual_form {
			response.insert(
				"form_html".to_string(),
				Value::String(form_html(form, helper, &ctx)?),
			);
			response.insert("form_errors".to_string(), json!(form.non_field_errors()));
		} else if let ContextValue::FormSet(formset) = actual_form {
			let mut forms = Vec::with_capacity(formset.total_form_count());
			for form in formset.forms() {
				let html = form_html(form, helper, &ctx)?;
				forms.push(json!({
					"form_html": html,
					"errors": form.non_field_errors(),
				}));
			}
			response.insert("forms".to_string(), Value::Array(forms));
			response.insert(
				"management_form".to_string(),
				Value::String(formset.management_form_html()),
			);
			response.insert(
				"formset_errors".to_string(),
				json!(formset.non_form_errors()),
			);
		}

		let mut tera_context = Context::new();
		for (key, value) in &response {
			tera_context.insert(key.as_str(), value);
		}
		if !response.contains_key("csrf_token") {
			tera_context.insert("csrf_token", &Value::Null);
		}
		Ok(tera_context)
	}

	pub fn render(&self, context: &TagContext, uni_form: &UniForm) -> UniFormResult<String> {
		let is_formset = matches!(context.get(&self.form), Some(ContextValue::FormSet(_)));
		let render_context = self.get_render(context, uni_form)?;
		let settings = uni_form.settings();
		let template = if is_formset {
			&settings.formset_template
		} else {
			&settings.form_template
		};
		tracing::debug!(form = %self.form, template = %template, "Rendering uni_form tag");
		Ok(uni_form.engine().render(template, &render_context)?)
	}
}

/// Form markup: the helper's layout when it has one, otherwise every field
fn form_html(form: &Form, helper: Option<&FormHelper>, ctx: &RenderContext<'_>) -> UniFormResult<String> {
	match helper.and_then(FormHelper::layout) {
		Some(layout) => layout.render(form, ctx),
		None => filters::render_fields(form, ctx),
	}
}

/// Everything the wrapper template needs besides the form markup
///
/// Keys are prefixed with `form_` or `formset_`: `_action` (default `.`),
/// `_method` (default `post`), `_tag` (default true), `_class` and `_id`
/// (default empty). The CSRF token is included only when the context has one.
pub fn get_response_dict(
	attrs: Option<&HelperAttributes>,
	context: &TagContext,
	is_formset: bool,
) -> IndexMap<String, Value> {
	let form_type = if is_formset { "formset" } else { "form" };

	let mut response = IndexMap::new();
	response.insert(
		format!("{}_action", form_type),
		json!(attrs.and_then(|a| a.form_action.as_deref()).unwrap_or(".")),
	);
	response.insert(
		format!("{}_method", form_type),
		json!(attrs.map(|a| a.form_method.as_str()).unwrap_or("post")),
	);
	response.insert(
		format!("{}_tag", form_type),
		json!(attrs.map(|a| a.form_tag).unwrap_or(true)),
	);
	response.insert(
		format!("{}_class", form_type),
		json!(attrs.and_then(|a| a.class.as_deref()).unwrap_or("")),
	);
	response.insert(
		format!("{}_id", form_type),
		json!(attrs.and_then(|a| a.id.as_deref()).unwrap_or("")),
	);
	response.insert(
		"form_error_title".to_string(),
		json!(attrs.and_then(|a| a.form_error_title.as_deref())),
	);
	response.insert(
		"formset_error_title".to_string(),
		json!(attrs.and_then(|a| a.formset_error_title.as_deref())),
	);
	response.insert(
		"inputs".to_string(),
		Value::Array(
			attrs
				.map(|a| a.inputs.iter().map(Input::to_value).collect())
				.unwrap_or_default(),
		),
	);
	response.insert("is_formset".to_string(), json!(is_formset));

	if let Some(token) = context.csrf_token() {
		response.insert("csrf_token".to_string(), json!(token));
	}
	response
}

fn substitute<F>(
	source: &str,
	pattern: &Regex,
	outputs: &mut Vec<String>,
	mut render: F,
) -> UniFormResult<String>
where
	F: FnMut(&Captures<'_>) -> UniFormResult<String>,
{
	let mut rewritten = String::with_capacity(source.len());
	let mut last = 0;
	for caps in pattern.captures_iter(source) {
		let Some(whole) = caps.get(0) else {
			continue;
		};
		rewritten.push_str(&source[last..whole.start()]);
		outputs.push(render(&caps)?);
		rewritten.push_str(&format!("{{{{ uni_form_output_{} | safe }}}}", outputs.len() - 1));
		last = whole.end();
	}
	rewritten.push_str(&source[last..]);
	Ok(rewritten)
}

fn render_filter(filter: &str, variable: &str, context: &TagContext, uni_form: &UniForm) -> UniFormResult<String> {
	match (context.get(variable), filter) {
		(Some(ContextValue::Form(form)), "as_uni_form") => uni_form.as_uni_form(form),
		(Some(ContextValue::Form(form)), _) => uni_form.as_uni_errors(form),
		(Some(ContextValue::FormSet(formset)), "as_uni_form") => uni_form.as_uni_formset(formset),
		(Some(ContextValue::FormSet(formset)), _) => uni_form.as_uni_formset_errors(formset),
		(Some(_), _) => Err(UniFormError::InvalidForm(variable.to_string())),
		(None, _) => Err(UniFormError::VariableDoesNotExist(variable.to_string())),
	}
}

/// Render a template string using the `uni_form` tag and filters
///
/// `{% load uni_form_tags %}` is dropped, every `{% uni_form … %}` tag and
/// `{{ var|as_uni_form }}` / `{{ var|as_uni_errors }}` expression is rendered
/// in place, and the remaining text is rendered with the context's text and
/// boolean variables.
pub fn render_template(source: &str, context: &TagContext, uni_form: &UniForm) -> UniFormResult<String> {
	let source = LOAD_TAG.replace_all(source, "");
	let mut outputs = Vec::new();

	let source = substitute(&source, &UNI_FORM_TAG, &mut outputs, |caps| {
		UniFormNode::parse(&caps[1])?.render(context, uni_form)
	})?;
	let source = substitute(&source, &UNI_FORM_FILTER, &mut outputs, |caps| {
		render_filter(&caps[2], &caps[1], context, uni_form)
	})?;

	let mut template_context = context.scalar_context();
	for (index, output) in outputs.iter().enumerate() {
		template_context.insert(format!("uni_form_output_{}", index), output);
	}
	Ok(uni_form.engine().render_str(&source, &template_context)?)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::helper::FormMethod;
	use crate::settings::UniFormSettings;
	use rstest::{fixture, rstest};
	use uniform_forms::CharField;
	use uniform_urls::{NoReverse, RouteTable};

	fn email_form() -> Form {
		Form::new().field(CharField::new("email").required())
	}

	#[fixture]
	fn uni_form() -> UniForm {
		UniForm::default()
	}

	#[rstest]
	#[case("uni_form")]
	#[case("uni_form a b c")]
	#[case("crispy form")]
	#[case("")]
	fn test_parse_rejects_bad_tags(#[case] tag: &str) {
		assert!(matches!(
			UniFormNode::parse(tag),
			Err(UniFormError::TemplateSyntax(_))
		));
	}

	#[rstest]
	fn test_parse_accepts_delimiters() {
		let node = UniFormNode::parse("{% uni_form testForm form_helper %}").unwrap();

		assert_eq!(node, UniFormNode::new("testForm", Some("form_helper".to_string())));
	}

	#[rstest]
	fn test_missing_form_variable(uni_form: UniForm) {
		let err = uni_form.render_tag("uni_form form", &TagContext::new()).unwrap_err();

		assert!(matches!(err, UniFormError::VariableDoesNotExist(v) if v == "form"));
	}

	#[rstest]
	fn test_helper_slot_must_hold_helper(uni_form: UniForm) {
		let context = TagContext::new()
			.with("form", email_form())
			.with("form_helper", "invalid");

		let err = uni_form
			.render_tag("uni_form form form_helper", &context)
			.unwrap_err();

		assert!(matches!(err, UniFormError::InvalidHelper(t) if t == "text"));
	}

	#[rstest]
	fn test_form_slot_must_hold_form(uni_form: UniForm) {
		let context = TagContext::new().with("form", true);

		let err = uni_form.render_tag("uni_form form", &context).unwrap_err();

		assert!(matches!(err, UniFormError::InvalidForm(_)));
	}

	#[rstest]
	fn test_response_dict_defaults() {
		let response = get_response_dict(None, &TagContext::new(), false);

		assert_eq!(response["form_action"], json!("."));
		assert_eq!(response["form_method"], json!("post"));
		assert_eq!(response["form_tag"], json!(true));
		assert_eq!(response["form_class"], json!(""));
		assert_eq!(response["form_id"], json!(""));
		assert_eq!(response["inputs"], json!([]));
		assert_eq!(response["is_formset"], json!(false));
		assert!(!response.contains_key("csrf_token"));
	}

	#[rstest]
	fn test_response_dict_formset_prefix_and_csrf() {
		let routes = RouteTable::new().with_route("simpleAction", "/simple/action/").unwrap();
		let mut helper = FormHelper::new();
		helper.set_form_action("simpleAction");
		helper.set_form_method(FormMethod::Get);
		let attrs = helper.get_attributes(&routes);
		let context = TagContext::new().with("csrf_token", "abc123");

		let response = get_response_dict(Some(&attrs), &context, true);

		assert_eq!(response["formset_action"], json!("/simple/action/"));
		assert_eq!(response["formset_method"], json!("get"));
		assert_eq!(response["csrf_token"], json!("abc123"));
		assert!(!response.contains_key("form_action"));
	}

	#[rstest]
	fn test_render_template_keeps_surrounding_text(uni_form: UniForm) {
		let context = TagContext::new()
			.with("form", email_form())
			.with("title", "Sign <up>");

		let html = uni_form
			.render_template(
				"{% load uni_form_tags %}<h1>{{ title }}</h1>{% uni_form form %}<p>after</p>",
				&context,
			)
			.unwrap();

		assert!(html.starts_with("<h1>Sign &lt;up&gt;</h1><form"));
		assert!(html.contains(r#"<input type="text" name="email" id="id_email""#));
		assert!(html.ends_with("<p>after</p>"));
	}

	#[rstest]
	fn test_render_template_escape_html_keeps_slashes(uni_form: UniForm) {
		let context = TagContext::new()
			.with("form", email_form())
			.with("next", "/home/?a=1&b=2");

		let html = uni_form
			.render_template(
				r#"<a href="{{ next | escape_html }}">back</a>{% uni_form form %}"#,
				&context,
			)
			.unwrap();

		assert!(html.starts_with(r#"<a href="/home/?a=1&amp;b=2">back</a><form"#));
	}

	#[rstest]
	fn test_response_dict_lists_input_ids() {
		let mut helper = FormHelper::new();
		helper.add_input(Input::submit("Search the Site", "go"));
		let attrs = helper.get_attributes(&NoReverse);

		let response = get_response_dict(Some(&attrs), &TagContext::new(), false);

		assert_eq!(response["inputs"][0]["input_id"], json!("submit-id-search-the-site"));
		assert_eq!(get_response_dict(None, &TagContext::new(), false)["inputs"], json!([]));
	}

	#[rstest]
	fn test_render_template_filters(uni_form: UniForm) {
		let context = TagContext::new().with("form", email_form());

		let html = uni_form
			.render_template("{% load uni_form_tags %}{{ form|as_uni_form }}", &context)
			.unwrap();

		assert!(html.contains("id_email"));
		assert!(!html.contains("<form"));
	}

	#[rstest]
	fn test_uni_form_setup_is_not_a_uni_form_tag() {
		assert!(!UNI_FORM_TAG.is_match("{% uni_form_setup %}"));
		assert!(UNI_FORM_TAG.is_match("{%uni_form form%}"));
	}

	#[rstest]
	fn test_strict_settings_propagate_to_layout() {
		let uni_form = UniForm::default().with_settings(UniFormSettings::strict());
		let helper = FormHelper::new().with_layout(crate::layout::Layout::new(["typo"]).unwrap());
		let context = TagContext::new()
			.with("form", email_form())
			.with("form_helper", helper);

		let err = uni_form
			.render_tag("uni_form form form_helper", &context)
			.unwrap_err();

		assert!(matches!(err, UniFormError::UnresolvedField(f) if f == "typo"));
	}
}
