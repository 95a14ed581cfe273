//! Field resolution
//!
//! Every field a layout emits goes through [`render_field`], which looks the
//! name up in the form, records it in the current [`RenderPass`] and renders
//! the bound field through the field template.

use crate::error::{UniFormError, UniFormResult};
use crate::field_name::FieldName;
use crate::settings::UniFormSettings;
use indexmap::{IndexMap, IndexSet};
use serde::Serialize;
use uniform_forms::{BoundFieldContext, Form};
use uniform_templates::{Context, TemplateEngine};

/// Field names emitted so far while rendering one form
///
/// A pass belongs to a single render of a single form and is dropped with it,
/// so rendering the same form twice starts from a clean slate.
#[derive(Debug, Clone, Default)]
pub struct RenderPass {
	rendered: IndexSet<String>,
}

impl RenderPass {
	pub fn new() -> Self {
		Self::default()
	}

	/// Record a field, returning `false` if it was already rendered
	pub fn record(&mut self, name: &str) -> bool {
		self.rendered.insert(name.to_string())
	}

	pub fn contains(&self, name: &str) -> bool {
		self.rendered.contains(name)
	}

	/// Rendered names in emission order
	pub fn rendered(&self) -> impl Iterator<Item = &str> {
		self.rendered.iter().map(String::as_str)
	}

	pub fn len(&self) -> usize {
		self.rendered.len()
	}

	pub fn is_empty(&self) -> bool {
		self.rendered.is_empty()
	}
}

/// Collaborators and options shared by every node of one render
#[derive(Clone, Copy)]
pub struct RenderContext<'a> {
	pub engine: &'a dyn TemplateEngine,
	pub settings: &'a UniFormSettings,
	/// CSS class derived from the helper's form style, applied to fieldsets
	pub form_style: &'a str,
}

impl<'a> RenderContext<'a> {
	pub fn new(engine: &'a dyn TemplateEngine, settings: &'a UniFormSettings) -> Self {
		Self {
			engine,
			settings,
			form_style: "",
		}
	}

	pub fn with_form_style(mut self, form_style: &'a str) -> Self {
		self.form_style = form_style;
		self
	}
}

impl std::fmt::Debug for RenderContext<'_> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("RenderContext")
			.field("settings", self.settings)
			.field("form_style", &self.form_style)
			.finish_non_exhaustive()
	}
}

/// Template-facing view of a whole form, exposed as `form` to HTML nodes
#[derive(Debug, Clone, Serialize)]
pub struct FormContext {
	pub fields: IndexMap<String, BoundFieldContext>,
	pub non_field_errors: Vec<String>,
	pub prefix: String,
	pub is_bound: bool,
}

impl FormContext {
	pub fn from_form(form: &Form) -> Self {
		Self {
			fields: form
				.bound_fields()
				.map(|bound| (bound.name().to_string(), bound.to_context()))
				.collect(),
			non_field_errors: form.non_field_errors().to_vec(),
			prefix: form.prefix().to_string(),
			is_bound: form.is_bound(),
		}
	}
}

/// Render one field with the configured field template
pub fn render_field(
	name: &FieldName,
	form: &Form,
	pass: &mut RenderPass,
	ctx: &RenderContext<'_>,
) -> UniFormResult<String> {
	resolve_field(
		name.as_str(),
		form,
		pass,
		ctx,
		&ctx.settings.field_template,
		None,
	)
}

/// Render one field with an explicit template and label class
pub fn render_field_with(
	name: &FieldName,
	form: &Form,
	pass: &mut RenderPass,
	ctx: &RenderContext<'_>,
	template: &str,
	labelclass: Option<&str>,
) -> UniFormResult<String> {
	resolve_field(name.as_str(), form, pass, ctx, template, labelclass)
}

pub(crate) fn resolve_field(
	name: &str,
	form: &Form,
	pass: &mut RenderPass,
	ctx: &RenderContext<'_>,
	template: &str,
	labelclass: Option<&str>,
) -> UniFormResult<String> {
	let fail_silently = ctx.settings.fail_silently;

	let bound = form.get_bound_field(name);
	if bound.is_none() {
		if !fail_silently {
			return Err(UniFormError::UnresolvedField(name.to_string()));
		}
		tracing::warn!("Could not resolve form field '{}'.", name);
	}

	if !pass.record(name) {
		if !fail_silently {
			return Err(UniFormError::DoubleRender(name.to_string()));
		}
		tracing::warn!("A field should only be rendered once: {}", name);
	}

	let Some(bound) = bound else {
		return Ok(String::new());
	};

	let mut context = Context::new();
	context.insert("field", &bound.to_context());
	context.insert("labelclass", &labelclass);
	tracing::debug!(field = name, template, "Rendering field");
	Ok(ctx.engine.render(template, &context)?)
}

/// Render every form field not yet in the pass, in form order
pub fn render_remaining_fields(
	form: &Form,
	pass: &mut RenderPass,
	ctx: &RenderContext<'_>,
) -> UniFormResult<String> {
	let remaining: Vec<&str> = form
		.field_names()
		.filter(|name| !pass.contains(name))
		.collect();

	let mut html = String::new();
	for name in remaining {
		html.push_str(&resolve_field(
			name,
			form,
			pass,
			ctx,
			&ctx.settings.field_template,
			None,
		)?);
	}
	Ok(html)
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::{fixture, rstest};
	use uniform_forms::CharField;
	use uniform_templates::TeraEngine;

	#[fixture]
	fn form() -> Form {
		Form::new()
			.field(CharField::new("email").with_label("email"))
			.field(CharField::new("first_name"))
	}

	#[fixture]
	fn engine() -> TeraEngine {
		TeraEngine::new()
	}

	fn name(s: &str) -> FieldName {
		FieldName::new(s).unwrap()
	}

	#[rstest]
	fn test_render_field_uses_field_template(form: Form, engine: TeraEngine) {
		// Arrange
		let settings = UniFormSettings::strict();
		let ctx = RenderContext::new(&engine, &settings);
		let mut pass = RenderPass::new();

		// Act
		let html = render_field(&name("email"), &form, &mut pass, &ctx).unwrap();

		// Assert
		assert!(html.contains(r#"id="div_id_email""#));
		assert!(html.contains(r#"name="email""#));
		assert!(pass.contains("email"));
	}

	#[rstest]
	fn test_unresolved_field_strict(form: Form, engine: TeraEngine) {
		let settings = UniFormSettings::strict();
		let ctx = RenderContext::new(&engine, &settings);
		let mut pass = RenderPass::new();

		let err = render_field(&name("typo"), &form, &mut pass, &ctx).unwrap_err();

		assert!(matches!(err, UniFormError::UnresolvedField(n) if n == "typo"));
	}

	#[rstest]
	fn test_unresolved_field_permissive_is_recorded(form: Form, engine: TeraEngine) {
		let settings = UniFormSettings::default();
		let ctx = RenderContext::new(&engine, &settings);
		let mut pass = RenderPass::new();

		let html = render_field(&name("typo"), &form, &mut pass, &ctx).unwrap();

		assert_eq!(html, "");
		assert!(pass.contains("typo"));
	}

	#[rstest]
	fn test_double_render_strict(form: Form, engine: TeraEngine) {
		let settings = UniFormSettings::strict();
		let ctx = RenderContext::new(&engine, &settings);
		let mut pass = RenderPass::new();

		render_field(&name("email"), &form, &mut pass, &ctx).unwrap();
		let err = render_field(&name("email"), &form, &mut pass, &ctx).unwrap_err();

		assert!(matches!(err, UniFormError::DoubleRender(n) if n == "email"));
	}

	#[rstest]
	fn test_double_render_permissive_renders_again(form: Form, engine: TeraEngine) {
		let settings = UniFormSettings::default();
		let ctx = RenderContext::new(&engine, &settings);
		let mut pass = RenderPass::new();

		let first = render_field(&name("email"), &form, &mut pass, &ctx).unwrap();
		let second = render_field(&name("email"), &form, &mut pass, &ctx).unwrap();

		assert_eq!(first, second);
		assert_eq!(pass.len(), 1);
	}

	#[rstest]
	fn test_render_remaining_follows_form_order(form: Form, engine: TeraEngine) {
		let settings = UniFormSettings::strict();
		let ctx = RenderContext::new(&engine, &settings);
		let mut pass = RenderPass::new();
		pass.record("email");

		let html = render_remaining_fields(&form, &mut pass, &ctx).unwrap();

		assert!(html.contains("id_first_name"));
		assert!(!html.contains("id_email"));
		assert_eq!(pass.rendered().collect::<Vec<_>>(), vec!["email", "first_name"]);
	}

	#[rstest]
	fn test_form_context_lists_fields_in_order(form: Form) {
		let context = FormContext::from_form(&form);

		let names: Vec<&str> = context.fields.keys().map(String::as_str).collect();
		assert_eq!(names, vec!["email", "first_name"]);
		assert!(!context.is_bound);
	}
}
