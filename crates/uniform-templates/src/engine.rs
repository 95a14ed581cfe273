//! Tera-backed template engine
//!
//! Built-in templates are parsed once into a shared [`Tera`] instance and
//! cloned into every [`TeraEngine`]. Autoescaping follows Tera's defaults for
//! `.html` templates. Values that keep their slashes go through the
//! `escape_html` filter, and pre-rendered markup (widgets, layout fragments)
//! is emitted with `safe`.

use crate::escaping::EscapeHtml;
use crate::{TemplateError, TemplateResult};
use once_cell::sync::Lazy;
use serde::Serialize;
use tera::{Context, Tera};

/// Names and sources of the templates shipped with the crate
pub const BUILTIN_TEMPLATES: &[(&str, &str)] = &[
	(
		"uni_form/field.html",
		include_str!("../templates/uni_form/field.html"),
	),
	(
		"uni_form/multifield.html",
		include_str!("../templates/uni_form/multifield.html"),
	),
	(
		"uni_form/errors.html",
		include_str!("../templates/uni_form/errors.html"),
	),
	(
		"uni_form/errors_formset.html",
		include_str!("../templates/uni_form/errors_formset.html"),
	),
	(
		"uni_form/inputs.html",
		include_str!("../templates/uni_form/inputs.html"),
	),
	(
		"uni_form/whole_uni_form.html",
		include_str!("../templates/uni_form/whole_uni_form.html"),
	),
	(
		"uni_form/whole_uni_formset.html",
		include_str!("../templates/uni_form/whole_uni_formset.html"),
	),
];

/// Name under which [`TeraEngine::render_str`] registers its source
const INLINE_TEMPLATE: &str = "__uniform_inline__.html";

static BUILTIN: Lazy<Tera> = Lazy::new(|| {
	let mut tera = configured(Tera::default());
	tera.add_raw_templates(BUILTIN_TEMPLATES.iter().copied())
		.expect("Failed to parse built-in uni_form templates");
	tera
});

fn configured(mut tera: Tera) -> Tera {
	tera.register_filter("escape_html", EscapeHtml);
	tera
}

/// Service rendering templates against a variable mapping
pub trait TemplateEngine: Send + Sync {
	/// Render a registered template by name
	fn render(&self, template_name: &str, context: &Context) -> TemplateResult<String>;

	/// Render a template given as source text
	fn render_str(&self, source: &str, context: &Context) -> TemplateResult<String>;

	fn has_template(&self, template_name: &str) -> bool;
}

/// [`TemplateEngine`] implementation on top of Tera
#[derive(Clone)]
pub struct TeraEngine {
	tera: Tera,
}

impl TeraEngine {
	/// Engine with only the built-in `uni_form/*` templates
	///
	/// # Examples
	///
	/// ```
	/// use uniform_templates::{TemplateEngine, TeraEngine};
	///
	/// let engine = TeraEngine::new();
	/// assert!(engine.has_template("uni_form/field.html"));
	/// ```
	pub fn new() -> Self {
		Self {
			tera: BUILTIN.clone(),
		}
	}

	/// Load templates from a glob such as `templates/**/*.html`
	///
	/// Templates found by the glob take precedence over the built-in ones with
	/// the same name, so projects can override `uni_form/field.html` and friends.
	pub fn from_glob(glob: &str) -> TemplateResult<Self> {
		let mut tera = configured(Tera::new(glob)?);
		tera.extend(&BUILTIN)?;
		tracing::debug!(
			"Loaded {} templates from {}",
			tera.get_template_names().count(),
			glob
		);
		Ok(Self { tera })
	}

	/// Register or replace a template
	pub fn add_raw_template(&mut self, name: &str, source: &str) -> TemplateResult<()> {
		self.tera.add_raw_template(name, source)?;
		Ok(())
	}

	pub fn template_names(&self) -> impl Iterator<Item = &str> {
		self.tera.get_template_names()
	}
}

impl Default for TeraEngine {
	fn default() -> Self {
		Self::new()
	}
}

impl std::fmt::Debug for TeraEngine {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("TeraEngine")
			.field("templates", &self.tera.get_template_names().collect::<Vec<_>>())
			.finish()
	}
}

impl TemplateEngine for TeraEngine {
	fn render(&self, template_name: &str, context: &Context) -> TemplateResult<String> {
		tracing::debug!(template = template_name, "Rendering template");
		Ok(self.tera.render(template_name, context)?)
	}

	fn render_str(&self, source: &str, context: &Context) -> TemplateResult<String> {
		let mut tera = self.tera.clone();
		tera.add_raw_template(INLINE_TEMPLATE, source)?;
		Ok(tera.render(INLINE_TEMPLATE, context)?)
	}

	fn has_template(&self, template_name: &str) -> bool {
		self.tera
			.get_template_names()
			.any(|name| name == template_name)
	}
}

/// Build a Tera context from any serializable value with named fields
///
/// # Examples
///
/// ```
/// use uniform_templates::context_from_serialize;
/// use serde_json::json;
///
/// let context = context_from_serialize(&json!({"form_method": "post"})).unwrap();
/// assert_eq!(context.get("form_method"), Some(&json!("post")));
///
/// assert!(context_from_serialize(&json!("not a map")).is_err());
/// ```
pub fn context_from_serialize<T: Serialize>(value: &T) -> TemplateResult<Context> {
	Context::from_serialize(value).map_err(|e| TemplateError::Context(e.to_string()))
}
