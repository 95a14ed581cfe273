//! Collaborator bundle driving the tag and filters

use crate::error::UniFormResult;
use crate::field::RenderContext;
use crate::filters;
use crate::settings::UniFormSettings;
use crate::templatetags::{self, TagContext, UniFormNode};
use std::sync::Arc;
use uniform_forms::{Form, FormSet};
use uniform_templates::{TemplateEngine, TeraEngine};
use uniform_urls::{NoReverse, UrlReverser};

/// Template engine, route reverser and settings used for rendering
///
/// The default bundle uses the built-in templates, reverses no routes and
/// fails silently.
///
/// # Examples
///
/// ```
/// use uniform_forms::{CharField, Form};
/// use uniform_layout::{TagContext, UniForm};
///
/// let uni_form = UniForm::default();
/// let mut context = TagContext::new();
/// context.insert("form", Form::new().field(CharField::new("email")));
///
/// let html = uni_form
///     .render_template("{% load uni_form_tags %}{% uni_form form %}", &context)
///     .unwrap();
/// assert!(html.contains(r#"class="uniForm""#));
/// assert!(html.contains("id_email"));
/// ```
#[derive(Clone)]
pub struct UniForm {
	engine: Arc<dyn TemplateEngine>,
	urls: Arc<dyn UrlReverser>,
	settings: UniFormSettings,
}

impl UniForm {
	pub fn new(
		engine: Arc<dyn TemplateEngine>,
		urls: Arc<dyn UrlReverser>,
		settings: UniFormSettings,
	) -> Self {
		Self {
			engine,
			urls,
			settings,
		}
	}

	pub fn with_engine(mut self, engine: impl TemplateEngine + 'static) -> Self {
		self.engine = Arc::new(engine);
		self
	}

	pub fn with_urls(mut self, urls: impl UrlReverser + 'static) -> Self {
		self.urls = Arc::new(urls);
		self
	}

	pub fn with_settings(mut self, settings: UniFormSettings) -> Self {
		self.settings = settings;
		self
	}

	pub fn engine(&self) -> &dyn TemplateEngine {
		self.engine.as_ref()
	}

	pub fn urls(&self) -> &dyn UrlReverser {
		self.urls.as_ref()
	}

	pub fn settings(&self) -> &UniFormSettings {
		&self.settings
	}

	pub fn settings_mut(&mut self) -> &mut UniFormSettings {
		&mut self.settings
	}

	pub fn render_context<'a>(&'a self, form_style: &'a str) -> RenderContext<'a> {
		RenderContext::new(self.engine.as_ref(), &self.settings).with_form_style(form_style)
	}

	/// Render a template containing `{% uni_form %}` tags and uni_form filters
	pub fn render_template(&self, source: &str, context: &TagContext) -> UniFormResult<String> {
		templatetags::render_template(source, context, self)
	}

	/// Parse and render a single tag, e.g. `uni_form form helper`
	pub fn render_tag(&self, tag: &str, context: &TagContext) -> UniFormResult<String> {
		UniFormNode::parse(tag)?.render(context, self)
	}

	pub fn as_uni_form(&self, form: &Form) -> UniFormResult<String> {
		filters::as_uni_form(form, &self.render_context(""))
	}

	pub fn as_uni_errors(&self, form: &Form) -> UniFormResult<String> {
		filters::as_uni_errors(form, &self.render_context(""))
	}

	pub fn as_uni_formset(&self, formset: &FormSet) -> UniFormResult<String> {
		filters::as_uni_formset(formset, &self.render_context(""))
	}

	pub fn as_uni_formset_errors(&self, formset: &FormSet) -> UniFormResult<String> {
		filters::as_uni_formset_errors(formset, &self.render_context(""))
	}
}

impl Default for UniForm {
	fn default() -> Self {
		Self::new(
			Arc::new(TeraEngine::new()),
			Arc::new(NoReverse),
			UniFormSettings::default(),
		)
	}
}

impl std::fmt::Debug for UniForm {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("UniForm")
			.field("settings", &self.settings)
			.finish_non_exhaustive()
	}
}
