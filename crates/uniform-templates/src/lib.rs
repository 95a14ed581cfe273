//! # uniform templates
//!
//! Template rendering service used by the uniform layout layer.
//!
//! The [`TemplateEngine`] trait is the seam: anything that can render a named
//! template or a raw template string against a [`Context`] can drive the form
//! layouts. [`TeraEngine`] is the bundled implementation and ships the
//! `uni_form/*.html` templates:
//!
//! - `uni_form/field.html` - a single field with label, errors and hint
//! - `uni_form/multifield.html` - a field inside a multi-field block
//! - `uni_form/errors.html`, `uni_form/errors_formset.html` - non-field errors
//! - `uni_form/inputs.html` - submit/reset/hidden/button inputs
//! - `uni_form/whole_uni_form.html`, `uni_form/whole_uni_formset.html` - wrappers
//!
//! ## Example
//!
//! ```rust
//! use uniform_templates::{Context, TemplateEngine, TeraEngine};
//!
//! let mut engine = TeraEngine::new();
//! engine.add_raw_template("hello.html", "Hello {{ name | escape_html }}!").unwrap();
//!
//! let mut context = Context::new();
//! context.insert("name", "<World>");
//!
//! assert_eq!(engine.render("hello.html", &context).unwrap(), "Hello &lt;World&gt;!");
//! ```

pub mod engine;
pub mod escaping;

pub use engine::{BUILTIN_TEMPLATES, TemplateEngine, TeraEngine, context_from_serialize};
pub use escaping::{EscapeHtml, escape_html};
pub use tera::Context;

/// Errors raised while rendering templates
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
	#[error("Template not found: {0}")]
	TemplateNotFound(String),
	#[error("Template rendering error: {0}")]
	Render(String),
	#[error("Invalid template context: {0}")]
	Context(String),
}

pub type TemplateResult<T> = Result<T, TemplateError>;

impl From<tera::Error> for TemplateError {
	fn from(err: tera::Error) -> Self {
		if let tera::ErrorKind::TemplateNotFound(name) = &err.kind {
			return TemplateError::TemplateNotFound(name.clone());
		}

		// Tera nests the useful message in the source chain
		let mut message = err.to_string();
		let mut source = std::error::Error::source(&err);
		while let Some(inner) = source {
			message.push_str(": ");
			message.push_str(&inner.to_string());
			source = inner.source();
		}
		TemplateError::Render(message)
	}
}
