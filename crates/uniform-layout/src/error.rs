use crate::settings::SettingsError;
use uniform_templates::TemplateError;

/// Errors raised while building or rendering form layouts
#[derive(Debug, thiserror::Error)]
pub enum UniFormError {
	/// A layout names a field the form does not have
	#[error("Could not resolve form field '{0}'.")]
	UnresolvedField(String),
	/// The same field was emitted twice in one render pass
	#[error("A field should only be rendered once: {0}")]
	DoubleRender(String),
	/// Field references must be non-empty ASCII letters, digits, `_` or `-`
	#[error("Field '{0}' is using forbidden characters")]
	InvalidFieldName(String),
	#[error("Only GET and POST are valid in the form_method helper attribute, got '{0}'")]
	InvalidMethod(String),
	#[error("Only default and inline are valid in the form_style helper attribute, got '{0}'")]
	InvalidStyle(String),
	/// The helper slot of the tag holds something other than a helper
	#[error("helper object provided to uni_form tag must be a FormHelper, got {0}")]
	InvalidHelper(String),
	/// The form slot of the tag holds neither a form nor a formset
	#[error("variable '{0}' provided to uni_form tag must be a form or a formset")]
	InvalidForm(String),
	#[error("Failed lookup for key [{0}] in the template context")]
	VariableDoesNotExist(String),
	#[error("Template syntax error: {0}")]
	TemplateSyntax(String),
	#[error(transparent)]
	Template(#[from] TemplateError),
	#[error(transparent)]
	Settings(#[from] SettingsError),
}

pub type UniFormResult<T> = Result<T, UniFormError>;
