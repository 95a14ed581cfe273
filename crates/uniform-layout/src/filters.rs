//! Template filters rendering whole forms without a helper
//!
//! - `as_uni_form`: non-field errors followed by every field
//! - `as_uni_errors`: only the non-field error block

use crate::error::UniFormResult;
use crate::field::{RenderContext, RenderPass, render_remaining_fields};
use crate::settings::{ERRORS_TEMPLATE, FORMSET_ERRORS_TEMPLATE};
use uniform_forms::{Form, FormSet};
use uniform_templates::Context;

/// Every field of the form in declaration order, in a fresh pass
pub fn render_fields(form: &Form, ctx: &RenderContext<'_>) -> UniFormResult<String> {
	let mut pass = RenderPass::new();
	render_remaining_fields(form, &mut pass, ctx)
}

/// Non-field errors of a form, without a title
pub fn as_uni_errors(form: &Form, ctx: &RenderContext<'_>) -> UniFormResult<String> {
	let mut context = Context::new();
	context.insert("form_errors", form.non_field_errors());
	context.insert("form_error_title", &None::<String>);
	Ok(ctx.engine.render(ERRORS_TEMPLATE, &context)?)
}

pub fn as_uni_form(form: &Form, ctx: &RenderContext<'_>) -> UniFormResult<String> {
	let mut html = as_uni_errors(form, ctx)?;
	html.push_str(&render_fields(form, ctx)?);
	Ok(html)
}

/// Formset-level errors followed by the non-field errors of each form
pub fn as_uni_formset_errors(formset: &FormSet, ctx: &RenderContext<'_>) -> UniFormResult<String> {
	let mut context = Context::new();
	context.insert("formset_errors", formset.non_form_errors());
	context.insert("formset_error_title", &None::<String>);
	let mut html = ctx.engine.render(FORMSET_ERRORS_TEMPLATE, &context)?;
	for form in formset.forms() {
		html.push_str(&as_uni_errors(form, ctx)?);
	}
	Ok(html)
}

/// Management form, formset errors, then every form
pub fn as_uni_formset(formset: &FormSet, ctx: &RenderContext<'_>) -> UniFormResult<String> {
	let mut html = formset.management_form_html();
	html.push('\n');
	let mut context = Context::new();
	context.insert("formset_errors", formset.non_form_errors());
	context.insert("formset_error_title", &None::<String>);
	html.push_str(&ctx.engine.render(FORMSET_ERRORS_TEMPLATE, &context)?);
	for form in formset.forms() {
		html.push_str(&as_uni_form(form, ctx)?);
	}
	Ok(html)
}
