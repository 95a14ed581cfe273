//! # uniform
//!
//! Declarative layouts for HTML forms.
//!
//! A [`FormHelper`](layout::FormHelper) carries the form-level attributes
//! (method, action, id, class, style, inputs) and an optional
//! [`Layout`](layout::Layout) that arranges the form's fields into fieldsets,
//! rows, columns and multi-field blocks interleaved with raw HTML. The
//! `{% uni_form form helper %}` tag renders the whole thing.
//!
//! ## Crates
//!
//! - [`forms`] - host form abstraction (fields, bound data, formsets)
//! - [`templates`] - Tera engine with the built-in `uni_form/*.html` templates
//! - [`urls`] - named route reversal for form actions
//! - [`layout`] - layout objects, form helper, template tag and filters
//!
//! ## Quick Example
//!
//! ```rust
//! use uniform::prelude::*;
//!
//! let form = Form::new()
//!     .field(CharField::new("first_name"))
//!     .field(CharField::new("last_name"));
//!
//! let mut helper = FormHelper::new();
//! helper.set_form_id("this-form-rocks");
//! helper.add_layout(Layout::new([Row::new(["first_name", "last_name"]).unwrap()]).unwrap());
//!
//! let context = TagContext::new().with("form", form).with("helper", helper);
//! let html = UniForm::default()
//! 	.render_template("{% load uni_form_tags %}{% uni_form form helper %}", &context)
//! 	.unwrap();
//!
//! assert!(html.contains(r#"id="this-form-rocks""#));
//! assert!(html.contains(r#"<div class="formRow">"#));
//! ```

pub use uniform_forms as forms;
pub use uniform_layout as layout;
pub use uniform_templates as templates;
pub use uniform_urls as urls;

pub use uniform_layout::{UniForm, UniFormError, UniFormResult, UniFormSettings};

pub mod prelude {
	pub use crate::forms::{BooleanField, CharField, Form, FormError, FormSet, Widget};
	pub use crate::layout::{
		Column,
		Container,
		Fieldset,
		FormHelper,
		FormMethod,
		FormStyle,
		HTML,
		Input,
		Layout,
		LayoutItem,
		LayoutObject,
		MultiField,
		Row,
		TagContext,
		UniForm,
		UniFormError,
		UniFormResult,
		UniFormSettings,
	};
	pub use crate::templates::{TemplateEngine, TeraEngine};
	pub use crate::urls::{NoReverse, RouteTable, UrlReverser};
}
