//! # uniform layout
//!
//! Declarative form layouts: compose fieldsets, rows, columns, multi-fields
//! and raw HTML around form fields, attach the layout to a [`FormHelper`]
//! together with form-level attributes, and render everything through the
//! `uni_form` template tag.
//!
//! ## Modules
//!
//! - [`layout`]: layout objects and their markup
//! - [`field`]: field resolution and the per-render [`RenderPass`]
//! - [`helper`]: [`FormHelper`] and its attribute projection
//! - [`input`]: submit, reset, hidden and button inputs
//! - [`templatetags`]: the `uni_form` tag and template rendering
//! - [`filters`]: `as_uni_form` / `as_uni_errors`
//! - [`settings`]: fail-silently switch and template names
//!
//! ## Example
//!
//! ```rust
//! use uniform_forms::{CharField, Form};
//! use uniform_layout::{
//!     Fieldset, FormHelper, HTML, Input, Layout, LayoutItem, Row, TagContext, UniForm,
//! };
//!
//! let form = Form::new()
//!     .field(CharField::new("email").required())
//!     .field(CharField::new("password1"))
//!     .field(CharField::new("password2"));
//!
//! let mut helper = FormHelper::new();
//! helper.add_input(Input::submit("save", "Save"));
//! helper.add_layout(
//!     Layout::new([Fieldset::new(
//!         "Account",
//!         [
//!             LayoutItem::from("email"),
//!             Row::new(["password1", "password2"]).unwrap().into(),
//!             HTML::new("<hr/>").into(),
//!         ],
//!     )
//!     .unwrap()])
//!     .unwrap(),
//! );
//!
//! let context = TagContext::new().with("form", form).with("helper", helper);
//! let html = UniForm::default().render_tag("uni_form form helper", &context).unwrap();
//!
//! assert!(html.contains("<legend>Account</legend>"));
//! assert!(html.contains(r#"<div class="formRow">"#));
//! assert!(html.contains(r#"id="submit-id-save""#));
//! ```

pub mod error;
pub mod field;
pub mod field_name;
pub mod filters;
pub mod helper;
pub mod input;
pub mod layout;
pub mod settings;
pub mod templatetags;
pub mod uni_form;

pub use error::{UniFormError, UniFormResult};
pub use field::{FormContext, RenderContext, RenderPass, render_field, render_field_with};
pub use field_name::FieldName;
pub use filters::{as_uni_errors, as_uni_form, as_uni_formset, as_uni_formset_errors};
pub use helper::{FormHelper, FormMethod, FormStyle, HelperAttributes};
pub use input::{Input, InputType};
pub use layout::{Column, Container, Fieldset, HTML, Layout, LayoutItem, LayoutObject, MultiField, Row};
pub use settings::{SettingsError, UniFormSettings};
pub use templatetags::{ContextValue, TagContext, UniFormNode, get_response_dict, render_template};
pub use uni_form::UniForm;
