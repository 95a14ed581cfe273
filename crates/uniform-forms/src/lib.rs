//! Form abstraction used by uniform
//!
//! This crate provides the pieces of a host form framework that the layout
//! layer renders against:
//! - Ordered field mapping with bound data and validation errors
//! - Bound fields exposing value, errors, help text and widget markup
//! - Widgets rendering escaped HTML inputs
//! - Formsets with a management form

pub mod bound_field;
pub mod field;
pub mod fields;
pub mod form;
pub mod formset;

pub use bound_field::{BoundField, BoundFieldContext};
pub use field::{FieldError, FieldResult, FormField, Widget};
pub use fields::{BooleanField, CharField};
pub use form::{ALL_FIELDS_KEY, Form, FormError, FormResult};
pub use formset::FormSet;
