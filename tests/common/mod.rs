//! Shared fixtures for the integration tests

#![allow(dead_code)]

use rstest::fixture;
use serde_json::json;
use std::collections::HashMap;
use uniform::prelude::*;

pub const SIMPLE_ACTION_URL: &str = "/simple/action/";

pub const FIELD_NAMES: [&str; 6] = [
	"is_company",
	"email",
	"password1",
	"password2",
	"first_name",
	"last_name",
];

/// Sign-up form with a password confirmation check
pub fn test_form() -> Form {
	let mut form = Form::new()
		.field(BooleanField::new("is_company").with_label("company"))
		.field(
			CharField::new("email")
				.required()
				.with_label("email")
				.with_max_length(30),
		)
		.field(
			CharField::new("password1")
				.required()
				.with_label("password")
				.with_widget(Widget::PasswordInput),
		)
		.field(
			CharField::new("password2")
				.required()
				.with_label("re-enter password")
				.with_widget(Widget::PasswordInput),
		)
		.field(CharField::new("first_name").required().with_label("first name"))
		.field(CharField::new("last_name").required().with_label("last name"));

	form.add_clean_function(|data| {
		let password1 = data.get("password1").and_then(|v| v.as_str()).unwrap_or("");
		let password2 = data.get("password2").and_then(|v| v.as_str()).unwrap_or("");
		if (password1.is_empty() && password2.is_empty()) || password1 != password2 {
			return Err(FormError::Validation("Passwords dont match".to_string()));
		}
		Ok(())
	});
	form
}

/// [`test_form`] bound to two passwords and validated
pub fn bound_test_form(password1: &str, password2: &str) -> Form {
	let mut form = test_form();
	let mut data = HashMap::new();
	data.insert("password1".to_string(), json!(password1));
	data.insert("password2".to_string(), json!(password2));
	form.bind(data);
	form.is_valid();
	form
}

#[fixture]
pub fn uni_form() -> UniForm {
	let urls = RouteTable::new()
		.with_route("simpleAction", SIMPLE_ACTION_URL)
		.expect("Invalid route pattern");
	UniForm::default().with_urls(urls)
}

#[fixture]
pub fn strict_uni_form() -> UniForm {
	uni_form().with_settings(UniFormSettings::strict())
}

pub const TAG_TEMPLATE: &str = "
	{% load uni_form_tags %}
	{% uni_form form form_helper %}
";
