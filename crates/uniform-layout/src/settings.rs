//! Rendering settings
//!
//! Settings can be built in code, read from the environment or parsed from a
//! TOML document:
//!
//! | Key                 | Environment variable          | Default                           |
//! |---------------------|-------------------------------|-----------------------------------|
//! | `fail_silently`     | `UNIFORM_FAIL_SILENTLY`       | `true`                            |
//! | `field_template`    | `UNIFORM_FIELD_TEMPLATE`      | `uni_form/field.html`             |
//! | `multifield_template` | `UNIFORM_MULTIFIELD_TEMPLATE` | `uni_form/multifield.html`      |
//! | `form_template`     | `UNIFORM_FORM_TEMPLATE`       | `uni_form/whole_uni_form.html`    |
//! | `formset_template`  | `UNIFORM_FORMSET_TEMPLATE`    | `uni_form/whole_uni_formset.html` |

use serde::{Deserialize, Serialize};
use std::env;

pub const DEFAULT_FIELD_TEMPLATE: &str = "uni_form/field.html";
pub const DEFAULT_MULTIFIELD_TEMPLATE: &str = "uni_form/multifield.html";
pub const DEFAULT_FORM_TEMPLATE: &str = "uni_form/whole_uni_form.html";
pub const DEFAULT_FORMSET_TEMPLATE: &str = "uni_form/whole_uni_formset.html";
pub const ERRORS_TEMPLATE: &str = "uni_form/errors.html";
pub const FORMSET_ERRORS_TEMPLATE: &str = "uni_form/errors_formset.html";

pub const ENV_FAIL_SILENTLY: &str = "UNIFORM_FAIL_SILENTLY";
pub const ENV_FIELD_TEMPLATE: &str = "UNIFORM_FIELD_TEMPLATE";
pub const ENV_MULTIFIELD_TEMPLATE: &str = "UNIFORM_MULTIFIELD_TEMPLATE";
pub const ENV_FORM_TEMPLATE: &str = "UNIFORM_FORM_TEMPLATE";
pub const ENV_FORMSET_TEMPLATE: &str = "UNIFORM_FORMSET_TEMPLATE";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
	#[error("Failed to parse environment variable '{key}' (length {value_len}): {error}")]
	ParseError {
		key: String,
		value_len: usize,
		error: String,
	},
	#[error("Invalid settings document: {0}")]
	Toml(String),
}

/// Settings controlling how layouts resolve and render fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UniFormSettings {
	/// Degrade unresolved and double-rendered fields to a logged warning
	pub fail_silently: bool,
	pub field_template: String,
	pub multifield_template: String,
	pub form_template: String,
	pub formset_template: String,
}

impl Default for UniFormSettings {
	fn default() -> Self {
		Self {
			fail_silently: true,
			field_template: DEFAULT_FIELD_TEMPLATE.to_string(),
			multifield_template: DEFAULT_MULTIFIELD_TEMPLATE.to_string(),
			form_template: DEFAULT_FORM_TEMPLATE.to_string(),
			formset_template: DEFAULT_FORMSET_TEMPLATE.to_string(),
		}
	}
}

impl UniFormSettings {
	/// Settings that raise on unresolved or double-rendered fields
	pub fn strict() -> Self {
		Self {
			fail_silently: false,
			..Self::default()
		}
	}

	pub fn with_fail_silently(mut self, fail_silently: bool) -> Self {
		self.fail_silently = fail_silently;
		self
	}

	pub fn with_field_template(mut self, template: impl Into<String>) -> Self {
		self.field_template = template.into();
		self
	}

	/// Read settings from `UNIFORM_*` environment variables
	///
	/// Unset variables keep their defaults.
	pub fn from_env() -> Result<Self, SettingsError> {
		Self::from_lookup(|key| env::var(key).ok())
	}

	/// Read settings through an arbitrary variable lookup
	///
	/// # Examples
	///
	/// ```
	/// use uniform_layout::UniFormSettings;
	///
	/// let settings = UniFormSettings::from_lookup(|key| match key {
	///     "UNIFORM_FAIL_SILENTLY" => Some("off".to_string()),
	///     _ => None,
	/// })
	/// .unwrap();
	///
	/// assert!(!settings.fail_silently);
	/// assert_eq!(settings.field_template, "uni_form/field.html");
	/// ```
	pub fn from_lookup<F>(lookup: F) -> Result<Self, SettingsError>
	where
		F: Fn(&str) -> Option<String>,
	{
		let mut settings = Self::default();

		if let Some(value) = lookup(ENV_FAIL_SILENTLY) {
			settings.fail_silently = parse_bool(&value).map_err(|error| SettingsError::ParseError {
				key: ENV_FAIL_SILENTLY.to_string(),
				value_len: value.len(),
				error,
			})?;
		}
		for (key, slot) in [
			(ENV_FIELD_TEMPLATE, &mut settings.field_template),
			(ENV_MULTIFIELD_TEMPLATE, &mut settings.multifield_template),
			(ENV_FORM_TEMPLATE, &mut settings.form_template),
			(ENV_FORMSET_TEMPLATE, &mut settings.formset_template),
		] {
			if let Some(value) = lookup(key)
				&& !value.trim().is_empty()
			{
				*slot = value.trim().to_string();
			}
		}

		tracing::debug!(fail_silently = settings.fail_silently, "Loaded uni_form settings");
		Ok(settings)
	}

	/// Parse settings from a TOML document, missing keys keep their defaults
	///
	/// # Examples
	///
	/// ```
	/// use uniform_layout::UniFormSettings;
	///
	/// let settings = UniFormSettings::from_toml_str("fail_silently = false").unwrap();
	/// assert!(!settings.fail_silently);
	/// ```
	pub fn from_toml_str(source: &str) -> Result<Self, SettingsError> {
		toml::from_str(source).map_err(|e| SettingsError::Toml(e.to_string()))
	}
}

/// Parse a boolean the way environment files spell them
///
/// Accepts `true`/`false`, `1`/`0`, `yes`/`no`, `on`/`off` in any case.
pub fn parse_bool(value: &str) -> Result<bool, String> {
	match value.trim().to_lowercase().as_str() {
		"true" | "1" | "yes" | "on" => Ok(true),
		"false" | "0" | "no" | "off" => Ok(false),
		_ => Err(format!("Invalid boolean value: {}", value)),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serial_test::serial;

	#[rstest]
	#[case("true", true)]
	#[case("YES", true)]
	#[case(" 1 ", true)]
	#[case("On", true)]
	#[case("false", false)]
	#[case("no", false)]
	#[case("0", false)]
	#[case("OFF", false)]
	fn test_parse_bool(#[case] input: &str, #[case] expected: bool) {
		assert_eq!(parse_bool(input), Ok(expected));
	}

	#[rstest]
	fn test_parse_bool_rejects_garbage() {
		assert!(parse_bool("maybe").is_err());
	}

	#[rstest]
	fn test_defaults() {
		let settings = UniFormSettings::default();

		assert!(settings.fail_silently);
		assert_eq!(settings.field_template, DEFAULT_FIELD_TEMPLATE);
		assert_eq!(settings.formset_template, DEFAULT_FORMSET_TEMPLATE);
		assert!(!UniFormSettings::strict().fail_silently);
	}

	#[rstest]
	fn test_toml_partial_document() {
		let settings = UniFormSettings::from_toml_str(
			r#"
			fail_silently = false
			field_template = "custom/field.html"
			"#,
		)
		.unwrap();

		assert!(!settings.fail_silently);
		assert_eq!(settings.field_template, "custom/field.html");
		assert_eq!(settings.multifield_template, DEFAULT_MULTIFIELD_TEMPLATE);
	}

	#[rstest]
	fn test_toml_rejects_wrong_types() {
		let result = UniFormSettings::from_toml_str("fail_silently = \"sometimes\"");

		assert!(matches!(result, Err(SettingsError::Toml(_))));
	}

	#[rstest]
	#[serial(uniform_env)]
	fn test_from_env_reads_variables() {
		// Arrange
		unsafe {
			env::set_var(ENV_FAIL_SILENTLY, "no");
			env::set_var(ENV_FORM_TEMPLATE, "site/form.html");
		}

		// Act
		let settings = UniFormSettings::from_env();

		unsafe {
			env::remove_var(ENV_FAIL_SILENTLY);
			env::remove_var(ENV_FORM_TEMPLATE);
		}

		// Assert
		let settings = settings.unwrap();
		assert!(!settings.fail_silently);
		assert_eq!(settings.form_template, "site/form.html");
		assert_eq!(settings.field_template, DEFAULT_FIELD_TEMPLATE);
	}

	#[rstest]
	#[serial(uniform_env)]
	fn test_from_env_reports_bad_bool() {
		unsafe { env::set_var(ENV_FAIL_SILENTLY, "sometimes") };

		let result = UniFormSettings::from_env();

		unsafe { env::remove_var(ENV_FAIL_SILENTLY) };

		match result {
			Err(SettingsError::ParseError { key, value_len, .. }) => {
				assert_eq!(key, ENV_FAIL_SILENTLY);
				assert_eq!(value_len, "sometimes".len());
			}
			other => panic!("expected parse error, got {:?}", other),
		}
	}
}
