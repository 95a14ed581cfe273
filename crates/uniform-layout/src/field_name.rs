use crate::error::{UniFormError, UniFormResult};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// A validated reference to a form field
///
/// Names are non-empty and limited to ASCII letters, digits, `_` and `-`, so a
/// layout can never carry a reference that could not name a form field.
///
/// # Examples
///
/// ```
/// use uniform_layout::FieldName;
///
/// let name = FieldName::new("first_name").unwrap();
/// assert_eq!(name.as_str(), "first_name");
///
/// assert!(FieldName::new("españa").is_err());
/// assert!(FieldName::new("").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct FieldName(String);

impl FieldName {
	pub fn new(name: impl Into<String>) -> UniFormResult<Self> {
		let name = name.into();
		if is_valid_field_name(&name) {
			Ok(Self(name))
		} else {
			Err(UniFormError::InvalidFieldName(name))
		}
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}

	pub fn into_string(self) -> String {
		self.0
	}
}

pub fn is_valid_field_name(name: &str) -> bool {
	!name.is_empty()
		&& name
			.chars()
			.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

impl FromStr for FieldName {
	type Err = UniFormError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::new(s)
	}
}

impl TryFrom<&str> for FieldName {
	type Error = UniFormError;

	fn try_from(value: &str) -> Result<Self, Self::Error> {
		Self::new(value)
	}
}

impl TryFrom<String> for FieldName {
	type Error = UniFormError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		Self::new(value)
	}
}

impl AsRef<str> for FieldName {
	fn as_ref(&self) -> &str {
		&self.0
	}
}

impl PartialEq<str> for FieldName {
	fn eq(&self, other: &str) -> bool {
		self.0 == other
	}
}

impl PartialEq<&str> for FieldName {
	fn eq(&self, other: &&str) -> bool {
		self.0 == *other
	}
}

impl fmt::Display for FieldName {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case("email")]
	#[case("password1")]
	#[case("form-0-title")]
	#[case("_private")]
	fn test_accepts_identifiers(#[case] name: &str) {
		assert_eq!(FieldName::new(name).unwrap(), name);
	}

	#[rstest]
	#[case("")]
	#[case("españa")]
	#[case("first name")]
	#[case("a.b")]
	fn test_rejects_other_names(#[case] name: &str) {
		let err = FieldName::new(name).unwrap_err();

		assert!(matches!(err, UniFormError::InvalidFieldName(n) if n == name));
	}
}
