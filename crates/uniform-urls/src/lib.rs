//! # uniform urls
//!
//! URL reverse resolution for form actions.
//!
//! A form helper's action may name a route instead of spelling out a path.
//! The [`UrlReverser`] trait is the lookup seam; [`RouteTable`] is a simple
//! registry of named path patterns (`/users/{id}/`) that implements it.
//!
//! ## Example
//!
//! ```rust
//! use uniform_urls::{RouteTable, UrlReverser};
//!
//! let mut routes = RouteTable::new();
//! routes.register("simpleAction", "/simple/action/").unwrap();
//! routes.register("users:detail", "/users/{id}/").unwrap();
//!
//! assert_eq!(routes.reverse("simpleAction"), Some("/simple/action/".to_string()));
//! assert_eq!(routes.reverse_with("users:detail", &[("id", "7")]).unwrap(), "/users/7/");
//! assert_eq!(routes.reverse("missing"), None);
//! ```

use indexmap::IndexMap;
use std::collections::HashMap;

/// Errors raised while registering or reversing routes
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReverseError {
	#[error("Reverse for '{0}' not found")]
	NotFound(String),
	#[error("Missing parameter '{param}' reversing '{name}'")]
	MissingParam { name: String, param: String },
	#[error("Invalid parameter '{0}': contains dangerous characters")]
	InvalidParam(String),
	#[error("Invalid route pattern '{0}'")]
	InvalidPattern(String),
}

pub type ReverseResult<T> = Result<T, ReverseError>;

/// Resolves a route name to a URL path
pub trait UrlReverser: Send + Sync {
	/// Reverse a parameterless route, `None` when the name is unknown
	fn reverse(&self, name: &str) -> Option<String>;
}

/// Reverser that knows no routes, so every action is used literally
#[derive(Debug, Clone, Copy, Default)]
pub struct NoReverse;

impl UrlReverser for NoReverse {
	fn reverse(&self, _name: &str) -> Option<String> {
		None
	}
}

/// Extract parameter names from a URL pattern
///
/// # Examples
///
/// ```
/// use uniform_urls::extract_param_names;
///
/// let names = extract_param_names("/users/{id}/posts/{post_id}/");
/// assert_eq!(names, vec!["id", "post_id"]);
/// ```
pub fn extract_param_names(pattern: &str) -> Vec<String> {
	let mut names = Vec::new();
	let mut chars = pattern.chars();

	while let Some(ch) = chars.next() {
		if ch == '{' {
			let name: String = chars.by_ref().take_while(|&c| c != '}').collect();
			if !name.is_empty() {
				names.push(name);
			}
		}
	}

	names
}

/// Single-pass placeholder substitution
///
/// Placeholders without a value are kept as is.
///
/// # Examples
///
/// ```
/// use std::collections::HashMap;
/// use uniform_urls::reverse_single_pass;
///
/// let mut params = HashMap::new();
/// params.insert("id".to_string(), "123".to_string());
///
/// assert_eq!(reverse_single_pass("/users/{id}/{tab}/", &params), "/users/123/{tab}/");
/// ```
pub fn reverse_single_pass(pattern: &str, params: &HashMap<String, String>) -> String {
	let mut result = String::with_capacity(pattern.len());
	let mut chars = pattern.chars();

	while let Some(ch) = chars.next() {
		if ch == '{' {
			let param_name: String = chars.by_ref().take_while(|&c| c != '}').collect();
			match params.get(&param_name) {
				Some(value) => result.push_str(value),
				None => {
					result.push('{');
					result.push_str(&param_name);
					result.push('}');
				}
			}
		} else {
			result.push(ch);
		}
	}

	result
}

/// Reject values that would change the shape of the reversed path
fn is_safe_param(value: &str) -> bool {
	!value.is_empty()
		&& !value.contains("..")
		&& !value.chars().any(|c| matches!(c, '/' | '\\' | '?' | '#' | '%'))
}

fn is_valid_pattern(pattern: &str) -> bool {
	let mut depth = 0usize;
	for c in pattern.chars() {
		match c {
			'{' if depth == 0 => depth = 1,
			'}' if depth == 1 => depth = 0,
			'{' | '}' => return false,
			_ => {}
		}
	}
	depth == 0
}

/// Registry of named path patterns
///
/// Names may carry a namespace (`"users:detail"`); the full name is the key.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
	routes: IndexMap<String, String>,
}

impl RouteTable {
	pub fn new() -> Self {
		Self::default()
	}

	/// Register a route pattern under a name, replacing any previous pattern
	pub fn register(&mut self, name: impl Into<String>, pattern: impl Into<String>) -> ReverseResult<()> {
		let pattern = pattern.into();
		if !is_valid_pattern(&pattern) {
			return Err(ReverseError::InvalidPattern(pattern));
		}
		let name = name.into();
		tracing::debug!(route = %name, pattern = %pattern, "Registered route");
		self.routes.insert(name, pattern);
		Ok(())
	}

	/// Builder-style [`register`](Self::register)
	pub fn with_route(mut self, name: impl Into<String>, pattern: impl Into<String>) -> ReverseResult<Self> {
		self.register(name, pattern)?;
		Ok(self)
	}

	/// Reverse a route name to a path, substituting every parameter
	pub fn reverse_with<S: AsRef<str>>(&self, name: &str, params: &[(S, S)]) -> ReverseResult<String> {
		let pattern = self
			.routes
			.get(name)
			.ok_or_else(|| ReverseError::NotFound(name.to_string()))?;

		let params: HashMap<String, String> = params
			.iter()
			.map(|(k, v)| (k.as_ref().to_string(), v.as_ref().to_string()))
			.collect();

		for param in extract_param_names(pattern) {
			match params.get(&param) {
				None => {
					return Err(ReverseError::MissingParam {
						name: name.to_string(),
						param,
					});
				}
				Some(value) if !is_safe_param(value) => {
					return Err(ReverseError::InvalidParam(param));
				}
				Some(_) => {}
			}
		}

		Ok(reverse_single_pass(pattern, &params))
	}

	pub fn has_route(&self, name: &str) -> bool {
		self.routes.contains_key(name)
	}

	/// Registered names in registration order
	pub fn route_names(&self) -> impl Iterator<Item = &str> {
		self.routes.keys().map(String::as_str)
	}

	pub fn len(&self) -> usize {
		self.routes.len()
	}

	pub fn is_empty(&self) -> bool {
		self.routes.is_empty()
	}
}

impl UrlReverser for RouteTable {
	fn reverse(&self, name: &str) -> Option<String> {
		self.reverse_with::<&str>(name, &[]).ok()
	}
}

impl<T: UrlReverser + ?Sized> UrlReverser for &T {
	fn reverse(&self, name: &str) -> Option<String> {
		(**self).reverse(name)
	}
}

impl<T: UrlReverser + ?Sized> UrlReverser for std::sync::Arc<T> {
	fn reverse(&self, name: &str) -> Option<String> {
		(**self).reverse(name)
	}
}
