//! Error types for the console
//!
//! Three families reach the user:
//! - transport errors from the API boundary ([`HttpError`]), carrying the
//!   server's category and code
//! - client-side validation failures ([`ValidationErrors`]) that block a
//!   submission before any request is sent
//! - JSON parse failures on Json-category fields ([`ConsoleError::JsonField`])

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Normalized error from the REST API
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpError {
	/// HTTP status, 0 when the request never reached the server
	#[serde(default)]
	pub status: u16,
	pub message: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub category: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub code: Option<String>,
	/// Client-side failure (timeout, connection reset, undecodable body)
	#[serde(default)]
	pub exception: bool,
}

impl HttpError {
	pub fn new(status: u16, message: impl Into<String>) -> Self {
		Self {
			status,
			message: message.into(),
			..Default::default()
		}
	}

	/// Error raised before a response was received or while decoding it
	pub fn exception(message: impl Into<String>) -> Self {
		Self {
			message: message.into(),
			exception: true,
			..Default::default()
		}
	}

	pub fn with_category(mut self, category: impl Into<String>) -> Self {
		self.category = Some(category.into());
		self
	}

	pub fn with_code(mut self, code: impl Into<String>) -> Self {
		self.code = Some(code.into());
		self
	}

	/// Whether the server tagged this error with `category`
	pub fn is_category(&self, category: &str) -> bool {
		self.category.as_deref() == Some(category)
	}

	/// Whether the server tagged this error with `code`
	pub fn is_code(&self, code: &str) -> bool {
		self.code.as_deref() == Some(code)
	}
}

impl fmt::Display for HttpError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.message)?;
		if let Some(category) = self.category.as_deref().filter(|c| !c.is_empty()) {
			write!(f, " [{}]", category.to_uppercase())?;
		}
		if let Some(code) = self.code.as_deref().filter(|c| !c.is_empty()) {
			write!(f, " [{}]", code)?;
		}
		Ok(())
	}
}

impl std::error::Error for HttpError {}

/// Field-level validation failures, keyed by field name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
	fields: BTreeMap<String, String>,
}

impl ValidationErrors {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
		self.fields.insert(field.into(), message.into());
	}

	pub fn is_empty(&self) -> bool {
		self.fields.is_empty()
	}

	pub fn len(&self) -> usize {
		self.fields.len()
	}

	pub fn get(&self, field: &str) -> Option<&str> {
		self.fields.get(field).map(String::as_str)
	}

	pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
		self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
	}

	/// `Ok(())` when empty, `Err(self)` otherwise
	pub fn into_result(self) -> Result<(), Self> {
		if self.is_empty() { Ok(()) } else { Err(self) }
	}
}

impl fmt::Display for ValidationErrors {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let mut first = true;
		for (field, message) in &self.fields {
			if !first {
				f.write_str("; ")?;
			}
			write!(f, "{}: {}", field, message)?;
			first = false;
		}
		Ok(())
	}
}

impl std::error::Error for ValidationErrors {}

/// Console error type
#[derive(Debug, Error)]
pub enum ConsoleError {
	/// Transport or server error
	#[error("{0}")]
	Http(#[from] HttpError),

	/// Client-side validation failed; nothing was sent
	#[error("Validation error: {0}")]
	Validation(#[from] ValidationErrors),

	/// A Json-category field does not contain valid JSON
	#[error("Invalid JSON in field '{field}': {message}")]
	JsonField { field: String, message: String },

	/// The schema of the model has not been loaded yet
	#[error("Schema for model '{0}' is not loaded")]
	NoSchema(String),

	/// Form rules derived for one model were applied to another
	#[error("Form rules were derived for model '{expected}', not '{actual}'")]
	StaleValidator { expected: String, actual: String },

	/// The same action is already running
	#[error("{0} is already in progress")]
	Busy(String),

	/// Preference storage failure
	#[error("Storage error: {0}")]
	Storage(String),

	/// Invalid user input outside of a schema-driven form
	#[error("Invalid input: {0}")]
	InvalidInput(String),
}

impl ConsoleError {
	/// The wrapped API error, if any
	pub fn as_http(&self) -> Option<&HttpError> {
		match self {
			ConsoleError::Http(err) => Some(err),
			_ => None,
		}
	}
}

/// Result type for console operations
pub type ConsoleResult<T> = Result<T, ConsoleError>;
