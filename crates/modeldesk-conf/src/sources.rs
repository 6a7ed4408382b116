//! Configuration sources for the layered settings
//!
//! Sources are merged in priority order (environment variables > TOML file >
//! defaults). Each one yields a flat map of top-level keys.

use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Flat key/value map produced by a source
pub type SourceMap = Map<String, Value>;

/// Trait for configuration sources
pub trait ConfigSource: Send + Sync {
	/// Load configuration from this source
	fn load(&self) -> Result<SourceMap, SourceError>;

	/// Priority of this source (higher wins)
	fn priority(&self) -> u8;

	fn description(&self) -> String;
}

/// Error type for configuration sources
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
	#[error("Failed to read {path}: {source}")]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("TOML error: {0}")]
	Toml(#[from] toml::de::Error),

	#[error("JSON error: {0}")]
	Json(#[from] serde_json::Error),

	#[error("Parse error: {0}")]
	Parse(String),
}

/// Environment variable configuration source
///
/// Only variables starting with the prefix are read; the prefix is stripped
/// and the rest lowercased, so `MODELDESK_API_BASE_URL` becomes
/// `api_base_url`. Values stay strings; empty ones are skipped.
pub struct EnvSource {
	prefix: String,
	vars: Option<HashMap<String, String>>,
}

impl EnvSource {
	/// Read the process environment
	///
	/// # Examples
	///
	/// ```
	/// use modeldesk_conf::EnvSource;
	///
	/// let source = EnvSource::new().with_prefix("APP_");
	/// ```
	pub fn new() -> Self {
		Self {
			prefix: crate::settings::ENV_PREFIX.to_string(),
			vars: None,
		}
	}

	/// Read a fixed set of variables instead of the process environment
	pub fn from_vars(vars: HashMap<String, String>) -> Self {
		Self {
			vars: Some(vars),
			..Self::new()
		}
	}

	pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
		self.prefix = prefix.into();
		self
	}

	fn collect(&self) -> Vec<(String, String)> {
		match &self.vars {
			Some(vars) => vars.iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
			None => std::env::vars().collect(),
		}
	}
}

impl Default for EnvSource {
	fn default() -> Self {
		Self::new()
	}
}

impl ConfigSource for EnvSource {
	fn load(&self) -> Result<SourceMap, SourceError> {
		let mut config = SourceMap::new();

		for (key, value) in self.collect() {
			let Some(clean_key) = key.strip_prefix(&self.prefix) else {
				continue;
			};
			if clean_key.is_empty() || value.trim().is_empty() {
				continue;
			}
			config.insert(clean_key.to_lowercase(), Value::String(value.trim().to_string()));
		}

		Ok(config)
	}

	fn priority(&self) -> u8 {
		100
	}

	fn description(&self) -> String {
		format!("Environment variables (prefix: {})", self.prefix)
	}
}

/// TOML file configuration source
pub struct TomlFileSource {
	path: PathBuf,
	required: bool,
}

impl TomlFileSource {
	/// An optional file: a missing path yields no values
	///
	/// # Examples
	///
	/// ```
	/// use modeldesk_conf::TomlFileSource;
	///
	/// let source = TomlFileSource::new("modeldesk.toml");
	/// ```
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self {
			path: path.into(),
			required: false,
		}
	}

	/// A file that must exist
	pub fn required(path: impl Into<PathBuf>) -> Self {
		Self {
			path: path.into(),
			required: true,
		}
	}

	pub fn path(&self) -> &Path {
		&self.path
	}
}

impl ConfigSource for TomlFileSource {
	fn load(&self) -> Result<SourceMap, SourceError> {
		if !self.required && !self.path.exists() {
			tracing::debug!(path = %self.path.display(), "settings file not found, skipped");
			return Ok(SourceMap::new());
		}

		let content = fs::read_to_string(&self.path).map_err(|source| SourceError::Io {
			path: self.path.clone(),
			source,
		})?;
		let toml_value: toml::Value = toml::from_str(&content)?;

		match serde_json::to_value(toml_value)? {
			Value::Object(map) => Ok(map),
			_ => Err(SourceError::Parse("Expected a table at root".to_string())),
		}
	}

	fn priority(&self) -> u8 {
		50
	}

	fn description(&self) -> String {
		format!("TOML file: {}", self.path.display())
	}
}

/// Default values configuration source
#[derive(Default)]
pub struct DefaultSource {
	values: SourceMap,
}

impl DefaultSource {
	pub fn new() -> Self {
		Self::default()
	}

	/// Defaults taken from a serializable value, usually `T::default()`
	pub fn from_serialize<T: serde::Serialize>(value: &T) -> Result<Self, SourceError> {
		match serde_json::to_value(value)? {
			Value::Object(values) => Ok(Self { values }),
			_ => Err(SourceError::Parse("Defaults must serialize to a map".to_string())),
		}
	}

	pub fn with_value(mut self, key: impl Into<String>, value: Value) -> Self {
		self.values.insert(key.into(), value);
		self
	}
}

impl ConfigSource for DefaultSource {
	fn load(&self) -> Result<SourceMap, SourceError> {
		Ok(self.values.clone())
	}

	fn priority(&self) -> u8 {
		0
	}

	fn description(&self) -> String {
		"Default values".to_string()
	}
}
