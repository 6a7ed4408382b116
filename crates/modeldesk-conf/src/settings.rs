//! Console settings and their layered loader

use crate::sources::{ConfigSource, DefaultSource, EnvSource, SourceError, SourceMap, TomlFileSource};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

/// Prefix of the environment variables read by [`ConsoleSettings::load`]
pub const ENV_PREFIX: &str = "MODELDESK_";

pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:7001/api";

pub const DEFAULT_LOG_FILTER: &str = "info";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

const DEFAULT_PAGE_SIZE: u64 = 10;

/// Errors raised while loading settings
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
	#[error("{description}: {source}")]
	Source {
		description: String,
		#[source]
		source: SourceError,
	},

	#[error("Invalid settings: {0}")]
	Deserialize(#[from] serde_json::Error),

	#[error("Invalid setting `{field}`: {message}")]
	Invalid { field: &'static str, message: String },
}

/// Runtime settings of the console
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleSettings {
	/// Base URL every API path is appended to
	pub api_base_url: String,

	pub request_timeout_secs: u64,

	/// Directory of file-backed view preferences; in-memory when unset
	pub preferences_dir: Option<PathBuf>,

	/// Page size used when a model has no stored preference
	pub default_page_size: u64,

	pub captcha_theme: Option<String>,

	/// `tracing-subscriber` filter directive
	pub log_filter: String,
}

impl Default for ConsoleSettings {
	fn default() -> Self {
		Self {
			api_base_url: DEFAULT_API_BASE_URL.to_string(),
			request_timeout_secs: DEFAULT_TIMEOUT_SECS,
			preferences_dir: None,
			default_page_size: DEFAULT_PAGE_SIZE,
			captcha_theme: None,
			log_filter: DEFAULT_LOG_FILTER.to_string(),
		}
	}
}

impl ConsoleSettings {
	/// Defaults, then `path` if it exists, then the process environment
	///
	/// # Examples
	///
	/// ```no_run
	/// use modeldesk_conf::ConsoleSettings;
	///
	/// let settings = ConsoleSettings::load(Some("modeldesk.toml".as_ref())).unwrap();
	/// println!("{}", settings.api_base_url);
	/// ```
	pub fn load(path: Option<&Path>) -> Result<Self, SettingsError> {
		let mut builder = SettingsBuilder::new();
		if let Some(path) = path {
			builder = builder.add_source(TomlFileSource::new(path));
		}
		builder.add_source(EnvSource::new()).build()
	}

	pub fn request_timeout(&self) -> Duration {
		Duration::from_secs(self.request_timeout_secs)
	}

	/// Checks the invariants the loader cannot express in types
	pub fn validate(&self) -> Result<(), SettingsError> {
		let url = Url::parse(&self.api_base_url).map_err(|e| SettingsError::Invalid {
			field: "api_base_url",
			message: e.to_string(),
		})?;
		if !matches!(url.scheme(), "http" | "https") {
			return Err(SettingsError::Invalid {
				field: "api_base_url",
				message: format!("unsupported scheme `{}`", url.scheme()),
			});
		}
		if self.request_timeout_secs == 0 {
			return Err(SettingsError::Invalid {
				field: "request_timeout_secs",
				message: "must be greater than zero".to_string(),
			});
		}
		if self.default_page_size == 0 {
			return Err(SettingsError::Invalid {
				field: "default_page_size",
				message: "must be greater than zero".to_string(),
			});
		}
		Ok(())
	}
}

/// Merges sources by priority into [`ConsoleSettings`]
///
/// The built-in defaults are always the lowest layer.
pub struct SettingsBuilder {
	sources: Vec<Box<dyn ConfigSource>>,
}

impl SettingsBuilder {
	pub fn new() -> Self {
		Self {
			sources: Vec::new(),
		}
	}

	pub fn add_source<S: ConfigSource + 'static>(mut self, source: S) -> Self {
		self.sources.push(Box::new(source));
		self
	}

	fn load_source(source: &dyn ConfigSource) -> Result<SourceMap, SettingsError> {
		source.load().map_err(|source_error| SettingsError::Source {
			description: source.description(),
			source: source_error,
		})
	}

	pub fn build(mut self) -> Result<ConsoleSettings, SettingsError> {
		let shape = match serde_json::to_value(ConsoleSettings::default())? {
			serde_json::Value::Object(map) => map,
			_ => SourceMap::new(),
		};
		let defaults = DefaultSource::from_serialize(&ConsoleSettings::default()).map_err(|source| {
			SettingsError::Source {
				description: "Default values".to_string(),
				source,
			}
		})?;
		self.sources.push(Box::new(defaults));
		// Stable sort keeps insertion order among equal priorities
		self.sources.sort_by_key(|s| s.priority());

		let mut merged = SourceMap::new();
		for source in &self.sources {
			let values = Self::load_source(source.as_ref())?;
			tracing::debug!(source = %source.description(), keys = values.len(), "settings source loaded");
			merged.extend(values);
		}
		type_like_defaults(&mut merged, &shape);

		let settings: ConsoleSettings = serde_json::from_value(serde_json::Value::Object(merged))?;
		settings.validate()?;
		Ok(settings)
	}
}

/// Parses text values of numeric and boolean settings
///
/// Environment values arrive as strings; a value is typed only when the
/// setting's default is a number or a flag, so text settings keep values
/// such as `"1"` or `"true"`. Unparseable text is left for deserialization
/// to reject.
fn type_like_defaults(merged: &mut SourceMap, shape: &SourceMap) {
	for (key, value) in merged.iter_mut() {
		let serde_json::Value::String(raw) = value else {
			continue;
		};
		let raw = raw.trim();
		let typed = match shape.get(key) {
			Some(serde_json::Value::Number(_)) => raw.parse::<u64>().ok().map(serde_json::Value::from),
			Some(serde_json::Value::Bool(_)) => raw.parse::<bool>().ok().map(serde_json::Value::Bool),
			_ => None,
		};
		if let Some(typed) = typed {
			*value = typed;
		}
	}
}

impl Default for SettingsBuilder {
	fn default() -> Self {
		Self::new()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use std::collections::HashMap;
	use tempfile::TempDir;

	fn env(pairs: &[(&str, &str)]) -> EnvSource {
		EnvSource::from_vars(
			pairs
				.iter()
				.map(|(k, v)| (k.to_string(), v.to_string()))
				.collect::<HashMap<_, _>>(),
		)
	}

	#[rstest]
	fn test_defaults_without_sources() {
		let settings = SettingsBuilder::new().build().unwrap();

		assert_eq!(settings, ConsoleSettings::default());
		assert_eq!(settings.api_base_url, "http://127.0.0.1:7001/api");
		assert_eq!(settings.request_timeout(), Duration::from_secs(30));
		assert_eq!(settings.default_page_size, 10);
		assert_eq!(settings.log_filter, "info");
		assert!(settings.preferences_dir.is_none());
	}

	#[rstest]
	fn test_env_overrides_file_overrides_defaults() {
		// Arrange
		let temp_dir = TempDir::new().unwrap();
		let path = temp_dir.path().join("modeldesk.toml");
		std::fs::write(
			&path,
			r#"
api_base_url = "https://file.example.com/api"
default_page_size = 50
captcha_theme = "dark"
"#,
		)
		.unwrap();

		// Act
		let settings = SettingsBuilder::new()
			.add_source(env(&[("MODELDESK_DEFAULT_PAGE_SIZE", "20")]))
			.add_source(TomlFileSource::new(&path))
			.build()
			.unwrap();

		// Assert
		assert_eq!(settings.api_base_url, "https://file.example.com/api");
		assert_eq!(settings.default_page_size, 20);
		assert_eq!(settings.captcha_theme.as_deref(), Some("dark"));
		assert_eq!(settings.request_timeout_secs, 30);
	}

	#[rstest]
	#[case("MODELDESK_API_BASE_URL", "ftp://files.example.com", "api_base_url")]
	#[case("MODELDESK_API_BASE_URL", "not a url", "api_base_url")]
	#[case("MODELDESK_REQUEST_TIMEOUT_SECS", "0", "request_timeout_secs")]
	#[case("MODELDESK_DEFAULT_PAGE_SIZE", "0", "default_page_size")]
	fn test_invalid_values_are_rejected(
		#[case] key: &str,
		#[case] value: &str,
		#[case] expected_field: &str,
	) {
		let result = SettingsBuilder::new().add_source(env(&[(key, value)])).build();

		match result {
			Err(SettingsError::Invalid { field, .. }) => assert_eq!(field, expected_field),
			other => panic!("expected invalid setting, got {:?}", other),
		}
	}

	#[rstest]
	fn test_wrongly_typed_value_is_a_deserialize_error() {
		let result = SettingsBuilder::new()
			.add_source(env(&[("MODELDESK_DEFAULT_PAGE_SIZE", "many")]))
			.build();

		assert!(matches!(result, Err(SettingsError::Deserialize(_))));
	}

	#[rstest]
	#[case("1")]
	#[case("true")]
	#[case("dark")]
	fn test_text_setting_keeps_numeric_looking_env_value(#[case] theme: &str) {
		let settings = SettingsBuilder::new()
			.add_source(env(&[
				("MODELDESK_CAPTCHA_THEME", theme),
				("MODELDESK_LOG_FILTER", "1"),
			]))
			.build()
			.unwrap();

		assert_eq!(settings.captcha_theme.as_deref(), Some(theme));
		assert_eq!(settings.log_filter, "1");
	}

	#[rstest]
	fn test_preferences_dir_from_env() {
		let settings = SettingsBuilder::new()
			.add_source(env(&[("MODELDESK_PREFERENCES_DIR", "/var/lib/modeldesk")]))
			.build()
			.unwrap();

		assert_eq!(
			settings.preferences_dir,
			Some(PathBuf::from("/var/lib/modeldesk"))
		);
	}
}
