//! Per-model view preferences
//!
//! Page size, hidden columns and default ordering are remembered per model
//! under the key `"<model>-view-options"`. Reads never fail: an absent or
//! unreadable entry yields [`ModelViewOptions::default`]. Writes go through
//! immediately and the last write wins.

use modeldesk_types::ConsoleError;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

/// Page size used when nothing else is configured
pub const DEFAULT_PAGE_SIZE: u64 = 10;

/// Key of the remembered application selection
pub const SELECTED_APP_KEY: &str = "selected-app";

fn default_limit() -> u64 {
	DEFAULT_PAGE_SIZE
}

/// Remembered list preferences of one model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelViewOptions {
	#[serde(default = "default_limit")]
	pub limit: u64,
	#[serde(default, rename = "hiddenColumns")]
	pub hidden_columns: Vec<String>,
	/// Default ordering, empty for none
	#[serde(default)]
	pub order_by: String,
}

impl Default for ModelViewOptions {
	fn default() -> Self {
		Self {
			limit: DEFAULT_PAGE_SIZE,
			hidden_columns: Vec::new(),
			order_by: String::new(),
		}
	}
}

impl ModelViewOptions {
	pub fn is_hidden(&self, column: &str) -> bool {
		self.hidden_columns.iter().any(|c| c == column)
	}
}

/// Storage key of a model's preferences
pub fn view_options_key(model: &str) -> String {
	format!("{}-view-options", model)
}

/// Preference storage errors
#[derive(Debug, Error)]
pub enum PreferenceError {
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),

	#[error("Serialization error: {0}")]
	Serialization(#[from] serde_json::Error),
}

impl From<PreferenceError> for ConsoleError {
	fn from(err: PreferenceError) -> Self {
		ConsoleError::Storage(err.to_string())
	}
}

/// Key/value storage for serialized preferences
pub trait PreferenceBackend: Send + Sync {
	/// Raw stored value, `None` when absent
	fn read(&self, key: &str) -> Result<Option<String>, PreferenceError>;

	/// Overwrite the value stored under `key`
	fn write(&self, key: &str, value: &str) -> Result<(), PreferenceError>;

	/// Remove `key`; removing an absent key is not an error
	fn remove(&self, key: &str) -> Result<(), PreferenceError>;
}

/// Process-local preference storage
#[derive(Debug, Default)]
pub struct MemoryPreferences {
	entries: RwLock<HashMap<String, String>>,
}

impl MemoryPreferences {
	/// Create an empty store
	///
	/// # Examples
	///
	/// ```
	/// use modeldesk_core::view_options::{MemoryPreferences, PreferenceBackend};
	///
	/// let prefs = MemoryPreferences::new();
	/// prefs.write("selected-app", "\"billing\"").unwrap();
	/// assert_eq!(prefs.read("selected-app").unwrap().as_deref(), Some("\"billing\""));
	/// ```
	pub fn new() -> Self {
		Self::default()
	}
}

impl PreferenceBackend for MemoryPreferences {
	fn read(&self, key: &str) -> Result<Option<String>, PreferenceError> {
		Ok(self.entries.read().get(key).cloned())
	}

	fn write(&self, key: &str, value: &str) -> Result<(), PreferenceError> {
		self.entries.write().insert(key.to_string(), value.to_string());
		Ok(())
	}

	fn remove(&self, key: &str) -> Result<(), PreferenceError> {
		self.entries.write().remove(key);
		Ok(())
	}
}

/// Preference storage with one JSON file per key
#[derive(Debug, Clone)]
pub struct FilePreferences {
	dir: PathBuf,
}

impl FilePreferences {
	/// Store preferences under `dir`, created on first write
	pub fn new(dir: impl Into<PathBuf>) -> Self {
		Self { dir: dir.into() }
	}

	pub fn dir(&self) -> &Path {
		&self.dir
	}

	/// File backing `key`
	///
	/// Bytes outside `[A-Za-z0-9_-]` are percent-encoded, so distinct keys
	/// never share a file and no key escapes `dir`.
	pub fn path_for(&self, key: &str) -> PathBuf {
		let mut name = String::with_capacity(key.len());
		for byte in key.bytes() {
			if byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'_') {
				name.push(char::from(byte));
			} else {
				name.push_str(&format!("%{:02X}", byte));
			}
		}
		self.dir.join(format!("{}.json", name))
	}
}

impl PreferenceBackend for FilePreferences {
	fn read(&self, key: &str) -> Result<Option<String>, PreferenceError> {
		match std::fs::read_to_string(self.path_for(key)) {
			Ok(content) => Ok(Some(content)),
			Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
			Err(err) => Err(err.into()),
		}
	}

	fn write(&self, key: &str, value: &str) -> Result<(), PreferenceError> {
		std::fs::create_dir_all(&self.dir)?;
		std::fs::write(self.path_for(key), value)?;
		Ok(())
	}

	fn remove(&self, key: &str) -> Result<(), PreferenceError> {
		match std::fs::remove_file(self.path_for(key)) {
			Err(err) if err.kind() != std::io::ErrorKind::NotFound => Err(err.into()),
			_ => Ok(()),
		}
	}
}

/// Typed access to per-model view preferences
#[derive(Clone)]
pub struct ViewOptionStore {
	backend: Arc<dyn PreferenceBackend>,
	default_limit: u64,
}

impl ViewOptionStore {
	pub fn new(backend: Arc<dyn PreferenceBackend>) -> Self {
		Self {
			backend,
			default_limit: DEFAULT_PAGE_SIZE,
		}
	}

	/// Store backed by [`MemoryPreferences`]
	pub fn in_memory() -> Self {
		Self::new(Arc::new(MemoryPreferences::new()))
	}

	/// Page size for models without a stored preference
	pub fn with_default_limit(mut self, limit: u64) -> Self {
		self.default_limit = limit.max(1);
		self
	}

	fn defaults(&self) -> ModelViewOptions {
		ModelViewOptions {
			limit: self.default_limit,
			..Default::default()
		}
	}

	/// Preferences of `model`, or the defaults when absent or malformed
	pub fn get(&self, model: &str) -> ModelViewOptions {
		let key = view_options_key(model);
		let raw = match self.backend.read(&key) {
			Ok(Some(raw)) => raw,
			Ok(None) => return self.defaults(),
			Err(err) => {
				tracing::warn!(key = %key, error = %err, "failed to read view options, using defaults");
				return self.defaults();
			}
		};
		match serde_json::from_str::<ModelViewOptions>(&raw) {
			Ok(mut options) => {
				if options.limit == 0 {
					options.limit = self.default_limit;
				}
				options
			}
			Err(err) => {
				tracing::warn!(key = %key, error = %err, "malformed view options, using defaults");
				self.defaults()
			}
		}
	}

	/// Overwrite the preferences of `model`
	pub fn set(&self, model: &str, options: &ModelViewOptions) -> Result<(), PreferenceError> {
		let raw = serde_json::to_string(options)?;
		self.backend.write(&view_options_key(model), &raw)
	}

	/// Flip the visibility of `column` and persist the result
	pub fn toggle_column(&self, model: &str, column: &str) -> Result<ModelViewOptions, PreferenceError> {
		let mut options = self.get(model);
		if options.is_hidden(column) {
			options.hidden_columns.retain(|c| c != column);
		} else {
			options.hidden_columns.push(column.to_string());
		}
		self.set(model, &options)?;
		Ok(options)
	}

	/// Persist a new page size
	pub fn set_limit(&self, model: &str, limit: u64) -> Result<ModelViewOptions, PreferenceError> {
		let mut options = self.get(model);
		options.limit = limit.max(1);
		self.set(model, &options)?;
		Ok(options)
	}

	/// Remembered application selection
	pub fn selected_app(&self) -> Option<String> {
		let raw = match self.backend.read(SELECTED_APP_KEY) {
			Ok(raw) => raw?,
			Err(err) => {
				tracing::warn!(error = %err, "failed to read selected app");
				return None;
			}
		};
		match serde_json::from_str::<String>(&raw) {
			Ok(app) if !app.is_empty() => Some(app),
			Ok(_) => None,
			Err(err) => {
				tracing::warn!(error = %err, "malformed selected app, ignoring");
				None
			}
		}
	}

	pub fn set_selected_app(&self, app: &str) -> Result<(), PreferenceError> {
		let raw = serde_json::to_string(app)?;
		self.backend.write(SELECTED_APP_KEY, &raw)
	}
}

impl std::fmt::Debug for ViewOptionStore {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ViewOptionStore")
			.field("default_limit", &self.default_limit)
			.finish_non_exhaustive()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_absent_options_are_defaults() {
		let store = ViewOptionStore::in_memory();

		assert_eq!(store.get("user"), ModelViewOptions::default());
	}

	#[rstest]
	fn test_set_then_get_is_per_model() {
		// Arrange
		let store = ViewOptionStore::in_memory();
		let options = ModelViewOptions {
			limit: 50,
			hidden_columns: vec!["email".into()],
			order_by: "-created".into(),
		};

		// Act
		store.set("user", &options).unwrap();

		// Assert
		assert_eq!(store.get("user"), options);
		assert_eq!(store.get("role"), ModelViewOptions::default());
	}

	#[rstest]
	fn test_wire_format_uses_hidden_columns_key() {
		let backend = Arc::new(MemoryPreferences::new());
		let store = ViewOptionStore::new(backend.clone());

		store.toggle_column("user", "email").unwrap();

		let raw = backend.read("user-view-options").unwrap().unwrap();
		let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
		assert_eq!(value["hiddenColumns"], serde_json::json!(["email"]));
		assert_eq!(value["limit"], 10);
	}

	#[rstest]
	#[case("not json")]
	#[case("{\"limit\": \"many\"}")]
	#[case("42")]
	fn test_malformed_options_fall_back_to_defaults(#[case] raw: &str) {
		// Arrange
		let backend = Arc::new(MemoryPreferences::new());
		backend.write("user-view-options", raw).unwrap();
		let store = ViewOptionStore::new(backend).with_default_limit(20);

		// Act
		let options = store.get("user");

		// Assert
		assert_eq!(options.limit, 20);
		assert!(options.hidden_columns.is_empty());
	}

	#[rstest]
	fn test_partial_options_fill_missing_fields() {
		let backend = Arc::new(MemoryPreferences::new());
		backend
			.write("user-view-options", "{\"hiddenColumns\": [\"a\"]}")
			.unwrap();
		let store = ViewOptionStore::new(backend);

		let options = store.get("user");

		assert_eq!(options.limit, DEFAULT_PAGE_SIZE);
		assert_eq!(options.hidden_columns, vec!["a"]);
		assert_eq!(options.order_by, "");
	}

	#[rstest]
	fn test_toggle_column_twice_restores_visibility() {
		let store = ViewOptionStore::in_memory();

		let hidden = store.toggle_column("user", "email").unwrap();
		let shown = store.toggle_column("user", "email").unwrap();

		assert!(hidden.is_hidden("email"));
		assert!(!shown.is_hidden("email"));
		assert!(!store.get("user").is_hidden("email"));
	}

	#[rstest]
	fn test_set_limit_keeps_hidden_columns() {
		let store = ViewOptionStore::in_memory();
		store.toggle_column("user", "email").unwrap();

		store.set_limit("user", 50).unwrap();

		let options = store.get("user");
		assert_eq!(options.limit, 50);
		assert!(options.is_hidden("email"));
	}

	#[rstest]
	fn test_file_preferences_round_trip_through_disk() {
		// Arrange
		let dir = tempfile::tempdir().unwrap();
		let store = ViewOptionStore::new(Arc::new(FilePreferences::new(dir.path())));

		// Act
		store.set_limit("http_stat", 30).unwrap();
		store.set_selected_app("billing").unwrap();

		// Assert
		let reopened = ViewOptionStore::new(Arc::new(FilePreferences::new(dir.path())));
		assert_eq!(reopened.get("http_stat").limit, 30);
		assert_eq!(reopened.selected_app().as_deref(), Some("billing"));
		assert!(dir.path().join("http_stat-view-options.json").exists());
	}

	#[rstest]
	#[case("user-view-options", "user-view-options.json")]
	#[case("../etc/passwd", "%2E%2E%2Fetc%2Fpasswd.json")]
	#[case("a b/c", "a%20b%2Fc.json")]
	#[case("audit:log", "audit%3Alog.json")]
	fn test_file_names_are_encoded(#[case] key: &str, #[case] expected: &str) {
		let prefs = FilePreferences::new("/tmp/prefs");

		let path = prefs.path_for(key);

		assert_eq!(path, Path::new("/tmp/prefs").join(expected));
	}

	#[rstest]
	fn test_similar_model_names_do_not_share_a_file() {
		// Arrange
		let dir = tempfile::tempdir().unwrap();
		let store = ViewOptionStore::new(Arc::new(FilePreferences::new(dir.path())));

		// Act
		store.set_limit("audit:log", 50).unwrap();
		store.set_limit(".x", 40).unwrap();

		// Assert
		assert_eq!(store.get("audit:log").limit, 50);
		assert_eq!(store.get("audit_log").limit, DEFAULT_PAGE_SIZE);
		assert_eq!(store.get(".x").limit, 40);
		assert_eq!(store.get("x").limit, DEFAULT_PAGE_SIZE);
	}

	#[rstest]
	fn test_missing_file_reads_as_absent() {
		let dir = tempfile::tempdir().unwrap();
		let prefs = FilePreferences::new(dir.path().join("nested"));

		assert!(prefs.read("user-view-options").unwrap().is_none());
		prefs.remove("user-view-options").unwrap();
	}
}
