//! Wiring from settings to an application context

use modeldesk_client::{HttpApi, HttpApiConfig};
use modeldesk_conf::ConsoleSettings;
use modeldesk_core::{FilePreferences, MemoryPreferences, PreferenceBackend, ViewOptionStore};
use modeldesk_types::ConsoleResult;
use modeldesk_ui::AppContext;
use std::sync::Arc;

/// Preference store described by `settings`
///
/// Files under `preferences_dir` when set, process memory otherwise.
pub fn preferences_for(settings: &ConsoleSettings) -> ViewOptionStore {
	let backend: Arc<dyn PreferenceBackend> = match &settings.preferences_dir {
		Some(dir) => Arc::new(FilePreferences::new(dir.clone())),
		None => Arc::new(MemoryPreferences::new()),
	};
	ViewOptionStore::new(backend).with_default_limit(settings.default_page_size)
}

/// Builds the HTTP client, preference store and session for `settings`
pub fn build_context(settings: &ConsoleSettings) -> ConsoleResult<AppContext> {
	let config = HttpApiConfig::new(settings.api_base_url.clone()).with_timeout(settings.request_timeout());
	let api = HttpApi::new(config)?;
	tracing::info!(
		base_url = %settings.api_base_url,
		persistent_preferences = settings.preferences_dir.is_some(),
		"console context ready"
	);
	Ok(AppContext::new(
		Arc::new(api),
		preferences_for(settings),
		settings.captcha_theme.clone(),
	))
}
