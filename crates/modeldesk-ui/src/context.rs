//! Application context

use crate::notifications::Notifications;
use crate::state::editor::EditorState;
use crate::state::list::ModelListState;
use crate::state::session::SessionState;
use crate::state::upload::UploadState;
use modeldesk_client::ConsoleApi;
use modeldesk_core::ViewOptionStore;
use std::sync::Arc;

/// Everything the state containers share
///
/// Built once at startup and passed to whoever creates a view. Cloning is
/// cheap and shares the API client, the preferences, the notification queue
/// and the session.
#[derive(Clone)]
pub struct AppContext {
	api: Arc<dyn ConsoleApi>,
	preferences: ViewOptionStore,
	notifications: Notifications,
	session: Arc<SessionState>,
}

impl AppContext {
	/// Create a context
	///
	/// # Examples
	///
	/// ```no_run
	/// use modeldesk_client::{HttpApi, HttpApiConfig};
	/// use modeldesk_core::ViewOptionStore;
	/// use modeldesk_ui::AppContext;
	/// use std::sync::Arc;
	///
	/// let api = HttpApi::new(HttpApiConfig::new("http://127.0.0.1:7001/api")).unwrap();
	/// let ctx = AppContext::new(Arc::new(api), ViewOptionStore::in_memory(), None);
	/// let users = ctx.model_list();
	/// ```
	pub fn new(api: Arc<dyn ConsoleApi>, preferences: ViewOptionStore, captcha_theme: Option<String>) -> Self {
		let notifications = Notifications::new();
		let session = SessionState::new(Arc::clone(&api), notifications.clone(), captcha_theme);
		Self {
			api,
			preferences,
			notifications,
			session,
		}
	}

	pub fn api(&self) -> &Arc<dyn ConsoleApi> {
		&self.api
	}

	pub fn preferences(&self) -> &ViewOptionStore {
		&self.preferences
	}

	pub fn notifications(&self) -> &Notifications {
		&self.notifications
	}

	pub fn session(&self) -> &Arc<SessionState> {
		&self.session
	}

	/// State for a model list page
	pub fn model_list(&self) -> Arc<ModelListState> {
		ModelListState::new(self)
	}

	/// State for a record page
	pub fn editor(&self) -> Arc<EditorState> {
		EditorState::new(self)
	}

	/// State for the upload page; `groups` is the comma-separated group list
	pub fn uploader(&self, groups: &str) -> Arc<UploadState> {
		UploadState::new(self, groups)
	}
}

impl std::fmt::Debug for AppContext {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("AppContext")
			.field("preferences", &self.preferences)
			.field("notifications", &self.notifications)
			.finish_non_exhaustive()
	}
}
