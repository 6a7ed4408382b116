//! File upload page

use crate::context::AppContext;
use crate::notifications::{Notice, NoticeLevel, Notifications};
use futures_signals::signal::Mutable;
use futures_signals::signal_vec::MutableVec;
use modeldesk_client::{ConsoleApi, MAX_UPLOAD_FILE_SIZE, MAX_UPLOAD_FILES, UploadFile};
use modeldesk_core::ActionGuard;
use modeldesk_types::{ConsoleError, ConsoleResult};
use std::sync::Arc;

/// A file refused at selection time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
	pub file_name: String,
	pub message: String,
}

/// Selected group and files of the upload page
pub struct UploadState {
	/// Groups offered for selection
	pub groups: Vec<String>,
	pub group: Mutable<Option<String>>,
	pub files: MutableVec<UploadFile>,
	pub upload_action: ActionGuard,
	api: Arc<dyn ConsoleApi>,
	notifications: Notifications,
}

impl UploadState {
	/// `groups` is a comma-separated list; blank entries are ignored
	pub fn new(ctx: &AppContext, groups: &str) -> Arc<Self> {
		let groups = groups
			.split(',')
			.map(str::trim)
			.filter(|g| !g.is_empty())
			.map(str::to_string)
			.collect();
		Arc::new(Self {
			groups,
			group: Mutable::new(None),
			files: MutableVec::new(),
			upload_action: ActionGuard::new("upload"),
			api: Arc::clone(ctx.api()),
			notifications: ctx.notifications().clone(),
		})
	}

	pub fn select_group(&self, group: &str) -> ConsoleResult<()> {
		if !self.groups.iter().any(|g| g == group) {
			return Err(ConsoleError::InvalidInput(format!("unknown upload group `{}`", group)));
		}
		self.group.set(Some(group.to_string()));
		Ok(())
	}

	/// Adds files to the selection
	///
	/// Files larger than the size limit, or beyond the file-count limit, are
	/// refused and reported.
	pub fn add_files(&self, files: Vec<UploadFile>) -> Vec<Rejection> {
		let mut rejections = Vec::new();
		let mut selected = self.files.lock_mut();
		for file in files {
			let message = if file.size() > MAX_UPLOAD_FILE_SIZE {
				Some("File too large")
			} else if selected.len() >= MAX_UPLOAD_FILES {
				Some("Maximum files reached")
			} else {
				None
			};
			match message {
				Some(message) => {
					let file_name = file.short_name();
					self.notifications.push(
						Notice::new(NoticeLevel::Error, message)
							.with_description(format!("\"{}\" has been rejected", file_name)),
					);
					rejections.push(Rejection {
						file_name,
						message: message.to_string(),
					});
				}
				None => selected.push_cloned(file),
			}
		}
		rejections
	}

	pub fn remove_file(&self, index: usize) -> Option<UploadFile> {
		let mut files = self.files.lock_mut();
		(index < files.len()).then(|| files.remove(index))
	}

	pub fn can_upload(&self) -> bool {
		self.group.lock_ref().is_some() && !self.files.lock_ref().is_empty() && !self.upload_action.is_in_flight()
	}

	/// Uploads the selection to the chosen group; clears it on success
	pub async fn upload(&self) -> ConsoleResult<()> {
		let result = self
			.upload_action
			.run(async {
				let group = self
					.group
					.get_cloned()
					.ok_or_else(|| ConsoleError::InvalidInput("no upload group selected".to_string()))?;
				let files = self.files.lock_ref().to_vec();
				if files.is_empty() {
					return Err(ConsoleError::InvalidInput("no files selected".to_string()));
				}
				tracing::debug!(group = %group, files = files.len(), "uploading files");
				self.api.upload(&group, files).await
			})
			.await;
		match result {
			Ok(()) => {
				self.files.lock_mut().clear();
				self.notifications.success("Uploaded successfully");
				Ok(())
			}
			Err(err) => {
				self.notifications.error(err.to_string());
				Err(err)
			}
		}
	}
}
