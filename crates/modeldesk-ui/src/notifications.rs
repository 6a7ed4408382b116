//! Toast-style notification queue

use futures_signals::signal_vec::{MutableSignalVec, MutableVec};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
	Info,
	Success,
	Error,
}

/// One message for the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
	pub level: NoticeLevel,
	pub message: String,
	/// Secondary line, e.g. the rejected file name
	pub description: Option<String>,
}

impl Notice {
	pub fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
		Self {
			level,
			message: message.into(),
			description: None,
		}
	}

	pub fn with_description(mut self, description: impl Into<String>) -> Self {
		self.description = Some(description.into());
		self
	}
}

/// Shared queue of pending notices
///
/// Cloning shares the queue. Renderers subscribe with
/// [`signal_vec`](Notifications::signal_vec) and remove what they showed
/// with [`drain`](Notifications::drain).
#[derive(Clone, Default)]
pub struct Notifications {
	items: Arc<MutableVec<Notice>>,
}

impl Notifications {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn push(&self, notice: Notice) {
		tracing::debug!(level = ?notice.level, message = %notice.message, "notice");
		self.items.lock_mut().push_cloned(notice);
	}

	pub fn info(&self, message: impl Into<String>) {
		self.push(Notice::new(NoticeLevel::Info, message));
	}

	pub fn success(&self, message: impl Into<String>) {
		self.push(Notice::new(NoticeLevel::Success, message));
	}

	pub fn error(&self, message: impl Into<String>) {
		self.push(Notice::new(NoticeLevel::Error, message));
	}

	/// Current notices, oldest first
	pub fn snapshot(&self) -> Vec<Notice> {
		self.items.lock_ref().to_vec()
	}

	/// Removes and returns every pending notice
	pub fn drain(&self) -> Vec<Notice> {
		let mut items = self.items.lock_mut();
		let drained = items.to_vec();
		items.clear();
		drained
	}

	pub fn len(&self) -> usize {
		self.items.lock_ref().len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	pub fn signal_vec(&self) -> MutableSignalVec<Notice> {
		self.items.signal_vec_cloned()
	}
}

impl std::fmt::Debug for Notifications {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Notifications")
			.field("pending", &self.len())
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_clones_share_the_queue() {
		// Arrange
		let notifications = Notifications::new();
		let shared = notifications.clone();

		// Act
		shared.success("Update successfully");
		shared.error("Forbidden");

		// Assert
		let drained = notifications.drain();
		assert_eq!(drained.len(), 2);
		assert_eq!(drained[0].level, NoticeLevel::Success);
		assert_eq!(drained[1].message, "Forbidden");
		assert!(shared.is_empty());
	}
}
