//! State containers

pub mod editor;
pub mod list;
pub mod session;
pub mod upload;

use std::sync::atomic::{AtomicU64, Ordering};

/// Request generation counter
///
/// Every request of a container takes a new generation; its response is
/// applied only while that generation is still the latest.
#[derive(Debug, Default)]
pub(crate) struct Generation(AtomicU64);

impl Generation {
	pub(crate) fn next(&self) -> u64 {
		self.0.fetch_add(1, Ordering::SeqCst) + 1
	}

	/// Latest generation handed out
	pub(crate) fn current(&self) -> u64 {
		self.0.load(Ordering::SeqCst)
	}

	pub(crate) fn is_current(&self, generation: u64) -> bool {
		self.0.load(Ordering::SeqCst) == generation
	}
}
