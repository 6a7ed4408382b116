//! Files sent to `/files/upload`

/// Most files accepted by one upload
pub const MAX_UPLOAD_FILES: usize = 10;

/// Largest accepted file, in bytes
pub const MAX_UPLOAD_FILE_SIZE: usize = 5 * 1024 * 1024;

/// Multipart field name of the uploaded files
pub const UPLOAD_FIELD: &str = "files[]";

/// An in-memory file selected for upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
	pub name: String,
	/// MIME type, guessed by the server when absent
	pub content_type: Option<String>,
	pub bytes: Vec<u8>,
}

impl UploadFile {
	pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
		Self {
			name: name.into(),
			content_type: None,
			bytes: bytes.into(),
		}
	}

	pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
		self.content_type = Some(content_type.into());
		self
	}

	pub fn size(&self) -> usize {
		self.bytes.len()
	}

	/// Name shortened to 20 characters for messages
	pub fn short_name(&self) -> String {
		if self.name.chars().count() > 20 {
			format!("{}...", self.name.chars().take(20).collect::<String>())
		} else {
			self.name.clone()
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case("a.png", "a.png")]
	#[case("a-very-long-file-name-indeed.png", "a-very-long-file-nam...")]
	fn test_short_name(#[case] name: &str, #[case] expected: &str) {
		assert_eq!(UploadFile::new(name, vec![]).short_name(), expected);
	}
}
