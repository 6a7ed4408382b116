//! Settings to context wiring

use modeldesk::prelude::*;
use modeldesk::{build_context, preferences_for};
use rstest::rstest;
use tempfile::TempDir;

#[rstest]
fn test_file_preferences_survive_a_new_store() {
	// Arrange
	let dir = TempDir::new().unwrap();
	let settings = ConsoleSettings {
		preferences_dir: Some(dir.path().to_path_buf()),
		default_page_size: 25,
		..Default::default()
	};

	// Act
	preferences_for(&settings).set_limit("user", 50).unwrap();
	let reopened = preferences_for(&settings);

	// Assert
	assert_eq!(reopened.get("user").limit, 50);
	assert_eq!(reopened.get("role").limit, 25);
}

#[rstest]
fn test_memory_preferences_start_from_default_page_size() {
	let settings = ConsoleSettings {
		default_page_size: 30,
		..Default::default()
	};

	let store = preferences_for(&settings);
	store.set_limit("user", 50).unwrap();

	assert_eq!(store.get("user").limit, 50);
	assert_eq!(preferences_for(&settings).get("user").limit, 30);
}

#[rstest]
#[tokio::test]
async fn test_context_starts_signed_out() {
	let settings = ConsoleSettings {
		captcha_theme: Some("dark".to_string()),
		..Default::default()
	};

	let ctx = build_context(&settings).unwrap();

	assert!(!ctx.session().is_authenticated());
	assert!(ctx.notifications().is_empty());
	assert_eq!(ctx.model_list().phase.get(), modeldesk::ui::ListPhase::Uninitialized);
}
