//! EditorState against an in-memory console API

mod common;

use common::{FakeApi, context, user_row, user_view};
use modeldesk_core::FormMode;
use modeldesk_types::ConsoleError;
use modeldesk_ui::{NoticeLevel, SubmitOutcome};
use rstest::rstest;
use serde_json::{Value, json};

fn api() -> std::sync::Arc<FakeApi> {
	FakeApi::new().with_model("user", user_view(), vec![user_row(7)])
}

#[rstest]
#[tokio::test]
async fn test_view_mode_has_no_submit() {
	// Arrange
	let api = api();
	let editor = context(&api).editor();

	// Act
	editor.mount("user", 7, false).await.unwrap();

	// Assert
	assert_eq!(editor.mode.get(), FormMode::View);
	assert!(!editor.can_submit());
	let values = editor.display_values();
	assert_eq!(values.get("account"), Some(&json!("user7")));
	let profile = values.get("profile").and_then(Value::as_str).unwrap();
	assert_eq!(serde_json::from_str::<Value>(profile).unwrap(), json!({"x": 1}));
	assert!(!values.contains_key("id"));
}

#[rstest]
#[tokio::test]
async fn test_edit_sends_only_dirty_fields_and_rebaselines() {
	// Arrange
	let api = api();
	let ctx = context(&api);
	let editor = ctx.editor();
	editor.mount("user", 7, true).await.unwrap();
	assert!(!editor.can_submit());

	// Act
	editor.set_value("status", json!(0));
	let dirty = editor.can_submit();
	let outcome = editor.submit().await.unwrap();

	// Assert
	assert!(dirty);
	assert_eq!(outcome, SubmitOutcome::Updated);
	let updates = api.updates.lock().unwrap();
	assert_eq!(updates.len(), 1);
	assert_eq!(updates[0].id, 7);
	assert_eq!(updates[0].model, "user");
	assert_eq!(Value::Object(updates[0].data.clone()), json!({"status": 0}));
	assert!(!editor.is_dirty());
	let notices = ctx.notifications().drain();
	assert_eq!(notices.last().map(|n| n.level), Some(NoticeLevel::Success));
}

#[rstest]
#[tokio::test]
async fn test_unchanged_form_sends_nothing() {
	let api = api();
	let ctx = context(&api);
	let editor = ctx.editor();
	editor.mount("user", 7, true).await.unwrap();

	let outcome = editor.submit().await.unwrap();

	assert_eq!(outcome, SubmitOutcome::NoChange);
	assert!(api.updates.lock().unwrap().is_empty());
	assert_eq!(ctx.notifications().drain()[0].message, "No changes to update");
}

#[rstest]
#[tokio::test]
async fn test_json_field_round_trips_unchanged_and_reports_parse_errors() {
	// Arrange
	let api = api();
	let editor = context(&api).editor();
	editor.mount("user", 7, true).await.unwrap();

	// Act
	editor.set_value("profile", json!("{\"x\": 2}"));
	editor.submit().await.unwrap();
	editor.set_value("profile", json!("{broken"));
	let result = editor.submit().await;

	// Assert
	let updates = api.updates.lock().unwrap();
	assert_eq!(updates.len(), 1);
	assert_eq!(Value::Object(updates[0].data.clone()), json!({"profile": {"x": 2}}));
	match result {
		Err(ConsoleError::JsonField { field, .. }) => assert_eq!(field, "profile"),
		other => panic!("expected json field error, got {:?}", other),
	}
}

#[rstest]
#[tokio::test]
async fn test_invalid_number_blocks_submission() {
	// Arrange
	let api = api();
	let editor = context(&api).editor();
	editor.mount("user", 7, true).await.unwrap();

	// Act
	editor.set_input("age", "abc").unwrap();
	let result = editor.submit().await;

	// Assert
	assert!(matches!(result, Err(ConsoleError::Validation(_))));
	let errors = editor.field_errors.get_cloned().unwrap();
	assert!(errors.get("age").is_some());
	assert!(api.updates.lock().unwrap().is_empty());
}

#[rstest]
#[tokio::test]
async fn test_create_posts_defaults_and_returns_list_route() {
	// Arrange
	let api = api();
	let editor = context(&api).editor();
	editor.mount("user", 0, false).await.unwrap();
	assert_eq!(editor.mode.get(), FormMode::Create);

	// Act
	editor.set_input("account", "tree").unwrap();
	editor.set_input("age", "41").unwrap();
	let outcome = editor.submit().await.unwrap();

	// Assert
	assert_eq!(
		outcome,
		SubmitOutcome::Created {
			id: 42,
			route: "/model/user".to_string()
		}
	);
	let creates = api.creates.lock().unwrap();
	let data = &creates[0].data;
	assert_eq!(data.get("account"), Some(&json!("tree")));
	assert_eq!(data.get("age"), Some(&json!(41)));
	assert!(!data.contains_key("created"));
	assert!(!data.contains_key("profile"));
}

#[rstest]
#[tokio::test]
async fn test_duplicate_submit_is_rejected_while_in_flight() {
	// Arrange
	let api = api();
	let editor = context(&api).editor();
	editor.mount("user", 7, true).await.unwrap();
	editor.set_value("age", json!(31));
	let gate = api.gate_updates();

	// Act
	let (first, second, ()) = futures::join!(editor.submit(), editor.submit(), async {
		gate.notify_one();
	});

	// Assert
	assert_eq!(first.unwrap(), SubmitOutcome::Updated);
	assert!(matches!(second, Err(ConsoleError::Busy(_))));
	assert_eq!(api.updates.lock().unwrap().len(), 1);
	assert!(!editor.submit_action.is_in_flight());
}

#[rstest]
#[tokio::test]
async fn test_update_settling_after_another_record_is_opened_keeps_its_form() {
	// Arrange
	let api = FakeApi::new().with_model("user", user_view(), vec![user_row(7), user_row(8)]);
	let editor = context(&api).editor();
	editor.mount("user", 7, true).await.unwrap();
	editor.set_value("account", json!("renamed"));
	let gate = api.gate_updates();

	// Act
	let (outcome, ()) = futures::join!(editor.submit(), async {
		editor.mount("user", 8, true).await.unwrap();
		gate.notify_one();
	});

	// Assert
	assert_eq!(outcome.unwrap(), SubmitOutcome::Updated);
	assert_eq!(api.updates.lock().unwrap()[0].id, 7);
	let form = editor.form.get_cloned().unwrap();
	assert_eq!(form.get("account"), Some(&json!("user8")));
	assert!(!editor.is_dirty());
}
