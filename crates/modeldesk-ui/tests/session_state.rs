//! SessionState against an in-memory console API

mod common;

use common::{FakeApi, LOGIN_HASH, context, user_view};
use modeldesk_client::{login_digest, password_digest};
use modeldesk_core::form::{ProfileForm, SignUpForm};
use modeldesk_types::{ConsoleError, HttpError, User};
use modeldesk_ui::NoticeLevel;
use rstest::rstest;
use std::sync::atomic::Ordering;

#[rstest]
#[tokio::test]
async fn test_login_sends_digest_and_consumes_captcha() {
	// Arrange
	let api = FakeApi::new();
	let session = context(&api).session().clone();
	session.load_captcha().await.unwrap();

	// Act
	let user = session.login("tree", "secret", "1234").await.unwrap();

	// Assert
	let logins = api.logins.lock().unwrap();
	let (request, captcha) = &logins[0];
	assert_eq!(captcha, "c1:1234");
	assert_eq!(request.password, login_digest(LOGIN_HASH, "secret"));
	assert_eq!(request.account, "tree");
	assert_eq!(user.account, "tree");
	assert!(session.is_authenticated());
	assert!(!session.captcha.get_cloned().is_loaded());
	assert_eq!(api.captcha_calls.load(Ordering::SeqCst), 1);
}

#[rstest]
#[tokio::test]
async fn test_failed_login_loads_a_new_captcha() {
	// Arrange
	let api = FakeApi::new();
	*api.fail_login.lock().unwrap() = Some(HttpError::new(400, "Captcha is invalid").with_category("captcha"));
	let ctx = context(&api);
	let session = ctx.session().clone();
	session.load_captcha().await.unwrap();

	// Act
	let result = session.login("tree", "secret", "0000").await;

	// Assert
	assert!(result.is_err());
	assert!(!session.is_authenticated());
	assert_eq!(session.captcha.get_cloned().id, "c2");
	assert_eq!(session.login_action.state().error(), Some("Captcha is invalid [CAPTCHA]"));
	let notices = ctx.notifications().drain();
	assert_eq!(notices[0].level, NoticeLevel::Error);
}

#[rstest]
#[tokio::test]
async fn test_permissions_follow_the_signed_in_user() {
	// Arrange
	let api = FakeApi::new();
	let session = context(&api).session().clone();
	let view = user_view();
	let anonymous = session.permissions(&view);

	// Act
	session.login("tree", "secret", "").await.unwrap();
	let signed_in = session.permissions(&view);

	// Assert
	assert!(!anonymous.can_edit);
	assert!(signed_in.can_edit);
	assert!(!signed_in.can_create);
}

#[rstest]
#[tokio::test]
async fn test_logout_clears_user() {
	let api = FakeApi::new();
	let session = context(&api).session().clone();
	session.login("tree", "secret", "").await.unwrap();

	session.logout().await.unwrap();

	assert!(!session.is_authenticated());
	assert!(session.current_user().is_none());
	assert_eq!(api.logouts.load(Ordering::SeqCst), 1);
}

#[rstest]
#[tokio::test]
async fn test_fetch_and_refresh_reload_the_user() {
	let api = FakeApi::new();
	*api.user.lock().unwrap() = User::with_account("tree", ["admin"], ["ops"]);
	let session = context(&api).session().clone();

	let fetched = session.fetch().await.unwrap();
	let refreshed = session.refresh().await.unwrap();

	assert!(session.initialized.get());
	assert_eq!(fetched.account, "tree");
	assert_eq!(refreshed.groups().to_vec(), vec!["ops".to_string()]);
	assert_eq!(api.refreshes.load(Ordering::SeqCst), 1);
}

#[rstest]
#[tokio::test]
async fn test_profile_update_sends_changed_fields_only() {
	// Arrange
	let api = FakeApi::new();
	*api.user.lock().unwrap() = User {
		email: Some("tree@example.com".into()),
		avatar: Some("https://img.example.com/a.png".into()),
		..User::with_account("tree", ["admin"], Vec::<String>::new())
	};
	let ctx = context(&api);
	let session = ctx.session().clone();
	session.fetch().await.unwrap();
	let mut form = ProfileForm::from_user(&session.user.get_cloned());

	// Act
	let unchanged = session.update_profile(&form).await.unwrap();
	form.avatar = "https://img.example.com/b.png".into();
	let changed = session.update_profile(&form).await.unwrap();

	// Assert
	assert!(!unchanged);
	assert!(changed);
	let updates = api.profile_updates.lock().unwrap();
	assert_eq!(updates.len(), 1);
	assert_eq!(updates[0].avatar.as_deref(), Some("https://img.example.com/b.png"));
	assert!(updates[0].email.is_none());
	assert_eq!(
		session.user.get_cloned().avatar.as_deref(),
		Some("https://img.example.com/b.png")
	);
}

#[rstest]
#[tokio::test]
async fn test_invalid_profile_is_not_sent() {
	let api = FakeApi::new();
	let session = context(&api).session().clone();
	let form = ProfileForm {
		email: "not-an-email".into(),
		avatar: "https://img.example.com/a.png".into(),
		..Default::default()
	};

	let result = session.update_profile(&form).await;

	assert!(matches!(result, Err(ConsoleError::Validation(_))));
	assert!(api.profile_updates.lock().unwrap().is_empty());
}

#[rstest]
#[case("tree", "secret", "secret", true)]
#[case("tree", "secret", "other", false)]
#[case("", "secret", "secret", false)]
#[tokio::test]
async fn test_sign_up_sends_password_digest(
	#[case] account: &str,
	#[case] password: &str,
	#[case] confirm: &str,
	#[case] accepted: bool,
) {
	// Arrange
	let api = FakeApi::new();
	let session = context(&api).session().clone();

	// Act
	let result = session.sign_up(&SignUpForm::new(account, password, confirm)).await;

	// Assert
	assert_eq!(result.is_ok(), accepted);
	let registrations = api.registrations.lock().unwrap();
	if accepted {
		assert_eq!(registrations[0].password, password_digest(password));
		assert_eq!(registrations[0].account, account);
	} else {
		assert!(registrations.is_empty());
	}
}
