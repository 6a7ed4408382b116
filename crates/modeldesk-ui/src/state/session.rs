//! Current user session

use crate::notifications::Notifications;
use futures_signals::signal::Mutable;
use modeldesk_client::{ConsoleApi, login_digest, password_digest};
use modeldesk_core::form::{ProfileForm, SignUpForm};
use modeldesk_core::{ActionGuard, Permissions};
use modeldesk_types::{
	Captcha, ConsoleError, ConsoleResult, LoginRequest, ProfileUpdate, RegisterRequest, SchemaView, User,
};
use std::sync::Arc;

/// Session of the signed-in user
pub struct SessionState {
	/// Current user; anonymous when the account is empty
	pub user: Mutable<User>,
	/// Whether `/users/me` has answered at least once
	pub initialized: Mutable<bool>,
	/// Current captcha challenge
	pub captcha: Mutable<Captcha>,
	pub login_action: ActionGuard,
	pub logout_action: ActionGuard,
	pub refresh_action: ActionGuard,
	pub profile_action: ActionGuard,
	pub sign_up_action: ActionGuard,
	captcha_theme: Option<String>,
	notifications: Notifications,
	api: Arc<dyn ConsoleApi>,
}

impl SessionState {
	pub fn new(api: Arc<dyn ConsoleApi>, notifications: Notifications, captcha_theme: Option<String>) -> Arc<Self> {
		Arc::new(Self {
			user: Mutable::new(User::default()),
			initialized: Mutable::new(false),
			captcha: Mutable::new(Captcha::default()),
			login_action: ActionGuard::new("login"),
			logout_action: ActionGuard::new("logout"),
			refresh_action: ActionGuard::new("refresh"),
			profile_action: ActionGuard::new("profile update"),
			sign_up_action: ActionGuard::new("sign up"),
			captcha_theme,
			notifications,
			api,
		})
	}

	/// The signed-in user, `None` when anonymous
	pub fn current_user(&self) -> Option<User> {
		let user = self.user.lock_ref();
		user.is_authenticated().then(|| user.clone())
	}

	pub fn is_authenticated(&self) -> bool {
		self.user.lock_ref().is_authenticated()
	}

	/// Create/edit permissions of the current user on `view`
	pub fn permissions(&self, view: &SchemaView) -> Permissions {
		Permissions::resolve(view, self.current_user().as_ref())
	}

	/// Loads the current user from `/users/me`
	pub async fn fetch(&self) -> ConsoleResult<User> {
		let user = self.api.me().await?;
		tracing::debug!(account = %user.account, "session fetched");
		self.user.set(user.clone());
		self.initialized.set(true);
		Ok(user)
	}

	/// Loads a fresh captcha challenge
	pub async fn load_captcha(&self) -> ConsoleResult<()> {
		let captcha = self.api.captcha(self.captcha_theme.as_deref()).await?;
		self.captcha.set(captcha);
		Ok(())
	}

	/// Signs in with the password digest and the answer to the current
	/// captcha
	///
	/// The captcha is consumed by the attempt. When the login fails a new
	/// challenge is loaded.
	pub async fn login(&self, account: &str, password: &str, captcha_code: &str) -> ConsoleResult<User> {
		let result = self
			.login_action
			.run(async {
				let answer = self.captcha.replace(Captcha::default()).answer(captcha_code);
				let token = self.api.login_token().await?;
				let request = LoginRequest {
					ts: token.ts,
					password: login_digest(&token.hash, password),
					hash: token.hash,
					token: token.token,
					account: account.trim().to_string(),
				};
				self.api.login(&request, &answer).await
			})
			.await;

		match result {
			Ok(user) => {
				tracing::debug!(account = %user.account, "logged in");
				self.user.set(user.clone());
				self.initialized.set(true);
				Ok(user)
			}
			Err(err) => {
				self.notifications.error(err.to_string());
				if !matches!(err, ConsoleError::Busy(_))
					&& let Err(captcha_err) = self.load_captcha().await
				{
					tracing::debug!(error = %captcha_err, "failed to reload captcha");
				}
				Err(err)
			}
		}
	}

	pub async fn logout(&self) -> ConsoleResult<()> {
		let result = self.logout_action.run(self.api.logout()).await;
		match result {
			Ok(()) => {
				self.user.set(User::default());
				self.initialized.set(true);
				Ok(())
			}
			Err(err) => {
				self.notifications.error(err.to_string());
				Err(err)
			}
		}
	}

	/// Renews the session, then reloads the user for the new expiry
	pub async fn refresh(&self) -> ConsoleResult<User> {
		let result = self
			.refresh_action
			.run(async {
				self.api.refresh().await?;
				self.api.me().await
			})
			.await;
		match result {
			Ok(user) => {
				self.user.set(user.clone());
				Ok(user)
			}
			Err(err) => {
				self.notifications.error(err.to_string());
				Err(err)
			}
		}
	}

	/// Sends the changed profile fields
	///
	/// Returns `false` without a request when nothing changed.
	pub async fn update_profile(&self, form: &ProfileForm) -> ConsoleResult<bool> {
		form.validate()?;
		let baseline = ProfileForm::from_user(&self.user.get_cloned());
		let update = form.changes(&baseline);
		if update.is_empty() {
			self.notifications.info("No changes to update");
			return Ok(false);
		}

		match self.profile_action.run(self.api.update_profile(&update)).await {
			Ok(()) => {
				self.apply_profile(update);
				self.notifications.success("Update profile successfully");
				Ok(true)
			}
			Err(err) => {
				self.notifications.error(err.to_string());
				Err(err)
			}
		}
	}

	fn apply_profile(&self, update: ProfileUpdate) {
		let mut user = self.user.lock_mut();
		if let Some(email) = update.email {
			user.email = Some(email);
		}
		if let Some(avatar) = update.avatar {
			user.avatar = Some(avatar);
		}
		if let Some(roles) = update.roles {
			user.roles = Some(roles);
		}
		if let Some(groups) = update.groups {
			user.groups = Some(groups);
		}
	}

	/// Registers a new account; the password leaves as a digest
	pub async fn sign_up(&self, form: &SignUpForm) -> ConsoleResult<()> {
		form.validate()?;
		let request = RegisterRequest {
			account: form.account.trim().to_string(),
			password: password_digest(&form.password),
		};
		self.sign_up_action
			.run(self.api.register(&request))
			.await
			.inspect_err(|err| self.notifications.error(err.to_string()))
	}
}
