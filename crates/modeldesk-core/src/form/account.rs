//! Profile and sign-up forms

use modeldesk_types::{ProfileUpdate, User, ValidationErrors};
use url::Url;

fn looks_like_email(value: &str) -> bool {
	let Some((local, domain)) = value.split_once('@') else {
		return false;
	};
	!local.is_empty()
		&& !domain.contains('@')
		&& !value.chars().any(char::is_whitespace)
		&& domain
			.split_once('.')
			.is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty() && !tld.ends_with('.'))
}

fn is_http_url(value: &str) -> bool {
	Url::parse(value).is_ok_and(|url| matches!(url.scheme(), "http" | "https") && url.host().is_some())
}

/// Editable profile of the current user
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileForm {
	pub email: String,
	pub avatar: String,
	pub roles: Vec<String>,
	pub groups: Vec<String>,
}

impl ProfileForm {
	/// Form values for `user`, absent fields empty
	pub fn from_user(user: &User) -> Self {
		Self {
			email: user.email.clone().unwrap_or_default(),
			avatar: user.avatar.clone().unwrap_or_default(),
			roles: user.roles().to_vec(),
			groups: user.groups().to_vec(),
		}
	}

	pub fn validate(&self) -> Result<(), ValidationErrors> {
		let mut errors = ValidationErrors::new();
		if self.email.trim().is_empty() {
			errors.add("email", "Please input your email.");
		} else if !looks_like_email(self.email.trim()) {
			errors.add("email", "Invalid email");
		}
		if !is_http_url(self.avatar.trim()) {
			errors.add("avatar", "Please enter a valid URL.");
		}
		errors.into_result()
	}

	/// Changed fields relative to `baseline`
	pub fn changes(&self, baseline: &ProfileForm) -> ProfileUpdate {
		ProfileUpdate {
			email: (self.email != baseline.email).then(|| self.email.trim().to_string()),
			avatar: (self.avatar != baseline.avatar).then(|| self.avatar.trim().to_string()),
			roles: (self.roles != baseline.roles).then(|| self.roles.clone()),
			groups: (self.groups != baseline.groups).then(|| self.groups.clone()),
		}
	}
}

/// Account registration input
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignUpForm {
	pub account: String,
	pub password: String,
	pub confirm_password: String,
}

impl SignUpForm {
	pub fn new(account: impl Into<String>, password: impl Into<String>, confirm_password: impl Into<String>) -> Self {
		Self {
			account: account.into(),
			password: password.into(),
			confirm_password: confirm_password.into(),
		}
	}

	/// Whether the submit control is enabled
	pub fn is_submittable(&self) -> bool {
		self.validate().is_ok()
	}

	pub fn validate(&self) -> Result<(), ValidationErrors> {
		let mut errors = ValidationErrors::new();
		if self.account.trim().is_empty() {
			errors.add("account", "is required");
		}
		if self.password.is_empty() {
			errors.add("password", "is required");
		}
		if self.password != self.confirm_password {
			errors.add("confirm_password", "does not match the password");
		}
		errors.into_result()
	}
}
