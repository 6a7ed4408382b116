//! Session payloads of the `/users/*` and `/commons/captcha` endpoints

use serde::{Deserialize, Serialize};

/// Current user as reported by `/users/me` and `/users/login`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
	/// Account name; empty for anonymous sessions
	#[serde(default)]
	pub account: String,
	#[serde(default)]
	pub expired_at: String,
	#[serde(default)]
	pub issued_at: String,
	#[serde(default)]
	pub time: String,
	/// Whether the session may be refreshed
	#[serde(default)]
	pub can_renew: bool,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub email: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub avatar: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub roles: Option<Vec<String>>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub groups: Option<Vec<String>>,
}

impl User {
	/// Create an authenticated user with the given roles and groups
	pub fn with_account<R, G>(account: impl Into<String>, roles: R, groups: G) -> Self
	where
		R: IntoIterator,
		R::Item: Into<String>,
		G: IntoIterator,
		G::Item: Into<String>,
	{
		Self {
			account: account.into(),
			roles: Some(roles.into_iter().map(Into::into).collect()),
			groups: Some(groups.into_iter().map(Into::into).collect()),
			..Default::default()
		}
	}

	/// Whether this is a logged-in user
	pub fn is_authenticated(&self) -> bool {
		!self.account.is_empty()
	}

	pub fn roles(&self) -> &[String] {
		self.roles.as_deref().unwrap_or_default()
	}

	pub fn groups(&self) -> &[String] {
		self.groups.as_deref().unwrap_or_default()
	}
}

/// Captcha challenge
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Captcha {
	pub id: String,
	/// Base64 encoded PNG
	pub data: String,
}

impl Captcha {
	/// Whether a challenge is loaded
	pub fn is_loaded(&self) -> bool {
		!self.id.is_empty()
	}

	/// Answer string sent in the `X-Captcha` header: `"<id>:<code>"`,
	/// or empty when no challenge is loaded.
	pub fn answer(&self, code: &str) -> String {
		if self.is_loaded() {
			format!("{}:{}", self.id, code)
		} else {
			String::new()
		}
	}

	/// `data:` URI suitable for an image source
	pub fn data_uri(&self) -> String {
		format!("data:image/png;base64,{}", self.data)
	}
}

/// One-time login challenge from `/users/login/token`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginToken {
	pub ts: i64,
	pub hash: String,
	pub token: String,
}

/// Body of `/users/login`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
	pub ts: i64,
	pub hash: String,
	pub token: String,
	pub account: String,
	/// Salted password digest, never the raw password
	pub password: String,
}

/// Body of `/users/register`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterRequest {
	pub account: String,
	/// Password digest
	pub password: String,
}

/// Body of `/users/profile`; only present fields are changed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileUpdate {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub email: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub avatar: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub roles: Option<Vec<String>>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub groups: Option<Vec<String>>,
}

impl ProfileUpdate {
	pub fn is_empty(&self) -> bool {
		self.email.is_none() && self.avatar.is_none() && self.roles.is_none() && self.groups.is_none()
	}
}
