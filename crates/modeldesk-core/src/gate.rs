//! Role/group authorization of create and edit actions

use modeldesk_types::{AccessPolicy, SchemaView, User};

/// Whether `user` passes `policy`
///
/// Denied for anonymous or absent users and for absent or disabled
/// policies. Otherwise allowed when the policy admits any role (`"*"`) or
/// shares a role or a group with the user.
///
/// # Examples
///
/// ```
/// use modeldesk_core::gate::allow;
/// use modeldesk_types::{AccessPolicy, User};
///
/// let policy = AccessPolicy::new(["admin"], Vec::<String>::new());
/// let admin = User::with_account("tree", ["admin"], Vec::<String>::new());
/// assert!(allow(Some(&policy), Some(&admin)));
/// assert!(!allow(None, Some(&admin)));
/// ```
pub fn allow(policy: Option<&AccessPolicy>, user: Option<&User>) -> bool {
	let (Some(policy), Some(user)) = (policy, user) else {
		return false;
	};
	if policy.disabled || !user.is_authenticated() {
		return false;
	}
	if policy.roles.iter().any(|r| r == AccessPolicy::ANY) {
		return true;
	}
	let shares = |mine: &[String], allowed: &[String]| mine.iter().any(|m| allowed.contains(m));
	shares(user.roles(), &policy.roles) || shares(user.groups(), &policy.groups)
}

/// Create/edit permissions of a user on one model
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Permissions {
	pub can_create: bool,
	pub can_edit: bool,
}

impl Permissions {
	pub fn resolve(view: &SchemaView, user: Option<&User>) -> Self {
		Self {
			can_create: allow(view.allow_create.as_ref(), user),
			can_edit: allow(view.allow_edit.as_ref(), user),
		}
	}
}
