//! Form derivation
//!
//! This module derives everything a model detail/edit/create screen needs
//! from the schema view:
//! - `FormLayout`: which fields appear, how they render and whether they
//!   are editable in the current `FormMode`
//! - `FormValidator`: per-field value rules bound to one model
//! - `FormState`: baseline and current values with dirty tracking
//! - `prepare_submit`: validation, diffing and coercion into a `SubmitPlan`
//! - `ProfileForm` / `SignUpForm`: the account forms outside the model
//!   screens

pub mod account;
pub mod layout;
pub mod state;
pub mod validate;

// Re-exports
pub use account::{ProfileForm, SignUpForm};
pub use layout::{EditControl, FieldSpec, FormLayout, ViewRender, edit_control, is_editable, view_render};
pub use state::{FormState, SubmitPlan, coerce, default_values, display_values, prepare_submit};
pub use validate::{FormValidator, ValueRule};

/// Form mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormMode {
	/// Read-only detail view
	View,
	/// Editing an existing record
	Edit,
	/// Creating a new record
	Create,
}

impl FormMode {
	/// Id 0 creates, otherwise the edit intent decides between Edit and View
	///
	/// # Examples
	///
	/// ```
	/// use modeldesk_core::form::FormMode;
	///
	/// assert_eq!(FormMode::resolve(0, false), FormMode::Create);
	/// assert_eq!(FormMode::resolve(7, true), FormMode::Edit);
	/// assert_eq!(FormMode::resolve(7, false), FormMode::View);
	/// ```
	pub fn resolve(id: u64, edit_intent: bool) -> Self {
		if id == 0 {
			FormMode::Create
		} else if edit_intent {
			FormMode::Edit
		} else {
			FormMode::View
		}
	}

	/// Whether the form accepts input at all
	pub fn is_writable(&self) -> bool {
		match self {
			FormMode::View => false,
			FormMode::Edit | FormMode::Create => true,
		}
	}
}
