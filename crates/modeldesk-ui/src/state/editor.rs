//! Record page: view, edit or create one item

use crate::context::AppContext;
use crate::notifications::Notifications;
use crate::state::Generation;
use crate::state::session::SessionState;
use chrono::Utc;
use futures_signals::signal::Mutable;
use modeldesk_client::ConsoleApi;
use modeldesk_core::form::display_values;
use modeldesk_core::schema::interpret;
use modeldesk_core::{
	ActionGuard, FormLayout, FormMode, FormState, FormValidator, Permissions, SubmitPlan, prepare_submit,
};
use modeldesk_types::{
	ConsoleError, ConsoleResult, CreateRequest, Item, ItemRef, SchemaView, UpdateRequest, ValidationErrors,
};
use serde_json::Value;
use std::sync::Arc;

/// Route of the list page of `model`
pub fn list_route(model: &str) -> String {
	format!("/model/{}", model)
}

/// Result of a submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
	/// Nothing was dirty; no request was sent
	NoChange,
	/// The record was patched and the form re-baselined
	Updated,
	/// A record was created; the caller navigates to `route`
	Created { id: u64, route: String },
}

/// Everything derived for one mounted record
#[derive(Debug, Clone)]
struct Mounted {
	model: String,
	id: u64,
	layout: Arc<FormLayout>,
	validator: FormValidator,
}

/// Form state for one record of one model
pub struct EditorState {
	pub mode: Mutable<FormMode>,
	pub view: Mutable<Option<Arc<SchemaView>>>,
	pub layout: Mutable<Option<Arc<FormLayout>>>,
	/// Current values and their baseline; `None` until mounted
	pub form: Mutable<Option<FormState>>,
	/// Messages of the last failed validation
	pub field_errors: Mutable<Option<ValidationErrors>>,
	pub loading: Mutable<bool>,
	pub error: Mutable<Option<String>>,
	pub permissions: Mutable<Permissions>,
	pub submit_action: ActionGuard,
	mounted: parking_lot::Mutex<Option<Mounted>>,
	generation: Generation,
	api: Arc<dyn ConsoleApi>,
	notifications: Notifications,
	session: Arc<SessionState>,
}

impl EditorState {
	pub fn new(ctx: &AppContext) -> Arc<Self> {
		Arc::new(Self {
			mode: Mutable::new(FormMode::View),
			view: Mutable::new(None),
			layout: Mutable::new(None),
			form: Mutable::new(None),
			field_errors: Mutable::new(None),
			loading: Mutable::new(false),
			error: Mutable::new(None),
			permissions: Mutable::new(Permissions::default()),
			submit_action: ActionGuard::new("submit"),
			mounted: parking_lot::Mutex::new(None),
			generation: Generation::default(),
			api: Arc::clone(ctx.api()),
			notifications: ctx.notifications().clone(),
			session: Arc::clone(ctx.session()),
		})
	}

	/// Loads the schema and, unless creating, the record
	///
	/// `id` 0 opens an empty Create form; otherwise `edit_intent` chooses
	/// between Edit and View.
	pub async fn mount(&self, model: &str, id: u64, edit_intent: bool) -> ConsoleResult<()> {
		let generation = self.generation.next();
		let mode = FormMode::resolve(id, edit_intent);
		tracing::debug!(model = %model, id, mode = ?mode, generation, "mounting editor");

		*self.mounted.lock() = None;
		self.mode.set(mode);
		self.form.set(None);
		self.field_errors.set(None);
		self.error.set(None);
		self.loading.set(true);

		let result = self.fetch(model, id, mode).await;
		if !self.generation.is_current(generation) {
			tracing::debug!(model = %model, id, generation, "dropping stale editor response");
			return Ok(());
		}
		self.loading.set(false);

		match result {
			Ok((view, item)) => {
				let layout = Arc::new(FormLayout::derive(model, &view, mode));
				let form = match &item {
					Some(item) => FormState::load(&layout, item),
					None => FormState::for_create(&layout),
				};
				*self.mounted.lock() = Some(Mounted {
					model: model.to_string(),
					id,
					validator: FormValidator::derive(&layout),
					layout: Arc::clone(&layout),
				});
				self.permissions.set(self.session.permissions(&view));
				self.view.set(Some(Arc::new(view)));
				self.layout.set(Some(layout));
				self.form.set(Some(form));
				Ok(())
			}
			Err(err) => {
				self.error.set(Some(err.to_string()));
				self.notifications.error(err.to_string());
				Err(err)
			}
		}
	}

	async fn fetch(&self, model: &str, id: u64, mode: FormMode) -> ConsoleResult<(SchemaView, Option<Item>)> {
		let view = interpret(self.api.schema(model).await?, Utc::now());
		let item = match mode {
			FormMode::Create => None,
			FormMode::View | FormMode::Edit => Some(self.api.detail(&ItemRef::new(model, id)).await?),
		};
		Ok((view, item))
	}

	/// Sets a field value
	pub fn set_value(&self, name: &str, value: Value) {
		if let Some(form) = self.form.lock_mut().as_mut() {
			form.set(name, value);
		}
	}

	/// Sets a field from the raw text of its control
	pub fn set_input(&self, name: &str, raw: &str) -> ConsoleResult<()> {
		let layout = self.layout.get_cloned().ok_or_else(|| ConsoleError::NoSchema(name.to_string()))?;
		let field = layout
			.field(name)
			.ok_or_else(|| ConsoleError::InvalidInput(format!("unknown field `{}`", name)))?;
		self.set_value(name, field.control.parse_input(raw));
		Ok(())
	}

	pub fn is_dirty(&self) -> bool {
		self.form.lock_ref().as_ref().is_some_and(FormState::is_dirty)
	}

	/// Whether the submit control is enabled
	pub fn can_submit(&self) -> bool {
		let has_submit = self.layout.lock_ref().as_ref().is_some_and(|l| l.has_submit());
		has_submit
			&& !self.submit_action.is_in_flight()
			&& self.form.lock_ref().as_ref().is_some_and(FormState::can_submit)
	}

	/// Current values formatted for the read-only view
	pub fn display_values(&self) -> Item {
		let layout = self.layout.get_cloned();
		let form = self.form.lock_ref();
		match (layout, form.as_ref()) {
			(Some(layout), Some(form)) => display_values(&layout, form.values()),
			_ => Item::new(),
		}
	}

	/// Validates and sends the form
	///
	/// Edit sends only the dirty fields and re-baselines on success; Create
	/// returns the list route to navigate to.
	pub async fn submit(&self) -> ConsoleResult<SubmitOutcome> {
		let mounted = self
			.mounted
			.lock()
			.clone()
			.ok_or_else(|| ConsoleError::NoSchema("no record is mounted".to_string()))?;
		let result = self.submit_action.run(self.send(&mounted)).await;
		match &result {
			Ok(SubmitOutcome::NoChange) => self.notifications.info("No changes to update"),
			Ok(SubmitOutcome::Updated) => self.notifications.success("Update successfully"),
			Ok(SubmitOutcome::Created { .. }) => self.notifications.success("Create successfully"),
			Err(ConsoleError::Validation(errors)) => {
				self.field_errors.set(Some(errors.clone()));
				self.notifications.error(errors.to_string());
			}
			Err(err) => self.notifications.error(err.to_string()),
		}
		result
	}

	fn is_mounted(&self, record: &Mounted) -> bool {
		self.mounted
			.lock()
			.as_ref()
			.is_some_and(|m| m.model == record.model && m.id == record.id)
	}

	async fn send(&self, mounted: &Mounted) -> ConsoleResult<SubmitOutcome> {
		let form = self
			.form
			.get_cloned()
			.ok_or_else(|| ConsoleError::NoSchema("no record is mounted".to_string()))?;
		let plan = prepare_submit(&mounted.layout, &mounted.validator, &form)?;
		self.field_errors.set(None);

		match plan {
			SubmitPlan::NoChange => Ok(SubmitOutcome::NoChange),
			SubmitPlan::Update { data } => {
				let request = UpdateRequest {
					id: mounted.id,
					model: mounted.model.clone(),
					data,
				};
				let generation = self.generation.current();
				self.api.update(&request).await?;
				tracing::debug!(model = %mounted.model, id = mounted.id, "record updated");
				if !self.generation.is_current(generation) || !self.is_mounted(mounted) {
					tracing::debug!(model = %mounted.model, id = mounted.id, "record no longer mounted, form left as is");
					return Ok(SubmitOutcome::Updated);
				}
				if let Some(form) = self.form.lock_mut().as_mut() {
					form.rebaseline(&mounted.layout, &request.data);
				}
				Ok(SubmitOutcome::Updated)
			}
			SubmitPlan::Create { data } => {
				let request = CreateRequest {
					model: mounted.model.clone(),
					data,
				};
				let created = self.api.create(&request).await?;
				tracing::debug!(model = %mounted.model, id = created.id, "record created");
				Ok(SubmitOutcome::Created {
					id: created.id,
					route: list_route(&mounted.model),
				})
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_list_route() {
		assert_eq!(list_route("user"), "/model/user");
	}
}
