//! In-memory `ConsoleApi` for state container tests

#![allow(dead_code)]

use async_trait::async_trait;
use modeldesk_client::{ConsoleApi, UploadFile};
use modeldesk_core::ViewOptionStore;
use modeldesk_types::{
	AccessPolicy, Captcha, Category, ConsoleResult, CreateRequest, CreateResponse, HttpError, Item, ItemRef,
	ListParams, ListResponse, LoginRequest, LoginToken, ProfileUpdate, RegisterRequest, Schema, SchemaView,
	UpdateRequest, User, item_id,
};
use modeldesk_ui::AppContext;
use serde_json::json;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

pub const LOGIN_HASH: &str = "h-1";

/// Schema of the `user` model used across tests
pub fn user_view() -> SchemaView {
	let mut view = SchemaView::new(vec![
		Schema::new("id", Category::Number).sortable(),
		Schema::new("account", Category::String)
			.identity()
			.required()
			.sortable()
			.filterable(),
		Schema::new("status", Category::Status).filterable(),
		Schema::new("age", Category::Number),
		Schema::new("profile", Category::Json),
		Schema::new("created", Category::Date).auto_create().read_only(),
		Schema::new("modified", Category::Date).sortable().read_only(),
	]);
	view.allow_edit = Some(AccessPolicy::new(["admin"], Vec::<String>::new()));
	view
}

pub fn role_view() -> SchemaView {
	SchemaView::new(vec![
		Schema::new("id", Category::Number),
		Schema::new("name", Category::String).identity(),
	])
}

pub fn user_row(id: u64) -> Item {
	json!({
		"id": id,
		"account": format!("user{}", id),
		"status": 1,
		"age": 30,
		"profile": {"x": 1},
		"modified": "2024-03-01T10:00:00Z"
	})
	.as_object()
	.cloned()
	.unwrap_or_default()
}

#[derive(Default)]
pub struct FakeApi {
	pub schemas: Mutex<HashMap<String, SchemaView>>,
	pub rows: Mutex<HashMap<String, Vec<Item>>>,
	pub schema_calls: AtomicUsize,
	/// Models whose schema response waits for a notification
	pub schema_gates: Mutex<HashMap<String, Arc<Notify>>>,
	pub list_requests: Mutex<Vec<ListParams>>,
	/// Pages whose list response waits for a notification
	pub list_gates: Mutex<HashMap<u64, Arc<Notify>>>,
	pub update_gate: Mutex<Option<Arc<Notify>>>,
	pub delete_gate: Mutex<Option<Arc<Notify>>>,
	pub updates: Mutex<Vec<UpdateRequest>>,
	pub creates: Mutex<Vec<CreateRequest>>,
	pub deletes: Mutex<Vec<ItemRef>>,
	pub fail_delete: Mutex<Option<HttpError>>,
	pub fail_login: Mutex<Option<HttpError>>,
	pub captcha_calls: AtomicUsize,
	pub logins: Mutex<Vec<(LoginRequest, String)>>,
	pub user: Mutex<User>,
	pub logouts: AtomicUsize,
	pub refreshes: AtomicUsize,
	pub profile_updates: Mutex<Vec<ProfileUpdate>>,
	pub registrations: Mutex<Vec<RegisterRequest>>,
	pub uploads: Mutex<Vec<(String, Vec<UploadFile>)>>,
}

impl FakeApi {
	pub fn new() -> Arc<Self> {
		Arc::new(Self::default())
	}

	pub fn with_model(self: Arc<Self>, model: &str, view: SchemaView, rows: Vec<Item>) -> Arc<Self> {
		self.schemas.lock().unwrap().insert(model.to_string(), view);
		self.rows.lock().unwrap().insert(model.to_string(), rows);
		self
	}

	pub fn gate_page(&self, page: u64) -> Arc<Notify> {
		let gate = Arc::new(Notify::new());
		self.list_gates.lock().unwrap().insert(page, Arc::clone(&gate));
		gate
	}

	pub fn gate_schema(&self, model: &str) -> Arc<Notify> {
		let gate = Arc::new(Notify::new());
		self.schema_gates.lock().unwrap().insert(model.to_string(), Arc::clone(&gate));
		gate
	}

	pub fn gate_deletes(&self) -> Arc<Notify> {
		let gate = Arc::new(Notify::new());
		*self.delete_gate.lock().unwrap() = Some(Arc::clone(&gate));
		gate
	}

	pub fn gate_updates(&self) -> Arc<Notify> {
		let gate = Arc::new(Notify::new());
		*self.update_gate.lock().unwrap() = Some(Arc::clone(&gate));
		gate
	}

	pub fn count_flags(&self) -> Vec<bool> {
		self.list_requests.lock().unwrap().iter().map(|p| p.count).collect()
	}

	pub fn last_list(&self) -> Option<ListParams> {
		self.list_requests.lock().unwrap().last().cloned()
	}
}

fn not_found(what: &str) -> HttpError {
	HttpError::new(404, format!("{} not found", what))
}

#[async_trait]
impl ConsoleApi for FakeApi {
	async fn schema(&self, model: &str) -> ConsoleResult<SchemaView> {
		self.schema_calls.fetch_add(1, Ordering::SeqCst);
		let gate = self.schema_gates.lock().unwrap().remove(model);
		if let Some(gate) = gate {
			gate.notified().await;
		}
		let view = self.schemas.lock().unwrap().get(model).cloned();
		Ok(view.ok_or_else(|| not_found(model))?)
	}

	async fn list(&self, params: &ListParams) -> ConsoleResult<ListResponse> {
		self.list_requests.lock().unwrap().push(params.clone());
		let gate = self.list_gates.lock().unwrap().remove(&params.page);
		if let Some(gate) = gate {
			gate.notified().await;
		}
		let rows = self.rows.lock().unwrap().get(&params.model).cloned().unwrap_or_default();
		let skip = ((params.page.max(1) - 1) * params.limit) as usize;
		Ok(ListResponse {
			count: if params.count { rows.len() as i64 } else { -1 },
			items: rows.into_iter().skip(skip).take(params.limit as usize).collect(),
		})
	}

	async fn detail(&self, item: &ItemRef) -> ConsoleResult<Item> {
		let rows = self.rows.lock().unwrap().get(&item.model).cloned().unwrap_or_default();
		let found = rows.into_iter().find(|row| item_id(row) == Some(item.id));
		Ok(found.ok_or_else(|| not_found("record"))?)
	}

	async fn update(&self, request: &UpdateRequest) -> ConsoleResult<()> {
		let gate = self.update_gate.lock().unwrap().take();
		if let Some(gate) = gate {
			gate.notified().await;
		}
		self.updates.lock().unwrap().push(request.clone());
		Ok(())
	}

	async fn create(&self, request: &CreateRequest) -> ConsoleResult<CreateResponse> {
		self.creates.lock().unwrap().push(request.clone());
		Ok(CreateResponse { id: 42 })
	}

	async fn delete(&self, item: &ItemRef) -> ConsoleResult<()> {
		let gate = self.delete_gate.lock().unwrap().take();
		if let Some(gate) = gate {
			gate.notified().await;
		}
		if let Some(err) = self.fail_delete.lock().unwrap().clone() {
			return Err(err.into());
		}
		self.deletes.lock().unwrap().push(item.clone());
		if let Some(rows) = self.rows.lock().unwrap().get_mut(&item.model) {
			rows.retain(|row| item_id(row) != Some(item.id));
		}
		Ok(())
	}

	async fn captcha(&self, _theme: Option<&str>) -> ConsoleResult<Captcha> {
		let n = self.captcha_calls.fetch_add(1, Ordering::SeqCst) + 1;
		Ok(Captcha {
			id: format!("c{}", n),
			data: "iVBORw0KGgo=".to_string(),
		})
	}

	async fn me(&self) -> ConsoleResult<User> {
		Ok(self.user.lock().unwrap().clone())
	}

	async fn login_token(&self) -> ConsoleResult<LoginToken> {
		Ok(LoginToken {
			ts: 1_700_000_000,
			hash: LOGIN_HASH.to_string(),
			token: "t-1".to_string(),
		})
	}

	async fn login(&self, request: &LoginRequest, captcha: &str) -> ConsoleResult<User> {
		self.logins.lock().unwrap().push((request.clone(), captcha.to_string()));
		if let Some(err) = self.fail_login.lock().unwrap().clone() {
			return Err(err.into());
		}
		let user = User::with_account(request.account.clone(), ["admin"], Vec::<String>::new());
		*self.user.lock().unwrap() = user.clone();
		Ok(user)
	}

	async fn logout(&self) -> ConsoleResult<()> {
		self.logouts.fetch_add(1, Ordering::SeqCst);
		*self.user.lock().unwrap() = User::default();
		Ok(())
	}

	async fn refresh(&self) -> ConsoleResult<()> {
		self.refreshes.fetch_add(1, Ordering::SeqCst);
		Ok(())
	}

	async fn update_profile(&self, update: &ProfileUpdate) -> ConsoleResult<()> {
		self.profile_updates.lock().unwrap().push(update.clone());
		Ok(())
	}

	async fn register(&self, request: &RegisterRequest) -> ConsoleResult<()> {
		self.registrations.lock().unwrap().push(request.clone());
		Ok(())
	}

	async fn upload(&self, group: &str, files: Vec<UploadFile>) -> ConsoleResult<()> {
		self.uploads.lock().unwrap().push((group.to_string(), files));
		Ok(())
	}
}

pub fn context(api: &Arc<FakeApi>) -> AppContext {
	AppContext::new(api.clone(), ViewOptionStore::in_memory(), None)
}
