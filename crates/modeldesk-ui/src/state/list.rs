//! List page of one model

use crate::context::AppContext;
use crate::notifications::Notifications;
use crate::state::Generation;
use chrono::Utc;
use futures_signals::signal::Mutable;
use futures_signals::signal_vec::MutableVec;
use modeldesk_client::ConsoleApi;
use modeldesk_core::query::Filters;
use modeldesk_core::schema::{display_key, interpret, visible_columns};
use modeldesk_core::{
	ActionGuard, CountCache, CountState, ModelViewOptions, Pagination, Permissions, QueryState, RenderedCell,
	SearchParams, ViewOptionStore, render_cell,
};
use modeldesk_types::{ConsoleError, ConsoleResult, Item, ItemRef, SchemaView, item_id};
use serde_json::Value;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::session::SessionState;

/// Loading phase of a model mount
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ListPhase {
	#[default]
	Uninitialized,
	FetchingSchema,
	/// Schema known, first page requested
	Listing,
	Ready,
}

/// What the table body shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayState {
	Loading,
	Empty,
	/// Number of rows on the page
	Rows(usize),
}

/// One table row ready for rendering
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedRow {
	pub id: Option<u64>,
	/// Identity fields joined for titles and confirmations
	pub key: String,
	/// `(column name, cell)` in column order
	pub cells: Vec<(String, RenderedCell)>,
}

/// List view state for one model at a time
///
/// Mounting another model resets keyword, filters, rows and count before the
/// new schema is requested.
pub struct ModelListState {
	/// Loaded model name
	pub model: Mutable<Option<String>>,
	pub phase: Mutable<ListPhase>,
	/// Set while any list request is pending
	pub loading: Mutable<bool>,
	/// Interpreted schema of the loaded model
	pub view: Mutable<Option<Arc<SchemaView>>>,
	/// Stored preferences of the loaded model
	pub options: Mutable<ModelViewOptions>,
	/// Parameters of the page URL
	pub params: Mutable<SearchParams>,
	pub keyword: Mutable<String>,
	pub filters: Mutable<Filters>,
	/// Query of the last list request
	pub query: Mutable<Option<QueryState>>,
	pub items: MutableVec<Item>,
	pub count: Mutable<CountState>,
	pub permissions: Mutable<Permissions>,
	/// Last load error
	pub error: Mutable<Option<String>>,
	pub delete_action: ActionGuard,
	count_cache: parking_lot::Mutex<CountCache>,
	/// Bumped by model switches
	schema_generation: Generation,
	/// Bumped by model switches and list requests
	generation: Generation,
	/// List requests awaiting a response, stale ones included
	pending: AtomicUsize,
	api: Arc<dyn ConsoleApi>,
	preferences: ViewOptionStore,
	notifications: Notifications,
	session: Arc<SessionState>,
}

impl ModelListState {
	pub fn new(ctx: &AppContext) -> Arc<Self> {
		Arc::new(Self {
			model: Mutable::new(None),
			phase: Mutable::new(ListPhase::Uninitialized),
			loading: Mutable::new(false),
			view: Mutable::new(None),
			options: Mutable::new(ModelViewOptions::default()),
			params: Mutable::new(SearchParams::default()),
			keyword: Mutable::new(String::new()),
			filters: Mutable::new(Filters::new()),
			query: Mutable::new(None),
			items: MutableVec::new(),
			count: Mutable::new(CountState::Unknown),
			permissions: Mutable::new(Permissions::default()),
			error: Mutable::new(None),
			delete_action: ActionGuard::new("delete"),
			count_cache: parking_lot::Mutex::new(CountCache::new()),
			schema_generation: Generation::default(),
			generation: Generation::default(),
			pending: AtomicUsize::new(0),
			api: Arc::clone(ctx.api()),
			preferences: ctx.preferences().clone(),
			notifications: ctx.notifications().clone(),
			session: Arc::clone(ctx.session()),
		})
	}

	fn model_name(&self) -> ConsoleResult<String> {
		self.model
			.get_cloned()
			.ok_or_else(|| ConsoleError::NoSchema("no model is mounted".to_string()))
	}

	/// Applies the page URL parameters
	///
	/// A new model name triggers a schema fetch before the list; otherwise
	/// only the list is reloaded.
	pub async fn mount(&self, params: SearchParams) -> ConsoleResult<()> {
		let Some(model) = params.name.clone() else {
			return Err(ConsoleError::InvalidInput("missing model name".to_string()));
		};
		let changed =
			self.model.lock_ref().as_deref() != Some(model.as_str()) || self.view.lock_ref().is_none();
		self.params.set(params);
		if changed && !self.switch_model(&model).await? {
			return Ok(());
		}
		self.load().await
	}

	/// Resets the state for `model` and loads its schema; `false` when a
	/// newer mount superseded this one
	async fn switch_model(&self, model: &str) -> ConsoleResult<bool> {
		let generation = self.schema_generation.next();
		self.generation.next();
		tracing::debug!(model = %model, generation, "mounting model");

		self.model.set(Some(model.to_string()));
		self.options.set(self.preferences.get(model));
		self.keyword.set(String::new());
		self.filters.set(Filters::new());
		self.items.lock_mut().clear();
		self.count_cache.lock().reset();
		self.count.set(CountState::Unknown);
		self.query.set(None);
		self.view.set(None);
		self.error.set(None);
		self.phase.set(ListPhase::FetchingSchema);

		let result = self.api.schema(model).await;
		if !self.schema_generation.is_current(generation) {
			tracing::debug!(model = %model, generation, "dropping stale schema response");
			return Ok(false);
		}
		match result {
			Ok(view) => {
				let view = interpret(view, Utc::now());
				self.permissions.set(self.session.permissions(&view));
				self.view.set(Some(Arc::new(view)));
				self.phase.set(ListPhase::Listing);
				Ok(true)
			}
			Err(err) => {
				self.phase.set(ListPhase::Uninitialized);
				self.error.set(Some(err.to_string()));
				self.notifications.error(err.to_string());
				Err(err)
			}
		}
	}

	/// Fetches the current page
	///
	/// The count is requested only while it is unknown for the current
	/// keyword, filters and sort. While a schema is being fetched nothing is
	/// requested; the pending mount loads with the latest inputs.
	pub async fn load(&self) -> ConsoleResult<()> {
		let model = self.model_name()?;
		if self.phase.get() == ListPhase::FetchingSchema {
			tracing::debug!(model = %model, "schema pending, list load deferred");
			return Ok(());
		}
		let query = QueryState::derive(
			&self.params.lock_ref(),
			&self.options.lock_ref(),
			&self.keyword.lock_ref(),
			&self.filters.lock_ref(),
		);
		let with_count = self.count_cache.lock().observe(query.count_key());
		if with_count {
			self.count.set(CountState::Unknown);
		}
		let generation = self.generation.next();
		tracing::debug!(model = %model, page = query.page, sort = %query.sort, with_count, generation, "loading list");

		self.pending.fetch_add(1, Ordering::SeqCst);
		self.loading.set(true);
		self.query.set(Some(query.clone()));
		let result = self.api.list(&query.to_list_params(&model, with_count)).await;
		if self.pending.fetch_sub(1, Ordering::SeqCst) == 1 {
			self.loading.set(false);
		}
		if !self.generation.is_current(generation) {
			tracing::debug!(model = %model, generation, "dropping stale list response");
			return Ok(());
		}

		match result {
			Ok(response) => {
				if with_count {
					let mut cache = self.count_cache.lock();
					cache.record(CountState::from_response(response.count));
					self.count.set(cache.state());
				}
				self.items.lock_mut().replace_cloned(response.items);
				self.error.set(None);
				self.phase.set(ListPhase::Ready);
				Ok(())
			}
			Err(err) => {
				self.error.set(Some(err.to_string()));
				self.phase.set(ListPhase::Ready);
				self.notifications.error(err.to_string());
				Err(err)
			}
		}
	}

	pub fn display_state(&self) -> DisplayState {
		if self.loading.get() || self.phase.get() != ListPhase::Ready {
			return DisplayState::Loading;
		}
		match self.items.lock_ref().len() {
			0 => DisplayState::Empty,
			n => DisplayState::Rows(n),
		}
	}

	/// Cycles the sort of `field` and reloads from the first page
	pub async fn toggle_sort(&self, field: &str) -> ConsoleResult<()> {
		let model = self.model_name()?;
		let current = self.query.lock_ref().as_ref().map(|q| q.sort.clone());
		let next = modeldesk_core::toggle_sort(current.as_deref(), field);
		tracing::debug!(model = %model, field = %field, sort = ?next, "sort toggled");

		let mut options = self.options.get_cloned();
		options.order_by = next.clone().unwrap_or_default();
		self.save_options(&model, options);
		{
			let mut params = self.params.lock_mut();
			params.sort = next;
			params.page = Some(1);
		}
		self.load().await
	}

	pub async fn set_page(&self, page: u64) -> ConsoleResult<()> {
		self.params.lock_mut().page = Some(page.max(1));
		self.load().await
	}

	/// Stores a new page size and reloads from the first page
	pub async fn set_page_size(&self, limit: u64) -> ConsoleResult<()> {
		let model = self.model_name()?;
		let limit = limit.max(1);
		match self.preferences.set_limit(&model, limit) {
			Ok(options) => self.options.set(options),
			Err(err) => {
				self.report_preference_error(err);
				self.options.lock_mut().limit = limit;
			}
		}
		{
			let mut params = self.params.lock_mut();
			params.limit = Some(limit);
			params.page = Some(1);
		}
		self.load().await
	}

	/// Shows or hides a column; no reload
	pub fn toggle_column(&self, column: &str) -> ConsoleResult<()> {
		let model = self.model_name()?;
		let options = self.preferences.toggle_column(&model, column)?;
		self.options.set(options);
		Ok(())
	}

	pub async fn set_keyword(&self, keyword: &str) -> ConsoleResult<()> {
		self.keyword.set(keyword.to_string());
		self.params.lock_mut().page = Some(1);
		self.load().await
	}

	/// Sets one filter; a blank value clears it
	pub async fn set_filter(&self, name: &str, value: Value) -> ConsoleResult<()> {
		{
			let mut filters = self.filters.lock_mut();
			if value.is_null() || value.as_str().is_some_and(|s| s.trim().is_empty()) {
				filters.remove(name);
			} else {
				filters.insert(name.to_string(), value);
			}
		}
		self.params.lock_mut().page = Some(1);
		self.load().await
	}

	pub async fn clear_filters(&self) -> ConsoleResult<()> {
		self.filters.set(Filters::new());
		self.params.lock_mut().page = Some(1);
		self.load().await
	}

	/// Deletes a record and removes it from the page once the server
	/// confirms; the list is not refetched
	pub async fn delete(&self, id: u64) -> ConsoleResult<()> {
		let model = self.model_name()?;
		let item = ItemRef::new(&model, id);
		let generation = self.schema_generation.current();
		match self.delete_action.run(self.api.delete(&item)).await {
			Ok(()) => {
				let still_mounted = self.schema_generation.is_current(generation)
					&& self.model.lock_ref().as_deref() == Some(model.as_str());
				if !still_mounted {
					tracing::debug!(model = %model, id, "model switched during delete, rows left as is");
					self.notifications.success("Delete successfully");
					return Ok(());
				}
				let removed = {
					let mut items = self.items.lock_mut();
					let before = items.len();
					items.retain(|item| item_id(item) != Some(id));
					before - items.len()
				};
				if removed > 0 {
					let mut count = self.count.lock_mut();
					if let CountState::Known(n) = *count {
						*count = CountState::Known(n.saturating_sub(removed as u64));
					}
				}
				tracing::debug!(model = %model, id, removed, "record deleted");
				self.notifications.success("Delete successfully");
				Ok(())
			}
			Err(err) => {
				self.notifications.error(err.to_string());
				Err(err)
			}
		}
	}

	/// Page links for the current page; `None` while the count is unknown
	pub fn pagination(&self) -> Option<Pagination> {
		let total = self.count.get().known()?;
		let query = self.query.lock_ref();
		let query = query.as_ref()?;
		Some(Pagination::new(query.limit, query.page, total))
	}

	/// Names of the columns currently shown
	pub fn columns(&self) -> Vec<String> {
		let Some(view) = self.view.get_cloned() else {
			return Vec::new();
		};
		let options = self.options.lock_ref();
		visible_columns(&view, &options.hidden_columns)
			.iter()
			.map(|column| column.name().to_string())
			.collect()
	}

	/// Rows of the current page rendered for the visible columns
	pub fn rows(&self) -> Vec<RenderedRow> {
		let Some(view) = self.view.get_cloned() else {
			return Vec::new();
		};
		let options = self.options.lock_ref();
		let columns = visible_columns(&view, &options.hidden_columns);
		self.items
			.lock_ref()
			.iter()
			.map(|item| RenderedRow {
				id: item_id(item),
				key: display_key(&view, item),
				cells: columns
					.iter()
					.map(|column| {
						(
							column.name().to_string(),
							render_cell(column.schema, item.get(column.name())),
						)
					})
					.collect(),
			})
			.collect()
	}

	fn save_options(&self, model: &str, options: ModelViewOptions) {
		if let Err(err) = self.preferences.set(model, &options) {
			self.report_preference_error(err);
		}
		self.options.set(options);
	}

	fn report_preference_error(&self, err: modeldesk_core::PreferenceError) {
		tracing::warn!(error = %err, "failed to store view options");
		self.notifications.error(ConsoleError::from(err).to_string());
	}
}
