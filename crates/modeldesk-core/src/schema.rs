//! Schema interpretation
//!
//! Turns the raw [`SchemaView`] served by the API into the data the list
//! screen needs: sort fields, filter conditions, visible columns and the
//! composite display key of an item.
//!
//! Every function here is pure. The clock is passed in explicitly so that
//! date-range defaults are deterministic under test.

use chrono::{DateTime, Duration, SecondsFormat, Utc};
use modeldesk_types::{Category, Condition, ConditionCategory, Item, Schema, SchemaView};
use serde_json::Value;

/// Look-back of the default date-range filter
pub const DEFAULT_DATE_RANGE_DAYS: i64 = 2;

/// Separator between identity values in a display key
pub const DISPLAY_KEY_SEPARATOR: &str = " / ";

/// Re-derives `sort_fields` and `conditions` of a freshly fetched view
///
/// Any server-provided values for the derived fields are overwritten, so
/// applying this twice yields the same view.
///
/// # Examples
///
/// ```
/// use chrono::Utc;
/// use modeldesk_core::schema::interpret;
/// use modeldesk_types::{Category, Schema, SchemaView};
///
/// let view = SchemaView::new(vec![
/// 	Schema::new("name", Category::String).sortable().filterable(),
/// 	Schema::new("modified", Category::Date).sortable(),
/// ]);
///
/// let view = interpret(view, Utc::now());
/// assert_eq!(view.sort_fields, vec!["name", "modified"]);
/// assert_eq!(view.conditions.len(), 1);
/// ```
pub fn interpret(mut view: SchemaView, now: DateTime<Utc>) -> SchemaView {
	view.sort_fields = derive_sort_fields(&view.schemas);
	view.conditions = derive_conditions(&view.schemas, now);
	tracing::debug!(
		fields = view.schemas.len(),
		sort_fields = view.sort_fields.len(),
		conditions = view.conditions.len(),
		"interpreted schema view"
	);
	view
}

/// Names of the sortable schemas, in declaration order
pub fn derive_sort_fields(schemas: &[Schema]) -> Vec<String> {
	schemas
		.iter()
		.filter(|s| s.sortable)
		.map(|s| s.name.clone())
		.collect()
}

/// One filter condition per filterable schema
///
/// Date fields get a date-range control defaulting to the last two days,
/// fields with options get a select, everything else a free-text input.
pub fn derive_conditions(schemas: &[Schema], now: DateTime<Utc>) -> Vec<Condition> {
	schemas
		.iter()
		.filter(|s| s.filterable)
		.map(|schema| {
			let category = if schema.category == Category::Date {
				ConditionCategory::Date
			} else if schema.options.is_some() {
				ConditionCategory::Select
			} else {
				ConditionCategory::Input
			};
			let default_value = match category {
				ConditionCategory::Date => Some(default_date_range(now)),
				ConditionCategory::Select | ConditionCategory::Input => None,
			};
			Condition {
				name: schema.name.clone(),
				label: schema.label.clone(),
				category,
				options: schema.options.clone().unwrap_or_default(),
				default_value,
			}
		})
		.collect()
}

/// `[now - 2 days, now]` as ISO-8601 UTC strings with millisecond precision
pub fn default_date_range(now: DateTime<Utc>) -> Value {
	let start = now - Duration::days(DEFAULT_DATE_RANGE_DAYS);
	Value::Array(vec![
		Value::String(start.to_rfc3339_opts(SecondsFormat::Millis, true)),
		Value::String(now.to_rfc3339_opts(SecondsFormat::Millis, true)),
	])
}

/// A list column
#[derive(Debug, Clone, PartialEq)]
pub struct Column<'a> {
	pub schema: &'a Schema,
	/// Pinned to the edge of the table
	pub fixed: bool,
}

impl Column<'_> {
	pub fn name(&self) -> &str {
		&self.schema.name
	}

	pub fn title(&self) -> &str {
		self.schema.title()
	}
}

/// Columns to display: neither `hidden` by the schema nor by the user
pub fn visible_columns<'a>(view: &'a SchemaView, hidden_columns: &[String]) -> Vec<Column<'a>> {
	view.schemas
		.iter()
		.filter(|s| !s.hidden && !hidden_columns.iter().any(|h| h == &s.name))
		.map(|schema| Column {
			schema,
			fixed: schema.fixed,
		})
		.collect()
}

/// Columns the user may toggle on or off (everything not schema-hidden)
pub fn toggleable_columns(view: &SchemaView) -> impl Iterator<Item = &Schema> {
	view.schemas.iter().filter(|s| !s.hidden)
}

/// Composite key identifying an item to a human
///
/// Values of the `identity` fields joined with `" / "`; the item id when no
/// identity field has a value.
pub fn display_key(view: &SchemaView, item: &Item) -> String {
	let parts: Vec<String> = view
		.schemas
		.iter()
		.filter(|s| s.identity)
		.filter_map(|s| item.get(&s.name))
		.map(value_text)
		.filter(|text| !text.is_empty())
		.collect();
	if parts.is_empty() {
		item.get("id").map(value_text).unwrap_or_default()
	} else {
		parts.join(DISPLAY_KEY_SEPARATOR)
	}
}

/// Plain text of a JSON value: strings unquoted, null empty
pub fn value_text(value: &Value) -> String {
	match value {
		Value::Null => String::new(),
		Value::String(s) => s.clone(),
		other => other.to_string(),
	}
}
