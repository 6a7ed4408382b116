//! Form values, dirty tracking and submission planning

use super::FormMode;
use super::layout::{FieldSpec, FormLayout};
use super::validate::FormValidator;
use crate::cell::pretty_json;
use crate::schema::value_text;
use modeldesk_types::{Category, ConsoleError, ConsoleResult, Item, ValidationErrors};
use serde_json::{Number, Value};

/// Editable representation of a loaded value
fn normalize(field: &FieldSpec, value: Option<&Value>) -> Value {
	let value = match value {
		None | Some(Value::Null) => {
			return match field.category {
				Category::Strings => Value::Array(Vec::new()),
				_ => Value::String(String::new()),
			};
		}
		Some(value) => value,
	};
	match field.category {
		Category::Json => Value::String(pretty_json(value)),
		Category::Status => match value {
			Value::String(s) => s
				.trim()
				.parse::<i64>()
				.map(Value::from)
				.unwrap_or_else(|_| value.clone()),
			_ => value.clone(),
		},
		Category::Strings | Category::Boolean | Category::Number => value.clone(),
		Category::String
		| Category::Bytes
		| Category::ByteSize
		| Category::Result
		| Category::Date
		| Category::Code
		| Category::Placeholder => match value {
			Value::String(_) => value.clone(),
			other => Value::String(value_text(other)),
		},
	}
}

/// Form values of a loaded record
///
/// Null Strings become `[]`, other nulls `""`; Json values are
/// pretty-printed for editing.
pub fn display_values(layout: &FormLayout, item: &Item) -> Item {
	layout
		.fields
		.iter()
		.map(|f| (f.name.clone(), normalize(f, item.get(&f.name))))
		.collect()
}

/// Initial values of a create form: each field's default when present
pub fn default_values(layout: &FormLayout) -> Item {
	layout
		.fields
		.iter()
		.map(|f| (f.name.clone(), normalize(f, f.default_value.as_ref())))
		.collect()
}

/// Baseline and current values of one form
#[derive(Debug, Clone, PartialEq)]
pub struct FormState {
	mode: FormMode,
	baseline: Item,
	values: Item,
}

impl FormState {
	/// A form whose current values equal `baseline`
	pub fn new(mode: FormMode, baseline: Item) -> Self {
		Self {
			mode,
			values: baseline.clone(),
			baseline,
		}
	}

	/// Form for `item` in `layout`'s mode, normalized for editing
	pub fn load(layout: &FormLayout, item: &Item) -> Self {
		Self::new(layout.mode, display_values(layout, item))
	}

	/// Create form filled with defaults
	pub fn for_create(layout: &FormLayout) -> Self {
		Self::new(FormMode::Create, default_values(layout))
	}

	pub fn mode(&self) -> FormMode {
		self.mode
	}

	pub fn values(&self) -> &Item {
		&self.values
	}

	pub fn baseline(&self) -> &Item {
		&self.baseline
	}

	pub fn get(&self, name: &str) -> Option<&Value> {
		self.values.get(name)
	}

	pub fn set(&mut self, name: impl Into<String>, value: Value) {
		self.values.insert(name.into(), value);
	}

	/// Names of fields whose value differs from the baseline
	pub fn dirty_fields(&self) -> Vec<&str> {
		self.values
			.iter()
			.filter(|(name, value)| self.baseline.get(name.as_str()).unwrap_or(&Value::Null) != *value)
			.map(|(name, _)| name.as_str())
			.collect()
	}

	pub fn is_dirty(&self) -> bool {
		!self.dirty_fields().is_empty()
	}

	/// Current values of the dirty fields
	pub fn diff(&self) -> Item {
		self.dirty_fields()
			.into_iter()
			.filter_map(|name| self.values.get(name).map(|v| (name.to_string(), v.clone())))
			.collect()
	}

	/// Whether the submit control is enabled
	pub fn can_submit(&self) -> bool {
		match self.mode {
			FormMode::View => false,
			FormMode::Edit => self.is_dirty(),
			FormMode::Create => true,
		}
	}

	/// Makes the current values the new baseline, merged with `saved`
	///
	/// Fields present in `saved` take its value; dirty state clears.
	pub fn rebaseline(&mut self, layout: &FormLayout, saved: &Item) {
		let mut merged = self.values.clone();
		for field in &layout.fields {
			if let Some(value) = saved.get(&field.name) {
				merged.insert(field.name.clone(), normalize(field, Some(value)));
			}
		}
		self.baseline = merged.clone();
		self.values = merged;
	}
}

/// What a submission should do
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitPlan {
	/// Nothing changed; no request is needed
	NoChange,
	/// Patch an existing record with the changed fields
	Update { data: Item },
	/// Create a new record
	Create { data: Item },
}

fn coerce_number(field: &str, raw: &str) -> ConsoleResult<Option<Value>> {
	let raw = raw.trim();
	if raw.is_empty() {
		return Ok(None);
	}
	if let Ok(n) = raw.parse::<i64>() {
		return Ok(Some(Value::from(n)));
	}
	match raw.parse::<f64>().ok().and_then(Number::from_f64) {
		Some(n) => Ok(Some(Value::Number(n))),
		None => {
			let mut errors = ValidationErrors::new();
			errors.add(field, "must be a number");
			Err(errors.into())
		}
	}
}

/// Converts form values into request values
///
/// Json text is parsed, Number text becomes a number (`""` is null) and
/// null values are dropped.
pub fn coerce(layout: &FormLayout, data: &Item) -> ConsoleResult<Item> {
	let mut out = Item::new();
	for (name, value) in data {
		let category = layout.field(name).map(|f| f.category);
		let coerced = match (category, value) {
			(_, Value::Null) => None,
			(Some(Category::Json), Value::String(raw)) => {
				if raw.trim().is_empty() {
					None
				} else {
					let parsed = serde_json::from_str::<Value>(raw).map_err(|err| ConsoleError::JsonField {
						field: name.clone(),
						message: err.to_string(),
					})?;
					Some(parsed)
				}
			}
			(Some(Category::Number), Value::String(raw)) => coerce_number(name, raw)?,
			(_, other) => Some(other.clone()),
		};
		if let Some(value) = coerced.filter(|v| !v.is_null()) {
			out.insert(name.clone(), value);
		}
	}
	Ok(out)
}

/// Validates the form and plans the request
///
/// Edit submits only dirty editable fields and yields
/// [`SubmitPlan::NoChange`] when nothing is left to send after coercion.
/// Create submits editable fields that carry a default or were changed;
/// untouched fields without a default stay unset.
pub fn prepare_submit(layout: &FormLayout, validator: &FormValidator, form: &FormState) -> ConsoleResult<SubmitPlan> {
	validator.validate(&layout.model, form.values())?;
	let editable = |name: &str| layout.field(name).is_some_and(|f| f.editable);
	match form.mode() {
		FormMode::View => Ok(SubmitPlan::NoChange),
		FormMode::Edit => {
			let changed: Item = form.diff().into_iter().filter(|(name, _)| editable(name.as_str())).collect();
			let data = coerce(layout, &changed)?;
			if data.is_empty() {
				return Ok(SubmitPlan::NoChange);
			}
			Ok(SubmitPlan::Update { data })
		}
		FormMode::Create => {
			let has_default = |name: &str| layout.field(name).is_some_and(|f| f.default_value.is_some());
			let values: Item = form
				.values()
				.iter()
				.filter(|(name, _)| editable(name.as_str()))
				.filter(|(name, value)| has_default(name.as_str()) || form.baseline().get(name.as_str()) != Some(*value))
				.map(|(k, v)| (k.clone(), v.clone()))
				.collect();
			Ok(SubmitPlan::Create {
				data: coerce(layout, &values)?,
			})
		}
	}
}
