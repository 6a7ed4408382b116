//! Per-model value rules

use super::layout::FormLayout;
use modeldesk_types::{Category, ConsoleError, ConsoleResult, Item, ValidationErrors};
use serde_json::Value;

/// Expected value shape of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueRule {
	StringArray,
	/// Integer 0 or 1
	Flag,
	Boolean,
	/// Number or numeric text
	Number,
	Text,
}

impl ValueRule {
	pub fn for_category(category: Category) -> Self {
		match category {
			Category::Strings => ValueRule::StringArray,
			Category::Status => ValueRule::Flag,
			Category::Boolean => ValueRule::Boolean,
			Category::Number => ValueRule::Number,
			Category::String
			| Category::Bytes
			| Category::ByteSize
			| Category::Result
			| Category::Date
			| Category::Json
			| Category::Code
			| Category::Placeholder => ValueRule::Text,
		}
	}

	fn check(&self, value: &Value) -> Result<(), &'static str> {
		let ok = match self {
			ValueRule::StringArray => value
				.as_array()
				.is_some_and(|values| values.iter().all(Value::is_string)),
			ValueRule::Flag => value.as_i64().is_some_and(|n| (0..=1).contains(&n)),
			ValueRule::Boolean => value.is_boolean(),
			ValueRule::Number => match value {
				Value::Number(_) => true,
				Value::String(s) => s.trim().parse::<f64>().is_ok(),
				_ => false,
			},
			ValueRule::Text => value.is_string(),
		};
		if ok {
			return Ok(());
		}
		Err(match self {
			ValueRule::StringArray => "must be a list of strings",
			ValueRule::Flag => "must be 0 or 1",
			ValueRule::Boolean => "must be true or false",
			ValueRule::Number => "must be a number",
			ValueRule::Text => "must be text",
		})
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct FieldRule {
	name: String,
	rule: ValueRule,
	required: bool,
}

/// Value rules of one model's form
///
/// Bound to the model it was derived from; validating another model's
/// values is a [`ConsoleError::StaleValidator`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormValidator {
	model: String,
	rules: Vec<FieldRule>,
}

impl FormValidator {
	/// Rules for the editable fields of `layout`
	pub fn derive(layout: &FormLayout) -> Self {
		let rules = layout
			.editable_fields()
			.filter(|f| f.category != Category::Placeholder)
			.map(|f| FieldRule {
				name: f.name.clone(),
				rule: ValueRule::for_category(f.category),
				required: f.required,
			})
			.collect();
		Self {
			model: layout.model.clone(),
			rules,
		}
	}

	pub fn model(&self) -> &str {
		&self.model
	}

	/// Names of the validated fields
	pub fn fields(&self) -> impl Iterator<Item = &str> {
		self.rules.iter().map(|r| r.name.as_str())
	}

	/// Checks `values` of `model`
	///
	/// Null or absent values pass for optional fields. An empty string
	/// counts as absent for every non-text rule.
	pub fn validate(&self, model: &str, values: &Item) -> ConsoleResult<()> {
		if model != self.model {
			return Err(ConsoleError::StaleValidator {
				expected: self.model.clone(),
				actual: model.to_string(),
			});
		}
		let mut errors = ValidationErrors::new();
		for rule in &self.rules {
			let value = match values.get(&rule.name) {
				None | Some(Value::Null) => None,
				Some(Value::String(s)) if rule.rule != ValueRule::Text && s.is_empty() => None,
				Some(value) => Some(value),
			};
			match value {
				None if rule.required => errors.add(&rule.name, "is required"),
				None => {}
				Some(value) => {
					if let Err(message) = rule.rule.check(value) {
						errors.add(&rule.name, message);
					}
				}
			}
		}
		errors.into_result().map_err(ConsoleError::from)
	}
}
