//! Schema model for server-declared models
//!
//! A [`SchemaView`] is the complete per-model contract: the ordered field
//! [`Schema`]s plus the derived sort fields, filter [`Condition`]s and the
//! create/edit [`AccessPolicy`] objects.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// A single row of a model: field name to raw value.
pub type Item = serde_json::Map<String, serde_json::Value>;

/// Extracts the numeric `id` of an item, accepting numeric strings.
pub fn item_id(item: &Item) -> Option<u64> {
	match item.get("id")? {
		serde_json::Value::Number(n) => n.as_u64(),
		serde_json::Value::String(s) => s.trim().parse().ok(),
		_ => None,
	}
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
	D: Deserializer<'de>,
	T: Default + Deserialize<'de>,
{
	Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

fn default_span() -> u8 {
	1
}

/// Field category
///
/// Closed set of rendering/editing strategies. Every dispatch over this enum
/// is an exhaustive `match`, so adding a variant fails to compile until each
/// renderer and form-control site handles it.
///
/// Unknown wire names fall back to [`Category::String`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Category {
	/// Plain text
	#[default]
	String,
	/// Numeric value
	Number,
	/// True/false flag
	Boolean,
	/// Byte count shown with decimal units
	Bytes,
	/// Byte count shown with binary units
	ByteSize,
	/// 0/1 active badge
	Status,
	/// success/fail badge
	Result,
	/// List of tags
	Strings,
	/// Timestamp
	Date,
	/// Structured JSON document
	Json,
	/// Source code or other preformatted text
	Code,
	/// Layout-only spacer, carries no data
	Placeholder,
}

impl Category {
	/// Every category, in declaration order
	pub const ALL: [Category; 12] = [
		Category::String,
		Category::Number,
		Category::Boolean,
		Category::Bytes,
		Category::ByteSize,
		Category::Status,
		Category::Result,
		Category::Strings,
		Category::Date,
		Category::Json,
		Category::Code,
		Category::Placeholder,
	];

	/// Wire name of this category
	pub fn as_str(&self) -> &'static str {
		match self {
			Category::String => "string",
			Category::Number => "number",
			Category::Boolean => "boolean",
			Category::Bytes => "bytes",
			Category::ByteSize => "byte_size",
			Category::Status => "status",
			Category::Result => "result",
			Category::Strings => "strings",
			Category::Date => "date",
			Category::Json => "json",
			Category::Code => "code",
			Category::Placeholder => "placeholder",
		}
	}

	/// Parses a wire name, returning `None` for unknown names
	pub fn parse(name: &str) -> Option<Self> {
		Self::ALL.into_iter().find(|c| c.as_str() == name)
	}
}

impl From<String> for Category {
	fn from(name: String) -> Self {
		Self::parse(&name).unwrap_or_else(|| {
			tracing::warn!(category = %name, "unknown field category, rendering as string");
			Category::String
		})
	}
}

impl From<Category> for String {
	fn from(category: Category) -> Self {
		category.as_str().to_string()
	}
}

impl fmt::Display for Category {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// One entry of an enumerated choice list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
	/// Display text
	pub label: String,
	/// Submitted value
	pub value: String,
}

impl SelectOption {
	/// Create a new option
	pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
		Self {
			label: label.into(),
			value: value.into(),
		}
	}
}

/// Per-field metadata of a model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schema {
	/// Field identifier, unique within the model
	pub name: String,
	/// Display override for the field name
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub label: Option<String>,
	#[serde(default)]
	pub category: Category,
	/// Not editable once the record exists
	#[serde(default)]
	pub read_only: bool,
	/// Filled by the server; excluded from create forms and payloads
	#[serde(default)]
	pub auto_create: bool,
	#[serde(default)]
	pub required: bool,
	/// Participates in the composite display key
	#[serde(default)]
	pub identity: bool,
	/// Pinned column
	#[serde(default)]
	pub fixed: bool,
	#[serde(default)]
	pub options: Option<Vec<SelectOption>>,
	/// Excluded from display entirely
	#[serde(default)]
	pub hidden: bool,
	#[serde(default)]
	pub sortable: bool,
	#[serde(default)]
	pub filterable: bool,
	/// Large values collapse behind a popover
	#[serde(default)]
	pub popover: bool,
	/// Form grid width (1-4)
	#[serde(default = "default_span")]
	pub span: u8,
	#[serde(default)]
	pub default_value: Option<serde_json::Value>,
	/// Values rendered as blank
	#[serde(default, deserialize_with = "null_as_default")]
	pub hidden_values: Vec<String>,
	/// Truncation threshold in characters
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub max_width: Option<usize>,
}

impl Schema {
	/// Create a schema with every flag cleared
	pub fn new(name: impl Into<String>, category: Category) -> Self {
		Self {
			name: name.into(),
			label: None,
			category,
			read_only: false,
			auto_create: false,
			required: false,
			identity: false,
			fixed: false,
			options: None,
			hidden: false,
			sortable: false,
			filterable: false,
			popover: false,
			span: default_span(),
			default_value: None,
			hidden_values: Vec::new(),
			max_width: None,
		}
	}

	/// Display title: the label when present, the name otherwise
	pub fn title(&self) -> &str {
		self.label.as_deref().unwrap_or(&self.name)
	}

	/// Form grid width clamped to 1-4
	pub fn span(&self) -> u8 {
		self.span.clamp(1, 4)
	}

	pub fn with_label(mut self, label: impl Into<String>) -> Self {
		self.label = Some(label.into());
		self
	}

	pub fn read_only(mut self) -> Self {
		self.read_only = true;
		self
	}

	pub fn auto_create(mut self) -> Self {
		self.auto_create = true;
		self
	}

	pub fn required(mut self) -> Self {
		self.required = true;
		self
	}

	pub fn identity(mut self) -> Self {
		self.identity = true;
		self
	}

	pub fn fixed(mut self) -> Self {
		self.fixed = true;
		self
	}

	pub fn hidden(mut self) -> Self {
		self.hidden = true;
		self
	}

	pub fn sortable(mut self) -> Self {
		self.sortable = true;
		self
	}

	pub fn filterable(mut self) -> Self {
		self.filterable = true;
		self
	}

	pub fn popover(mut self) -> Self {
		self.popover = true;
		self
	}

	pub fn with_options(mut self, options: Vec<SelectOption>) -> Self {
		self.options = Some(options);
		self
	}

	pub fn with_span(mut self, span: u8) -> Self {
		self.span = span;
		self
	}

	pub fn with_default(mut self, value: serde_json::Value) -> Self {
		self.default_value = Some(value);
		self
	}

	pub fn with_hidden_values(mut self, values: Vec<String>) -> Self {
		self.hidden_values = values;
		self
	}

	pub fn with_max_width(mut self, width: usize) -> Self {
		self.max_width = Some(width);
		self
	}
}

/// Kind of filter control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConditionCategory {
	/// Free text input
	Input,
	/// Date range picker
	Date,
	/// Dropdown over the schema options
	Select,
}

/// Filter control derived from a filterable schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
	/// Name of the filtered field
	pub name: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub label: Option<String>,
	pub category: ConditionCategory,
	#[serde(default, deserialize_with = "null_as_default")]
	pub options: Vec<SelectOption>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub default_value: Option<serde_json::Value>,
}

/// Role/group based authorization policy
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessPolicy {
	#[serde(default)]
	pub disabled: bool,
	/// Allowed roles; `"*"` admits any authenticated user
	#[serde(default, deserialize_with = "null_as_default")]
	pub roles: Vec<String>,
	#[serde(default, deserialize_with = "null_as_default")]
	pub groups: Vec<String>,
}

impl AccessPolicy {
	/// Wildcard role granting access to any authenticated user
	pub const ANY: &'static str = "*";

	/// Create an enabled policy
	pub fn new<R, G>(roles: R, groups: G) -> Self
	where
		R: IntoIterator,
		R::Item: Into<String>,
		G: IntoIterator,
		G::Item: Into<String>,
	{
		Self {
			disabled: false,
			roles: roles.into_iter().map(Into::into).collect(),
			groups: groups.into_iter().map(Into::into).collect(),
		}
	}
}

/// Complete per-model contract served by `/models/schema`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaView {
	#[serde(default, deserialize_with = "null_as_default")]
	pub schemas: Vec<Schema>,
	/// Derived client-side; any server value is overwritten
	#[serde(default, deserialize_with = "null_as_default")]
	pub conditions: Vec<Condition>,
	/// Derived client-side; any server value is overwritten
	#[serde(default, deserialize_with = "null_as_default")]
	pub sort_fields: Vec<String>,
	#[serde(default)]
	pub allow_create: Option<AccessPolicy>,
	#[serde(default)]
	pub allow_edit: Option<AccessPolicy>,
}

impl SchemaView {
	/// Create a view from field schemas, without derived data or policies
	pub fn new(schemas: Vec<Schema>) -> Self {
		Self {
			schemas,
			..Default::default()
		}
	}

	/// Look up a field schema by name
	pub fn schema(&self, name: &str) -> Option<&Schema> {
		self.schemas.iter().find(|s| s.name == name)
	}
}
