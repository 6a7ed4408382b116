//! Form layout: fields, controls and editability

use super::FormMode;
use modeldesk_types::{Category, Schema, SchemaView, SelectOption};
use serde_json::Value;

/// Name of the primary key field, shown in the title instead of the form
pub const ID_FIELD: &str = "id";

/// How a field is shown when not editable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewRender {
	Text,
	/// Pretty-printed preformatted block
	Block,
	Tags,
	Badge,
	Flag,
	/// Formatted timestamp
	Date,
	Nothing,
}

/// Input control of an editable field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditControl {
	TextInput,
	TextArea {
		/// Content is parsed as JSON on submit
		json: bool,
	},
	MultiSelect(Vec<SelectOption>),
	/// Free tags entered as comma separated text
	TagInput,
	RadioGroup(Vec<SelectOption>),
	ReadOnlyBadge,
	Switch,
	/// Numeric input; an empty input means null
	NumberInput,
	/// ISO-8601 timestamp with offset
	DateTimePicker,
	Select(Vec<SelectOption>),
	Spacer,
}

impl EditControl {
	/// Converts raw control input into a form value
	pub fn parse_input(&self, raw: &str) -> Value {
		match self {
			EditControl::MultiSelect(_) | EditControl::TagInput => Value::Array(
				raw.split(',')
					.map(str::trim)
					.filter(|s| !s.is_empty())
					.map(|s| Value::String(s.to_string()))
					.collect(),
			),
			EditControl::RadioGroup(_) => raw
				.trim()
				.parse::<i64>()
				.map(Value::from)
				.unwrap_or_else(|_| Value::String(raw.to_string())),
			EditControl::Switch => Value::Bool(matches!(raw.trim(), "true" | "1" | "on")),
			EditControl::TextInput
			| EditControl::TextArea { .. }
			| EditControl::NumberInput
			| EditControl::DateTimePicker
			| EditControl::Select(_)
			| EditControl::ReadOnlyBadge
			| EditControl::Spacer => Value::String(raw.to_string()),
		}
	}
}

/// Read-only rendering of a field
pub fn view_render(schema: &Schema) -> ViewRender {
	match schema.category {
		Category::String | Category::Number | Category::Bytes | Category::ByteSize => ViewRender::Text,
		Category::Json | Category::Code => ViewRender::Block,
		Category::Strings => ViewRender::Tags,
		Category::Status | Category::Result => ViewRender::Badge,
		Category::Boolean => ViewRender::Flag,
		Category::Date => ViewRender::Date,
		Category::Placeholder => ViewRender::Nothing,
	}
}

fn status_options() -> Vec<SelectOption> {
	vec![SelectOption::new("Active", "1"), SelectOption::new("Inactive", "0")]
}

/// Input control of a field
pub fn edit_control(schema: &Schema) -> EditControl {
	match schema.category {
		Category::Json => EditControl::TextArea { json: true },
		Category::Code => EditControl::TextArea { json: false },
		Category::Strings => match &schema.options {
			Some(options) => EditControl::MultiSelect(options.clone()),
			None => EditControl::TagInput,
		},
		Category::Status => EditControl::RadioGroup(status_options()),
		Category::Result => EditControl::ReadOnlyBadge,
		Category::Boolean => EditControl::Switch,
		Category::Number => EditControl::NumberInput,
		Category::Date => EditControl::DateTimePicker,
		Category::Placeholder => EditControl::Spacer,
		Category::String | Category::Bytes | Category::ByteSize => match &schema.options {
			Some(options) => EditControl::Select(options.clone()),
			None => EditControl::TextInput,
		},
	}
}

/// Whether a form field accepts input in `mode`
pub fn is_editable(schema: &Schema, mode: FormMode) -> bool {
	match mode {
		FormMode::View => false,
		FormMode::Edit => {
			!schema.read_only && !matches!(schema.category, Category::Result | Category::Placeholder)
		}
		FormMode::Create => !matches!(schema.category, Category::Result | Category::Placeholder),
	}
}

/// Render descriptor of one form field
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
	pub name: String,
	pub title: String,
	pub category: Category,
	/// Grid width, 1-4
	pub span: u8,
	pub required: bool,
	pub editable: bool,
	pub view: ViewRender,
	pub control: EditControl,
	pub default_value: Option<Value>,
}

impl FieldSpec {
	fn from_schema(schema: &Schema, mode: FormMode) -> Self {
		Self {
			name: schema.name.clone(),
			title: schema.title().to_string(),
			category: schema.category,
			span: schema.span(),
			required: schema.required,
			editable: is_editable(schema, mode),
			view: view_render(schema),
			control: edit_control(schema),
			default_value: schema.default_value.clone(),
		}
	}
}

/// Ordered form fields of one model in one mode
#[derive(Debug, Clone, PartialEq)]
pub struct FormLayout {
	pub model: String,
	pub mode: FormMode,
	pub fields: Vec<FieldSpec>,
}

impl FormLayout {
	/// Derives the form of `model`
	///
	/// Hidden fields and the id are left out; in Create mode so are
	/// server-filled (`auto_create`) fields.
	pub fn derive(model: &str, view: &SchemaView, mode: FormMode) -> Self {
		let fields = view
			.schemas
			.iter()
			.filter(|s| !s.hidden && s.name != ID_FIELD)
			.filter(|s| mode != FormMode::Create || !s.auto_create)
			.map(|s| FieldSpec::from_schema(s, mode))
			.collect();
		Self {
			model: model.to_string(),
			mode,
			fields,
		}
	}

	pub fn field(&self, name: &str) -> Option<&FieldSpec> {
		self.fields.iter().find(|f| f.name == name)
	}

	pub fn editable_fields(&self) -> impl Iterator<Item = &FieldSpec> {
		self.fields.iter().filter(|f| f.editable)
	}

	/// Whether a submit control is shown at all
	pub fn has_submit(&self) -> bool {
		self.mode.is_writable() && self.fields.iter().any(|f| f.editable)
	}
}
