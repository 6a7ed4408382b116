//! Table cell rendering
//!
//! [`render_cell`] maps a field schema and a raw value to a toolkit-neutral
//! [`RenderedCell`]. The view layer only has to draw the variants of
//! [`CellView`].

use crate::schema::value_text;
use chrono::{DateTime, NaiveDateTime};
use modeldesk_types::{Category, Schema};
use serde_json::Value;

/// Characters kept in the preview of a collapsed cell without `max_width`
pub const PREVIEW_CHARS: usize = 30;

/// Text shown for an empty date
pub const EMPTY_DATE: &str = "--";

const DATE_DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Two-state badge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Badge {
	Active,
	Inactive,
	Success,
	Failed,
}

/// Kind of preformatted block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
	Json,
	Code,
}

/// What to draw in a cell
#[derive(Debug, Clone, PartialEq)]
pub enum CellView {
	/// Blank cell
	Empty,
	/// Layout spacer, draws nothing
	Spacer,
	Text(String),
	Flag(bool),
	Badge(Badge),
	Tags(Vec<String>),
	Block { kind: BlockKind, text: String },
	/// Large value behind a popover
	Collapsed {
		preview: String,
		chars: usize,
		full: Box<CellView>,
	},
}

/// Layout hints carried alongside the view
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StyleHint {
	pub fixed: bool,
	pub max_width: Option<usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderedCell {
	pub view: CellView,
	pub style: StyleHint,
}

/// Renders one cell
///
/// # Examples
///
/// ```
/// use modeldesk_core::cell::{render_cell, Badge, CellView};
/// use modeldesk_types::{Category, Schema};
/// use serde_json::json;
///
/// let schema = Schema::new("status", Category::Status);
/// let cell = render_cell(&schema, Some(&json!(1)));
/// assert_eq!(cell.view, CellView::Badge(Badge::Active));
/// ```
pub fn render_cell(schema: &Schema, value: Option<&Value>) -> RenderedCell {
	let style = StyleHint {
		fixed: schema.fixed,
		max_width: schema.max_width,
	};
	let view = match value {
		_ if schema.category == Category::Placeholder => CellView::Spacer,
		None | Some(Value::Null) => CellView::Empty,
		Some(value) if schema.hidden_values.contains(&value_text(value)) => CellView::Empty,
		Some(value) => collapse(schema, render_value(schema.category, value)),
	};
	RenderedCell { view, style }
}

fn render_value(category: Category, value: &Value) -> CellView {
	match category {
		Category::String | Category::Number => CellView::Text(value_text(value)),
		Category::Boolean => CellView::Flag(truthy(value)),
		Category::Bytes => CellView::Text(number_or_text(value, format_bytes)),
		Category::ByteSize => CellView::Text(number_or_text(value, format_byte_size)),
		Category::Status => CellView::Badge(if value_text(value) == "1" {
			Badge::Active
		} else {
			Badge::Inactive
		}),
		Category::Result => CellView::Badge(if value_text(value) == "1" {
			Badge::Failed
		} else {
			Badge::Success
		}),
		Category::Strings => CellView::Tags(tags(value)),
		Category::Date => CellView::Text(format_date(&value_text(value))),
		Category::Json => CellView::Block {
			kind: BlockKind::Json,
			text: pretty_json(value),
		},
		Category::Code => CellView::Block {
			kind: BlockKind::Code,
			text: match value {
				Value::String(s) => s.clone(),
				other => serde_json::to_string_pretty(other).unwrap_or_else(|_| other.to_string()),
			},
		},
		Category::Placeholder => CellView::Spacer,
	}
}

fn collapse(schema: &Schema, view: CellView) -> CellView {
	let text = match &view {
		CellView::Text(text) | CellView::Block { text, .. } => text,
		CellView::Empty
		| CellView::Spacer
		| CellView::Flag(_)
		| CellView::Badge(_)
		| CellView::Tags(_)
		| CellView::Collapsed { .. } => return view,
	};
	let chars = text.chars().count();
	let too_wide = schema.max_width.is_some_and(|width| chars > width);
	if chars == 0 || !(schema.popover || too_wide) {
		return view;
	}
	let keep = schema.max_width.unwrap_or(PREVIEW_CHARS);
	let mut preview: String = text.chars().take(keep).collect();
	if chars > keep {
		preview.push('…');
	}
	CellView::Collapsed {
		preview,
		chars,
		full: Box::new(view),
	}
}

fn truthy(value: &Value) -> bool {
	match value {
		Value::Bool(b) => *b,
		Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
		Value::String(s) => matches!(s.trim(), "1" | "true" | "TRUE" | "True"),
		Value::Null | Value::Array(_) | Value::Object(_) => false,
	}
}

fn number_or_text(value: &Value, format: fn(f64) -> String) -> String {
	let number = match value {
		Value::Number(n) => n.as_f64(),
		Value::String(s) => s.trim().parse::<f64>().ok(),
		_ => None,
	};
	number.map(format).unwrap_or_else(|| value_text(value))
}

fn tags(value: &Value) -> Vec<String> {
	match value {
		Value::Array(values) => values
			.iter()
			.map(value_text)
			.filter(|s| !s.is_empty())
			.collect(),
		Value::String(s) => s
			.split(',')
			.map(str::trim)
			.filter(|s| !s.is_empty())
			.map(str::to_string)
			.collect(),
		other => vec![value_text(other)],
	}
}

/// Pretty-prints a JSON value, parsing it first when it is a string
///
/// Strings that are not valid JSON are returned unchanged.
pub fn pretty_json(value: &Value) -> String {
	let parsed;
	let value = match value {
		Value::String(raw) => match serde_json::from_str::<Value>(raw) {
			Ok(v) => {
				parsed = v;
				&parsed
			}
			Err(_) => return raw.clone(),
		},
		other => other,
	};
	serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

fn format_units(value: f64, base: f64, units: &[&str]) -> String {
	if value.abs() < base {
		return format!("{} {}", value, units[0]);
	}
	let mut scaled = value;
	let mut unit = 0;
	while scaled.abs() >= base && unit + 1 < units.len() {
		scaled /= base;
		unit += 1;
	}
	format!("{:.1} {}", scaled, units[unit])
}

/// Byte count with decimal units (base 1000)
pub fn format_bytes(value: f64) -> String {
	format_units(value, 1000.0, &["B", "KB", "MB", "GB", "TB"])
}

/// Byte count with binary units (base 1024)
pub fn format_byte_size(value: f64) -> String {
	format_units(value, 1024.0, &["B", "KiB", "MiB", "GiB", "TiB"])
}

/// Timestamp as `YYYY-MM-DD HH:MM:SS` in its own offset
///
/// Empty input gives `--`; unparseable input is returned as is.
pub fn format_date(raw: &str) -> String {
	let raw = raw.trim();
	if raw.is_empty() {
		return EMPTY_DATE.to_string();
	}
	if let Ok(date) = DateTime::parse_from_rfc3339(raw) {
		return date.format(DATE_DISPLAY_FORMAT).to_string();
	}
	for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
		if let Ok(date) = NaiveDateTime::parse_from_str(raw, format) {
			return date.format(DATE_DISPLAY_FORMAT).to_string();
		}
	}
	raw.to_string()
}
