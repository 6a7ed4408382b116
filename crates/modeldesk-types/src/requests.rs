//! Request types for the console REST API

use crate::models::Item;
use serde::{Deserialize, Serialize};

/// Query string of `GET /models/list`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListParams {
	/// Model name
	pub model: String,
	/// Ask the server for the total row count
	pub count: bool,
	/// Page number (1-indexed)
	pub page: u64,
	/// Items per page
	pub limit: u64,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub keyword: Option<String>,
	/// Sort field, prefixed with "-" for descending
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub order_by: Option<String>,
	/// JSON encoded field filters; empty (and not sent) when no filter is active
	#[serde(default, skip_serializing_if = "String::is_empty")]
	pub filters: String,
}

/// Query string addressing a single record (`detail`, `delete`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRef {
	pub id: u64,
	pub model: String,
}

impl ItemRef {
	pub fn new(model: impl Into<String>, id: u64) -> Self {
		Self {
			id,
			model: model.into(),
		}
	}
}

/// Body of `PATCH /models/update`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateRequest {
	pub id: u64,
	pub model: String,
	/// Changed fields only
	pub data: Item,
}

/// Body of `POST /models/create`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateRequest {
	pub model: String,
	pub data: Item,
}
