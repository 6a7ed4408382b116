//! Response types for the console REST API

use crate::models::Item;
use serde::{Deserialize, Serialize};

/// Response of `GET /models/list`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListResponse {
	/// Total row count; only meaningful when it was requested
	#[serde(default)]
	pub count: i64,
	#[serde(default)]
	pub items: Vec<Item>,
}

/// Response of `POST /models/create`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateResponse {
	pub id: u64,
}
