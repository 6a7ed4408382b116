//! List query derivation
//!
//! The effective list query is rebuilt on every navigation from two sources:
//! the URL search parameters, which are authoritative for `page`, `limit`
//! and `sort`, and the stored [`ModelViewOptions`], which only supply
//! defaults. Keyword and filters live in the list state itself.

use crate::view_options::ModelViewOptions;
use modeldesk_types::ListParams;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Ordering used when neither the URL nor the preferences name one
pub const DEFAULT_SORT: &str = "-modified";

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
	/// Ascending order
	Ascending,
	/// Descending order
	Descending,
}

impl SortDirection {
	/// Splits a sort parameter into direction and field
	///
	/// `"name"` is ascending, `"-name"` descending.
	pub fn parse_from_query(s: &str) -> (Self, &str) {
		if let Some(field) = s.strip_prefix('-') {
			(Self::Descending, field)
		} else {
			(Self::Ascending, s)
		}
	}
}

/// Direction of `field` in the current sort parameter, if it is the sort column
pub fn sort_direction(current: Option<&str>, field: &str) -> Option<SortDirection> {
	let current = current.filter(|s| !s.is_empty())?;
	let (direction, name) = SortDirection::parse_from_query(current);
	(name == field).then_some(direction)
}

/// Next sort parameter after clicking the header of `field`
///
/// Cycles none → descending → ascending → none. Clicking a column other than
/// the current sort column starts over at descending.
///
/// # Examples
///
/// ```
/// use modeldesk_core::query::toggle_sort;
///
/// let first = toggle_sort(None, "created");
/// assert_eq!(first.as_deref(), Some("-created"));
/// let second = toggle_sort(first.as_deref(), "created");
/// assert_eq!(second.as_deref(), Some("created"));
/// assert_eq!(toggle_sort(second.as_deref(), "created"), None);
/// ```
pub fn toggle_sort(current: Option<&str>, field: &str) -> Option<String> {
	match sort_direction(current, field) {
		None => Some(format!("-{}", field)),
		Some(SortDirection::Descending) => Some(field.to_string()),
		Some(SortDirection::Ascending) => None,
	}
}

#[derive(Debug, Default, Deserialize)]
struct RawSearchParams {
	name: Option<String>,
	page: Option<String>,
	limit: Option<String>,
	sort: Option<String>,
}

fn parse_positive(raw: Option<String>) -> Option<u64> {
	raw.and_then(|s| s.trim().parse::<u64>().ok())
		.filter(|n| *n > 0)
}

fn non_empty(raw: Option<String>) -> Option<String> {
	raw.filter(|s| !s.trim().is_empty())
}

/// List-related URL search parameters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SearchParams {
	/// Model name
	#[serde(skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub page: Option<u64>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub limit: Option<u64>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub sort: Option<String>,
}

impl SearchParams {
	/// Parses a query string, with or without the leading `?`
	///
	/// Unparseable or non-positive numbers are treated as absent; unknown
	/// parameters are ignored.
	pub fn parse(query: &str) -> Self {
		let query = query.strip_prefix('?').unwrap_or(query);
		let raw: RawSearchParams = serde_urlencoded::from_str(query).unwrap_or_else(|err| {
			tracing::debug!(error = %err, "unparseable search parameters, ignoring");
			RawSearchParams::default()
		});
		Self {
			name: non_empty(raw.name),
			page: parse_positive(raw.page),
			limit: parse_positive(raw.limit),
			sort: non_empty(raw.sort),
		}
	}

	/// Encodes back into a query string (without `?`)
	pub fn to_query_string(&self) -> String {
		serde_urlencoded::to_string(self).unwrap_or_default()
	}

	pub fn with_page(mut self, page: u64) -> Self {
		self.page = Some(page);
		self
	}

	pub fn with_limit(mut self, limit: u64) -> Self {
		self.limit = Some(limit);
		self
	}

	pub fn with_sort(mut self, sort: Option<String>) -> Self {
		self.sort = sort;
		self
	}
}

/// Filter values keyed by field name
pub type Filters = BTreeMap<String, Value>;

fn is_blank(value: &Value) -> bool {
	match value {
		Value::Null => true,
		Value::String(s) => s.trim().is_empty(),
		Value::Array(values) => values.is_empty(),
		Value::Object(map) => map.is_empty(),
		Value::Bool(_) | Value::Number(_) => false,
	}
}

/// Effective list query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryState {
	pub page: u64,
	pub limit: u64,
	pub sort: String,
	pub keyword: String,
	pub filters: Filters,
}

impl QueryState {
	/// Combines URL parameters, stored preferences and the current keyword
	/// and filters
	pub fn derive(params: &SearchParams, options: &ModelViewOptions, keyword: &str, filters: &Filters) -> Self {
		let sort = params
			.sort
			.clone()
			.or_else(|| Some(options.order_by.clone()).filter(|s| !s.is_empty()))
			.unwrap_or_else(|| DEFAULT_SORT.to_string());
		Self {
			page: params.page.unwrap_or(1),
			limit: params.limit.unwrap_or(options.limit).max(1),
			sort,
			keyword: keyword.trim().to_string(),
			filters: filters
				.iter()
				.filter(|(_, v)| !is_blank(v))
				.map(|(k, v)| (k.clone(), v.clone()))
				.collect(),
		}
	}

	/// The `filters` request parameter: a JSON object, empty when no filter
	/// is set
	pub fn filters_param(&self) -> String {
		if self.filters.is_empty() {
			return String::new();
		}
		serde_json::to_string(&self.filters).unwrap_or_default()
	}

	/// Inputs that determine the total row count
	pub fn count_key(&self) -> CountKey {
		CountKey {
			keyword: self.keyword.clone(),
			filters: self.filters_param(),
			sort: self.sort.clone(),
		}
	}

	/// Request parameters for `/models/list`
	pub fn to_list_params(&self, model: &str, count: bool) -> ListParams {
		ListParams {
			model: model.to_string(),
			count,
			page: self.page,
			limit: self.limit,
			keyword: Some(self.keyword.clone()).filter(|k| !k.is_empty()),
			order_by: Some(self.sort.clone()).filter(|s| !s.is_empty()),
			filters: self.filters_param(),
		}
	}
}

/// Cached total row count
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CountState {
	/// Must be requested with the next list fetch
	#[default]
	Unknown,
	Known(u64),
}

impl CountState {
	pub fn is_unknown(&self) -> bool {
		matches!(self, CountState::Unknown)
	}

	pub fn known(&self) -> Option<u64> {
		match self {
			CountState::Unknown => None,
			CountState::Known(n) => Some(*n),
		}
	}

	/// Interprets the `count` field of a list response; negative means the
	/// server did not compute it
	pub fn from_response(count: i64) -> Self {
		u64::try_from(count).map_or(CountState::Unknown, CountState::Known)
	}
}

/// The `(keyword, filters, sort)` combination a count belongs to
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct CountKey {
	pub keyword: String,
	pub filters: String,
	pub sort: String,
}

/// Count cache keyed by [`CountKey`]
///
/// Page turns reuse a known count; any change of keyword, filters or sort
/// invalidates it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CountCache {
	key: Option<CountKey>,
	state: CountState,
}

impl CountCache {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn state(&self) -> CountState {
		self.state
	}

	/// Records the query about to be fetched; returns whether the count has
	/// to be requested with it
	pub fn observe(&mut self, key: CountKey) -> bool {
		if self.key.as_ref() != Some(&key) {
			self.key = Some(key);
			self.state = CountState::Unknown;
		}
		self.state.is_unknown()
	}

	/// Stores a count returned for the current key
	pub fn record(&mut self, state: CountState) {
		if !state.is_unknown() {
			self.state = state;
		}
	}

	/// Forget everything, e.g. on model change
	pub fn reset(&mut self) {
		self.key = None;
		self.state = CountState::Unknown;
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	#[case("created")]
	#[case("modified")]
	#[case("id")]
	fn test_sort_toggle_cycles_back_to_none(#[case] field: &str) {
		// Act
		let first = toggle_sort(None, field);
		let second = toggle_sort(first.as_deref(), field);
		let third = toggle_sort(second.as_deref(), field);

		// Assert
		assert_eq!(first, Some(format!("-{}", field)));
		assert_eq!(second, Some(field.to_string()));
		assert_eq!(third, None);
	}

	#[rstest]
	#[case(Some("name"))]
	#[case(Some("-name"))]
	#[case(Some(""))]
	fn test_sort_toggle_other_column_starts_descending(#[case] current: Option<&str>) {
		assert_eq!(toggle_sort(current, "created").as_deref(), Some("-created"));
	}

	#[rstest]
	fn test_sort_direction_only_for_current_column() {
		assert_eq!(
			sort_direction(Some("-created"), "created"),
			Some(SortDirection::Descending)
		);
		assert_eq!(sort_direction(Some("created"), "name"), None);
	}

	#[rstest]
	#[case("?name=user&page=3&limit=50&sort=-id", Some("user"), Some(3), Some(50), Some("-id"))]
	#[case("page=0&limit=abc", None, None, None, None)]
	#[case("sort=&other=1", None, None, None, None)]
	fn test_search_params_parse(
		#[case] query: &str,
		#[case] name: Option<&str>,
		#[case] page: Option<u64>,
		#[case] limit: Option<u64>,
		#[case] sort: Option<&str>,
	) {
		let params = SearchParams::parse(query);

		assert_eq!(params.name.as_deref(), name);
		assert_eq!(params.page, page);
		assert_eq!(params.limit, limit);
		assert_eq!(params.sort.as_deref(), sort);
	}

	#[rstest]
	fn test_url_overrides_stored_options() {
		// Arrange
		let params = SearchParams::parse("page=2&limit=30&sort=name");
		let options = ModelViewOptions {
			limit: 50,
			order_by: "-created".into(),
			..Default::default()
		};

		// Act
		let query = QueryState::derive(&params, &options, "", &Filters::new());

		// Assert
		assert_eq!((query.page, query.limit, query.sort.as_str()), (2, 30, "name"));
	}

	#[rstest]
	#[case("-created", "-created")]
	#[case("", DEFAULT_SORT)]
	fn test_sort_falls_back_to_order_by_then_default(#[case] order_by: &str, #[case] expected: &str) {
		let options = ModelViewOptions {
			order_by: order_by.into(),
			..Default::default()
		};

		let query = QueryState::derive(&SearchParams::default(), &options, "", &Filters::new());

		assert_eq!(query.sort, expected);
		assert_eq!(query.page, 1);
		assert_eq!(query.limit, 10);
	}

	#[rstest]
	fn test_filters_param_is_json_and_drops_blank_values() {
		// Arrange
		let mut filters = Filters::new();
		filters.insert("status".into(), json!("1"));
		filters.insert("account".into(), json!(""));
		filters.insert("created".into(), json!([]));

		// Act
		let query = QueryState::derive(&SearchParams::default(), &ModelViewOptions::default(), " tree ", &filters);
		let params = query.to_list_params("user", true);

		// Assert
		assert_eq!(params.filters, r#"{"status":"1"}"#);
		assert_eq!(params.keyword.as_deref(), Some("tree"));
		assert_eq!(params.order_by.as_deref(), Some(DEFAULT_SORT));
		assert!(params.count);
	}

	#[rstest]
	fn test_filters_param_is_empty_without_filters() {
		let query = QueryState::derive(
			&SearchParams::default(),
			&ModelViewOptions::default(),
			"",
			&Filters::new(),
		);

		assert_eq!(query.filters_param(), "");
		assert!(query.to_list_params("user", false).keyword.is_none());
	}

	#[rstest]
	fn test_count_is_reused_across_page_turns() {
		// Arrange
		let options = ModelViewOptions::default();
		let page1 = QueryState::derive(&SearchParams::default(), &options, "", &Filters::new());
		let page2 = QueryState::derive(&SearchParams::default().with_page(2), &options, "", &Filters::new());
		let mut cache = CountCache::new();

		// Act
		let first = cache.observe(page1.count_key());
		cache.record(CountState::Known(95));
		let second = cache.observe(page2.count_key());

		// Assert
		assert!(first);
		assert!(!second);
		assert_eq!(cache.state(), CountState::Known(95));
	}

	#[rstest]
	fn test_count_resets_when_keyword_changes() {
		let options = ModelViewOptions::default();
		let mut cache = CountCache::new();
		cache.observe(QueryState::derive(&SearchParams::default(), &options, "", &Filters::new()).count_key());
		cache.record(CountState::Known(95));

		let refetch = cache.observe(QueryState::derive(&SearchParams::default(), &options, "tree", &Filters::new()).count_key());

		assert!(refetch);
		assert_eq!(cache.state(), CountState::Unknown);
	}

	#[rstest]
	#[case(-1, CountState::Unknown)]
	#[case(0, CountState::Known(0))]
	#[case(95, CountState::Known(95))]
	fn test_count_state_from_response(#[case] raw: i64, #[case] expected: CountState) {
		assert_eq!(CountState::from_response(raw), expected);
	}
}
