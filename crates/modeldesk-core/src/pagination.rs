//! Pagination for model lists

/// Pages shown before the current page in a truncated window
pub const WINDOW_BEFORE: u64 = 2;

/// Pages shown after the current page in a truncated window
pub const WINDOW_AFTER: u64 = 4;

/// Width of the page window; lists with at most this many pages show all
pub const WINDOW_WIDTH: u64 = WINDOW_BEFORE + WINDOW_AFTER + 1;

/// Entry of a rendered page window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageItem {
	Page(u64),
	Ellipsis,
}

/// Pagination configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pagination {
	/// Number of items per page
	pub per_page: u64,
	/// Current page number (1-indexed)
	pub current_page: u64,
	/// Total number of items
	pub total_items: u64,
}

impl Pagination {
	/// Creates a new pagination configuration
	///
	/// # Arguments
	///
	/// * `per_page` - Number of items per page, at least 1
	/// * `current_page` - 1-indexed page, at least 1
	/// * `total_items` - Total row count
	pub fn new(per_page: u64, current_page: u64, total_items: u64) -> Self {
		Self {
			per_page: per_page.max(1),
			current_page: current_page.max(1),
			total_items,
		}
	}

	/// Returns the total number of pages
	pub fn total_pages(&self) -> u64 {
		if self.total_items == 0 {
			0
		} else {
			self.total_items.div_ceil(self.per_page.max(1))
		}
	}

	/// Page links to render around the current page
	///
	/// Shows `current - 2 ..= current + 4` clamped to the valid range. The
	/// first and last pages are always present; an ellipsis stands in for any
	/// gap between them and the window.
	///
	/// # Examples
	///
	/// ```
	/// use modeldesk_core::pagination::{PageItem, Pagination};
	///
	/// let items = Pagination::new(10, 3, 95).window();
	/// assert_eq!(items.last(), Some(&PageItem::Page(10)));
	/// assert_eq!(items[7], PageItem::Ellipsis);
	/// ```
	pub fn window(&self) -> Vec<PageItem> {
		let total = self.total_pages();
		if total == 0 {
			return Vec::new();
		}
		if total <= WINDOW_WIDTH {
			return (1..=total).map(PageItem::Page).collect();
		}

		let current = self.current_page.clamp(1, total);
		let start = current.saturating_sub(WINDOW_BEFORE).max(1);
		let end = (current + WINDOW_AFTER).min(total);

		let mut items = Vec::with_capacity(WINDOW_WIDTH as usize + 4);
		if start > 1 {
			items.push(PageItem::Page(1));
			if start > 2 {
				items.push(PageItem::Ellipsis);
			}
		}
		items.extend((start..=end).map(PageItem::Page));
		if end < total {
			if end + 1 < total {
				items.push(PageItem::Ellipsis);
			}
			items.push(PageItem::Page(total));
		}
		items
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	fn render(items: &[PageItem]) -> String {
		items
			.iter()
			.map(|item| match item {
				PageItem::Page(n) => n.to_string(),
				PageItem::Ellipsis => "…".to_string(),
			})
			.collect::<Vec<_>>()
			.join(" ")
	}

	#[rstest]
	#[case(95, 10, 3, "1 2 3 4 5 6 7 … 10")]
	#[case(95, 10, 1, "1 2 3 4 5 … 10")]
	#[case(95, 10, 10, "1 … 8 9 10")]
	#[case(200, 10, 10, "1 … 8 9 10 11 12 13 14 … 20")]
	#[case(95, 10, 4, "1 2 3 4 5 6 7 8 … 10")]
	#[case(95, 10, 5, "1 … 3 4 5 6 7 8 9 10")]
	#[case(70, 10, 2, "1 2 3 4 5 6 7")]
	#[case(5, 10, 1, "1")]
	#[case(0, 10, 1, "")]
	fn test_window(#[case] count: u64, #[case] limit: u64, #[case] page: u64, #[case] expected: &str) {
		// Arrange
		let pagination = Pagination::new(limit, page, count);

		// Act
		let items = pagination.window();

		// Assert
		assert_eq!(render(&items), expected);
	}

	#[rstest]
	fn test_window_clamps_out_of_range_page() {
		assert_eq!(render(&Pagination::new(10, 99, 95).window()), "1 … 8 9 10");
	}

	#[rstest]
	#[case(0, 10, 0)]
	#[case(95, 10, 10)]
	#[case(100, 10, 10)]
	#[case(3, 0, 3)]
	fn test_total_pages(#[case] count: u64, #[case] limit: u64, #[case] expected: u64) {
		assert_eq!(Pagination::new(limit, 1, count).total_pages(), expected);
	}
}
