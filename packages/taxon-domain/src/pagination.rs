#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Paging {
	Disabled,
	Enabled { page: usize, page_size: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paged<T> {
	pub items: Vec<T>,
	/// Zero when paging is disabled.
	pub page_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
	pub start: usize,
	pub stop: usize,
	pub page_count: usize,
}
impl PageWindow {
	/// Window for a one-based page. Pages below 1 clamp to the first page.
	pub fn new(total: usize, page: usize, page_size: usize) -> Self {
		let page_size = page_size.max(1);
		let start = page.max(1).saturating_sub(1).saturating_mul(page_size);
		let stop = start.saturating_add(page_size);

		Self { start, stop, page_count: total.div_ceil(page_size) }
	}
}

/// Moves the requested page out of `items`. Nothing is copied.
pub fn paginate<T>(items: Vec<T>, paging: Paging) -> Paged<T> {
	match paging {
		Paging::Disabled => Paged { items, page_count: 0 },
		Paging::Enabled { page, page_size } => {
			let window = PageWindow::new(items.len(), page, page_size);
			// Out-of-range windows yield an empty page.
			let items =
				items.into_iter().skip(window.start).take(window.stop - window.start).collect();

			Paged { items, page_count: window.page_count }
		},
	}
}
