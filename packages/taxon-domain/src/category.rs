use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use time::OffsetDateTime;

pub type CategoryId = u64;

/// Acting identity. `0` is a guest.
pub type ActorId = u64;

/// Parent id carried by top-level categories.
pub const ROOT_PARENT_ID: CategoryId = 0;

const DEFAULT_CHILDREN_PER_PAGE_LIMIT: usize = 10;

/// A hydrated category.
///
/// `children` is empty until the tree builder runs. Fields the search pipeline does not
/// interpret (colors, icons, link targets, ...) travel in `display` untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryNode {
	pub cid: CategoryId,
	#[serde(default)]
	pub parent_id: CategoryId,
	#[serde(default)]
	pub display_order: i64,
	#[serde(default = "default_children_per_page_limit")]
	pub children_per_page_limit: usize,
	pub name: String,
	#[serde(default)]
	pub slug: String,
	#[serde(default)]
	pub description: String,
	#[serde(default)]
	pub disabled: bool,
	#[serde(default)]
	pub num_recent_replies: usize,
	#[serde(default)]
	pub children: Vec<CategoryNode>,
	#[serde(default)]
	pub recent_replies: Vec<RecentReply>,
	#[serde(flatten)]
	pub display: Map<String, Value>,
}
impl CategoryNode {
	pub fn new(cid: CategoryId, parent_id: CategoryId, name: impl Into<String>) -> Self {
		let name = name.into();

		Self {
			cid,
			parent_id,
			display_order: 0,
			children_per_page_limit: DEFAULT_CHILDREN_PER_PAGE_LIMIT,
			slug: format!("{cid}/{}", slugify(&name)),
			name,
			description: String::new(),
			disabled: false,
			num_recent_replies: 0,
			children: Vec::new(),
			recent_replies: Vec::new(),
			display: Map::new(),
		}
	}

	pub fn with_order(mut self, display_order: i64) -> Self {
		self.display_order = display_order;

		self
	}

	pub fn with_children_limit(mut self, limit: usize) -> Self {
		self.children_per_page_limit = limit;

		self
	}

	pub fn child_ids(&self) -> Vec<CategoryId> {
		self.children.iter().map(|child| child.cid).collect()
	}
}

/// Most recent reply posted in a category, attached by the activity annotator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentReply {
	pub topic_id: u64,
	pub topic_title: String,
	pub author: String,
	#[serde(with = "crate::time_serde")]
	pub posted_at: OffsetDateTime,
}

fn default_children_per_page_limit() -> usize {
	DEFAULT_CHILDREN_PER_PAGE_LIMIT
}

fn slugify(name: &str) -> String {
	let mut out = String::with_capacity(name.len());

	for ch in name.chars() {
		if ch.is_alphanumeric() {
			out.extend(ch.to_lowercase());
		} else if !out.ends_with('-') {
			out.push('-');
		}
	}

	out.trim_matches('-').to_string()
}
