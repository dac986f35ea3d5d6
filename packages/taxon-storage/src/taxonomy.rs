use std::collections::{BTreeSet, HashMap};

use taxon_domain::{CategoryId, CategoryNode, ROOT_PARENT_ID};

use crate::{Error, Result, glob};

/// Category records plus the two indexes the search pipeline reads.
///
/// The name index holds `"<lower-cased name><separator><cid>"` members in lexical order.
/// The child index keeps each parent's children ordered by `(display_order, cid)`.
#[derive(Debug)]
pub struct MemoryTaxonomy {
	separator: String,
	records: HashMap<CategoryId, CategoryNode>,
	name_index: BTreeSet<String>,
	children: HashMap<CategoryId, Vec<CategoryId>>,
}
impl MemoryTaxonomy {
	pub fn new(separator: &str) -> Self {
		Self {
			separator: separator.to_string(),
			records: HashMap::new(),
			name_index: BTreeSet::new(),
			children: HashMap::new(),
		}
	}

	pub fn from_categories(categories: Vec<CategoryNode>, separator: &str) -> Result<Self> {
		let mut taxonomy = Self::new(separator);

		for category in categories {
			taxonomy.insert(category)?;
		}

		Ok(taxonomy)
	}

	pub fn len(&self) -> usize {
		self.records.len()
	}

	pub fn is_empty(&self) -> bool {
		self.records.is_empty()
	}

	pub fn get(&self, cid: CategoryId) -> Option<&CategoryNode> {
		self.records.get(&cid)
	}

	pub fn insert(&mut self, mut category: CategoryNode) -> Result<()> {
		if category.cid == ROOT_PARENT_ID {
			return Err(Error::InvalidArgument(
				"Category id 0 is reserved for the root.".to_string(),
			));
		}
		if self.records.contains_key(&category.cid) {
			return Err(Error::InvalidArgument(format!(
				"Category {} is already present.",
				category.cid
			)));
		}

		category.children.clear();
		category.recent_replies.clear();

		let cid = category.cid;
		let parent_id = category.parent_id;

		self.name_index.insert(format!(
			"{}{}{}",
			category.name.to_lowercase(),
			self.separator,
			cid
		));
		self.records.insert(cid, category);

		let records = &self.records;
		let siblings = self.children.entry(parent_id).or_default();

		siblings.push(cid);
		siblings.sort_by_key(|sibling| (records[sibling].display_order, *sibling));

		Ok(())
	}

	/// Name-index members matching `pattern`, at most `limit` of them, in index order.
	pub fn scan_names(&self, pattern: &str, limit: usize) -> Result<Vec<String>> {
		let matcher = glob::compile(pattern)?;

		Ok(self
			.name_index
			.iter()
			.filter(|member| matcher.is_match(member))
			.take(limit)
			.cloned()
			.collect())
	}

	/// Direct children only. Unknown parents have none.
	pub fn child_ids(&self, cid: CategoryId) -> Vec<CategoryId> {
		self.children.get(&cid).cloned().unwrap_or_default()
	}

	/// Fresh copies of the requested records. Unknown ids are omitted.
	pub fn hydrate(&self, cids: &[CategoryId]) -> HashMap<CategoryId, CategoryNode> {
		cids.iter()
			.filter_map(|cid| self.records.get(cid).map(|node| (*cid, node.clone())))
			.collect()
	}
}
