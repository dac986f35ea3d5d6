mod candidates;
mod compose;
mod expand;
mod filter;

use std::time::Instant;

use taxon_domain::{
	ActorId, CategoryNode,
	pagination::{self, Paged, Paging},
};

use crate::{Result, TaxonService};

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct SearchRequest {
	#[serde(default)]
	pub query: Option<String>,
	#[serde(default)]
	pub uid: ActorId,
	/// One-based. Values below 1 clamp to the first page.
	pub page: Option<i64>,
	pub paginate: Option<bool>,
	pub hard_cap: Option<u32>,
	pub results_per_page: Option<u32>,
	/// Opaque token forwarded to the activity annotator.
	pub qs: Option<String>,
}

/// A request with every default applied. Never changes once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
	pub text: String,
	pub uid: ActorId,
	pub page: usize,
	pub paginate: bool,
	pub candidate_cap: usize,
	pub page_size: usize,
	pub context_token: Option<String>,
}
impl SearchQuery {
	/// Unset knobs fall back to the configured defaults, as do a zero cap or page size.
	/// An explicit page below 1 clamps to the first page.
	pub fn resolve(req: SearchRequest, defaults: &taxon_config::Search) -> Self {
		let or_default =
			|value: Option<u32>, fallback: u32| value.filter(|value| *value > 0).unwrap_or(fallback);

		Self {
			text: req.query.unwrap_or_default(),
			uid: req.uid,
			page: match req.page {
				Some(page) => usize::try_from(page.max(1)).unwrap_or(usize::MAX),
				None => defaults.default_page as usize,
			},
			paginate: req.paginate.unwrap_or(defaults.paginate),
			candidate_cap: or_default(req.hard_cap, defaults.candidate_cap) as usize,
			page_size: or_default(req.results_per_page, defaults.page_size) as usize,
			context_token: req.qs,
		}
	}

	pub fn paging(&self) -> Paging {
		if self.paginate {
			Paging::Enabled { page: self.page, page_size: self.page_size }
		} else {
			Paging::Disabled
		}
	}
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct SearchResponse {
	/// Size of the hook- and authorization-filtered set before paging.
	pub match_count: usize,
	/// Zero when paging is disabled.
	pub page_count: usize,
	/// Seconds spent in the pipeline, two decimals.
	pub timing: String,
	pub categories: Vec<CategoryNode>,
}

impl TaxonService {
	pub async fn search(&self, req: SearchRequest) -> Result<SearchResponse> {
		let started = Instant::now();
		let query = SearchQuery::resolve(req, &self.cfg.search);
		let collaborators = &self.collaborators;
		let candidates = candidates::resolve(
			collaborators.store.as_ref(),
			&query,
			&self.cfg.storage.key_separator,
		)
		.await?;

		tracing::debug!(candidates = candidates.len(), "Resolved search candidates.");

		let filtered = filter::apply(collaborators, &query, candidates).await?;
		let match_count = filtered.len();
		let Paged { items: page_ids, page_count } = pagination::paginate(filtered, query.paging());

		tracing::debug!(match_count, page_count, page_len = page_ids.len(), "Paged search matches.");

		let hydrate_ids = expand::expand(collaborators, &page_ids, query.uid).await?;
		let composed =
			compose::compose(collaborators, &query, &hydrate_ids, &page_ids, started).await?;

		Ok(SearchResponse {
			match_count,
			page_count,
			timing: composed.timing,
			categories: composed.categories,
		})
	}
}
