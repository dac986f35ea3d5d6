use std::time::Instant;

use taxon_domain::{CategoryId, CategoryNode, ROOT_PARENT_ID, timing, tree};

use crate::{Collaborators, Result, search::SearchQuery};

pub(crate) struct Composed {
	pub(crate) timing: String,
	pub(crate) categories: Vec<CategoryNode>,
}

/// Hydrate, shape, annotate, trim, order, time, and keep the page's own categories.
pub(crate) async fn compose(
	collaborators: &Collaborators,
	query: &SearchQuery,
	hydrate_ids: &[CategoryId],
	page_ids: &[CategoryId],
	started: Instant,
) -> Result<Composed> {
	let mut nodes = if hydrate_ids.is_empty() {
		Vec::new()
	} else {
		let mut hydrated = collaborators.store.hydrate(hydrate_ids).await?;

		hydrate_ids.iter().filter_map(|cid| hydrated.remove(cid)).collect::<Vec<_>>()
	};

	if !nodes.is_empty() {
		nodes = collaborators.tree.build_tree(nodes, ROOT_PARENT_ID).await?;

		collaborators
			.activity
			.annotate(&mut nodes, query.uid, query.context_token.as_deref())
			.await?;
	}

	let mut nodes = tree::trim_children(nodes);

	tree::sort_for_display(&mut nodes);

	let timing = timing::format_elapsed(started.elapsed());

	Ok(Composed { timing, categories: tree::select_page(nodes, page_ids) })
}
