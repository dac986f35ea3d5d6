use std::{collections::HashSet, sync::Arc};

use tokio::task::JoinSet;

use taxon_domain::{ActorId, CategoryId};

use crate::{Collaborators, FIND_PRIVILEGE, Result};

/// Ids to hydrate for one page: the page ids followed by their authorized direct children,
/// without repeats.
///
/// Child lookups run as separate tasks. Results land in per-page-id slots so the flattened
/// order follows the page order no matter which lookup finishes first. Dropping the task
/// set on an early error aborts the lookups still in flight.
pub(crate) async fn expand(
	collaborators: &Collaborators,
	page_ids: &[CategoryId],
	actor: ActorId,
) -> Result<Vec<CategoryId>> {
	let mut tasks = JoinSet::new();

	for (slot, &cid) in page_ids.iter().enumerate() {
		let store = Arc::clone(&collaborators.store);

		tasks.spawn(async move { (slot, store.child_ids(cid).await) });
	}

	let mut slots: Vec<Vec<CategoryId>> = vec![Vec::new(); page_ids.len()];

	while let Some(joined) = tasks.join_next().await {
		let (slot, children) = joined?;

		slots[slot] = children?;
	}

	let children: Vec<CategoryId> = slots.into_iter().flatten().collect();
	let permitted = if children.is_empty() {
		Vec::new()
	} else {
		collaborators.authorizer.filter_ids(FIND_PRIVILEGE, &children, actor).await?
	};

	tracing::debug!(
		children = children.len(),
		permitted = permitted.len(),
		"Expanded page children."
	);

	let mut seen = HashSet::with_capacity(page_ids.len() + permitted.len());

	Ok(page_ids.iter().chain(permitted.iter()).copied().filter(|cid| seen.insert(*cid)).collect())
}
