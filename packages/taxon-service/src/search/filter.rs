use taxon_domain::CategoryId;

use crate::{
	Collaborators, FIND_PRIVILEGE, Result,
	hooks::{FilterContext, SEARCH_FILTER_HOOK},
	search::SearchQuery,
};

/// Hook pass, then authorization pass. The order is fixed so ids injected by a listener
/// are still authorized.
pub(crate) async fn apply(
	collaborators: &Collaborators,
	query: &SearchQuery,
	candidates: Vec<CategoryId>,
) -> Result<Vec<CategoryId>> {
	let context = FilterContext { query: query.clone(), ids: candidates, uid: query.uid };
	// Replacement, not intersection.
	let hooked = collaborators.hooks.fire(SEARCH_FILTER_HOOK, context).await?;

	tracing::debug!(ids = hooked.ids.len(), "Search filter hook returned.");

	collaborators.authorizer.filter_ids(FIND_PRIVILEGE, &hooked.ids, query.uid).await
}
