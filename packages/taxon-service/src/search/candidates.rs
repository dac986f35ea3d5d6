use taxon_domain::{CategoryId, query};

use crate::{Error, Result, TaxonomyStore, search::SearchQuery};

/// Scans the name index for `query.text`.
///
/// Short text never reaches the store. At most `candidate_cap` members are kept even if the
/// store returns more.
pub(crate) async fn resolve(
	store: &dyn TaxonomyStore,
	query: &SearchQuery,
	separator: &str,
) -> Result<Vec<CategoryId>> {
	let Some(pattern) = query::name_pattern(&query.text) else {
		return Ok(Vec::new());
	};
	let keys = store.scan_names(&pattern, query.candidate_cap).await?;

	keys.into_iter()
		.take(query.candidate_cap)
		.map(|key| match query::parse_key_id(&key, separator) {
			Some(cid) => Ok(cid),
			None => Err(Error::StoreCorruption { key }),
		})
		.collect()
}
