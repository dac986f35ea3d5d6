pub mod hooks;
pub mod search;

mod error;

pub use error::{Error, Result};
pub use hooks::{BoxError, FilterContext, FilterListener, HookRegistry, SEARCH_FILTER_HOOK};
pub use search::{SearchQuery, SearchRequest, SearchResponse};
pub use taxon_storage::privileges::FIND_PRIVILEGE;

use std::{collections::HashMap, future::Future, pin::Pin, sync::Arc};

use taxon_config::Config;
use taxon_domain::{ActorId, CategoryId, CategoryNode, tree};
use taxon_storage::{MemoryBackend, privileges::READ_PRIVILEGE};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Read access to the taxonomy namespace.
pub trait TaxonomyStore
where
	Self: Send + Sync,
{
	/// Name-index members matching a wildcard `pattern`, at most `limit` of them.
	fn scan_names<'a>(&'a self, pattern: &'a str, limit: usize)
	-> BoxFuture<'a, Result<Vec<String>>>;

	/// Immediate children of `cid`.
	fn child_ids<'a>(&'a self, cid: CategoryId) -> BoxFuture<'a, Result<Vec<CategoryId>>>;

	/// Records for `cids`. Ids the store does not know are left out of the map.
	fn hydrate<'a>(
		&'a self,
		cids: &'a [CategoryId],
	) -> BoxFuture<'a, Result<HashMap<CategoryId, CategoryNode>>>;
}

/// Runs the listeners registered on a named filter hook.
///
/// The returned context REPLACES the one passed in: its `ids` become the pipeline's ids
/// wholesale, whether the listeners removed entries, added entries, or both.
pub trait HookDispatcher
where
	Self: Send + Sync,
{
	fn fire<'a>(&'a self, hook: &'a str, context: FilterContext)
	-> BoxFuture<'a, Result<FilterContext>>;
}

pub trait Authorizer
where
	Self: Send + Sync,
{
	/// The subset of `cids` that `actor` holds `privilege` on.
	fn filter_ids<'a>(
		&'a self,
		privilege: &'a str,
		cids: &'a [CategoryId],
		actor: ActorId,
	) -> BoxFuture<'a, Result<Vec<CategoryId>>>;
}

pub trait TreeBuilder
where
	Self: Send + Sync,
{
	/// Populates `children` for every node whose parent is in the set.
	fn build_tree<'a>(
		&'a self,
		nodes: Vec<CategoryNode>,
		root_parent_id: CategoryId,
	) -> BoxFuture<'a, Result<Vec<CategoryNode>>>;
}

pub trait ActivityAnnotator
where
	Self: Send + Sync,
{
	/// Adds recent-activity data to `nodes` in place. Never removes anything.
	fn annotate<'a>(
		&'a self,
		nodes: &'a mut [CategoryNode],
		actor: ActorId,
		context_token: Option<&'a str>,
	) -> BoxFuture<'a, Result<()>>;
}

#[derive(Clone)]
pub struct Collaborators {
	pub store: Arc<dyn TaxonomyStore>,
	pub hooks: Arc<dyn HookDispatcher>,
	pub authorizer: Arc<dyn Authorizer>,
	pub tree: Arc<dyn TreeBuilder>,
	pub activity: Arc<dyn ActivityAnnotator>,
}

/// Tree builder backed by [`taxon_domain::tree::build_tree`].
pub struct DomainTreeBuilder;

pub struct TaxonService {
	pub cfg: Config,
	pub collaborators: Collaborators,
}

impl Collaborators {
	/// Every collaborator served by one in-memory backend.
	pub fn memory(backend: Arc<MemoryBackend>, hooks: Arc<dyn HookDispatcher>) -> Self {
		Self {
			store: backend.clone(),
			hooks,
			authorizer: backend.clone(),
			tree: Arc::new(DomainTreeBuilder),
			activity: backend,
		}
	}
}

impl TaxonService {
	pub fn new(cfg: Config, backend: MemoryBackend) -> Self {
		let collaborators =
			Collaborators::memory(Arc::new(backend), Arc::new(HookRegistry::default()));

		Self { cfg, collaborators }
	}

	pub fn with_collaborators(cfg: Config, collaborators: Collaborators) -> Self {
		Self { cfg, collaborators }
	}
}

impl TreeBuilder for DomainTreeBuilder {
	fn build_tree<'a>(
		&'a self,
		nodes: Vec<CategoryNode>,
		root_parent_id: CategoryId,
	) -> BoxFuture<'a, Result<Vec<CategoryNode>>> {
		Box::pin(async move { Ok(tree::build_tree(nodes, root_parent_id)) })
	}
}

impl TaxonomyStore for MemoryBackend {
	fn scan_names<'a>(
		&'a self,
		pattern: &'a str,
		limit: usize,
	) -> BoxFuture<'a, Result<Vec<String>>> {
		Box::pin(async move { Ok(self.taxonomy.scan_names(pattern, limit)?) })
	}

	fn child_ids<'a>(&'a self, cid: CategoryId) -> BoxFuture<'a, Result<Vec<CategoryId>>> {
		Box::pin(async move { Ok(self.taxonomy.child_ids(cid)) })
	}

	fn hydrate<'a>(
		&'a self,
		cids: &'a [CategoryId],
	) -> BoxFuture<'a, Result<HashMap<CategoryId, CategoryNode>>> {
		Box::pin(async move { Ok(self.taxonomy.hydrate(cids)) })
	}
}

impl Authorizer for MemoryBackend {
	fn filter_ids<'a>(
		&'a self,
		privilege: &'a str,
		cids: &'a [CategoryId],
		actor: ActorId,
	) -> BoxFuture<'a, Result<Vec<CategoryId>>> {
		Box::pin(async move { Ok(self.privileges.filter_ids(privilege, cids, actor)?) })
	}
}

impl ActivityAnnotator for MemoryBackend {
	fn annotate<'a>(
		&'a self,
		nodes: &'a mut [CategoryNode],
		actor: ActorId,
		_context_token: Option<&'a str>,
	) -> BoxFuture<'a, Result<()>> {
		Box::pin(async move {
			for node in nodes.iter_mut() {
				attach_recent_replies(self, node, actor)?;
			}

			Ok(())
		})
	}
}

fn attach_recent_replies(
	backend: &MemoryBackend,
	node: &mut CategoryNode,
	actor: ActorId,
) -> Result<()> {
	if node.num_recent_replies > 0
		&& !backend.privileges.filter_ids(READ_PRIVILEGE, &[node.cid], actor)?.is_empty()
	{
		node.recent_replies = backend.activity.latest(node.cid, node.num_recent_replies);
	}

	for child in &mut node.children {
		attach_recent_replies(backend, child, actor)?;
	}

	Ok(())
}
