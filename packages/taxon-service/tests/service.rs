use std::{
	collections::HashMap,
	sync::{
		Arc, Mutex,
		atomic::{AtomicUsize, Ordering},
	},
	time::Duration,
};

use taxon_domain::{ActorId, CategoryId, CategoryNode};
use taxon_service::{
	ActivityAnnotator, BoxError, BoxFuture, Collaborators, Error, FilterContext, FilterListener,
	HookRegistry, Result, SEARCH_FILTER_HOOK, SearchQuery, SearchRequest, TaxonService,
	TaxonomyStore,
};
use taxon_storage::{MemoryBackend, models::TaxonomySeed};
use taxon_testkit::{ADMIN, ARCHIVIST, GUEST, MEMBER, STAFF};

struct SpyStore {
	inner: Arc<MemoryBackend>,
	scans: AtomicUsize,
	child_lookups: AtomicUsize,
	hydrations: Mutex<Vec<Vec<CategoryId>>>,
	child_delays: HashMap<CategoryId, Duration>,
	failing_child: Option<CategoryId>,
}
impl SpyStore {
	fn new(inner: Arc<MemoryBackend>) -> Self {
		Self {
			inner,
			scans: AtomicUsize::new(0),
			child_lookups: AtomicUsize::new(0),
			hydrations: Mutex::new(Vec::new()),
			child_delays: HashMap::new(),
			failing_child: None,
		}
	}

	fn accesses(&self) -> usize {
		self.scans.load(Ordering::SeqCst)
			+ self.child_lookups.load(Ordering::SeqCst)
			+ self.hydrations.lock().unwrap_or_else(|err| err.into_inner()).len()
	}

	fn hydrations(&self) -> Vec<Vec<CategoryId>> {
		self.hydrations.lock().unwrap_or_else(|err| err.into_inner()).clone()
	}
}
impl TaxonomyStore for SpyStore {
	fn scan_names<'a>(
		&'a self,
		pattern: &'a str,
		limit: usize,
	) -> BoxFuture<'a, Result<Vec<String>>> {
		self.scans.fetch_add(1, Ordering::SeqCst);

		self.inner.scan_names(pattern, limit)
	}

	fn child_ids<'a>(&'a self, cid: CategoryId) -> BoxFuture<'a, Result<Vec<CategoryId>>> {
		self.child_lookups.fetch_add(1, Ordering::SeqCst);

		let delay = self.child_delays.get(&cid).copied();
		let failing = self.failing_child == Some(cid);

		Box::pin(async move {
			if let Some(delay) = delay {
				tokio::time::sleep(delay).await;
			}
			if failing {
				return Err(Error::StoreUnavailable { message: "connection reset".to_string() });
			}

			self.inner.child_ids(cid).await
		})
	}

	fn hydrate<'a>(
		&'a self,
		cids: &'a [CategoryId],
	) -> BoxFuture<'a, Result<HashMap<CategoryId, CategoryNode>>> {
		self.hydrations.lock().unwrap_or_else(|err| err.into_inner()).push(cids.to_vec());

		self.inner.hydrate(cids)
	}
}

/// Returns a fixed set of members regardless of the pattern.
struct FixedScanStore {
	keys: Vec<String>,
}
impl TaxonomyStore for FixedScanStore {
	fn scan_names<'a>(
		&'a self,
		_pattern: &'a str,
		_limit: usize,
	) -> BoxFuture<'a, Result<Vec<String>>> {
		let keys = self.keys.clone();

		Box::pin(async move { Ok(keys) })
	}

	fn child_ids<'a>(&'a self, _cid: CategoryId) -> BoxFuture<'a, Result<Vec<CategoryId>>> {
		Box::pin(async move { Ok(Vec::new()) })
	}

	fn hydrate<'a>(
		&'a self,
		cids: &'a [CategoryId],
	) -> BoxFuture<'a, Result<HashMap<CategoryId, CategoryNode>>> {
		Box::pin(async move {
			Ok(cids.iter().map(|cid| (*cid, CategoryNode::new(*cid, 0, format!("c{cid}")))).collect())
		})
	}
}

struct ReplaceIds {
	ids: Vec<CategoryId>,
}
impl FilterListener for ReplaceIds {
	fn apply<'a>(
		&'a self,
		mut context: FilterContext,
	) -> BoxFuture<'a, std::result::Result<FilterContext, BoxError>> {
		Box::pin(async move {
			context.ids = self.ids.clone();

			Ok(context)
		})
	}
}

struct AppendId {
	cid: CategoryId,
	seen: Arc<Mutex<Vec<Vec<CategoryId>>>>,
}
impl FilterListener for AppendId {
	fn apply<'a>(
		&'a self,
		mut context: FilterContext,
	) -> BoxFuture<'a, std::result::Result<FilterContext, BoxError>> {
		Box::pin(async move {
			self.seen.lock().unwrap_or_else(|err| err.into_inner()).push(context.ids.clone());
			context.ids.push(self.cid);

			Ok(context)
		})
	}
}

struct FailingListener;
impl FilterListener for FailingListener {
	fn apply<'a>(
		&'a self,
		_context: FilterContext,
	) -> BoxFuture<'a, std::result::Result<FilterContext, BoxError>> {
		Box::pin(async move { Err("listener exploded".into()) })
	}
}

#[derive(Default)]
struct SpyAnnotator {
	tokens: Mutex<Vec<(ActorId, Option<String>, usize)>>,
}
impl ActivityAnnotator for SpyAnnotator {
	fn annotate<'a>(
		&'a self,
		nodes: &'a mut [CategoryNode],
		actor: ActorId,
		context_token: Option<&'a str>,
	) -> BoxFuture<'a, Result<()>> {
		self.tokens.lock().unwrap_or_else(|err| err.into_inner()).push((
			actor,
			context_token.map(str::to_string),
			nodes.len(),
		));

		Box::pin(async move { Ok(()) })
	}
}

fn forum() -> Arc<MemoryBackend> {
	Arc::new(taxon_testkit::forum_backend().expect("Failed to seed forum backend."))
}

fn service_with_hooks(backend: Arc<MemoryBackend>, hooks: HookRegistry) -> TaxonService {
	TaxonService::with_collaborators(
		taxon_testkit::test_config(),
		Collaborators::memory(backend, Arc::new(hooks)),
	)
}

fn service_with_store(backend: Arc<MemoryBackend>, store: Arc<dyn TaxonomyStore>) -> TaxonService {
	let mut collaborators = Collaborators::memory(backend, Arc::new(HookRegistry::default()));

	collaborators.store = store;

	TaxonService::with_collaborators(taxon_testkit::test_config(), collaborators)
}

fn request(query: &str, uid: ActorId) -> SearchRequest {
	SearchRequest { query: Some(query.to_string()), uid, ..SearchRequest::default() }
}

fn ids(nodes: &[CategoryNode]) -> Vec<CategoryId> {
	nodes.iter().map(|node| node.cid).collect()
}

#[tokio::test]
async fn short_queries_never_touch_the_store() {
	let backend = forum();
	let store = Arc::new(SpyStore::new(backend.clone()));
	let service = service_with_store(backend, store.clone());

	for query in [None, Some(""), Some("n")] {
		let req = SearchRequest { query: query.map(str::to_string), ..SearchRequest::default() };
		let response = service.search(req).await.expect("Search failed.");

		assert_eq!(response.match_count, 0);
		assert_eq!(response.page_count, 0);
		assert!(response.categories.is_empty());
	}

	assert_eq!(store.accesses(), 0);
}

#[tokio::test]
async fn guest_news_search_shows_permitted_truncated_children() {
	let service = TaxonService::new(
		taxon_testkit::test_config(),
		taxon_testkit::forum_backend().expect("Failed to seed forum backend."),
	);
	let response = service.search(request("news", GUEST)).await.expect("Search failed.");

	assert_eq!(response.match_count, 1);
	assert_eq!(response.page_count, 1);
	assert_eq!(ids(&response.categories), vec![5]);

	let news = &response.categories[0];

	// Staff Room is hidden, then the limit of two keeps World and Local.
	assert_eq!(news.child_ids(), vec![6, 7]);
	assert!(news.children.iter().all(|child| child.children.is_empty()));
	assert_eq!(news.recent_replies.len(), 1);
	assert_eq!(news.recent_replies[0].topic_id, 101);
	assert_eq!(response.timing.split('.').nth(1).map(str::len), Some(2));
}

#[tokio::test]
async fn privileged_actors_see_more() {
	let backend = forum();
	let service = service_with_hooks(backend, HookRegistry::default());

	let archivist = service.search(request("news", ARCHIVIST)).await.expect("Search failed.");

	assert_eq!(archivist.match_count, 2);
	assert_eq!(ids(&archivist.categories), vec![5, 12]);

	let staff = service.search(request("news", STAFF)).await.expect("Search failed.");

	assert_eq!(staff.match_count, 1);
	assert_eq!(staff.categories[0].child_ids(), vec![9, 6]);
}

#[tokio::test]
async fn disabled_categories_are_never_found() {
	let service = service_with_hooks(forum(), HookRegistry::default());
	let response = service.search(request("retired", ADMIN)).await.expect("Search failed.");

	assert_eq!(response.match_count, 0);
	assert!(response.categories.is_empty());
}

#[tokio::test]
async fn match_count_ignores_paging() {
	let backend =
		Arc::new(taxon_testkit::numbered_backend(7).expect("Failed to seed numbered backend."));
	let service = service_with_hooks(backend, HookRegistry::default());
	let page = |page: i64| SearchRequest {
		page: Some(page),
		results_per_page: Some(3),
		..request("board", MEMBER)
	};

	let first = service.search(page(1)).await.expect("Search failed.");

	assert_eq!((first.match_count, first.page_count), (7, 3));
	assert_eq!(ids(&first.categories), vec![1, 2, 3]);

	let last = service.search(page(3)).await.expect("Search failed.");

	assert_eq!((last.match_count, last.page_count), (7, 3));
	assert_eq!(ids(&last.categories), vec![7]);

	let beyond = service.search(page(4)).await.expect("Search failed.");

	assert_eq!((beyond.match_count, beyond.page_count), (7, 3));
	assert!(beyond.categories.is_empty());
}

#[tokio::test]
async fn pages_below_one_clamp_to_the_first_page() {
	let backend =
		Arc::new(taxon_testkit::numbered_backend(10).expect("Failed to seed numbered backend."));
	let mut cfg = taxon_testkit::test_config();

	cfg.search.default_page = 3;

	let service = TaxonService::with_collaborators(
		cfg,
		Collaborators::memory(backend, Arc::new(HookRegistry::default())),
	);
	let paged = |page: Option<i64>| SearchRequest {
		page,
		results_per_page: Some(2),
		..request("board", GUEST)
	};

	for page in [Some(0), Some(-4)] {
		let response = service.search(paged(page)).await.expect("Search failed.");

		assert_eq!(ids(&response.categories), vec![1, 2], "page {page:?}");
	}

	let unset = service.search(paged(None)).await.expect("Search failed.");

	assert_eq!(ids(&unset.categories), vec![5, 6]);

	let req: SearchRequest = serde_json::from_value(serde_json::json!({
		"query": "board",
		"page": -1,
		"results_per_page": 2
	}))
	.expect("Failed to parse request.");
	let response = service.search(req).await.expect("Search failed.");

	assert_eq!(ids(&response.categories), vec![1, 2]);
}

#[tokio::test]
async fn nested_page_entries_keep_their_own_children() {
	let mut hooks = HookRegistry::default();

	hooks.register(SEARCH_FILTER_HOOK, 0, Arc::new(ReplaceIds { ids: vec![5, 6] }));

	let service = service_with_hooks(forum(), hooks);
	let response = service.search(request("news", ADMIN)).await.expect("Search failed.");

	assert_eq!(ids(&response.categories), vec![5, 6]);

	let news = &response.categories[0];
	let world = &response.categories[1];

	// Nested under News, World is trimmed to a leaf.
	assert_eq!(news.child_ids(), vec![9, 6]);
	assert!(news.children[1].children.is_empty());
	// As a page entry of its own, World keeps Regional.
	assert_eq!(world.child_ids(), vec![10]);
}

#[tokio::test]
async fn disabled_paging_returns_everything() {
	let backend =
		Arc::new(taxon_testkit::numbered_backend(60).expect("Failed to seed numbered backend."));
	let store = Arc::new(SpyStore::new(backend.clone()));
	let service = service_with_store(backend, store.clone());
	let req = SearchRequest { paginate: Some(false), ..request("board", GUEST) };
	let response = service.search(req).await.expect("Search failed.");

	assert_eq!(response.match_count, 60);
	assert_eq!(response.page_count, 0);
	assert_eq!(response.categories.len(), 60);
	assert_eq!(store.hydrations()[0].len(), 60);
}

#[tokio::test]
async fn hard_cap_bounds_the_scan() {
	let backend =
		Arc::new(taxon_testkit::numbered_backend(20).expect("Failed to seed numbered backend."));
	let service = service_with_hooks(backend, HookRegistry::default());
	let req = SearchRequest { hard_cap: Some(4), ..request("board", GUEST) };
	let response = service.search(req).await.expect("Search failed.");

	assert_eq!(response.match_count, 4);
}

#[tokio::test]
async fn oversized_scans_are_capped() {
	let store = Arc::new(FixedScanStore {
		keys: (1..=10).map(|cid| format!("board:{cid}")).collect(),
	});
	let mut collaborators = Collaborators::memory(
		Arc::new(MemoryBackend::empty(":")),
		Arc::new(HookRegistry::default()),
	);

	collaborators.store = store;
	collaborators.authorizer = Arc::new(
		MemoryBackend::from_seed(
			TaxonomySeed {
				privileges: taxon_storage::models::PrivilegeSeed {
					administrators: vec![ADMIN],
					..Default::default()
				},
				..TaxonomySeed::default()
			},
			":",
		)
		.expect("Failed to seed privileges."),
	);

	let service = TaxonService::with_collaborators(taxon_testkit::test_config(), collaborators);
	let req = SearchRequest { hard_cap: Some(3), ..request("board", ADMIN) };
	let response = service.search(req).await.expect("Search failed.");

	assert_eq!(response.match_count, 3);
	assert_eq!(ids(&response.categories), vec![1, 2, 3]);
}

#[tokio::test]
async fn hook_output_replaces_candidates() {
	let mut hooks = HookRegistry::default();

	hooks.register(SEARCH_FILTER_HOOK, 0, Arc::new(ReplaceIds { ids: vec![14] }));

	let service = service_with_hooks(forum(), hooks);
	let response = service.search(request("news", GUEST)).await.expect("Search failed.");

	assert_eq!(response.match_count, 1);
	assert_eq!(ids(&response.categories), vec![14]);
}

#[tokio::test]
async fn hook_injected_ids_are_still_authorized() {
	let mut hooks = HookRegistry::default();

	hooks.register(SEARCH_FILTER_HOOK, 0, Arc::new(ReplaceIds { ids: vec![12, 1] }));

	let service = service_with_hooks(forum(), hooks);
	let response = service.search(request("news", GUEST)).await.expect("Search failed.");

	assert_eq!(response.match_count, 1);
	assert_eq!(ids(&response.categories), vec![1]);
}

#[tokio::test]
async fn hook_runs_even_for_short_queries() {
	let mut hooks = HookRegistry::default();

	hooks.register(SEARCH_FILTER_HOOK, 0, Arc::new(ReplaceIds { ids: vec![14] }));

	let service = service_with_hooks(forum(), hooks);
	let response = service.search(request("", GUEST)).await.expect("Search failed.");

	assert_eq!(ids(&response.categories), vec![14]);
}

#[tokio::test]
async fn listeners_chain_in_priority_order() {
	let seen = Arc::new(Mutex::new(Vec::new()));
	let mut hooks = HookRegistry::default();

	hooks.register(SEARCH_FILTER_HOOK, 10, Arc::new(AppendId { cid: 1, seen: seen.clone() }));
	hooks.register(SEARCH_FILTER_HOOK, -5, Arc::new(AppendId { cid: 14, seen: seen.clone() }));

	assert_eq!(hooks.listener_count(SEARCH_FILTER_HOOK), 2);

	let service = service_with_hooks(forum(), hooks);
	let response = service.search(request("news", GUEST)).await.expect("Search failed.");
	let seen = seen.lock().unwrap_or_else(|err| err.into_inner()).clone();

	assert_eq!(seen, vec![vec![5, 12], vec![5, 12, 14]]);
	assert_eq!(response.match_count, 3);
	assert_eq!(ids(&response.categories), vec![1, 5, 14]);
}

#[tokio::test]
async fn listener_errors_surface_as_hook_failures() {
	let mut hooks = HookRegistry::default();

	hooks.register(SEARCH_FILTER_HOOK, 0, Arc::new(FailingListener));

	let service = service_with_hooks(forum(), hooks);
	let err = service.search(request("news", GUEST)).await.expect_err("Expected hook failure.");

	match err {
		Error::HookFailure { hook, message } => {
			assert_eq!(hook, SEARCH_FILTER_HOOK);
			assert_eq!(message, "listener exploded");
		},
		other => panic!("Unexpected error: {other:?}"),
	}
}

#[tokio::test]
async fn malformed_index_members_are_corruption() {
	let store = Arc::new(FixedScanStore { keys: vec!["news:5".to_string(), "news".to_string()] });
	let service = service_with_store(forum(), store);
	let err = service.search(request("news", GUEST)).await.expect_err("Expected corruption.");

	assert!(matches!(err, Error::StoreCorruption { ref key } if key == "news"), "{err:?}");
}

#[tokio::test]
async fn failed_child_lookup_aborts_the_search() {
	let backend = forum();
	let mut store = SpyStore::new(backend.clone());

	store.failing_child = Some(5);

	let store = Arc::new(store);
	let service = service_with_store(backend, store.clone());
	let err = service.search(request("news", ARCHIVIST)).await.expect_err("Expected failure.");

	assert!(matches!(err, Error::StoreUnavailable { .. }), "{err:?}");
	assert!(store.hydrations().is_empty());
}

#[tokio::test]
async fn child_merge_follows_page_order() {
	let backend = forum();
	let mut store = SpyStore::new(backend.clone());

	// News has the most children and finishes last.
	store.child_delays.insert(5, Duration::from_millis(40));

	let store = Arc::new(store);
	let mut hooks = HookRegistry::default();

	hooks.register(SEARCH_FILTER_HOOK, 0, Arc::new(ReplaceIds { ids: vec![1, 5, 6] }));

	let mut collaborators = Collaborators::memory(backend, Arc::new(hooks));

	collaborators.store = store.clone();

	let service = TaxonService::with_collaborators(taxon_testkit::test_config(), collaborators);
	let req = SearchRequest { paginate: Some(false), ..request("news", ADMIN) };

	service.search(req).await.expect("Search failed.");

	assert_eq!(store.child_lookups.load(Ordering::SeqCst), 3);
	assert_eq!(store.hydrations(), vec![vec![1, 5, 6, 9, 7, 8, 10]]);
}

#[tokio::test]
async fn output_is_ordered_by_parent_then_display_order() {
	let seed = TaxonomySeed {
		categories: vec![
			CategoryNode::new(2, 0, "Zeta ab").with_order(5),
			CategoryNode::new(3, 0, "Alpha ab").with_order(1),
			CategoryNode::new(4, 2, "Beta ab").with_order(0),
		],
		..TaxonomySeed::default()
	};
	let backend = Arc::new(MemoryBackend::from_seed(seed, ":").expect("Failed to seed."));
	let service = service_with_hooks(backend, HookRegistry::default());
	let response = service.search(request("ab", MEMBER)).await.expect("Search failed.");

	assert_eq!(ids(&response.categories), vec![3, 2, 4]);
	assert_eq!(response.categories[1].child_ids(), vec![4]);

	for pair in response.categories.windows(2) {
		assert!(
			(pair[0].parent_id, pair[0].display_order) <= (pair[1].parent_id, pair[1].display_order)
		);
	}
}

#[tokio::test]
async fn missing_records_are_omitted() {
	let mut hooks = HookRegistry::default();

	hooks.register(SEARCH_FILTER_HOOK, 0, Arc::new(ReplaceIds { ids: vec![999, 14] }));

	let service = service_with_hooks(forum(), hooks);
	let response = service.search(request("news", ADMIN)).await.expect("Search failed.");

	assert_eq!(response.match_count, 2);
	assert_eq!(ids(&response.categories), vec![14]);
}

#[tokio::test]
async fn annotator_receives_actor_and_context_token() {
	let annotator = Arc::new(SpyAnnotator::default());
	let mut collaborators = Collaborators::memory(forum(), Arc::new(HookRegistry::default()));

	collaborators.activity = annotator.clone();

	let service = TaxonService::with_collaborators(taxon_testkit::test_config(), collaborators);
	let req = SearchRequest { qs: Some("lang=en".to_string()), ..request("news", MEMBER) };

	service.search(req).await.expect("Search failed.");

	let calls = annotator.tokens.lock().unwrap_or_else(|err| err.into_inner()).clone();

	assert_eq!(calls, vec![(MEMBER, Some("lang=en".to_string()), 4)]);
}

#[tokio::test]
async fn repeated_searches_are_stable() {
	let service = service_with_hooks(forum(), HookRegistry::default());
	let first = service.search(request("news", ADMIN)).await.expect("Search failed.");

	for _ in 0..5 {
		let again = service.search(request("news", ADMIN)).await.expect("Search failed.");

		assert_eq!(again.match_count, first.match_count);
		assert_eq!(again.page_count, first.page_count);
		assert_eq!(ids(&again.categories), ids(&first.categories));
		assert_eq!(
			again.categories.iter().map(CategoryNode::child_ids).collect::<Vec<_>>(),
			first.categories.iter().map(CategoryNode::child_ids).collect::<Vec<_>>()
		);
	}
}

#[test]
fn query_defaults_fill_unset_and_zero_knobs() {
	let defaults = taxon_testkit::test_config().search;
	let query = SearchQuery::resolve(
		SearchRequest { hard_cap: Some(0), results_per_page: None, ..SearchRequest::default() },
		&defaults,
	);

	assert_eq!(query.text, "");
	assert_eq!(query.page, 1);
	assert!(query.paginate);
	assert_eq!(query.candidate_cap, 500);
	assert_eq!(query.page_size, 50);
	assert_eq!(query.context_token, None);
}

#[test]
fn request_parses_from_json() {
	let req: SearchRequest =
		serde_json::from_value(serde_json::json!({ "query": "news", "page": 2 }))
			.expect("Failed to parse request.");

	assert_eq!(req.query.as_deref(), Some("news"));
	assert_eq!(req.uid, GUEST);
	assert_eq!(req.page, Some(2));
	assert_eq!(req.paginate, None);
}
