//! Extension hooks fired from inside the search pipeline.

use std::{collections::HashMap, sync::Arc};

use taxon_domain::{ActorId, CategoryId};

use crate::{BoxFuture, Error, HookDispatcher, Result, search::SearchQuery};

/// Fired between candidate resolution and authorization.
pub const SEARCH_FILTER_HOOK: &str = "filter:categories.search";

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// State handed to `filter:categories.search` listeners.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterContext {
	pub query: SearchQuery,
	pub ids: Vec<CategoryId>,
	pub uid: ActorId,
}

/// One listener on a filter hook.
///
/// The context a listener returns replaces its input. Returning fewer ids filters,
/// returning extra ids injects them (they are still authorized downstream).
pub trait FilterListener
where
	Self: Send + Sync,
{
	fn apply<'a>(
		&'a self,
		context: FilterContext,
	) -> BoxFuture<'a, std::result::Result<FilterContext, BoxError>>;
}

struct Registered {
	priority: i32,
	listener: Arc<dyn FilterListener>,
}

/// Listeners keyed by hook name, each list in ascending priority order.
///
/// Ties keep registration order.
#[derive(Default)]
pub struct HookRegistry {
	listeners: HashMap<String, Vec<Registered>>,
}
impl HookRegistry {
	pub fn register(&mut self, hook: &str, priority: i32, listener: Arc<dyn FilterListener>) {
		let listeners = self.listeners.entry(hook.to_string()).or_default();
		let slot = listeners.partition_point(|existing| existing.priority <= priority);

		listeners.insert(slot, Registered { priority, listener });
	}

	pub fn listener_count(&self, hook: &str) -> usize {
		self.listeners.get(hook).map(Vec::len).unwrap_or(0)
	}
}

impl HookDispatcher for HookRegistry {
	fn fire<'a>(
		&'a self,
		hook: &'a str,
		context: FilterContext,
	) -> BoxFuture<'a, Result<FilterContext>> {
		Box::pin(async move {
			let Some(listeners) = self.listeners.get(hook) else {
				return Ok(context);
			};
			let mut context = context;

			for registered in listeners {
				context = registered.listener.apply(context).await.map_err(|err| {
					Error::HookFailure { hook: hook.to_string(), message: err.to_string() }
				})?;
			}

			Ok(context)
		})
	}
}
