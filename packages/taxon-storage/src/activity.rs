use std::collections::HashMap;

use taxon_domain::{CategoryId, RecentReply};

/// Reply log per category, newest first.
#[derive(Debug, Default)]
pub struct RecentActivity {
	replies: HashMap<CategoryId, Vec<RecentReply>>,
}
impl RecentActivity {
	pub fn record(&mut self, cid: CategoryId, reply: RecentReply) {
		let log = self.replies.entry(cid).or_default();
		let slot = log.partition_point(|existing| existing.posted_at >= reply.posted_at);

		log.insert(slot, reply);
	}

	pub fn latest(&self, cid: CategoryId, count: usize) -> Vec<RecentReply> {
		self.replies
			.get(&cid)
			.map(|log| log.iter().take(count).cloned().collect())
			.unwrap_or_default()
	}
}
