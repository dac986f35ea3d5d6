//! Fixture taxonomies shared by the workspace's tests.
//!
//! The forum seed:
//!
//! ```text
//! 1  General Discussion
//! 5  News               (children shown per page: 2, one recent reply)
//! ├─ 9  Staff Room      (find: staff only)
//! ├─ 6  World
//! │  └─ 10 Regional
//! ├─ 7  Local
//! └─ 8  Tech
//! 12 Old News           (find: archivists only)
//! 14 Help
//! 20 Retired Board      (disabled)
//! ```

use time::macros::datetime;

use taxon_config::{Config, Search, Service, Storage};
use taxon_domain::{ActorId, CategoryNode, RecentReply};
use taxon_storage::{
	MemoryBackend, Result,
	models::{CategoryGrant, GroupMembership, PrivilegeSeed, ReplyRecord, TaxonomySeed},
	privileges::FIND_PRIVILEGE,
};

pub const GUEST: ActorId = 0;
pub const ADMIN: ActorId = 1;
pub const MEMBER: ActorId = 3;
pub const ARCHIVIST: ActorId = 7;
pub const STAFF: ActorId = 42;

pub fn test_config() -> Config {
	Config {
		service: Service { http_bind: "127.0.0.1:0".to_string(), log_level: "info".to_string() },
		storage: Storage { key_separator: ":".to_string(), seed_path: None },
		search: Search { candidate_cap: 500, page_size: 50, default_page: 1, paginate: true },
	}
}

pub fn forum_seed() -> TaxonomySeed {
	let mut news = CategoryNode::new(5, 0, "News").with_order(2).with_children_limit(2);

	news.num_recent_replies = 1;

	let mut retired = CategoryNode::new(20, 0, "Retired Board").with_order(9);

	retired.disabled = true;

	TaxonomySeed {
		categories: vec![
			CategoryNode::new(1, 0, "General Discussion").with_order(1),
			news,
			CategoryNode::new(9, 5, "Staff Room").with_order(0),
			CategoryNode::new(6, 5, "World").with_order(1),
			CategoryNode::new(7, 5, "Local").with_order(2),
			CategoryNode::new(8, 5, "Tech").with_order(3),
			CategoryNode::new(10, 6, "Regional").with_order(1),
			CategoryNode::new(12, 0, "Old News").with_order(3),
			CategoryNode::new(14, 0, "Help").with_order(4),
			retired,
		],
		privileges: PrivilegeSeed {
			administrators: vec![ADMIN],
			memberships: vec![
				GroupMembership { group: "staff".to_string(), members: vec![STAFF] },
				GroupMembership { group: "archivists".to_string(), members: vec![ARCHIVIST] },
			],
			grants: vec![
				CategoryGrant {
					cid: 9,
					privilege: FIND_PRIVILEGE.to_string(),
					groups: vec!["staff".to_string()],
				},
				CategoryGrant {
					cid: 12,
					privilege: FIND_PRIVILEGE.to_string(),
					groups: vec!["archivists".to_string()],
				},
			],
			..PrivilegeSeed::default()
		},
		recent_replies: vec![
			ReplyRecord {
				cid: 5,
				reply: RecentReply {
					topic_id: 100,
					topic_title: "Release notes".to_string(),
					author: "admin".to_string(),
					posted_at: datetime!(2026-02-01 09:00 UTC),
				},
			},
			ReplyRecord {
				cid: 5,
				reply: RecentReply {
					topic_id: 101,
					topic_title: "Outage report".to_string(),
					author: "ops".to_string(),
					posted_at: datetime!(2026-02-03 18:30 UTC),
				},
			},
		],
	}
}

pub fn forum_backend() -> Result<MemoryBackend> {
	MemoryBackend::from_seed(forum_seed(), ":")
}

/// `count` root categories named `Board 001`, `Board 002`, ... with matching display order.
pub fn numbered_seed(count: u64) -> TaxonomySeed {
	TaxonomySeed {
		categories: (1..=count)
			.map(|cid| CategoryNode::new(cid, 0, format!("Board {cid:03}")).with_order(cid as i64))
			.collect(),
		..TaxonomySeed::default()
	}
}

pub fn numbered_backend(count: u64) -> Result<MemoryBackend> {
	MemoryBackend::from_seed(numbered_seed(count), ":")
}
