use serde::{Deserialize, Serialize};

use taxon_domain::{ActorId, CategoryId, CategoryNode, RecentReply};

use crate::privileges::{GUESTS_GROUP, REGISTERED_USERS_GROUP};

/// JSON seed document for the in-memory backend.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaxonomySeed {
	#[serde(default)]
	pub categories: Vec<CategoryNode>,
	#[serde(default)]
	pub privileges: PrivilegeSeed,
	#[serde(default)]
	pub recent_replies: Vec<ReplyRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrivilegeSeed {
	#[serde(default)]
	pub administrators: Vec<ActorId>,
	#[serde(default)]
	pub memberships: Vec<GroupMembership>,
	#[serde(default)]
	pub grants: Vec<CategoryGrant>,
	/// Groups granted a privilege on categories that carry no explicit grant for it.
	#[serde(default = "default_groups")]
	pub default_groups: Vec<String>,
}
impl Default for PrivilegeSeed {
	fn default() -> Self {
		Self {
			administrators: Vec::new(),
			memberships: Vec::new(),
			grants: Vec::new(),
			default_groups: default_groups(),
		}
	}
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupMembership {
	pub group: String,
	pub members: Vec<ActorId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryGrant {
	pub cid: CategoryId,
	pub privilege: String,
	pub groups: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplyRecord {
	pub cid: CategoryId,
	#[serde(flatten)]
	pub reply: RecentReply,
}

fn default_groups() -> Vec<String> {
	vec![GUESTS_GROUP.to_string(), REGISTERED_USERS_GROUP.to_string()]
}
