use std::collections::{HashMap, HashSet};

use taxon_domain::{ActorId, CategoryId, CategoryNode};

use crate::{Error, Result, models::PrivilegeSeed};

pub const FIND_PRIVILEGE: &str = "find";
pub const READ_PRIVILEGE: &str = "read";

pub const GUESTS_GROUP: &str = "guests";
pub const REGISTERED_USERS_GROUP: &str = "registered-users";
pub const ADMINISTRATORS_GROUP: &str = "administrators";

const KNOWN_PRIVILEGES: [&str; 2] = [FIND_PRIVILEGE, READ_PRIVILEGE];

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct GrantKey {
	cid: CategoryId,
	privilege: String,
}

/// Group-based category privileges.
///
/// Actor `0` is a guest. Every other actor is a registered user plus whatever groups it
/// was added to. Administrators pass every check.
#[derive(Debug, Default)]
pub struct PrivilegeTable {
	memberships: HashMap<ActorId, HashSet<String>>,
	grants: HashMap<GrantKey, HashSet<String>>,
	default_groups: Vec<String>,
	categories: HashMap<CategoryId, bool>,
}
impl PrivilegeTable {
	pub fn from_seed(seed: &PrivilegeSeed, categories: &[CategoryNode]) -> Self {
		let mut table = Self { default_groups: seed.default_groups.clone(), ..Self::default() };

		for category in categories {
			table.register_category(category.cid, category.disabled);
		}
		for actor in &seed.administrators {
			table.add_member(ADMINISTRATORS_GROUP, *actor);
		}
		for membership in &seed.memberships {
			for actor in &membership.members {
				table.add_member(&membership.group, *actor);
			}
		}
		for grant in &seed.grants {
			for group in &grant.groups {
				table.grant(grant.cid, &grant.privilege, group);
			}
		}

		table
	}

	pub fn register_category(&mut self, cid: CategoryId, disabled: bool) {
		self.categories.insert(cid, disabled);
	}

	pub fn add_member(&mut self, group: &str, actor: ActorId) {
		self.memberships.entry(actor).or_default().insert(group.to_string());
	}

	pub fn grant(&mut self, cid: CategoryId, privilege: &str, group: &str) {
		self.grants
			.entry(GrantKey { cid, privilege: privilege.to_string() })
			.or_default()
			.insert(group.to_string());
	}

	pub fn is_administrator(&self, actor: ActorId) -> bool {
		self.memberships
			.get(&actor)
			.map(|groups| groups.contains(ADMINISTRATORS_GROUP))
			.unwrap_or(false)
	}

	/// Keeps the ids `actor` holds `privilege` on, in input order and without repeats.
	///
	/// The root id and disabled categories never pass. Unknown categories only pass for
	/// administrators.
	pub fn filter_ids(
		&self,
		privilege: &str,
		cids: &[CategoryId],
		actor: ActorId,
	) -> Result<Vec<CategoryId>> {
		if !KNOWN_PRIVILEGES.contains(&privilege) {
			return Err(Error::UnknownPrivilege(privilege.to_string()));
		}

		let is_admin = self.is_administrator(actor);
		let groups = self.groups_of(actor);
		let mut seen = HashSet::with_capacity(cids.len());
		let mut allowed = Vec::with_capacity(cids.len());

		for &cid in cids {
			if cid == 0 || !seen.insert(cid) {
				continue;
			}
			if self.categories.get(&cid).copied().unwrap_or(false) {
				continue;
			}
			if is_admin || self.allows(cid, privilege, &groups) {
				allowed.push(cid);
			}
		}

		Ok(allowed)
	}

	fn groups_of(&self, actor: ActorId) -> HashSet<&str> {
		let mut groups = HashSet::new();

		if actor == 0 {
			groups.insert(GUESTS_GROUP);
		} else {
			groups.insert(REGISTERED_USERS_GROUP);
		}
		if let Some(extra) = self.memberships.get(&actor) {
			groups.extend(extra.iter().map(String::as_str));
		}

		groups
	}

	fn allows(&self, cid: CategoryId, privilege: &str, groups: &HashSet<&str>) -> bool {
		if !self.categories.contains_key(&cid) {
			return false;
		}

		match self.grants.get(&GrantKey { cid, privilege: privilege.to_string() }) {
			Some(granted) => granted.iter().any(|group| groups.contains(group.as_str())),
			None => self.default_groups.iter().any(|group| groups.contains(group.as_str())),
		}
	}
}
