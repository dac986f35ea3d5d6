pub mod activity;
pub mod glob;
pub mod models;
pub mod privileges;
pub mod taxonomy;

mod error;

pub use error::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

use std::{fs, path::Path};

use crate::{
	activity::RecentActivity, models::TaxonomySeed, privileges::PrivilegeTable,
	taxonomy::MemoryTaxonomy,
};

/// Everything the reference collaborators read, built from one seed document.
#[derive(Debug)]
pub struct MemoryBackend {
	pub taxonomy: MemoryTaxonomy,
	pub privileges: PrivilegeTable,
	pub activity: RecentActivity,
}
impl MemoryBackend {
	pub fn empty(separator: &str) -> Self {
		Self {
			taxonomy: MemoryTaxonomy::new(separator),
			privileges: PrivilegeTable::default(),
			activity: RecentActivity::default(),
		}
	}

	pub fn from_seed(seed: TaxonomySeed, separator: &str) -> Result<Self> {
		let privileges = PrivilegeTable::from_seed(&seed.privileges, &seed.categories);
		let taxonomy = MemoryTaxonomy::from_categories(seed.categories, separator)?;
		let mut activity = RecentActivity::default();

		for record in seed.recent_replies {
			if taxonomy.get(record.cid).is_none() {
				return Err(Error::InvalidArgument(format!(
					"Recent reply references unknown category {}.",
					record.cid
				)));
			}

			activity.record(record.cid, record.reply);
		}

		Ok(Self { taxonomy, privileges, activity })
	}
}

pub fn load_seed(path: &Path) -> Result<TaxonomySeed> {
	let raw = fs::read_to_string(path)?;

	Ok(serde_json::from_str(&raw)?)
}
