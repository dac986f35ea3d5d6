use std::path::PathBuf;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
	pub service: Service,
	#[serde(default)]
	pub storage: Storage,
	#[serde(default)]
	pub search: Search,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Service {
	pub http_bind: String,
	pub log_level: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Storage {
	/// Separator between the lower-cased name and the id in name-index members.
	#[serde(default = "default_key_separator")]
	pub key_separator: String,
	/// Optional. JSON taxonomy seed loaded at start-up.
	pub seed_path: Option<PathBuf>,
}

/// Defaults applied when a search request leaves a knob unset or zero.
#[derive(Debug, Clone, Deserialize)]
pub struct Search {
	/// Most name-index members a single scan may return. Defaults to 500.
	#[serde(default = "default_candidate_cap")]
	pub candidate_cap: u32,
	/// Categories per page. Defaults to 50.
	#[serde(default = "default_page_size")]
	pub page_size: u32,
	/// One-based page served when none is requested. Defaults to 1.
	#[serde(default = "default_page")]
	pub default_page: u32,
	/// Whether requests paginate unless they opt out. Defaults to true.
	#[serde(default = "default_paginate")]
	pub paginate: bool,
}
impl Default for Search {
	fn default() -> Self {
		Self {
			candidate_cap: default_candidate_cap(),
			page_size: default_page_size(),
			default_page: default_page(),
			paginate: default_paginate(),
		}
	}
}

impl Default for Storage {
	fn default() -> Self {
		Self { key_separator: default_key_separator(), seed_path: None }
	}
}

fn default_key_separator() -> String {
	":".to_string()
}

fn default_candidate_cap() -> u32 {
	500
}

fn default_page_size() -> u32 {
	50
}

fn default_page() -> u32 {
	1
}

fn default_paginate() -> bool {
	true
}
