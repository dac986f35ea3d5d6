mod error;
mod types;

pub use error::{Error, Result};
pub use types::{Config, Search, Service, Storage};

use std::{fs, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	for (label, value) in [
		("service.http_bind", &cfg.service.http_bind),
		("service.log_level", &cfg.service.log_level),
	] {
		if value.trim().is_empty() {
			return Err(Error::Validation { message: format!("{label} must be non-empty.") });
		}
	}

	if cfg.storage.key_separator.is_empty() {
		return Err(Error::Validation {
			message: "storage.key_separator must be non-empty.".to_string(),
		});
	}
	if cfg.storage.key_separator.chars().any(|ch| ch.is_ascii_digit()) {
		return Err(Error::Validation {
			message: "storage.key_separator must not contain digits.".to_string(),
		});
	}

	for (label, value) in [
		("search.candidate_cap", cfg.search.candidate_cap),
		("search.page_size", cfg.search.page_size),
		("search.default_page", cfg.search.default_page),
	] {
		if value == 0 {
			return Err(Error::Validation {
				message: format!("{label} must be greater than zero."),
			});
		}
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	if cfg
		.storage
		.seed_path
		.as_deref()
		.map(|path| path.as_os_str().to_string_lossy().trim().is_empty())
		.unwrap_or(false)
	{
		cfg.storage.seed_path = None;
	}
}
