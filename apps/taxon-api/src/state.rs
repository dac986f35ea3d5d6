use std::sync::Arc;

use taxon_service::TaxonService;
use taxon_storage::MemoryBackend;

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<TaxonService>,
}
impl AppState {
	/// Loads the configured seed, or starts from an empty taxonomy when none is set.
	pub fn new(config: taxon_config::Config) -> color_eyre::Result<Self> {
		let separator = config.storage.key_separator.clone();
		let backend = match &config.storage.seed_path {
			Some(path) => {
				let seed = taxon_storage::load_seed(path)?;

				tracing::info!(
					path = %path.display(),
					categories = seed.categories.len(),
					"Loaded taxonomy seed."
				);

				MemoryBackend::from_seed(seed, &separator)?
			},
			None => MemoryBackend::empty(&separator),
		};

		Ok(Self::from_service(TaxonService::new(config, backend)))
	}

	pub fn from_service(service: TaxonService) -> Self {
		Self { service: Arc::new(service) }
	}
}
