pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Store unavailable: {message}")]
	StoreUnavailable { message: String },
	#[error("Store corruption: malformed name-index member {key:?}.")]
	StoreCorruption { key: String },
	#[error("Hook {hook} failed: {message}")]
	HookFailure { hook: String, message: String },
	#[error("Authorization failed: {message}")]
	AuthorizationFailure { message: String },
}
impl From<taxon_storage::Error> for Error {
	fn from(err: taxon_storage::Error) -> Self {
		match err {
			taxon_storage::Error::UnknownPrivilege(privilege) => Self::AuthorizationFailure {
				message: format!("Unknown privilege {privilege:?}."),
			},
			other => Self::StoreUnavailable { message: other.to_string() },
		}
	}
}

impl From<tokio::task::JoinError> for Error {
	fn from(err: tokio::task::JoinError) -> Self {
		Self::StoreUnavailable { message: format!("Child lookup task did not complete: {err}.") }
	}
}
