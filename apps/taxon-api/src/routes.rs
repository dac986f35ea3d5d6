use axum::{
	Json, Router,
	extract::State,
	http::StatusCode,
	response::{IntoResponse, Response},
	routing::{get, post},
};
use serde::Serialize;

use taxon_service::{Error, SearchRequest, SearchResponse};

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(health))
		.route("/v1/categories/search", post(search))
		.with_state(state)
}

async fn health() -> StatusCode {
	StatusCode::OK
}

async fn search(
	State(state): State<AppState>,
	Json(payload): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, ApiError> {
	let response = state.service.search(payload).await?;

	Ok(Json(response))
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error_code: String,
	message: String,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error_code: String,
	message: String,
}
impl ApiError {
	fn new(status: StatusCode, error_code: impl Into<String>, message: impl Into<String>) -> Self {
		Self { status, error_code: error_code.into(), message: message.into() }
	}
}

impl From<Error> for ApiError {
	fn from(err: Error) -> Self {
		let message = err.to_string();

		match err {
			Error::StoreUnavailable { .. } => {
				tracing::error!(%message, "Category search failed.");

				ApiError::new(StatusCode::SERVICE_UNAVAILABLE, "store_unavailable", message)
			},
			Error::StoreCorruption { .. } => {
				tracing::error!(%message, "Category search failed.");

				ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "store_corruption", message)
			},
			Error::HookFailure { .. } => {
				tracing::warn!(%message, "Category search hook failed.");

				ApiError::new(StatusCode::BAD_GATEWAY, "hook_failure", message)
			},
			Error::AuthorizationFailure { .. } => {
				tracing::error!(%message, "Category search failed.");

				ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "authorization_failure", message)
			},
		}
	}
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body = ErrorBody { error_code: self.error_code, message: self.message };

		(self.status, Json(body)).into_response()
	}
}
