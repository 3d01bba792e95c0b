use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;
use tracing::error;

/// Errors produced by the domain rules. All are request-local: they are
/// translated to a status code and a JSON string message at the handler
/// boundary and never crash the process.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("storage error: {0}")]
    Store(#[from] anyhow::Error),
}

impl RegistryError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            RegistryError::Validation(_) => StatusCode::BAD_REQUEST,
            RegistryError::NotFound(_) => StatusCode::NOT_FOUND,
            RegistryError::Conflict(_) => StatusCode::CONFLICT,
            RegistryError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for RegistryError {
    fn into_response(self) -> Response {
        if let RegistryError::Store(err) = &self {
            // Store failures are logged server-side, the response body stays generic.
            error!("Store error while handling request: {:?}", err);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json("Internal server error".to_string()),
            )
                .into_response();
        }
        (self.status_code(), Json(self.to_string())).into_response()
    }
}
