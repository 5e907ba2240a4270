//! API error types.

use axum::Json;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use darkscan_core::DocumentError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// No feedback affordance or node for the identity.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Patch batch failed part way; earlier patches stay applied.
    #[error("Patch {index} failed: {source}")]
    Patch {
        index: usize,
        #[source]
        source: DocumentError,
    },

    #[error(transparent)]
    Document(#[from] DocumentError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Patch { source, .. } | ApiError::Document(source) => match source {
                DocumentError::UnknownPhid(_) => StatusCode::NOT_FOUND,
                _ => StatusCode::BAD_REQUEST,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        let mut body = serde_json::json!({ "error": self.to_string() });
        if let ApiError::Patch { index, .. } = &self {
            body["index"] = serde_json::json!(index);
        }
        (status, Json(body)).into_response()
    }
}
