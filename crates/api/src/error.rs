//! HTTP error mapping. Every failure renders as `{"error": "<description>"}`.

use axum::{
    extract::rejection::QueryRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use records::RecordError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Record(#[from] RecordError),

    /// The query string could not be deserialized at all.
    #[error("{0}")]
    InvalidQuery(String),
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::InvalidQuery(rejection.body_text())
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Record(RecordError::BadRequest(_)) | Self::InvalidQuery(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::Record(RecordError::NotFound(_)) => StatusCode::NOT_FOUND,
            Self::Record(RecordError::Storage(_) | RecordError::Decode(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}
