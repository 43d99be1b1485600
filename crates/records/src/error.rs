//! Record service error taxonomy.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RecordError {
    /// A required parameter is missing or unusable. Never reaches storage.
    #[error("{0}")]
    BadRequest(String),

    /// A lookup matched zero rows.
    #[error("{0}")]
    NotFound(String),

    /// Any storage-layer fault; displays the underlying error text.
    #[error(transparent)]
    Storage(#[from] db::DbError),

    /// A row did not have the shape of the requested record.
    #[error("malformed row: {0}")]
    Decode(#[from] serde_json::Error),
}

impl RecordError {
    pub(crate) fn bad_request(message: &str) -> Self {
        Self::BadRequest(message.to_owned())
    }

    pub(crate) fn not_found(message: &str) -> Self {
        Self::NotFound(message.to_owned())
    }
}
