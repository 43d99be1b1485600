//! Typed error type for the db crate.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    /// Connect, driver, syntax or constraint failure reported by MySQL.
    /// Displays the driver's own message unchanged.
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),

    /// Failure raised by a non-sqlx backend (the in-memory store).
    #[error("{0}")]
    Storage(String),

    /// A column value that has no JSON representation.
    #[error("cannot decode column '{column}': {message}")]
    Decode { column: String, message: String },
}
