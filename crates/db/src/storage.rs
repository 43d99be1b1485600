//! The `Storage` trait — the only seam between the record service and a
//! relational store.

use async_trait::async_trait;

use crate::{DbError, Row, Statement};

/// A relational store that can run one parameterized statement per call.
///
/// Implementations own their connection handling: whatever they acquire for
/// a call must be released before the call returns, on success and on error.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Run a read statement and return every row it produces.
    async fn query(&self, statement: &Statement) -> Result<Vec<Row>, DbError>;

    /// Run a mutating statement, commit it, and return the affected row count.
    async fn execute(&self, statement: &Statement) -> Result<u64, DbError>;
}
