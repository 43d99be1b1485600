//! `db` crate — the storage gateway.
//!
//! Defines the [`Storage`] seam (one parameterized statement per call), the
//! SQL text of every statement, the per-call MySQL gateway and an in-memory
//! store for tests. No business logic lives here.

pub mod error;
pub mod gateway;
pub mod memory;
pub mod sql;
pub mod statement;
pub mod storage;

pub use error::DbError;
pub use gateway::{GatewayConfig, MySqlGateway};
pub use memory::MemoryStorage;
pub use statement::{Param, Row, Statement};
pub use storage::Storage;
