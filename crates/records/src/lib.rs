//! `records` crate — the ticket & workflow record service.
//!
//! Validates request parameters, builds the statement for each operation,
//! normalizes translation lookups and shapes rows into typed records.

pub mod error;
pub mod models;
pub mod normalize;
pub mod service;

pub use error::RecordError;
pub use models::{Created, NewTicket, NewWorkflowStep, Ticket, WorkflowStep, WorkflowTranslation};
pub use normalize::normalize_message;
pub use service::RecordService;
