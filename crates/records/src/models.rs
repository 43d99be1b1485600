//! Records returned by the service and the parameter sets it accepts.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// tickets
// ---------------------------------------------------------------------------

/// A support ticket, keyed by `workflow_id`.
///
/// The table is owned elsewhere and may hold NULLs in any column; a NULL
/// reads back as `None` rather than failing the lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    pub workflow_id: Option<String>,
    pub conversation_id: Option<String>,
    pub ticket_content_original: Option<String>,
    pub ticket_content_translated: Option<String>,
    pub language: Option<String>,
    pub user_id: Option<String>,
}

/// Parameters of `insert_ticket`. Every field is required.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewTicket {
    pub workflow_id: Option<String>,
    pub conversation_id: Option<String>,
    pub ticket_content_original: Option<String>,
    pub ticket_content_translated: Option<String>,
    pub language: Option<String>,
    pub user_id: Option<String>,
}

// ---------------------------------------------------------------------------
// tickets_workflows
// ---------------------------------------------------------------------------

/// One step of a workflow conversation.
///
/// `workflow_id` and `step_number` are what the listing filters and sorts
/// on; the other columns tolerate NULL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowStep {
    pub workflow_id: String,
    pub step_number: i64,
    pub ai_message: Option<String>,
    pub ai_message_translated: Option<String>,
    pub customer_message: Option<String>,
    pub conversation_id: Option<String>,
    pub user_id: Option<String>,
    /// Assigned by storage on insert.
    pub created_at: Option<NaiveDateTime>,
}

/// Parameters of `insert_ticket_workflow`.
///
/// `workflow_id`, `step_number`, `conversation_id` and `user_id` are
/// required; the three message fields may be omitted.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewWorkflowStep {
    pub workflow_id: Option<String>,
    /// Arrives as text and must parse as an integer.
    pub step_number: Option<String>,
    pub ai_message: Option<String>,
    pub ai_message_translated: Option<String>,
    pub customer_message: Option<String>,
    pub conversation_id: Option<String>,
    pub user_id: Option<String>,
}

/// Result of a translation lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowTranslation {
    pub ai_message_translated: String,
    pub ai_message: String,
}

/// Acknowledgement returned by the insert operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Created {
    pub message: &'static str,
}
