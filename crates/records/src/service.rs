//! `RecordService` — the ticket and workflow-step operations.
//!
//! Each operation validates its parameters first; a missing parameter
//! returns [`RecordError::BadRequest`] before any statement is built. A
//! valid call issues exactly one statement against the injected storage.

use std::sync::Arc;

use db::{sql, Row, Statement, Storage};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{info, warn};

use crate::{
    normalize_message, Created, NewTicket, NewWorkflowStep, RecordError, Ticket, WorkflowStep,
    WorkflowTranslation,
};

const MISSING_PARAMETERS: &str = "Missing required parameters";

/// Stateless front over a [`Storage`]; cheap to share behind an `Arc`.
pub struct RecordService {
    storage: Arc<dyn Storage>,
}

impl RecordService {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// Every row of `tickets`, in storage order.
    pub async fn list_tickets(&self) -> Result<Vec<Row>, RecordError> {
        self.query(Statement::new(sql::SELECT_ALL_TICKETS)).await
    }

    pub async fn ticket_by_workflow_id(
        &self,
        workflow_id: Option<&str>,
    ) -> Result<Ticket, RecordError> {
        let workflow_id = required(workflow_id)
            .ok_or_else(|| RecordError::bad_request("Missing workflow_id parameter"))?;

        self.fetch_ticket(Statement::new(sql::SELECT_TICKET_BY_WORKFLOW_ID).bind(workflow_id))
            .await
    }

    pub async fn ticket_by_conversation_id(
        &self,
        conversation_id: Option<&str>,
    ) -> Result<Ticket, RecordError> {
        let conversation_id = required(conversation_id)
            .ok_or_else(|| RecordError::bad_request("Missing conversation_id parameter"))?;

        self.fetch_ticket(
            Statement::new(sql::SELECT_TICKET_BY_CONVERSATION_ID).bind(conversation_id),
        )
        .await
    }

    /// Insert one ticket. Does not check for an existing `workflow_id`.
    pub async fn insert_ticket(&self, ticket: &NewTicket) -> Result<Created, RecordError> {
        let (
            Some(workflow_id),
            Some(conversation_id),
            Some(original),
            Some(translated),
            Some(language),
            Some(user_id),
        ) = (
            required(ticket.workflow_id.as_deref()),
            required(ticket.conversation_id.as_deref()),
            required(ticket.ticket_content_original.as_deref()),
            required(ticket.ticket_content_translated.as_deref()),
            required(ticket.language.as_deref()),
            required(ticket.user_id.as_deref()),
        )
        else {
            return Err(RecordError::bad_request(MISSING_PARAMETERS));
        };

        let statement = Statement::new(sql::INSERT_TICKET)
            .bind(workflow_id)
            .bind(conversation_id)
            .bind(original)
            .bind(translated)
            .bind(language)
            .bind(user_id);
        self.execute(statement).await?;

        info!(workflow_id, conversation_id, "ticket inserted");
        Ok(Created {
            message: "Ticket inserted successfully",
        })
    }

    /// Append one workflow step.
    ///
    /// Absent message fields are stored as NULL. An empty `ai_message` or
    /// `customer_message` is stored as `''`; an empty
    /// `ai_message_translated` becomes NULL so it never satisfies a
    /// translation lookup.
    pub async fn insert_workflow_step(
        &self,
        step: &NewWorkflowStep,
    ) -> Result<Created, RecordError> {
        let (Some(workflow_id), Some(step_number), Some(conversation_id), Some(user_id)) = (
            required(step.workflow_id.as_deref()),
            required(step.step_number.as_deref()),
            required(step.conversation_id.as_deref()),
            required(step.user_id.as_deref()),
        ) else {
            return Err(RecordError::bad_request(MISSING_PARAMETERS));
        };

        let step_number: i64 = step_number
            .trim()
            .parse()
            .map_err(|_| RecordError::bad_request("Invalid step_number parameter"))?;

        let statement = Statement::new(sql::INSERT_WORKFLOW_STEP)
            .bind(workflow_id)
            .bind(step_number)
            .bind(step.ai_message.clone())
            .bind(optional(step.ai_message_translated.as_deref()))
            .bind(step.customer_message.clone())
            .bind(conversation_id)
            .bind(user_id);
        self.execute(statement).await?;

        info!(workflow_id, step_number, conversation_id, "workflow step inserted");
        Ok(Created {
            message: "Ticket workflow inserted successfully",
        })
    }

    /// Every step of one workflow, ordered by `step_number` then `created_at`.
    pub async fn workflow_steps(
        &self,
        workflow_id: Option<&str>,
    ) -> Result<Vec<WorkflowStep>, RecordError> {
        let workflow_id = required(workflow_id)
            .ok_or_else(|| RecordError::bad_request("Missing workflow_id parameter"))?;

        self.query(Statement::new(sql::SELECT_WORKFLOW_STEPS).bind(workflow_id))
            .await?
            .into_iter()
            .map(from_row)
            .collect()
    }

    /// Latest translated AI message of a conversation whose text equals
    /// `message` once both sides are trimmed.
    ///
    /// `message` is percent-decoded before trimming.
    pub async fn find_workflow_translation(
        &self,
        conversation_id: Option<&str>,
        message: Option<&str>,
    ) -> Result<WorkflowTranslation, RecordError> {
        let (Some(conversation_id), Some(message)) = (required(conversation_id), required(message))
        else {
            return Err(RecordError::bad_request(
                "Missing conversation_id or message parameter",
            ));
        };

        let message = normalize_message(message)?;
        if message.is_empty() {
            return Err(RecordError::bad_request(
                "Missing conversation_id or message parameter",
            ));
        }

        let statement = Statement::new(sql::SELECT_WORKFLOW_TRANSLATION)
            .bind(conversation_id)
            .bind(message);
        let row = self
            .query(statement)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| RecordError::not_found("Translation not found"))?;

        from_row(row)
    }

    async fn fetch_ticket(&self, statement: Statement) -> Result<Ticket, RecordError> {
        // Duplicate keys are not guarded against; storage's first row wins.
        let row = self
            .query(statement)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| RecordError::not_found("Ticket not found"))?;

        from_row(row)
    }

    async fn query(&self, statement: Statement) -> Result<Vec<Row>, RecordError> {
        self.storage.query(&statement).await.map_err(|err| {
            warn!(error = %err, sql = statement.sql.trim(), "query failed");
            RecordError::Storage(err)
        })
    }

    async fn execute(&self, statement: Statement) -> Result<u64, RecordError> {
        self.storage.execute(&statement).await.map_err(|err| {
            warn!(error = %err, sql = statement.sql.trim(), "statement failed");
            RecordError::Storage(err)
        })
    }
}

/// A parameter counts as present only when it is non-empty.
fn required(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

fn optional(value: Option<&str>) -> Option<String> {
    required(value).map(str::to_owned)
}

fn from_row<T: DeserializeOwned>(row: Row) -> Result<T, RecordError> {
    Ok(serde_json::from_value(Value::Object(row))?)
}
