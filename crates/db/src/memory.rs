//! `MemoryStorage` — an in-process test double for [`Storage`].
//!
//! Understands exactly the statements in [`crate::sql`] and keeps the two
//! tables as vectors of rows. Every statement it receives is recorded so
//! tests can assert what did (or did not) reach storage.

use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;

use crate::{sql, DbError, Param, Row, Statement, Storage};

const TICKET_COLUMNS: [&str; 6] = [
    "workflow_id",
    "conversation_id",
    "ticket_content_original",
    "ticket_content_translated",
    "language",
    "user_id",
];

const STEP_COLUMNS: [&str; 7] = [
    "workflow_id",
    "step_number",
    "ai_message",
    "ai_message_translated",
    "customer_message",
    "conversation_id",
    "user_id",
];

struct StoredStep {
    /// Insertion sequence; stands in for `created_at` ordering.
    seq: u64,
    row: Row,
}

#[derive(Default)]
struct Tables {
    tickets: Vec<Row>,
    steps: Vec<StoredStep>,
    next_seq: u64,
    statements: Vec<Statement>,
    failure: Option<String>,
}

/// In-memory `tickets` / `tickets_workflows` store.
#[derive(Default)]
pub struct MemoryStorage {
    tables: Mutex<Tables>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose every call fails with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        let storage = Self::default();
        storage.lock().failure = Some(message.into());
        storage
    }

    /// Every statement received so far, in call order.
    pub fn statements(&self) -> Vec<Statement> {
        self.lock().statements.clone()
    }

    pub fn ticket_count(&self) -> usize {
        self.lock().tickets.len()
    }

    pub fn step_count(&self) -> usize {
        self.lock().steps.len()
    }

    fn lock(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn query(&self, statement: &Statement) -> Result<Vec<Row>, DbError> {
        let mut tables = self.lock();
        tables.record(statement)?;

        match statement.sql {
            sql::SELECT_ALL_TICKETS => Ok(tables.tickets.clone()),
            sql::SELECT_TICKET_BY_WORKFLOW_ID => {
                Ok(tables.tickets_where("workflow_id", text_param(statement, 0)?))
            }
            sql::SELECT_TICKET_BY_CONVERSATION_ID => {
                Ok(tables.tickets_where("conversation_id", text_param(statement, 0)?))
            }
            sql::SELECT_WORKFLOW_STEPS => {
                Ok(tables.steps_of_workflow(text_param(statement, 0)?))
            }
            sql::SELECT_WORKFLOW_TRANSLATION => Ok(tables.latest_translation(
                text_param(statement, 0)?,
                text_param(statement, 1)?,
            )),
            other => Err(unsupported(other)),
        }
    }

    async fn execute(&self, statement: &Statement) -> Result<u64, DbError> {
        let mut tables = self.lock();
        tables.record(statement)?;

        match statement.sql {
            sql::INSERT_TICKET => {
                let row = columns_to_row(&TICKET_COLUMNS, &statement.params)?;
                tables.tickets.push(row);
                Ok(1)
            }
            sql::INSERT_WORKFLOW_STEP => {
                let mut row = columns_to_row(&STEP_COLUMNS, &statement.params)?;
                let created_at = Utc::now().naive_utc().format("%Y-%m-%dT%H:%M:%S%.f");
                row.insert("created_at".into(), Value::String(created_at.to_string()));

                let seq = tables.next_seq;
                tables.next_seq += 1;
                tables.steps.push(StoredStep { seq, row });
                Ok(1)
            }
            other => Err(unsupported(other)),
        }
    }
}

impl Tables {
    fn record(&mut self, statement: &Statement) -> Result<(), DbError> {
        self.statements.push(statement.clone());
        match &self.failure {
            Some(message) => Err(DbError::Storage(message.clone())),
            None => Ok(()),
        }
    }

    fn tickets_where(&self, column: &str, value: Option<&str>) -> Vec<Row> {
        self.tickets
            .iter()
            .filter(|row| value.is_some() && text_column(row, column) == value)
            .map(|row| project(row, &TICKET_COLUMNS))
            .collect()
    }

    fn steps_of_workflow(&self, workflow_id: Option<&str>) -> Vec<Row> {
        let mut matching: Vec<&StoredStep> = self
            .steps
            .iter()
            .filter(|step| {
                workflow_id.is_some() && text_column(&step.row, "workflow_id") == workflow_id
            })
            .collect();
        matching.sort_by_key(|step| (step.row.get("step_number").and_then(Value::as_i64), step.seq));
        matching.into_iter().map(|step| step.row.clone()).collect()
    }

    fn latest_translation(&self, conversation_id: Option<&str>, message: Option<&str>) -> Vec<Row> {
        let (Some(conversation_id), Some(message)) = (conversation_id, message) else {
            return Vec::new();
        };

        self.steps
            .iter()
            .filter(|step| {
                text_column(&step.row, "conversation_id") == Some(conversation_id)
                    // `str::trim` strips Unicode White_Space, the same set as
                    // `[[:space:]]` in the statement's REGEXP_REPLACE.
                    && text_column(&step.row, "ai_message").map(str::trim) == Some(message)
                    && !step.row.get("ai_message_translated").map_or(true, Value::is_null)
            })
            .max_by_key(|step| step.seq)
            .map(|step| project(&step.row, &["ai_message_translated", "ai_message"]))
            .into_iter()
            .collect()
    }
}

/// `None` for a bound NULL: it compares equal to nothing.
fn text_param(statement: &Statement, index: usize) -> Result<Option<&str>, DbError> {
    statement
        .params
        .get(index)
        .map(Param::as_text)
        .ok_or_else(|| DbError::Storage(format!("missing parameter {}", index + 1)))
}

fn text_column<'r>(row: &'r Row, column: &str) -> Option<&'r str> {
    row.get(column).and_then(Value::as_str)
}

fn columns_to_row(columns: &[&str], params: &[Param]) -> Result<Row, DbError> {
    if columns.len() != params.len() {
        return Err(DbError::Storage(format!(
            "statement expects {} parameters, got {}",
            columns.len(),
            params.len()
        )));
    }
    Ok(columns
        .iter()
        .zip(params)
        .map(|(column, param)| ((*column).to_owned(), param.to_json()))
        .collect())
}

fn project(row: &Row, columns: &[&str]) -> Row {
    columns
        .iter()
        .map(|column| {
            let value = row.get(*column).cloned().unwrap_or(Value::Null);
            ((*column).to_owned(), value)
        })
        .collect()
}

fn unsupported(sql: &str) -> DbError {
    DbError::Storage(format!("unsupported statement: {}", sql.trim()))
}
