//! SQL text for every statement the record service issues.
//!
//! The schema (`tickets`, `tickets_workflows`) is owned outside this
//! workspace; these statements only assume the columns below exist.
//! Placeholders are positional `?` (MySQL style).

// ---------------------------------------------------------------------------
// tickets
// ---------------------------------------------------------------------------

pub const SELECT_ALL_TICKETS: &str = "SELECT * FROM tickets";

/// Params: `workflow_id`.
pub const SELECT_TICKET_BY_WORKFLOW_ID: &str = r#"
        SELECT
            workflow_id,
            conversation_id,
            ticket_content_original,
            ticket_content_translated,
            language,
            user_id
        FROM tickets
        WHERE workflow_id = ?
        "#;

/// Params: `conversation_id`.
pub const SELECT_TICKET_BY_CONVERSATION_ID: &str = r#"
        SELECT
            workflow_id,
            conversation_id,
            ticket_content_original,
            ticket_content_translated,
            language,
            user_id
        FROM tickets
        WHERE conversation_id = ?
        "#;

/// Params: the six ticket columns, in column order.
pub const INSERT_TICKET: &str = r#"
        INSERT INTO tickets (
            workflow_id,
            conversation_id,
            ticket_content_original,
            ticket_content_translated,
            language,
            user_id
        )
        VALUES (?, ?, ?, ?, ?, ?)
        "#;

// ---------------------------------------------------------------------------
// tickets_workflows
// ---------------------------------------------------------------------------

/// Params: the seven step columns, in column order. `created_at` is left to
/// the column default.
pub const INSERT_WORKFLOW_STEP: &str = r#"
        INSERT INTO tickets_workflows (
            workflow_id,
            step_number,
            ai_message,
            ai_message_translated,
            customer_message,
            conversation_id,
            user_id
        )
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#;

/// Params: `workflow_id`.
pub const SELECT_WORKFLOW_STEPS: &str = r#"
        SELECT
            workflow_id,
            step_number,
            ai_message,
            ai_message_translated,
            customer_message,
            conversation_id,
            user_id,
            created_at
        FROM tickets_workflows
        WHERE workflow_id = ?
        ORDER BY step_number ASC, created_at ASC
        "#;

/// Params: `conversation_id`, normalized message text.
///
/// `TRIM` only strips spaces, so leading and trailing whitespace of every
/// kind (newlines, tabs, Unicode spaces) is removed with `REGEXP_REPLACE`
/// (MySQL 8.0+) to match the trimming applied to the caller's text.
pub const SELECT_WORKFLOW_TRANSLATION: &str = r#"
        SELECT
            ai_message_translated,
            ai_message
        FROM tickets_workflows
        WHERE conversation_id = ?
          AND REGEXP_REPLACE(ai_message, '^[[:space:]]+|[[:space:]]+$', '') = ?
          AND ai_message_translated IS NOT NULL
        ORDER BY created_at DESC
        LIMIT 1
        "#;
