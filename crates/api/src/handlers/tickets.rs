use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    Json,
};
use db::Row;
use records::{Created, NewTicket, Ticket};
use serde::Deserialize;

use super::AppState;
use crate::ApiError;

#[derive(Debug, Deserialize)]
pub struct WorkflowIdQuery {
    pub workflow_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ConversationIdQuery {
    pub conversation_id: Option<String>,
}

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Row>>, ApiError> {
    Ok(Json(state.records.list_tickets().await?))
}

pub async fn by_workflow_id(
    State(state): State<AppState>,
    query: Result<Query<WorkflowIdQuery>, QueryRejection>,
) -> Result<Json<Ticket>, ApiError> {
    let Query(query) = query?;
    let ticket = state
        .records
        .ticket_by_workflow_id(query.workflow_id.as_deref())
        .await?;
    Ok(Json(ticket))
}

pub async fn by_conversation_id(
    State(state): State<AppState>,
    query: Result<Query<ConversationIdQuery>, QueryRejection>,
) -> Result<Json<Ticket>, ApiError> {
    let Query(query) = query?;
    let ticket = state
        .records
        .ticket_by_conversation_id(query.conversation_id.as_deref())
        .await?;
    Ok(Json(ticket))
}

pub async fn insert(
    State(state): State<AppState>,
    query: Result<Query<NewTicket>, QueryRejection>,
) -> Result<(StatusCode, Json<Created>), ApiError> {
    let Query(ticket) = query?;
    let created = state.records.insert_ticket(&ticket).await?;
    Ok((StatusCode::CREATED, Json(created)))
}
