use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    Json,
};
use records::{Created, NewWorkflowStep, WorkflowStep, WorkflowTranslation};
use serde::Deserialize;

use super::{tickets::WorkflowIdQuery, AppState};
use crate::ApiError;

#[derive(Debug, Deserialize)]
pub struct TranslationQuery {
    pub conversation_id: Option<String>,
    /// Percent-encoded AI message text.
    pub message: Option<String>,
}

pub async fn insert(
    State(state): State<AppState>,
    query: Result<Query<NewWorkflowStep>, QueryRejection>,
) -> Result<(StatusCode, Json<Created>), ApiError> {
    let Query(step) = query?;
    let created = state.records.insert_workflow_step(&step).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn list(
    State(state): State<AppState>,
    query: Result<Query<WorkflowIdQuery>, QueryRejection>,
) -> Result<Json<Vec<WorkflowStep>>, ApiError> {
    let Query(query) = query?;
    let steps = state
        .records
        .workflow_steps(query.workflow_id.as_deref())
        .await?;
    Ok(Json(steps))
}

pub async fn translation(
    State(state): State<AppState>,
    query: Result<Query<TranslationQuery>, QueryRejection>,
) -> Result<Json<WorkflowTranslation>, ApiError> {
    let Query(query) = query?;
    let found = state
        .records
        .find_workflow_translation(query.conversation_id.as_deref(), query.message.as_deref())
        .await?;
    Ok(Json(found))
}
