//! `api` crate — HTTP REST API layer.
//!
//! Exposes, under the configured prefix (default `/api`):
//!   GET    /query
//!   GET    /get_ticket_by_workflow_id?workflow_id=
//!   GET    /get_ticket_by_conversation_id?conversation_id=
//!   POST   /insert_ticket?workflow_id=&conversation_id=&…
//!   POST   /insert_ticket_workflow?workflow_id=&step_number=&…
//!   GET    /get_ticket_workflows?workflow_id=
//!   GET    /get_workflow_translation?conversation_id=&message=

pub mod config;
pub mod error;
pub mod handlers;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use db::Storage;
use records::RecordService;
use thiserror::Error;
use tower_http::trace::TraceLayer;
use tracing::info;

pub use config::{ApiConfig, ConfigError};
pub use error::ApiError;
pub use handlers::AppState;

#[derive(Debug, Error)]
pub enum ServeError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("server i/o error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppState {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self {
            records: Arc::new(RecordService::new(storage)),
        }
    }
}

/// Unprefixed routes.
pub fn routes() -> Router<AppState> {
    use handlers::{tickets, workflows};

    Router::new()
        .route("/query", get(tickets::list))
        .route("/get_ticket_by_workflow_id", get(tickets::by_workflow_id))
        .route("/get_ticket_by_conversation_id", get(tickets::by_conversation_id))
        .route("/insert_ticket", post(tickets::insert))
        .route("/insert_ticket_workflow", post(workflows::insert))
        .route("/get_ticket_workflows", get(workflows::list))
        .route("/get_workflow_translation", get(workflows::translation))
}

/// The full application: routes mounted under the prefix, with CORS and
/// request tracing.
pub fn app(state: AppState, config: &ApiConfig) -> Result<Router, ConfigError> {
    let prefix = config.normalized_prefix();
    let router = if prefix.is_empty() {
        routes()
    } else {
        Router::new().nest(&prefix, routes())
    };

    Ok(router
        .layer(config.cors_layer()?)
        .layer(TraceLayer::new_for_http())
        .with_state(state))
}

/// Bind `config.bind` and serve until the process is stopped.
pub async fn serve(config: &ApiConfig, storage: Arc<dyn Storage>) -> Result<(), ServeError> {
    let app = app(AppState::new(storage), config)?;

    let listener = tokio::net::TcpListener::bind(&config.bind).await?;
    info!(
        "API listening on http://{}{}",
        listener.local_addr()?,
        config.normalized_prefix()
    );
    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod router_tests;
