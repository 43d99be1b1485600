//! End-to-end router tests: real axum app, in-memory storage.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use db::MemoryStorage;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use crate::{app, ApiConfig, AppState};

fn test_app(storage: Arc<MemoryStorage>) -> Router {
    app(AppState::new(storage), &ApiConfig::default()).unwrap()
}

fn uri(path: &str, params: &[(&str, &str)]) -> String {
    let query: Vec<String> = params
        .iter()
        .map(|(k, v)| format!("{k}={}", urlencoding::encode(v)))
        .collect();
    format!("/api{path}?{}", query.join("&"))
}

async fn call(app: &Router, method: Method, uri: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

const TICKET: [(&str, &str); 6] = [
    ("workflow_id", "wf_42"),
    ("conversation_id", "conv_42"),
    ("ticket_content_original", "Where is my parcel?"),
    ("ticket_content_translated", "我的包裹在哪里？"),
    ("language", "en"),
    ("user_id", "user_42"),
];

#[tokio::test]
async fn workflow_step_insert_does_not_create_a_ticket() {
    let storage = Arc::new(MemoryStorage::new());
    let app = test_app(storage.clone());

    let (status, body) = call(
        &app,
        Method::POST,
        &uri(
            "/insert_ticket_workflow",
            &[
                ("workflow_id", "test_workflow_123"),
                ("step_number", "1"),
                ("ai_message", "这是AI的回复消息"),
                ("customer_message", "这是客户的消息"),
                ("conversation_id", "conv_123456"),
                ("user_id", "test_user_456"),
            ],
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body, json!({ "message": "Ticket workflow inserted successfully" }));

    let (status, body) = call(
        &app,
        Method::GET,
        &uri("/get_ticket_by_workflow_id", &[("workflow_id", "test_workflow_123")]),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "Ticket not found" }));
}

#[tokio::test]
async fn ticket_round_trips_over_http() {
    let storage = Arc::new(MemoryStorage::new());
    let app = test_app(storage.clone());

    let (status, body) = call(&app, Method::POST, &uri("/insert_ticket", &TICKET)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body, json!({ "message": "Ticket inserted successfully" }));

    let expected = json!({
        "workflow_id": "wf_42",
        "conversation_id": "conv_42",
        "ticket_content_original": "Where is my parcel?",
        "ticket_content_translated": "我的包裹在哪里？",
        "language": "en",
        "user_id": "user_42",
    });

    let (status, body) = call(
        &app,
        Method::GET,
        &uri("/get_ticket_by_workflow_id", &[("workflow_id", "wf_42")]),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, expected);

    let (status, body) = call(
        &app,
        Method::GET,
        &uri("/get_ticket_by_conversation_id", &[("conversation_id", "conv_42")]),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, expected);

    let (status, body) = call(&app, Method::GET, "/api/query").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([expected]));
}

#[tokio::test]
async fn missing_parameters_are_rejected_before_storage() {
    let storage = Arc::new(MemoryStorage::new());
    let app = test_app(storage.clone());

    let (status, body) = call(&app, Method::POST, &uri("/insert_ticket", &TICKET[..5])).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "Missing required parameters" }));

    let (status, _) = call(
        &app,
        Method::POST,
        &uri("/insert_ticket_workflow", &[("workflow_id", "wf"), ("step_number", "1")]),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = call(&app, Method::GET, "/api/get_ticket_by_workflow_id").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "Missing workflow_id parameter" }));

    let (status, _) = call(
        &app,
        Method::GET,
        &uri("/get_workflow_translation", &[("conversation_id", "conv")]),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert!(storage.statements().is_empty());
}

#[tokio::test]
async fn translation_lookup_normalizes_the_message() {
    let storage = Arc::new(MemoryStorage::new());
    let app = test_app(storage.clone());

    let (status, _) = call(
        &app,
        Method::POST,
        &uri(
            "/insert_ticket_workflow",
            &[
                ("workflow_id", "wf"),
                ("step_number", "1"),
                ("ai_message", "这是AI的回复消息"),
                ("ai_message_translated", "This is the AI reply"),
                ("conversation_id", "conv_123456"),
                ("user_id", "u"),
            ],
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    // Client encoded the message itself before building the query string.
    let encoded_by_client = format!("{}%0A  ", urlencoding::encode("这是AI的回复消息"));
    let (status, body) = call(
        &app,
        Method::GET,
        &uri(
            "/get_workflow_translation",
            &[("conversation_id", "conv_123456"), ("message", encoded_by_client.as_str())],
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "ai_message_translated": "This is the AI reply",
            "ai_message": "这是AI的回复消息",
        })
    );

    let (status, body) = call(
        &app,
        Method::GET,
        &uri(
            "/get_workflow_translation",
            &[("conversation_id", "conv_123456"), ("message", "something else")],
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "Translation not found" }));
}

#[tokio::test]
async fn workflow_steps_list_in_step_order() {
    let storage = Arc::new(MemoryStorage::new());
    let app = test_app(storage.clone());

    for (step, message) in [("2", "second"), ("1", "first")] {
        let (status, _) = call(
            &app,
            Method::POST,
            &uri(
                "/insert_ticket_workflow",
                &[
                    ("workflow_id", "wf"),
                    ("step_number", step),
                    ("ai_message", message),
                    ("conversation_id", "conv"),
                    ("user_id", "u"),
                ],
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = call(
        &app,
        Method::GET,
        &uri("/get_ticket_workflows", &[("workflow_id", "wf")]),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let steps = body.as_array().unwrap();
    assert_eq!(steps.len(), 2);
    assert_eq!(steps[0]["step_number"], json!(1));
    assert_eq!(steps[0]["ai_message"], json!("first"));
    assert_eq!(steps[1]["customer_message"], Value::Null);
}

#[tokio::test]
async fn storage_failure_is_a_500_with_the_raw_error() {
    let storage = Arc::new(MemoryStorage::failing("Access denied for user 'op_query'"));
    let app = test_app(storage);

    let (status, body) = call(&app, Method::POST, &uri("/insert_ticket", &TICKET)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "Access denied for user 'op_query'" }));

    let (status, _) = call(&app, Method::GET, "/api/query").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn routes_follow_the_configured_prefix() {
    let storage = Arc::new(MemoryStorage::new());
    let config = ApiConfig {
        prefix: "/".into(),
        ..ApiConfig::default()
    };
    let app = app(AppState::new(storage), &config).unwrap();

    let (status, body) = call(&app, Method::GET, "/query").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));

    let (status, _) = call(&app, Method::GET, "/api/query").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
