//! Integration tests for the Axum web server.
//!
//! These tests verify that routes are correctly wired to handlers and
//! that request validation fails before any backend interaction.

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use chatrelay_axum::bootstrap::{CorsConfig, ServerConfig, bootstrap};
use chatrelay_axum::routes::create_router;

fn test_app() -> axum::Router {
    let ctx = bootstrap(&ServerConfig::with_defaults());
    create_router(ctx, &CorsConfig::AllowAll)
}

fn completion_request(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/v1/chat/completions")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn health_endpoint_returns_ok_with_empty_body() {
    let response = test_app()
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    assert!(body.is_empty());
}

#[tokio::test]
async fn models_endpoint_lists_the_static_catalog() {
    let response = test_app()
        .oneshot(
            Request::builder()
                .uri("/v1/models")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["object"], "list");
    let ids: Vec<&str> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|card| card["id"].as_str().unwrap())
        .collect();
    assert!(ids.contains(&"GPT-3.5-Turbo"));
    assert!(
        json["data"]
            .as_array()
            .unwrap()
            .iter()
            .all(|card| card["object"] == "model")
    );
}

#[tokio::test]
async fn models_catalog_is_stable_across_requests() {
    let ctx = bootstrap(&ServerConfig::with_defaults());
    let app = create_router(ctx, &CorsConfig::AllowAll);

    let models_request =
        || Request::builder().uri("/v1/models").body(Body::empty()).unwrap();
    let first = body_json(app.clone().oneshot(models_request()).await.unwrap()).await;
    // One tick past a second boundary would change a per-request stamp.
    tokio::time::sleep(std::time::Duration::from_millis(1100)).await;
    let second = body_json(app.oneshot(models_request()).await.unwrap()).await;

    // The snapshot built at bootstrap is served verbatim, `created` included.
    assert_eq!(first, second);
}

#[tokio::test]
async fn completions_without_backend_return_500() {
    let response = test_app()
        .oneshot(completion_request(json!({
            "model": "GPT-3.5-Turbo",
            "messages": [{"role": "user", "content": "hi"}],
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(response).await;
    assert_eq!(json["status"], 500);
    assert!(json["error"].as_str().unwrap().contains("no backend"));
}

#[tokio::test]
async fn empty_message_sequence_returns_400() {
    let ctx = bootstrap(&ServerConfig::with_defaults());
    // A registered backend proves validation, not availability, rejects this.
    let (tx, _rx) = tokio::sync::mpsc::channel(1);
    ctx.relay.registry().register(tx);
    let app = create_router(ctx, &CorsConfig::AllowAll);

    let response = app
        .oneshot(completion_request(json!({
            "model": "GPT-3.5-Turbo",
            "messages": [],
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn trailing_assistant_message_returns_400() {
    let ctx = bootstrap(&ServerConfig::with_defaults());
    let (tx, _rx) = tokio::sync::mpsc::channel(1);
    ctx.relay.registry().register(tx);
    let app = create_router(ctx, &CorsConfig::AllowAll);

    let response = app
        .oneshot(completion_request(json!({
            "model": "GPT-3.5-Turbo",
            "messages": [
                {"role": "user", "content": "hi"},
                {"role": "assistant", "content": "hello"},
            ],
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_model_returns_404() {
    let ctx = bootstrap(&ServerConfig::with_defaults());
    let (tx, _rx) = tokio::sync::mpsc::channel(1);
    ctx.relay.registry().register(tx);
    let app = create_router(ctx, &CorsConfig::AllowAll);

    let response = app
        .oneshot(completion_request(json!({
            "model": "not-a-model",
            "messages": [{"role": "user", "content": "hi"}],
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("not-a-model"));
}

#[tokio::test]
async fn cors_preflight_is_permissive_by_default() {
    let response = test_app()
        .oneshot(
            Request::builder()
                .method("OPTIONS")
                .uri("/v1/chat/completions")
                .header(header::ORIGIN, "http://example.com")
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .unwrap(),
        "*"
    );
}
