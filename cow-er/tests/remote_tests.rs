//! Tests for the remote image client and the best-effort secondary path

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use cow_er::db;
use cow_er::remote::{RemoteImageClient, RemoteImageError};
use cow_er::{build_router, workflow, AppState};
use serde_json::{json, Value};
use sqlx::sqlite::SqlitePoolOptions;
use std::time::Duration;
use tower::util::ServiceExt;
use wiremock::matchers::{body_string, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const FAKE_IMAGE: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 1, 2, 3, 4];

fn client(server: &MockServer) -> RemoteImageClient {
    RemoteImageClient::new(server.uri(), "secret", Duration::from_secs(2)).unwrap()
}

async fn setup_state(remote: RemoteImageClient) -> AppState {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    cow_common::db::init_schema(&pool).await.unwrap();
    AppState::new(pool).with_image_size(64).with_remote(remote)
}

#[tokio::test]
async fn test_generate_decodes_base64() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/expertGenerateImage"))
        .and(query_param("cookie", "secret"))
        .and(body_string("Riesling Spätlese"))
        .respond_with(ResponseTemplate::new(200).set_body_string(STANDARD.encode(FAKE_IMAGE)))
        .expect(1)
        .mount(&server)
        .await;

    let image = client(&server).generate("Riesling Spätlese").await.unwrap();
    assert_eq!(image, FAKE_IMAGE);
}

#[tokio::test]
async fn test_generate_tolerates_trailing_newline() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(format!("{}\n", STANDARD.encode(FAKE_IMAGE))),
        )
        .mount(&server)
        .await;

    assert_eq!(client(&server).generate("x").await.unwrap(), FAKE_IMAGE);
}

#[tokio::test]
async fn test_generate_accepts_line_wrapped_base64() {
    let image: Vec<u8> = (0..=255u8).cycle().take(300).collect();
    let encoded = STANDARD.encode(&image);
    let wrapped = encoded
        .as_bytes()
        .chunks(76)
        .map(|line| std::str::from_utf8(line).unwrap())
        .collect::<Vec<_>>()
        .join("\r\n");
    assert!(wrapped.contains('\n'));

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string(wrapped))
        .mount(&server)
        .await;

    assert_eq!(client(&server).generate("x").await.unwrap(), image);
}

#[tokio::test]
async fn test_http_error_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(403).set_body_string("bad cookie"))
        .mount(&server)
        .await;

    match client(&server).generate("x").await {
        Err(RemoteImageError::Status { status, body }) => {
            assert_eq!(status, 403);
            assert_eq!(body, "bad cookie");
        }
        other => panic!("expected status error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_invalid_base64() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not base64 !!!"))
        .mount(&server)
        .await;

    let err = client(&server).generate("x").await.unwrap_err();
    assert!(matches!(err, RemoteImageError::Decode(_)));
}

#[tokio::test]
async fn test_empty_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("  "))
        .mount(&server)
        .await;

    let err = client(&server).generate("x").await.unwrap_err();
    assert!(matches!(err, RemoteImageError::Empty));
}

#[tokio::test]
async fn test_timeout_is_network_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(STANDARD.encode(FAKE_IMAGE))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let slow = RemoteImageClient::new(server.uri(), "secret", Duration::from_millis(200)).unwrap();
    let err = slow.generate("x").await.unwrap_err();
    assert!(matches!(err, RemoteImageError::Network(_)));
}

#[tokio::test]
async fn test_workflow_stores_secondary_image() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/expertGenerateImage"))
        .respond_with(ResponseTemplate::new(200).set_body_string(STANDARD.encode(FAKE_IMAGE)))
        .mount(&server)
        .await;

    let state = setup_state(client(&server)).await;
    let outcome = workflow::generate(&state, "Pinot Noir").await.unwrap();

    let secondary_id = outcome.secondary_id.expect("secondary should be stored");
    let stored = db::get_evaluation_with_image(&state.db, secondary_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.record.renderer, "remote");
    assert_eq!(stored.record.viz_params, outcome.params);
    assert_eq!(stored.image, FAKE_IMAGE);

    workflow::delete_generation(&state, outcome.primary_id, Some(secondary_id))
        .await
        .unwrap();
    assert!(db::list_evaluations(&state.db).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_remote_failure_keeps_primary() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let app = build_router(setup_state(client(&server)).await);
    let request = Request::builder()
        .method("POST")
        .uri("/api/visualizations")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json!({ "description": "Pinot Noir" }).to_string()))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert!(body["primary_id"].is_i64());
    assert!(body["secondary_id"].is_null());
}

#[tokio::test]
async fn test_unreachable_remote_keeps_primary() {
    // nothing listens on port 9 (discard) in test environments
    let remote = RemoteImageClient::new("http://127.0.0.1:9", "secret", Duration::from_secs(1)).unwrap();
    let state = setup_state(remote).await;

    let outcome = workflow::generate(&state, "Riesling").await.unwrap();
    assert!(outcome.secondary_id.is_none());
    assert_eq!(db::list_evaluations(&state.db).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_health_reports_remote_renderer() {
    let server = MockServer::start().await;
    let app = build_router(setup_state(client(&server)).await);

    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let response = app.oneshot(request).await.unwrap();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["remote_renderer"], true);
}
