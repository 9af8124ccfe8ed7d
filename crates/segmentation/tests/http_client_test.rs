//! Exercises the HTTP segment client against a stub segment service bound
//! to an ephemeral local port.

use axum::extract::Query;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use offer_core::config::SegmentServiceConfig;
use offer_core::OfferError;
use offer_segmentation::{HttpSegmentClient, SegmentResolver};
use std::collections::HashMap;
use std::time::Duration;

async fn user_segment(Query(params): Query<HashMap<String, String>>) -> Response {
    match params.get("user_id").map(String::as_str) {
        Some("1") => Json(serde_json::json!({ "segment": "p1" })).into_response(),
        Some("2") => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        Some("3") => "not json".into_response(),
        Some("4") => {
            tokio::time::sleep(Duration::from_millis(500)).await;
            Json(serde_json::json!({ "segment": "p2" })).into_response()
        }
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn spawn_stub() -> String {
    let app = Router::new().route("/api/v1/user_segment", get(user_segment));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn client(base_url: String, timeout_ms: u64) -> HttpSegmentClient {
    HttpSegmentClient::new(&SegmentServiceConfig {
        base_url,
        timeout_ms,
    })
    .unwrap()
}

#[tokio::test]
async fn test_resolves_segment() {
    let base = spawn_stub().await;
    let client = client(base, 2000);
    assert_eq!(client.segment_for(1).await.unwrap(), "p1");
}

#[tokio::test]
async fn test_trailing_slash_in_base_url() {
    let base = spawn_stub().await;
    let client = client(format!("{base}/"), 2000);
    assert_eq!(client.endpoint(), format!("{base}/api/v1/user_segment"));
    assert_eq!(client.segment_for(1).await.unwrap(), "p1");
}

#[tokio::test]
async fn test_non_success_status_fails() {
    let base = spawn_stub().await;
    let client = client(base, 2000);
    let err = client.segment_for(2).await.unwrap_err();
    assert!(matches!(err, OfferError::SegmentLookupFailed(_)));

    let err = client.segment_for(42).await.unwrap_err();
    assert!(matches!(err, OfferError::SegmentLookupFailed(_)));
}

#[tokio::test]
async fn test_malformed_body_fails() {
    let base = spawn_stub().await;
    let client = client(base, 2000);
    let err = client.segment_for(3).await.unwrap_err();
    assert!(matches!(err, OfferError::SegmentLookupFailed(ref m) if m.contains("malformed")));
}

#[tokio::test]
async fn test_timeout_fails() {
    let base = spawn_stub().await;
    let client = client(base, 100);
    let err = client.segment_for(4).await.unwrap_err();
    assert!(matches!(err, OfferError::SegmentLookupFailed(_)));
}

#[tokio::test]
async fn test_unreachable_service_fails() {
    // Bind then drop to get a port with nothing listening.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = client(format!("http://{addr}"), 500);
    let err = client.segment_for(1).await.unwrap_err();
    assert!(matches!(err, OfferError::SegmentLookupFailed(_)));
}
