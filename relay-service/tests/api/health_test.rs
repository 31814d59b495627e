use super::{basic_state, call_json};
use axum::body::{to_bytes, Body};
use axum::extract::ConnectInfo;
use axum::http::Request;
use relay_service::api::router::build_router;
use std::sync::Arc;
use tower::ServiceExt;

#[tokio::test]
async fn health_is_public() {
    let router = build_router(Arc::new(basic_state()));

    let (status, body) = call_json(&router, "GET", "/health", None, None).await;
    assert!(status.is_success());
    assert_eq!(body["status"], "healthy");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn ready_reports_configuration() {
    let mut state = basic_state();
    state.storage_configured = true;
    let router = build_router(Arc::new(state));

    let (status, body) = call_json(&router, "GET", "/ready", None, None).await;
    assert!(status.is_success());
    assert_eq!(body["status"], "ready");
    assert_eq!(body["storage_configured"], true);
}

#[tokio::test]
async fn ready_degraded_when_upstream_config_missing() {
    let mut state = basic_state();
    state.whatsapp_configured = false;
    let router = build_router(Arc::new(state));

    let (_status, body) = call_json(&router, "GET", "/ready", None, None).await;
    assert_eq!(body["status"], "degraded");
}

#[tokio::test]
async fn admin_token_gates_ready_and_metrics() {
    let mut state = basic_state();
    state.admin_token = Some("admin-secret".to_string());
    let router = build_router(Arc::new(state));

    let (status, _body) = call_json(&router, "GET", "/ready", None, None).await;
    assert_eq!(status.as_u16(), 401);

    let mut request = Request::builder()
        .method("GET")
        .uri("/metrics")
        .header("authorization", "Bearer admin-secret")
        .body(Body::empty())
        .expect("request");
    request.extensions_mut().insert(ConnectInfo::<std::net::SocketAddr>("127.0.0.1:10005".parse().expect("addr")));

    let response = router.oneshot(request).await.expect("response");
    assert!(response.status().is_success());
    let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
    let text = String::from_utf8(bytes.to_vec()).expect("utf8");
    assert!(text.contains("events_forwarded_total") || text.is_empty() || text.contains("notifications_total"));
}
