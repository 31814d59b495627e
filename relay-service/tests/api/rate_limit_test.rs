use super::{basic_state, call_json, purchase_body, TEST_API_KEY};
use relay_service::api::router::build_router;
use std::sync::Arc;

#[tokio::test]
async fn production_rate_limit_enforced() {
    let mut state = basic_state();
    state.production = true;
    state.allowed_origins = vec!["https://store.example".to_string()];
    state.rate_limit_per_window = 1;
    state.rate_limit_burst = 0;
    let router = build_router(Arc::new(state));

    for idx in 0..2 {
        let (status, _body) =
            call_json(&router, "POST", "/api/events/purchase", Some(TEST_API_KEY), Some(purchase_body())).await;
        if idx == 0 {
            assert!(status.is_success());
        } else {
            assert_eq!(status.as_u16(), 429);
        }
    }
}

// Behind a proxy every request arrives on the proxy's socket; the limiter
// must bucket on the forwarded client address, not the shared peer.
#[tokio::test]
async fn limiter_distinguishes_forwarded_clients_on_shared_socket() {
    use axum::body::Body;
    use axum::extract::ConnectInfo;
    use axum::http::Request;
    use tower::ServiceExt;

    let mut state = basic_state();
    state.production = true;
    state.allowed_origins = vec!["https://store.example".to_string()];
    state.rate_limit_per_window = 1;
    state.rate_limit_burst = 0;
    let router = build_router(Arc::new(state));

    let send = |forwarded_for: &'static str| {
        let mut request = Request::builder()
            .method("POST")
            .uri("/api/events/purchase")
            .header("content-type", "application/json")
            .header("x-api-key", TEST_API_KEY)
            .header("x-forwarded-for", forwarded_for)
            .body(Body::from(purchase_body().to_string()))
            .expect("request");
        request
            .extensions_mut()
            .insert(ConnectInfo::<std::net::SocketAddr>("10.0.0.1:443".parse().expect("addr")));
        router.clone().oneshot(request)
    };

    assert!(send("198.51.100.7").await.expect("response").status().is_success());
    assert_eq!(send("198.51.100.7").await.expect("response").status().as_u16(), 429);
    assert!(send("198.51.100.8").await.expect("response").status().is_success());
}

#[tokio::test]
async fn limiter_disabled_outside_production() {
    let mut state = basic_state();
    state.rate_limit_per_window = 1;
    state.rate_limit_burst = 0;
    let router = build_router(Arc::new(state));

    for _ in 0..3 {
        let (status, _body) =
            call_json(&router, "POST", "/api/events/purchase", Some(TEST_API_KEY), Some(purchase_body())).await;
        assert!(status.is_success());
    }
}

#[tokio::test]
async fn health_endpoint_not_rate_limited() {
    let mut state = basic_state();
    state.production = true;
    state.allowed_origins = vec!["https://store.example".to_string()];
    state.rate_limit_per_window = 1;
    state.rate_limit_burst = 0;
    let router = build_router(Arc::new(state));

    for _ in 0..3 {
        let (status, _body) = call_json(&router, "GET", "/health", None, None).await;
        assert!(status.is_success());
    }
}
