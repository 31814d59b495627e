use super::{basic_state, call_json, purchase_body, FailingSink, RecordingSink, TEST_API_KEY};
use relay_service::api::router::build_router;
use serde_json::json;
use std::sync::Arc;

#[tokio::test]
async fn purchase_event_reaches_sink() {
    let sink = Arc::new(RecordingSink::default());
    let mut state = basic_state();
    state.sink = sink.clone();
    let router = build_router(Arc::new(state));

    let (status, body) =
        call_json(&router, "POST", "/api/events/purchase", Some(TEST_API_KEY), Some(purchase_body())).await;
    assert!(status.is_success());
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["events_received"], 1);

    let events = sink.received();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].event_name, "Purchase");
    assert_eq!(events[0].event_id, "evt-1");
    assert!(events[0].user_data.ph.is_some());
}

#[tokio::test]
async fn client_ip_taken_from_forwarded_header() {
    use axum::body::Body;
    use axum::extract::ConnectInfo;
    use axum::http::Request;
    use tower::ServiceExt;

    let sink = Arc::new(RecordingSink::default());
    let mut state = basic_state();
    state.sink = sink.clone();
    let router = build_router(Arc::new(state));

    let mut request = Request::builder()
        .method("POST")
        .uri("/api/events/purchase")
        .header("content-type", "application/json")
        .header("x-api-key", TEST_API_KEY)
        .header("x-forwarded-for", "198.51.100.7, 10.0.0.1")
        .body(Body::from(purchase_body().to_string()))
        .expect("request");
    request.extensions_mut().insert(ConnectInfo::<std::net::SocketAddr>("127.0.0.1:10002".parse().expect("addr")));

    let response = router.oneshot(request).await.expect("response");
    assert!(response.status().is_success());
    assert_eq!(sink.received()[0].user_data.client_ip_address.as_deref(), Some("198.51.100.7"));
}

#[tokio::test]
async fn validation_errors_are_reported_together() {
    let router = build_router(Arc::new(basic_state()));

    let mut body = purchase_body();
    body["customerName"] = json!("x");
    body["totalValue"] = json!(0.0);
    body["sourceUrl"] = json!("ftp://nope");

    let (status, body) = call_json(&router, "POST", "/api/events/purchase", Some(TEST_API_KEY), Some(body)).await;
    assert_eq!(status.as_u16(), 400);
    assert_eq!(body["success"], false);
    assert_eq!(body["details"].as_array().expect("details").len(), 3);
}

#[tokio::test]
async fn upstream_rejection_maps_to_bad_gateway() {
    let mut state = basic_state();
    state.sink = Arc::new(FailingSink);
    let router = build_router(Arc::new(state));

    let (status, body) =
        call_json(&router, "POST", "/api/events/purchase", Some(TEST_API_KEY), Some(purchase_body())).await;
    assert_eq!(status.as_u16(), 502);
    assert_eq!(body["success"], false);
    assert!(body["message"].as_str().expect("message").contains("Invalid parameter"));
}

#[tokio::test]
async fn add_to_cart_is_anonymous() {
    let sink = Arc::new(RecordingSink::default());
    let mut state = basic_state();
    state.sink = sink.clone();
    let router = build_router(Arc::new(state));

    let body = json!({
        "productId": "p-9",
        "productName": "Dress",
        "price": 12.5,
        "quantity": 3,
        "eventId": "evt-9",
        "sourceUrl": "https://store.example/p/9",
        "userAgent": "Mozilla/5.0",
    });
    let (status, _body) = call_json(&router, "POST", "/api/events/add-to-cart", Some(TEST_API_KEY), Some(body)).await;
    assert!(status.is_success());

    let events = sink.received();
    assert_eq!(events[0].event_name, "AddToCart");
    assert!(events[0].user_data.ph.is_none());
    assert!(events[0].user_data.fn_.is_none());
}

#[tokio::test]
async fn view_content_and_checkout_routes_exist() {
    let sink = Arc::new(RecordingSink::default());
    let mut state = basic_state();
    state.sink = sink.clone();
    let router = build_router(Arc::new(state));

    let view = json!({
        "productId": "p-1",
        "productName": "Abaya",
        "price": 25.0,
        "eventId": "evt-2",
        "sourceUrl": "https://store.example/p/1",
        "userAgent": "Mozilla/5.0",
    });
    let (status, _body) = call_json(&router, "POST", "/api/events/view-content", Some(TEST_API_KEY), Some(view)).await;
    assert!(status.is_success());

    let checkout = json!({
        "items": [{ "productId": "p-1", "quantity": 2, "price": 25.0 }],
        "totalValue": 50.0,
        "eventId": "evt-3",
        "sourceUrl": "https://store.example/checkout",
        "userAgent": "Mozilla/5.0",
    });
    let (status, _body) =
        call_json(&router, "POST", "/api/events/initiate-checkout", Some(TEST_API_KEY), Some(checkout)).await;
    assert!(status.is_success());

    let names: Vec<&str> = sink.received().iter().map(|e| e.event_name).collect();
    assert_eq!(names, vec!["ViewContent", "InitiateCheckout"]);
}
