use super::{basic_state, call_json, order_body, FakeNotifier, TEST_API_KEY};
use relay_service::api::router::build_router;
use serde_json::json;
use std::sync::Arc;

#[tokio::test]
async fn order_notification_delivered() {
    let notifier = Arc::new(FakeNotifier::delivering());
    let mut state = basic_state();
    state.notifier = notifier.clone();
    let router = build_router(Arc::new(state));

    let (status, body) =
        call_json(&router, "POST", "/api/whatsapp/notify-order", Some(TEST_API_KEY), Some(order_body())).await;
    assert!(status.is_success());
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["customer"]["success"], true);
    assert_eq!(body["data"]["store"]["success"], false);
    assert_eq!(body["data"]["store"]["error"], "store phone not configured");

    let orders = notifier.received();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].customer_name, "Lina Al Qasem");
}

#[tokio::test]
async fn invalid_customer_phone_rejected_before_sending() {
    let notifier = Arc::new(FakeNotifier::delivering());
    let mut state = basic_state();
    state.notifier = notifier.clone();
    let router = build_router(Arc::new(state));

    let mut body = order_body();
    body["customerPhone"] = json!("0781234567");

    let (status, body) = call_json(&router, "POST", "/api/whatsapp/notify-order", Some(TEST_API_KEY), Some(body)).await;
    assert_eq!(status.as_u16(), 400);
    assert_eq!(body["success"], false);
    assert!(body["details"].as_array().expect("details").iter().any(|d| d.as_str().unwrap().contains("customerPhone")));
    assert!(notifier.received().is_empty());
}

#[tokio::test]
async fn total_delivery_failure_maps_to_bad_gateway() {
    let mut state = basic_state();
    state.notifier = Arc::new(FakeNotifier::failing());
    let router = build_router(Arc::new(state));

    let (status, body) =
        call_json(&router, "POST", "/api/whatsapp/notify-order", Some(TEST_API_KEY), Some(order_body())).await;
    assert_eq!(status.as_u16(), 502);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "template rejected");
}

#[tokio::test]
async fn empty_items_rejected() {
    let router = build_router(Arc::new(basic_state()));

    let mut body = order_body();
    body["items"] = json!([]);

    let (status, body) = call_json(&router, "POST", "/api/whatsapp/notify-order", Some(TEST_API_KEY), Some(body)).await;
    assert_eq!(status.as_u16(), 400);
    assert!(body["details"].as_array().expect("details").iter().any(|d| d.as_str().unwrap().contains("items")));
}
