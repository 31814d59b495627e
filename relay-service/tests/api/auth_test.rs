use super::{basic_state, call_json, purchase_body, TEST_API_KEY};
use relay_service::api::router::build_router;
use std::sync::Arc;

#[tokio::test]
async fn api_routes_require_key() {
    let router = build_router(Arc::new(basic_state()));

    let (status, body) = call_json(&router, "POST", "/api/events/purchase", None, Some(purchase_body())).await;
    assert_eq!(status.as_u16(), 401);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "unauthorized");
}

#[tokio::test]
async fn wrong_key_rejected() {
    let router = build_router(Arc::new(basic_state()));

    let (status, _body) = call_json(&router, "POST", "/api/events/purchase", Some("nope"), Some(purchase_body())).await;
    assert_eq!(status.as_u16(), 401);
}

#[tokio::test]
async fn valid_key_passes() {
    let router = build_router(Arc::new(basic_state()));

    let (status, body) =
        call_json(&router, "POST", "/api/events/purchase", Some(TEST_API_KEY), Some(purchase_body())).await;
    assert!(status.is_success());
    assert_eq!(body["success"], true);
}
