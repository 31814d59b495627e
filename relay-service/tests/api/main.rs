mod auth_test;
mod events_test;
mod health_test;
mod orders_test;
mod rate_limit_test;

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::extract::ConnectInfo;
use axum::http::{Request, StatusCode};
use axum::Router;
use relay_core::domain::conversion::ConversionEvent;
use relay_core::domain::requests::OrderNotification;
use relay_core::RelayError;
use relay_service::api::state::AppState;
use relay_service::api::RateLimiter;
use relay_service::service::meta::EventSink;
use relay_service::service::metrics::Metrics;
use relay_service::service::whatsapp::{DeliveryOutcome, NotifyReport, OrderNotifier};
use serde_json::json;
use std::sync::{Arc, Mutex};

const TEST_API_KEY: &str = "test-key";

#[derive(Default)]
struct RecordingSink {
    events: Mutex<Vec<ConversionEvent>>,
}

impl RecordingSink {
    fn received(&self) -> Vec<ConversionEvent> {
        self.events.lock().expect("events lock").clone()
    }
}

#[async_trait]
impl EventSink for RecordingSink {
    async fn send_event(&self, event: ConversionEvent) -> Result<serde_json::Value, RelayError> {
        self.events.lock().expect("events lock").push(event);
        Ok(json!({ "events_received": 1 }))
    }
}

struct FailingSink;

#[async_trait]
impl EventSink for FailingSink {
    async fn send_event(&self, _event: ConversionEvent) -> Result<serde_json::Value, RelayError> {
        Err(RelayError::MetaApiError("Invalid parameter".to_string()))
    }
}

struct FakeNotifier {
    orders: Mutex<Vec<OrderNotification>>,
    report: NotifyReport,
}

impl FakeNotifier {
    fn delivering() -> Self {
        Self {
            orders: Mutex::new(Vec::new()),
            report: NotifyReport {
                customer: DeliveryOutcome::ok(),
                store: DeliveryOutcome::failed("store phone not configured"),
            },
        }
    }

    fn failing() -> Self {
        Self {
            orders: Mutex::new(Vec::new()),
            report: NotifyReport {
                customer: DeliveryOutcome::failed("template rejected"),
                store: DeliveryOutcome::failed("store phone not configured"),
            },
        }
    }

    fn received(&self) -> Vec<OrderNotification> {
        self.orders.lock().expect("orders lock").clone()
    }
}

#[async_trait]
impl OrderNotifier for FakeNotifier {
    async fn notify_order(&self, order: &OrderNotification) -> NotifyReport {
        self.orders.lock().expect("orders lock").push(order.clone());
        self.report.clone()
    }
}

fn basic_state() -> AppState {
    AppState {
        sink: Arc::new(RecordingSink::default()),
        notifier: Arc::new(FakeNotifier::delivering()),
        metrics: Arc::new(Metrics::new().expect("metrics")),
        rate_limiter: Arc::new(RateLimiter::new()),
        api_key: TEST_API_KEY.to_string(),
        admin_token: None,
        production: false,
        allowed_origins: Vec::new(),
        rate_limit_per_window: 100,
        rate_limit_burst: 20,
        meta_configured: true,
        whatsapp_configured: true,
        storage_configured: false,
    }
}

async fn call_json(
    router: &Router,
    method: &str,
    path: &str,
    api_key: Option<&str>,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder().method(method).uri(path);
    if let Some(key) = api_key {
        builder = builder.header("x-api-key", key);
    }
    let mut request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&body).expect("serialize body")))
            .expect("request"),
        None => builder.body(Body::empty()).expect("request"),
    };
    request.extensions_mut().insert(ConnectInfo::<std::net::SocketAddr>("127.0.0.1:10001".parse().expect("addr")));

    use tower::ServiceExt;
    let response = router.clone().oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body bytes");
    let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, json)
}

fn purchase_body() -> serde_json::Value {
    json!({
        "customerName": "Lina Al Qasem",
        "customerPhone": "0791234567",
        "city": "Amman",
        "items": [{
            "productId": "p-1",
            "productName": "Abaya",
            "colorName": "Black",
            "price": 25.0,
            "quantity": 2,
        }],
        "totalValue": 50.0,
        "eventId": "evt-1",
        "sourceUrl": "https://store.example/checkout",
        "fbp": "fb.1.123.456",
        "userAgent": "Mozilla/5.0",
    })
}

fn order_body() -> serde_json::Value {
    json!({
        "customerName": "Lina Al Qasem",
        "customerPhone": "0791234567",
        "governorate": "Amman",
        "address": "Gardens St 12",
        "items": [{
            "productName": "Abaya",
            "colorName": "Black",
            "size": "M",
            "price": 25.0,
            "quantity": 2,
        }],
        "totalValue": 50.0,
    })
}
