//! WhatsApp order-notification endpoint.

use super::types::{ok_response, upstream_failure, validation_failure};
use crate::api::state::AppState;
use crate::service::whatsapp::OrderNotifier;
use axum::extract::State;
use axum::response::Response;
use axum::Json;
use log::info;
use relay_core::domain::phone::normalize_phone;
use relay_core::domain::requests::OrderNotification;
use serde_json::json;
use std::sync::Arc;

pub async fn handle_notify_order(State(state): State<Arc<AppState>>, Json(req): Json<OrderNotification>) -> Response {
    let mut errors = req.validate().err().unwrap_or_default();
    // A malformed customer phone is a caller mistake, rejected up front;
    // the store phone is operator config and never blocks the request.
    let customer_phone = normalize_phone(Some(&req.customer_phone));
    if let Some(err) = customer_phone.error() {
        errors.push(format!("customerPhone: {}", err));
    }
    if !errors.is_empty() {
        return validation_failure(errors);
    }

    let report = state.notifier.notify_order(&req).await;
    state.metrics.record_notification("customer", report.customer.success);
    state.metrics.record_notification("store", report.store.success);
    info!(
        "order notification customer_ok={} store_ok={}",
        report.customer.success, report.store.success
    );

    let data = json!({
        "customer": { "success": report.customer.success, "error": report.customer.error },
        "store": { "success": report.store.success, "error": report.store.error },
    });

    if report.any_delivered() {
        ok_response("order notification sent", Some(data))
    } else {
        upstream_failure(&report.customer.error.clone().unwrap_or_else(|| "notification failed".to_string()))
    }
}
