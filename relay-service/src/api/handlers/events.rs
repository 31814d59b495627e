//! Conversion API event endpoints.
//!
//! Each handler follows the same shape: validate the request, build the
//! event with the caller's IP and the current timestamp, hand it to the
//! sink, count the outcome. Upstream rejections surface as 502 with
//! Meta's own message.

use super::types::{client_ip, ok_response, upstream_failure, validation_failure};
use crate::api::state::AppState;
use crate::service::meta::EventSink;
use axum::extract::{ConnectInfo, State};
use axum::http::HeaderMap;
use axum::response::Response;
use axum::Json;
use log::debug;
use relay_core::domain::conversion::{add_to_cart_event, initiate_checkout_event, purchase_event, view_content_event, ConversionEvent};
use relay_core::domain::requests::{AddToCartRequest, InitiateCheckoutRequest, PurchaseRequest, ViewContentRequest};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

fn event_time_now() -> u64 {
    SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_secs()).unwrap_or(0)
}

async fn forward(state: &AppState, event: ConversionEvent) -> Response {
    let event_name = event.event_name;
    match state.sink.send_event(event).await {
        Ok(data) => {
            state.metrics.record_event(event_name, true);
            ok_response("event forwarded", Some(data))
        }
        Err(err) => {
            state.metrics.record_event(event_name, false);
            upstream_failure(&err.to_string())
        }
    }
}

pub async fn handle_purchase(
    State(state): State<Arc<AppState>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    Json(req): Json<PurchaseRequest>,
) -> Response {
    if let Err(errors) = req.validate() {
        return validation_failure(errors);
    }
    let ip = client_ip(&headers, addr);
    debug!("purchase event event_id={} client_ip={}", req.event_id, ip);
    forward(&state, purchase_event(&req, &ip, event_time_now())).await
}

pub async fn handle_add_to_cart(
    State(state): State<Arc<AppState>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    Json(req): Json<AddToCartRequest>,
) -> Response {
    if let Err(errors) = req.validate() {
        return validation_failure(errors);
    }
    let ip = client_ip(&headers, addr);
    forward(&state, add_to_cart_event(&req, &ip, event_time_now())).await
}

pub async fn handle_initiate_checkout(
    State(state): State<Arc<AppState>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    Json(req): Json<InitiateCheckoutRequest>,
) -> Response {
    if let Err(errors) = req.validate() {
        return validation_failure(errors);
    }
    let ip = client_ip(&headers, addr);
    forward(&state, initiate_checkout_event(&req, &ip, event_time_now())).await
}

pub async fn handle_view_content(
    State(state): State<Arc<AppState>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    Json(req): Json<ViewContentRequest>,
) -> Response {
    if let Err(errors) = req.validate() {
        return validation_failure(errors);
    }
    let ip = client_ip(&headers, addr);
    forward(&state, view_content_event(&req, &ip, event_time_now())).await
}
