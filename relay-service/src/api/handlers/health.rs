use super::super::middleware::auth::authorize;
use super::super::state::AppState;
use axum::extract::State;
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use log::{debug, trace};
use std::sync::Arc;

pub async fn handle_health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    trace!("health check: ok");
    Json(serde_json::json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "environment": if state.production { "production" } else { "development" },
        "uptime_seconds": state.metrics.uptime().as_secs(),
    }))
}

/// Readiness reports configuration completeness; it never probes the
/// upstream APIs.
pub async fn handle_ready(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    if let Err(err) = authorize(&headers, state.admin_token.as_deref()) {
        return (StatusCode::UNAUTHORIZED, err).into_response();
    }

    let ready = state.meta_configured && state.whatsapp_configured;
    let status = if ready { "ready" } else { "degraded" };
    if ready {
        trace!("ready check: ok");
    } else {
        debug!(
            "ready check: degraded meta_configured={} whatsapp_configured={}",
            state.meta_configured, state.whatsapp_configured
        );
    }
    Json(serde_json::json!({
        "status": status,
        "meta_configured": state.meta_configured,
        "whatsapp_configured": state.whatsapp_configured,
        "storage_configured": state.storage_configured,
        "production": state.production,
    }))
    .into_response()
}

pub async fn handle_metrics(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    if let Err(err) = authorize(&headers, state.admin_token.as_deref()) {
        return (StatusCode::UNAUTHORIZED, err).into_response();
    }

    match state.metrics.encode() {
        Ok(body) => {
            let mut response = body.into_response();
            response.headers_mut().insert(axum::http::header::CONTENT_TYPE, HeaderValue::from_static("text/plain; version=0.0.4"));
            response
        }
        Err(err) => {
            debug!("metrics encode failed error={}", err);
            let mut response = format!("metrics_error: {}", err).into_response();
            *response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
            response
        }
    }
}
