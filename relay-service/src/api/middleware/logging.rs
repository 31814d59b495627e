use super::correlation::CorrelationId;
use axum::body::Body;
use axum::extract::ConnectInfo;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::Response;
use log::{debug, error, trace, warn};
use std::time::Instant;

fn sanitize_headers(headers: &axum::http::HeaderMap) -> Vec<(String, String)> {
    const REDACT: &[&str] = &["authorization", "x-api-key", "cookie"];
    const MAX_HEADER_VALUE_LEN: usize = 128;
    headers
        .iter()
        .map(|(name, value)| {
            let key = name.as_str().to_string();
            let val = if REDACT.contains(&name.as_str()) {
                "<redacted>".to_string()
            } else {
                value
                    .to_str()
                    .map(|s| {
                        let mut out = s.to_string();
                        if out.len() > MAX_HEADER_VALUE_LEN {
                            out.truncate(MAX_HEADER_VALUE_LEN);
                            out.push('…');
                        }
                        out
                    })
                    .unwrap_or_else(|_| "<non-utf8>".to_string())
            };
            (key, val)
        })
        .collect()
}

pub async fn logging_middleware(req: Request<Body>, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let client_ip = req
        .extensions()
        .get::<ConnectInfo<std::net::SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_default();
    let correlation_id = req.extensions().get::<CorrelationId>().map(|id| id.0.clone());
    let correlation_id = correlation_id.as_deref().unwrap_or("");
    let request_headers = sanitize_headers(req.headers());
    let start = Instant::now();

    debug!(
        target: "http",
        "request correlation_id={} client_ip={} method={} path={} headers={:?}",
        correlation_id, client_ip, method, path, request_headers
    );

    let response = next.run(req).await;

    let status = response.status();
    let duration_ms = start.elapsed().as_millis();
    let is_probe = matches!(path.as_str(), "/health" | "/ready" | "/metrics");

    if is_probe {
        trace!(
            target: "http",
            "probe correlation_id={} client_ip={} method={} path={} status={} duration_ms={}",
            correlation_id, client_ip, method, path, status.as_u16(), duration_ms
        );
    } else if status.is_server_error() {
        error!(
            target: "http",
            "request failed correlation_id={} client_ip={} method={} path={} status={} duration_ms={}",
            correlation_id, client_ip, method, path, status.as_u16(), duration_ms
        );
    } else if status.is_client_error() {
        warn!(
            target: "http",
            "request rejected correlation_id={} client_ip={} method={} path={} status={} duration_ms={}",
            correlation_id, client_ip, method, path, status.as_u16(), duration_ms
        );
    } else {
        debug!(
            target: "http",
            "request completed correlation_id={} client_ip={} method={} path={} status={} duration_ms={}",
            correlation_id, client_ip, method, path, status.as_u16(), duration_ms
        );
    }

    response
}
