//! Response envelope and request-metadata helpers shared by every handler.
//!
//! Every /api response uses the same `{success, message, data}` shape;
//! validation failures additionally carry a `details` list with one entry
//! per violated rule.

use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::Value;
use std::net::SocketAddr;

#[derive(Debug, Serialize)]
pub struct ApiEnvelope {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<String>>,
}

pub fn ok_response(message: &str, data: Option<Value>) -> Response {
    Json(ApiEnvelope { success: true, message: message.to_string(), data, details: None }).into_response()
}

pub fn error_envelope(message: &str) -> Json<ApiEnvelope> {
    Json(ApiEnvelope { success: false, message: message.to_string(), data: None, details: None })
}

pub fn validation_failure(errors: Vec<String>) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ApiEnvelope {
            success: false,
            message: "validation failed".to_string(),
            data: None,
            details: Some(errors),
        }),
    )
        .into_response()
}

pub fn upstream_failure(message: &str) -> Response {
    (StatusCode::BAD_GATEWAY, error_envelope(message)).into_response()
}

/// Best-effort client IP: proxy headers first, then the socket peer.
pub fn client_ip(headers: &HeaderMap, addr: SocketAddr) -> String {
    if let Some(value) = headers.get("x-forwarded-for").and_then(|v| v.to_str().ok()) {
        if let Some(first) = value.split(',').next().map(str::trim).filter(|s| !s.is_empty()) {
            return first.to_string();
        }
    }
    for header in ["x-real-ip", "cf-connecting-ip"] {
        if let Some(value) = headers.get(header).and_then(|v| v.to_str().ok()) {
            let value = value.trim();
            if !value.is_empty() {
                return value.to_string();
            }
        }
    }
    addr.ip().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn addr() -> SocketAddr {
        "203.0.113.9:55000".parse().unwrap()
    }

    #[test]
    fn forwarded_for_takes_first_hop() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static("198.51.100.7, 10.0.0.1"));
        headers.insert("x-real-ip", HeaderValue::from_static("10.0.0.2"));
        assert_eq!(client_ip(&headers, addr()), "198.51.100.7");
    }

    #[test]
    fn real_ip_beats_cf_header() {
        let mut headers = HeaderMap::new();
        headers.insert("x-real-ip", HeaderValue::from_static("198.51.100.8"));
        headers.insert("cf-connecting-ip", HeaderValue::from_static("198.51.100.9"));
        assert_eq!(client_ip(&headers, addr()), "198.51.100.8");
    }

    #[test]
    fn falls_back_to_socket_peer() {
        assert_eq!(client_ip(&HeaderMap::new(), addr()), "203.0.113.9");
    }

    #[test]
    fn envelope_omits_empty_optionals() {
        let body = serde_json::to_value(&ApiEnvelope {
            success: true,
            message: "ok".to_string(),
            data: None,
            details: None,
        })
        .unwrap();
        assert!(body.get("data").is_none());
        assert!(body.get("details").is_none());
    }
}
