use crate::api::handlers::types::error_envelope;
use crate::api::state::AppState;
use axum::body::Body;
use axum::extract::State;
use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderMap, Request, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use log::warn;
use std::sync::Arc;
use subtle::ConstantTimeEq;

/// Checks `X-API-Key` or `Authorization: Bearer` against the expected
/// secret. An empty expected secret disables the check.
pub fn authorize(headers: &HeaderMap, expected: Option<&str>) -> Result<(), String> {
    let expected = match expected {
        Some(value) if !value.trim().is_empty() => value.trim(),
        _ => return Ok(()),
    };

    if let Some(value) = headers.get("x-api-key").and_then(|v| v.to_str().ok()) {
        if constant_time_eq(value, expected) {
            return Ok(());
        }
    }
    if let Some(value) = headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok()) {
        if let Some(token) = value.strip_prefix("Bearer ") {
            if constant_time_eq(token, expected) {
                return Ok(());
            }
        }
    }
    Err("unauthorized".to_string())
}

fn constant_time_eq(a: &str, b: &str) -> bool {
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

/// Route-layer guard for the /api surface.
pub async fn require_api_key(State(state): State<Arc<AppState>>, req: Request<Body>, next: Next) -> Response {
    if let Err(message) = authorize(req.headers(), Some(&state.api_key)) {
        warn!("api key rejected path={}", req.uri().path());
        return (StatusCode::UNAUTHORIZED, error_envelope(&message)).into_response();
    }
    next.run(req).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(name: &'static str, value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(name, HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn api_key_header_accepted() {
        assert!(authorize(&headers("x-api-key", "s3cret"), Some("s3cret")).is_ok());
    }

    #[test]
    fn bearer_token_accepted() {
        assert!(authorize(&headers("authorization", "Bearer s3cret"), Some("s3cret")).is_ok());
    }

    #[test]
    fn wrong_key_rejected() {
        assert!(authorize(&headers("x-api-key", "nope"), Some("s3cret")).is_err());
        assert!(authorize(&HeaderMap::new(), Some("s3cret")).is_err());
    }

    #[test]
    fn empty_expected_disables_check() {
        assert!(authorize(&HeaderMap::new(), None).is_ok());
        assert!(authorize(&HeaderMap::new(), Some("  ")).is_ok());
    }
}
