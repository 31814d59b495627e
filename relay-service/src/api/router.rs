use super::handlers::events::{handle_add_to_cart, handle_initiate_checkout, handle_purchase, handle_view_content};
use super::handlers::health::{handle_health, handle_metrics, handle_ready};
use super::handlers::orders::handle_notify_order;
use super::middleware::auth::require_api_key;
use super::middleware::correlation::correlation_middleware;
use super::middleware::logging::logging_middleware;
use super::middleware::rate_limit::rate_limit_middleware;
use super::state::AppState;
use axum::extract::DefaultBodyLimit;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderName, HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use log::{error, info, warn};
use relay_core::RelayError;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;

pub async fn run_http_server(addr: SocketAddr, state: Arc<AppState>) -> Result<(), RelayError> {
    info!("binding http server addr={}", addr);
    let app = build_router(state);
    let listener = TcpListener::bind(addr).await?;
    info!("HTTP server ready and accepting connections addr={}", addr);
    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>()).await.map_err(|err| {
        error!("HTTP server terminated unexpectedly addr={} error={}", addr, err);
        RelayError::Message(err.to_string())
    })
}

pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = cors_layer(&state);

    let api = Router::new()
        .route("/events/purchase", post(handle_purchase))
        .route("/events/add-to-cart", post(handle_add_to_cart))
        .route("/events/initiate-checkout", post(handle_initiate_checkout))
        .route("/events/view-content", post(handle_view_content))
        .route("/whatsapp/notify-order", post(handle_notify_order))
        .route_layer(axum::middleware::from_fn_with_state(state.clone(), require_api_key))
        .route_layer(axum::middleware::from_fn_with_state(state.clone(), rate_limit_middleware));

    Router::new()
        .nest("/api", api)
        .route("/health", get(handle_health))
        .route("/ready", get(handle_ready))
        .route("/metrics", get(handle_metrics))
        .layer(DefaultBodyLimit::max(1024 * 1024))
        .layer(cors)
        .layer(axum::middleware::from_fn(logging_middleware))
        .layer(axum::middleware::from_fn(correlation_middleware))
        .with_state(state)
}

fn cors_layer(state: &AppState) -> CorsLayer {
    if !state.production {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = state
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("ignoring unparseable CORS origin origin={}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION, HeaderName::from_static("x-api-key")])
}
