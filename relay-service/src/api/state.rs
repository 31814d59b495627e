use crate::api::RateLimiter;
use crate::service::meta::EventSink;
use crate::service::metrics::Metrics;
use crate::service::whatsapp::OrderNotifier;
use std::sync::Arc;

/// Everything the HTTP layer needs, built once at startup and shared.
#[derive(Clone)]
pub struct AppState {
    pub sink: Arc<dyn EventSink>,
    pub notifier: Arc<dyn OrderNotifier>,
    pub metrics: Arc<Metrics>,
    pub rate_limiter: Arc<RateLimiter>,
    /// Shared secret for the /api routes.
    pub api_key: String,
    /// Gates /ready and /metrics. `None` leaves them open.
    pub admin_token: Option<String>,
    pub production: bool,
    pub allowed_origins: Vec<String>,
    pub rate_limit_per_window: u32,
    pub rate_limit_burst: u32,
    pub meta_configured: bool,
    pub whatsapp_configured: bool,
    pub storage_configured: bool,
}
