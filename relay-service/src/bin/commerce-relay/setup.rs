use relay_core::config::AppConfig;
use relay_core::RelayError;
use relay_service::api::state::AppState;
use relay_service::api::RateLimiter;
use relay_service::service::invoice::WkhtmlRenderer;
use relay_service::service::meta::MetaConversionClient;
use relay_service::service::metrics::Metrics;
use relay_service::service::storage::{InvoiceStore, R2InvoiceStore, UnconfiguredStore};
use relay_service::service::whatsapp::WhatsAppCloudNotifier;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

const UPSTREAM_TIMEOUT_SECS: u64 = 30;

pub fn init_logging(level: &str) -> Result<(), RelayError> {
    let filter = tracing_subscriber::EnvFilter::try_new(level)
        .or_else(|_| tracing_subscriber::EnvFilter::try_from_default_env())
        .map_err(|err| RelayError::Message(err.to_string()))?;
    let _ = tracing_subscriber::fmt().with_env_filter(filter).with_target(true).try_init();
    Ok(())
}

pub fn load_app_config() -> Result<AppConfig, RelayError> {
    let config = relay_core::config::load_app_config()?;
    if let Err(errors) = config.validate() {
        for err in &errors {
            error!("config validation error: {}", err);
        }
        return Err(RelayError::ConfigError(format!("{} validation error(s), see log", errors.len())));
    }
    Ok(config)
}

pub fn log_startup_banner(config: &AppConfig) {
    info!(
        "commerce-relay listen_addr={} production={} pixel_id={} whatsapp_phone_number_id={} storage={} rate_limit_per_window={} rate_limit_burst={}",
        config.server.listen_addr,
        config.server.production,
        config.meta.pixel_id,
        config.whatsapp.phone_number_id,
        if config.storage.is_some() { "r2" } else { "disabled" },
        config.server.rate_limit_per_window,
        config.server.rate_limit_burst,
    );
    if !config.server.production {
        warn!("running in development mode: permissive CORS, rate limiter disabled");
    }
}

pub fn build_state(config: &AppConfig) -> Result<Arc<AppState>, RelayError> {
    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(UPSTREAM_TIMEOUT_SECS))
        .build()
        .map_err(|err| RelayError::HttpError(err.to_string()))?;

    let test_event_code = config.meta.resolved_test_event_code(config.server.production);
    if test_event_code.is_none() && !config.meta.test_event_code.trim().is_empty() {
        warn!("ignoring meta.test_event_code in production");
    }
    let sink = Arc::new(MetaConversionClient::new(
        http.clone(),
        config.meta.events_url(),
        config.meta.access_token.clone(),
        test_event_code,
    ));

    let store: Arc<dyn InvoiceStore> = match config.storage.as_ref() {
        Some(storage) => Arc::new(R2InvoiceStore::new(storage)),
        None => Arc::new(UnconfiguredStore),
    };
    let store_phone = match config.whatsapp.store_phone.trim() {
        "" => None,
        phone => Some(phone.to_string()),
    };
    let notifier = Arc::new(WhatsAppCloudNotifier::new(
        http,
        config.whatsapp.messages_url(),
        config.whatsapp.access_token.clone(),
        config.whatsapp.template_name.clone(),
        config.whatsapp.template_language.clone(),
        store_phone,
        Arc::new(WkhtmlRenderer::new()),
        store,
    ));

    let admin_token = match config.server.admin_token.trim() {
        "" => None,
        token => Some(token.to_string()),
    };

    Ok(Arc::new(AppState {
        sink,
        notifier,
        metrics: Arc::new(Metrics::new()?),
        rate_limiter: Arc::new(RateLimiter::new()),
        api_key: config.security.api_key.clone(),
        admin_token,
        production: config.server.production,
        allowed_origins: config.server.allowed_origins.clone(),
        rate_limit_per_window: config.server.rate_limit_per_window,
        rate_limit_burst: config.server.rate_limit_burst,
        meta_configured: !config.meta.pixel_id.trim().is_empty() && !config.meta.access_token.trim().is_empty(),
        whatsapp_configured: !config.whatsapp.phone_number_id.trim().is_empty()
            && !config.whatsapp.access_token.trim().is_empty(),
        storage_configured: config.storage.is_some(),
    }))
}
