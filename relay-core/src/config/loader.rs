use crate::config::types::AppConfig;
use crate::config::{
    ADMIN_TOKEN_ENV, API_KEY_ENV, CONFIG_PATH_ENV, META_ACCESS_TOKEN_ENV, STORAGE_SECRET_KEY_ENV,
    WHATSAPP_ACCESS_TOKEN_ENV,
};
use crate::error::RelayError;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

const DEFAULT_CONFIG_PATH: &str = "relay.toml";
const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:3000";
const DEFAULT_GRAPH_API_VERSION: &str = "v22.0";
const DEFAULT_TEMPLATE_NAME: &str = "purchase_receipt";
const DEFAULT_TEMPLATE_LANGUAGE: &str = "ar";
const DEFAULT_RATE_LIMIT_PER_WINDOW: u32 = 100;
const DEFAULT_RATE_LIMIT_BURST: u32 = 20;

/// Config file location: `RELAY_CONFIG` env var, else `relay.toml` in the
/// working directory.
pub fn resolve_config_path() -> PathBuf {
    env::var(CONFIG_PATH_ENV).map(PathBuf::from).unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH))
}

/// Loads the resolved config file, applies env overrides and defaults.
pub fn load_app_config() -> Result<AppConfig, RelayError> {
    load_from_toml(&resolve_config_path())
}

pub fn load_from_toml(path: &Path) -> Result<AppConfig, RelayError> {
    let contents = fs::read_to_string(path)
        .map_err(|err| RelayError::ConfigError(format!("failed to read config {}: {}", path.display(), err)))?;
    let mut config: AppConfig = toml::from_str(&contents)
        .map_err(|err| RelayError::ConfigError(format!("failed to parse TOML {}: {}", path.display(), err)))?;
    apply_env_overrides(&mut config);
    apply_defaults(&mut config);
    Ok(config)
}

/// Secrets may arrive via environment instead of the config file; a set
/// env var always wins over the file value.
fn apply_env_overrides(config: &mut AppConfig) {
    if let Ok(value) = env::var(API_KEY_ENV) {
        config.security.api_key = value;
    }
    if let Ok(value) = env::var(ADMIN_TOKEN_ENV) {
        config.server.admin_token = value;
    }
    if let Ok(value) = env::var(META_ACCESS_TOKEN_ENV) {
        config.meta.access_token = value;
    }
    if let Ok(value) = env::var(WHATSAPP_ACCESS_TOKEN_ENV) {
        config.whatsapp.access_token = value;
    }
    if let Some(storage) = config.storage.as_mut() {
        if let Ok(value) = env::var(STORAGE_SECRET_KEY_ENV) {
            storage.secret_access_key = value;
        }
    }
}

fn apply_defaults(config: &mut AppConfig) {
    if config.server.listen_addr.trim().is_empty() {
        config.server.listen_addr = DEFAULT_LISTEN_ADDR.to_string();
    }
    if config.server.rate_limit_per_window == 0 {
        config.server.rate_limit_per_window = DEFAULT_RATE_LIMIT_PER_WINDOW;
    }
    if config.server.rate_limit_burst == 0 {
        config.server.rate_limit_burst = DEFAULT_RATE_LIMIT_BURST;
    }
    if config.meta.api_version.trim().is_empty() {
        config.meta.api_version = DEFAULT_GRAPH_API_VERSION.to_string();
    }
    if config.whatsapp.api_version.trim().is_empty() {
        config.whatsapp.api_version = DEFAULT_GRAPH_API_VERSION.to_string();
    }
    if config.whatsapp.template_name.trim().is_empty() {
        config.whatsapp.template_name = DEFAULT_TEMPLATE_NAME.to_string();
    }
    if config.whatsapp.template_language.trim().is_empty() {
        config.whatsapp.template_language = DEFAULT_TEMPLATE_LANGUAGE.to_string();
    }
}
