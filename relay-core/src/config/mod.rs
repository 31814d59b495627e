//! Startup configuration: typed sections, TOML loading, env overrides,
//! collected validation.

mod loader;
mod types;
mod validation;

pub use loader::{load_app_config, load_from_toml, resolve_config_path};
pub use types::{AppConfig, MetaConfig, SecurityConfig, ServerConfig, StorageConfig, WhatsAppConfig};

/// Env var pointing at the TOML config file.
pub const CONFIG_PATH_ENV: &str = "RELAY_CONFIG";

/// Env overrides for secrets that should stay out of the config file.
pub const API_KEY_ENV: &str = "RELAY_API_KEY";
pub const ADMIN_TOKEN_ENV: &str = "RELAY_ADMIN_TOKEN";
pub const META_ACCESS_TOKEN_ENV: &str = "META_ACCESS_TOKEN";
pub const WHATSAPP_ACCESS_TOKEN_ENV: &str = "WHATSAPP_ACCESS_TOKEN";
pub const STORAGE_SECRET_KEY_ENV: &str = "R2_SECRET_ACCESS_KEY";
