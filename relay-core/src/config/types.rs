use serde::Deserialize;

/// Top-level configuration, one section per concern.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub security: SecurityConfig,
    #[serde(default)]
    pub meta: MetaConfig,
    #[serde(default)]
    pub whatsapp: WhatsAppConfig,
    /// Optional: invoice upload degrades to "not configured" without it.
    pub storage: Option<StorageConfig>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Listen address, e.g. `127.0.0.1:3000`.
    #[serde(default)]
    pub listen_addr: String,
    /// Production toggles strict CORS and the rate limiter.
    #[serde(default)]
    pub production: bool,
    /// Origins allowed by CORS in production.
    #[serde(default)]
    pub allowed_origins: Vec<String>,
    /// Requests allowed per IP per window.
    #[serde(default)]
    pub rate_limit_per_window: u32,
    /// Extra requests tolerated past the window limit.
    #[serde(default)]
    pub rate_limit_burst: u32,
    /// Token gating /ready and /metrics. Empty disables the gate.
    #[serde(default)]
    pub admin_token: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: String::new(),
            production: false,
            allowed_origins: Vec::new(),
            rate_limit_per_window: 0,
            rate_limit_burst: 0,
            admin_token: String::new(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SecurityConfig {
    /// Shared secret checked against `X-API-Key` on every /api route.
    #[serde(default)]
    pub api_key: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MetaConfig {
    #[serde(default)]
    pub pixel_id: String,
    #[serde(default)]
    pub access_token: String,
    /// Graph API version segment, e.g. `v22.0`.
    #[serde(default)]
    pub api_version: String,
    /// Attached outside production so events land in the test console.
    #[serde(default)]
    pub test_event_code: String,
}

impl MetaConfig {
    pub fn events_url(&self) -> String {
        format!("https://graph.facebook.com/{}/{}/events", self.api_version, self.pixel_id)
    }

    /// Test event code to attach to outgoing events. Production always
    /// resolves to `None` so live traffic never lands in the test console.
    pub fn resolved_test_event_code(&self, production: bool) -> Option<String> {
        let code = self.test_event_code.trim();
        if code.is_empty() || production {
            None
        } else {
            Some(code.to_string())
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WhatsAppConfig {
    #[serde(default)]
    pub phone_number_id: String,
    #[serde(default)]
    pub access_token: String,
    #[serde(default)]
    pub api_version: String,
    /// Message template sent for order receipts.
    #[serde(default)]
    pub template_name: String,
    #[serde(default)]
    pub template_language: String,
    /// Store-side copy of every receipt goes here when set.
    #[serde(default)]
    pub store_phone: String,
}

impl WhatsAppConfig {
    pub fn messages_url(&self) -> String {
        format!("https://graph.facebook.com/{}/{}/messages", self.api_version, self.phone_number_id)
    }
}

/// S3-compatible object storage (Cloudflare R2) for invoice images.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    pub account_id: String,
    pub access_key_id: String,
    #[serde(default)]
    pub secret_access_key: String,
    pub bucket: String,
    /// Public base URL of the bucket, no trailing slash.
    pub public_base_url: String,
}

impl StorageConfig {
    pub fn endpoint_url(&self) -> String {
        format!("https://{}.r2.cloudflarestorage.com", self.account_id)
    }
}
