use crate::config::types::AppConfig;

impl AppConfig {
    /// Checks the whole config at once so startup can report every problem
    /// in a single pass.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.server.listen_addr.parse::<std::net::SocketAddr>().is_err() {
            errors.push(format!("server.listen_addr is not a socket address: {}", self.server.listen_addr));
        }
        if self.server.production && self.server.allowed_origins.is_empty() {
            errors.push("server.allowed_origins must not be empty in production".to_string());
        }
        for origin in &self.server.allowed_origins {
            if !(origin.starts_with("https://") || origin.starts_with("http://")) {
                errors.push(format!("server.allowed_origins entry is not an origin: {}", origin));
            }
        }

        if self.security.api_key.trim().is_empty() {
            errors.push("security.api_key must be set".to_string());
        }

        if self.meta.pixel_id.trim().is_empty() {
            errors.push("meta.pixel_id must be set".to_string());
        }
        if self.meta.access_token.trim().is_empty() {
            errors.push("meta.access_token must be set".to_string());
        }

        if self.whatsapp.phone_number_id.trim().is_empty() {
            errors.push("whatsapp.phone_number_id must be set".to_string());
        }
        if self.whatsapp.access_token.trim().is_empty() {
            errors.push("whatsapp.access_token must be set".to_string());
        }

        if let Some(storage) = self.storage.as_ref() {
            if storage.account_id.trim().is_empty() {
                errors.push("storage.account_id must be set".to_string());
            }
            if storage.access_key_id.trim().is_empty() {
                errors.push("storage.access_key_id must be set".to_string());
            }
            if storage.secret_access_key.trim().is_empty() {
                errors.push("storage.secret_access_key must be set".to_string());
            }
            if storage.bucket.trim().is_empty() {
                errors.push("storage.bucket must be set".to_string());
            }
            if !storage.public_base_url.starts_with("https://") {
                errors.push(format!("storage.public_base_url must be https: {}", storage.public_base_url));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::types::{AppConfig, StorageConfig};

    fn minimal_valid() -> AppConfig {
        let mut config = AppConfig::default();
        config.server.listen_addr = "127.0.0.1:3000".to_string();
        config.security.api_key = "k".to_string();
        config.meta.pixel_id = "px".to_string();
        config.meta.access_token = "tok".to_string();
        config.whatsapp.phone_number_id = "pn".to_string();
        config.whatsapp.access_token = "tok".to_string();
        config
    }

    #[test]
    fn minimal_config_validates() {
        assert!(minimal_valid().validate().is_ok());
    }

    #[test]
    fn production_requires_origins() {
        let mut config = minimal_valid();
        config.server.production = true;
        let errors = config.validate().unwrap_err();
        assert!(errors.iter().any(|e| e.contains("allowed_origins")));
    }

    #[test]
    fn all_errors_reported_together() {
        let config = AppConfig::default();
        let errors = config.validate().unwrap_err();
        assert!(errors.len() >= 5);
    }

    #[test]
    fn partial_storage_block_is_rejected() {
        let mut config = minimal_valid();
        config.storage = Some(StorageConfig {
            account_id: "acct".to_string(),
            access_key_id: String::new(),
            secret_access_key: String::new(),
            bucket: "b".to_string(),
            public_base_url: "http://insecure".to_string(),
        });
        let errors = config.validate().unwrap_err();
        assert_eq!(errors.len(), 3);
    }
}
