use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    ConfigError,
    ValidationFailed,
    MetaApiError,
    WhatsAppApiError,
    RenderFailed,
    StorageError,
    StorageNotConfigured,
    HttpError,
    Serialization,
    Message,
}

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("configuration error: {0}")]
    ConfigError(String),

    #[error("request validation failed: {}", .0.join("; "))]
    ValidationFailed(Vec<String>),

    #[error("Meta Conversion API error: {0}")]
    MetaApiError(String),

    #[error("WhatsApp Cloud API error: {0}")]
    WhatsAppApiError(String),

    #[error("invoice rendering failed: {0}")]
    RenderFailed(String),

    #[error("object storage error: {0}")]
    StorageError(String),

    #[error("object storage not configured")]
    StorageNotConfigured,

    #[error("HTTP transport error: {0}")]
    HttpError(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("{0}")]
    Message(String),
}

impl RelayError {
    pub fn code(&self) -> ErrorCode {
        match self {
            RelayError::ConfigError(_) => ErrorCode::ConfigError,
            RelayError::ValidationFailed(_) => ErrorCode::ValidationFailed,
            RelayError::MetaApiError(_) => ErrorCode::MetaApiError,
            RelayError::WhatsAppApiError(_) => ErrorCode::WhatsAppApiError,
            RelayError::RenderFailed(_) => ErrorCode::RenderFailed,
            RelayError::StorageError(_) => ErrorCode::StorageError,
            RelayError::StorageNotConfigured => ErrorCode::StorageNotConfigured,
            RelayError::HttpError(_) => ErrorCode::HttpError,
            RelayError::Serialization(_) => ErrorCode::Serialization,
            RelayError::Message(_) => ErrorCode::Message,
        }
    }
}

impl From<serde_json::Error> for RelayError {
    fn from(err: serde_json::Error) -> Self {
        RelayError::Serialization(err.to_string())
    }
}

impl From<std::io::Error> for RelayError {
    fn from(err: std::io::Error) -> Self {
        RelayError::Message(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, RelayError>;
