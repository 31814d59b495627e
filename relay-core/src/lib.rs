// Public crate surface: `domain` for pure relay logic, `config` for startup configuration.
pub mod config;
pub mod constants;
pub mod domain;
pub mod error;

pub use error::{RelayError, Result};
