use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "commerce-relay")]
#[command(about = "Storefront event relay for Meta Conversion API and WhatsApp notifications", long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Override listen address, e.g. 0.0.0.0:3000
    #[arg(short, long)]
    pub listen: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn apply_to_env(&self) {
        if let Some(config_path) = &self.config {
            std::env::set_var(relay_core::config::CONFIG_PATH_ENV, config_path);
        }
    }
}
