//! Shared service configuration: identity, listen port and telemetry
//! switches. Values come from an optional `configuration.*` file overlaid
//! with `APP__`-prefixed environment variables (e.g. `APP__SERVICE_NAME`,
//! `APP__OTLP_ENDPOINT`), with workshop defaults for everything but the
//! database settings, which the service layer owns.

use crate::error::AppError;
use config::{Config as Cfg, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default = "default_port")]
    pub port: u16,
    /// Reported by the health endpoints and attached to exported traces.
    #[serde(default = "default_service_name")]
    pub service_name: String,
    /// Fallback tracing filter when RUST_LOG is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Traces are exported only when an endpoint is configured.
    #[serde(default)]
    pub otlp_endpoint: Option<String>,
}

fn default_port() -> u16 {
    8080
}

fn default_service_name() -> String {
    "workshop-service".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    pub fn load() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let config = Cfg::builder()
            .add_source(File::with_name("configuration").required(false))
            .add_source(config::Environment::with_prefix("APP").separator("__"))
            .build()?;

        Ok(config.try_deserialize()?)
    }
}
