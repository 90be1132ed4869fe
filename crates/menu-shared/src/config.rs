//! Configuration management

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::constants::{DEFAULT_EXPORT_PRODUCER, DEFAULT_MAX_UPLOAD_BYTES};

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub app: AppSettings,
    pub database: DatabaseSettings,
    pub migrate: MigrateSettings,
    #[serde(default)]
    pub telemetry: TelemetrySettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppSettings {
    pub env: String,
    pub host: String,
    pub port: u16,
    pub name: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_seconds: u64,
}

/// Settings for the export/import pipeline.
#[derive(Debug, Deserialize, Clone)]
pub struct MigrateSettings {
    /// Written to `export_by` in every manifest.
    pub producer: String,
    /// Upper bound on an uploaded manifest, in bytes.
    pub max_upload_bytes: usize,
}

impl Default for MigrateSettings {
    fn default() -> Self {
        Self {
            producer: DEFAULT_EXPORT_PRODUCER.to_string(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct TelemetrySettings {
    pub log_dir: Option<String>,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".into());
        let config = Config::builder()
            .set_default("app.env", "development")?
            .set_default("app.host", "127.0.0.1")?
            .set_default("app.port", 8080)?
            .set_default("app.name", "menu-server")?
            .set_default("database.max_connections", 10)?
            .set_default("database.min_connections", 1)?
            .set_default("database.acquire_timeout_seconds", 3)?
            .set_default("migrate.producer", DEFAULT_EXPORT_PRODUCER)?
            .set_default("migrate.max_upload_bytes", DEFAULT_MAX_UPLOAD_BYTES as u64)?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(Environment::default().separator("__").try_parsing(true))
            .build()?;
        config.try_deserialize()
    }
}
