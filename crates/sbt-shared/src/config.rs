//! Configuration management

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::constants::{DEFAULT_EVENT_BUS_CAPACITY, DEFAULT_SYS_ADMIN_ROLE, DEFAULT_TOKEN_EXPIRY};

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub app: AppSettings,
    pub database: DatabaseSettings,
    pub auth: AuthSettings,
    pub events: EventSettings,
    #[serde(default)]
    pub log: LogSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppSettings {
    pub env: String,
    pub host: String,
    pub port: u16,
    pub name: String,
}

/// Which record store backs the tables.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Postgres,
    Memory,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseSettings {
    pub backend: StorageBackend,
    #[serde(default)]
    pub url: String,
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthSettings {
    pub jwt_secret: String,
    pub audience: Option<String>,
    pub sys_admin_role: String,
    pub token_expiry_secs: i64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct EventSettings {
    pub bus_name: String,
    pub source: String,
    pub capacity: usize,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct LogSettings {
    /// When set, logs are also written to a daily-rotated file in this directory.
    pub directory: Option<String>,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".into());
        let config = Config::builder()
            .set_default("app.env", "development")?
            .set_default("app.host", "127.0.0.1")?
            .set_default("app.port", 8080)?
            .set_default("app.name", "control-plane-server")?
            .set_default("database.backend", "memory")?
            .set_default("database.max_connections", 10)?
            .set_default("database.acquire_timeout_secs", 3)?
            .set_default("auth.sys_admin_role", DEFAULT_SYS_ADMIN_ROLE)?
            .set_default("auth.token_expiry_secs", DEFAULT_TOKEN_EXPIRY)?
            .set_default("events.bus_name", "sbt-control-plane")?
            .set_default("events.source", "sbt.control.plane")?
            .set_default("events.capacity", DEFAULT_EVENT_BUS_CAPACITY as i64)?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(Environment::default().separator("__").try_parsing(true))
            .build()?;
        config.try_deserialize()
    }
}
