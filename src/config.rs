//! Configuration management for the visitor check-in server

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use sqlx::postgres::{PgConnectOptions, PgSslMode};
use std::env;
use std::path::PathBuf;
use thiserror::Error;

/// Environment variable holding the store service-account document
pub const STORE_CREDENTIALS_VAR: &str = "STORE_CREDENTIALS_JSON";

/// Which of the two deployable services this process exposes
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ServiceRole {
    /// Public form, QR generation and admin endpoints
    #[default]
    Checkin,
    /// Admin listing and approve/reject only
    Admin,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub role: ServiceRole,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub max_connections: u32,
    pub min_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct QrConfig {
    /// URL encoded into every generated QR code
    pub form_url: String,
    /// Public origin used to build links to stored images
    pub public_base_url: String,
    /// Directory served under `/static`
    pub static_dir: PathBuf,
    /// Sub-directory of `static_dir` receiving generated images
    pub sub_dir: String,
}

impl QrConfig {
    pub fn output_dir(&self) -> PathBuf {
        self.static_dir.join(&self.sub_dir)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub qr: QrConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let config = Config::builder()
            .add_source(File::with_name("config/default"))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Environment variables with prefix CHECKIN_ (e.g. CHECKIN_QR__FORM_URL)
            .add_source(
                Environment::with_prefix("CHECKIN")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            // Hosting platforms hand the listening port over in PORT
            .set_override_option("server.port", env::var("PORT").ok())?
            .build()?;

        config.try_deserialize()
    }
}

/// Failure to obtain the store credentials at startup
#[derive(Error, Debug)]
pub enum CredentialsError {
    #[error("{0} environment variable is not set")]
    Missing(&'static str),

    #[error("invalid JSON in {var}: {source}")]
    Malformed {
        var: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid value for {field}: {value}")]
    InvalidField { field: &'static str, value: String },
}

/// Service-account document for the record store
#[derive(Debug, Deserialize, Clone)]
pub struct StoreCredentials {
    pub host: String,
    #[serde(default = "default_pg_port")]
    pub port: u16,
    pub database: String,
    pub username: String,
    pub password: String,
    pub ssl_mode: Option<String>,
}

fn default_pg_port() -> u16 {
    5432
}

impl StoreCredentials {
    /// Read and parse the credentials from [`STORE_CREDENTIALS_VAR`]
    pub fn from_env() -> Result<Self, CredentialsError> {
        let raw = env::var(STORE_CREDENTIALS_VAR)
            .map_err(|_| CredentialsError::Missing(STORE_CREDENTIALS_VAR))?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self, CredentialsError> {
        let credentials: Self = serde_json::from_str(raw).map_err(|source| {
            CredentialsError::Malformed {
                var: STORE_CREDENTIALS_VAR,
                source,
            }
        })?;
        // Surface a bad ssl_mode now rather than on first connect
        credentials.ssl_mode()?;
        Ok(credentials)
    }

    fn ssl_mode(&self) -> Result<Option<PgSslMode>, CredentialsError> {
        self.ssl_mode
            .as_deref()
            .map(|mode| {
                mode.parse::<PgSslMode>()
                    .map_err(|_| CredentialsError::InvalidField {
                        field: "ssl_mode",
                        value: mode.to_string(),
                    })
            })
            .transpose()
    }

    /// Connection options for the PostgreSQL pool
    pub fn connect_options(&self) -> Result<PgConnectOptions, CredentialsError> {
        let mut options = PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .database(&self.database)
            .username(&self.username)
            .password(&self.password);
        if let Some(mode) = self.ssl_mode()? {
            options = options.ssl_mode(mode);
        }
        Ok(options)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            role: ServiceRole::Checkin,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            max_connections: 10,
            min_connections: 1,
        }
    }
}

impl Default for QrConfig {
    fn default() -> Self {
        Self {
            form_url: "http://localhost:5000/checkin".to_string(),
            public_base_url: "http://localhost:5000".to_string(),
            static_dir: PathBuf::from("static"),
            sub_dir: "qrcodes".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
