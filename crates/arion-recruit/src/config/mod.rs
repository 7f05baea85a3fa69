use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use crate::applications::DEFAULT_REGISTRATION_PREFIX;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub storage: StorageConfig,
    pub registration: RegistrationConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let database = env::var("APP_DATABASE_PATH")
            .map(|raw| StorageConfig::from_raw(&raw))
            .unwrap_or_default();

        let prefix = env::var("APP_REG_PREFIX")
            .unwrap_or_else(|_| DEFAULT_REGISTRATION_PREFIX.to_string());
        if prefix.trim().is_empty() || !prefix.chars().all(|ch| ch.is_ascii_alphanumeric()) {
            return Err(ConfigError::InvalidRegistrationPrefix(prefix));
        }

        let max_attempts = env::var("APP_REG_ATTEMPTS")
            .unwrap_or_else(|_| "5".to_string())
            .parse::<u8>()
            .ok()
            .filter(|attempts| *attempts >= 1)
            .ok_or(ConfigError::InvalidRegistrationAttempts)?;

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            storage: database,
            registration: RegistrationConfig {
                prefix,
                max_attempts,
            },
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Where registration records are persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageConfig {
    InMemory,
    Sqlite(PathBuf),
}

impl StorageConfig {
    pub fn from_raw(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.is_empty() || raw == ":memory:" {
            Self::InMemory
        } else {
            Self::Sqlite(PathBuf::from(raw))
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::Sqlite(PathBuf::from("data/applications.db"))
    }
}

/// Registration code issuance.
#[derive(Debug, Clone)]
pub struct RegistrationConfig {
    pub prefix: String,
    /// Codes drawn before giving up when every candidate collides with a stored record.
    pub max_attempts: u8,
}

impl Default for RegistrationConfig {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_REGISTRATION_PREFIX.to_string(),
            max_attempts: 5,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidRegistrationPrefix(String),
    InvalidRegistrationAttempts,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidRegistrationPrefix(prefix) => {
                write!(f, "APP_REG_PREFIX must be non-empty ASCII alphanumerics, got '{prefix}'")
            }
            ConfigError::InvalidRegistrationAttempts => {
                write!(f, "APP_REG_ATTEMPTS must be an integer between 1 and 255")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidRegistrationPrefix(_)
            | ConfigError::InvalidRegistrationAttempts => None,
        }
    }
}
