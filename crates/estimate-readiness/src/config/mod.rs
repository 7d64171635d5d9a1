use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use crate::readiness::{ProfileError, ProfileSet};

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
    pub readiness: ReadinessConfig,
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

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            readiness: ReadinessConfig::from_env()?,
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

/// Where trade profiles come from and how readiness is computed.
#[derive(Debug, Clone, PartialEq)]
pub struct ReadinessConfig {
    /// JSON profile set overriding the built-in profiles.
    pub profiles_path: Option<PathBuf>,
    /// Base URL of a remote readiness service; local computation when unset.
    pub remote_url: Option<String>,
    pub remote_timeout: Duration,
    pub cache_capacity: u64,
}

impl Default for ReadinessConfig {
    fn default() -> Self {
        Self {
            profiles_path: None,
            remote_url: None,
            remote_timeout: Duration::from_secs(10),
            cache_capacity: 1024,
        }
    }
}

impl ReadinessConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let profiles_path = non_empty_var("READINESS_PROFILES_PATH").map(PathBuf::from);
        let remote_url = non_empty_var("READINESS_REMOTE_URL");

        let remote_timeout = match non_empty_var("READINESS_REMOTE_TIMEOUT_SECS") {
            Some(raw) => raw
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
                .ok_or(ConfigError::InvalidRemoteTimeout)?,
            None => defaults.remote_timeout,
        };

        let cache_capacity = match non_empty_var("READINESS_CACHE_CAPACITY") {
            Some(raw) => raw
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidCacheCapacity)?,
            None => defaults.cache_capacity,
        };

        Ok(Self {
            profiles_path,
            remote_url,
            remote_timeout,
            cache_capacity,
        })
    }

    /// Profiles from `profiles_path`, or the built-in set when none is configured.
    pub fn load_profiles(&self) -> Result<ProfileSet, ProfileError> {
        match &self.profiles_path {
            Some(path) => ProfileSet::from_path(path),
            None => Ok(ProfileSet::standard()),
        }
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidRemoteTimeout,
    InvalidCacheCapacity,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidRemoteTimeout => {
                write!(f, "READINESS_REMOTE_TIMEOUT_SECS must be a positive integer")
            }
            ConfigError::InvalidCacheCapacity => {
                write!(f, "READINESS_CACHE_CAPACITY must be a non-negative integer")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidRemoteTimeout
            | ConfigError::InvalidCacheCapacity => None,
        }
    }
}
