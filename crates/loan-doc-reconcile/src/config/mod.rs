use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use crate::reconciliation::engine::{
    ReconcileConfig, ToleranceBands, DEFAULT_MATCH_RATIO, DEFAULT_MAX_DOCUMENT_AGE_DAYS,
    DEFAULT_WARN_RATIO,
};

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
    pub reconciliation: ReconcileConfig,
    /// Optional CSV table merged over the standard ruleset catalog.
    pub rulesets_csv: Option<PathBuf>,
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

        let tolerance = ToleranceBands {
            match_ratio: ratio_var("RECONCILE_MATCH_TOLERANCE", DEFAULT_MATCH_RATIO)?,
            warn_ratio: ratio_var("RECONCILE_WARN_TOLERANCE", DEFAULT_WARN_RATIO)?,
        };
        if !tolerance.is_valid() {
            return Err(ConfigError::InvalidTolerance {
                match_ratio: tolerance.match_ratio,
                warn_ratio: tolerance.warn_ratio,
            });
        }

        let default_max_document_age_days = match env::var("RECONCILE_MAX_DOCUMENT_AGE_DAYS") {
            Ok(value) => value
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|days| *days > 0)
                .ok_or(ConfigError::InvalidMaxAge)?,
            Err(_) => DEFAULT_MAX_DOCUMENT_AGE_DAYS,
        };

        let rulesets_csv = env::var("RECONCILE_RULESETS_CSV")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            reconciliation: ReconcileConfig {
                tolerance,
                default_max_document_age_days,
            },
            rulesets_csv,
        })
    }
}

fn ratio_var(name: &'static str, default: f64) -> Result<f64, ConfigError> {
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse::<f64>()
            .map_err(|_| ConfigError::InvalidRatio { name }),
        Err(_) => Ok(default),
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

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidRatio { name: &'static str },
    InvalidTolerance { match_ratio: f64, warn_ratio: f64 },
    InvalidMaxAge,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidRatio { name } => {
                write!(f, "{name} must be a decimal fraction such as 0.2")
            }
            ConfigError::InvalidTolerance {
                match_ratio,
                warn_ratio,
            } => write!(
                f,
                "tolerance bands must satisfy 0 <= match ({match_ratio}) <= warn ({warn_ratio})"
            ),
            ConfigError::InvalidMaxAge => {
                write!(f, "RECONCILE_MAX_DOCUMENT_AGE_DAYS must be a positive integer")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidRatio { .. }
            | ConfigError::InvalidTolerance { .. }
            | ConfigError::InvalidMaxAge => None,
        }
    }
}
