use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use crate::analytics::{ScoreBands, ScoreBandsError};

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
    pub crm: CrmApiConfig,
    pub scoring: ScoringConfig,
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

        let base_url = normalize_base_url(
            &env::var("CRM_API_BASE_URL").unwrap_or_else(|_| "http://127.0.0.1:5000".to_string()),
        )?;

        let cache_ttl = seconds_var("CRM_CACHE_TTL_SECS", 5)?;
        let request_timeout = seconds_var("CRM_REQUEST_TIMEOUT_SECS", 30)?;
        let session_file = env::var("CRM_SESSION_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(".recruitdesk/session.json"));

        let bands = match env::var("CRM_EBES_BANDS") {
            Ok(raw) if !raw.trim().is_empty() => {
                Some(ScoreBands::parse(&raw).map_err(ConfigError::InvalidScoreBands)?)
            }
            _ => None,
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            crm: CrmApiConfig {
                base_url,
                cache_ttl,
                request_timeout,
                session_file,
            },
            scoring: ScoringConfig { bands },
        })
    }
}

/// Accepts http(s) URLs only and drops trailing slashes.
pub fn normalize_base_url(raw: &str) -> Result<String, ConfigError> {
    let base_url = raw.trim().trim_end_matches('/').to_string();
    if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
        return Err(ConfigError::InvalidBaseUrl(base_url));
    }
    Ok(base_url)
}

fn seconds_var(name: &'static str, default: u64) -> Result<Duration, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<u64>()
            .map(Duration::from_secs)
            .map_err(|_| ConfigError::InvalidSeconds { variable: name }),
        Err(_) => Ok(Duration::from_secs(default)),
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

/// Tracing and metrics controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Where the CRM backend lives and how the client talks to it.
#[derive(Debug, Clone)]
pub struct CrmApiConfig {
    pub base_url: String,
    pub cache_ttl: Duration,
    pub request_timeout: Duration,
    pub session_file: PathBuf,
}

/// Label cutoffs for the EBES score. `None` defers to the scoring endpoint.
#[derive(Debug, Clone, Default)]
pub struct ScoringConfig {
    pub bands: Option<ScoreBands>,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidBaseUrl(String),
    InvalidSeconds { variable: &'static str },
    InvalidScoreBands(ScoreBandsError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidBaseUrl(value) => write!(
                f,
                "CRM_API_BASE_URL must start with http:// or https:// (got '{value}')"
            ),
            ConfigError::InvalidSeconds { variable } => {
                write!(f, "{variable} must be a whole number of seconds")
            }
            ConfigError::InvalidScoreBands(err) => write!(f, "CRM_EBES_BANDS: {err}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidScoreBands(err) => Some(err),
            ConfigError::InvalidPort
            | ConfigError::InvalidBaseUrl(_)
            | ConfigError::InvalidSeconds { .. } => None,
        }
    }
}
