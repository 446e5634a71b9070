use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

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

/// Top-level configuration for the screener service.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub library_api: RemoteEndpointConfig,
    pub decision_engine: RemoteEndpointConfig,
    pub storage: StorageConfig,
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

        let library_api = RemoteEndpointConfig::from_env(
            "LIBRARY_API_BASE_URL",
            "http://127.0.0.1:8083",
            "LIBRARY_API_TIMEOUT_MS",
        )?;
        let decision_engine = RemoteEndpointConfig::from_env(
            "DECISION_ENGINE_URL",
            "http://127.0.0.1:8090",
            "DECISION_ENGINE_TIMEOUT_MS",
        )?;

        let storage = StorageConfig {
            model_root: env::var("MODEL_STORAGE_ROOT").unwrap_or_else(|_| "models".to_string()),
            fixtures_path: env::var("SCREENER_FIXTURES_PATH").ok().map(PathBuf::from),
            library_schema_path: env::var("LIBRARY_SCHEMA_PATH").ok().map(PathBuf::from),
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            library_api,
            decision_engine,
            storage,
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

/// Base address and per-call budget for an outbound collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteEndpointConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl RemoteEndpointConfig {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            base_url: base_url.into(),
            timeout,
        }
    }

    fn from_env(
        url_var: &'static str,
        default_url: &str,
        timeout_var: &'static str,
    ) -> Result<Self, ConfigError> {
        let base_url = env::var(url_var).unwrap_or_else(|_| default_url.to_string());
        let trimmed = base_url.trim().trim_end_matches('/');
        if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
            return Err(ConfigError::InvalidUrl {
                variable: url_var,
                value: base_url,
            });
        }

        let timeout = match env::var(timeout_var) {
            Ok(raw) => match raw.trim().parse::<u64>() {
                Ok(millis) if millis > 0 => Duration::from_millis(millis),
                _ => {
                    return Err(ConfigError::InvalidTimeout {
                        variable: timeout_var,
                    })
                }
            },
            Err(_) => Self::DEFAULT_TIMEOUT,
        };

        Ok(Self::new(trimmed, timeout))
    }
}

/// Locations of decision-model artifacts and seed data.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub model_root: String,
    pub fixtures_path: Option<PathBuf>,
    pub library_schema_path: Option<PathBuf>,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidUrl { variable: &'static str, value: String },
    InvalidTimeout { variable: &'static str },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidUrl { variable, value } => {
                write!(f, "{variable} must be an http(s) URL, found '{value}'")
            }
            ConfigError::InvalidTimeout { variable } => {
                write!(f, "{variable} must be a positive number of milliseconds")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidUrl { .. }
            | ConfigError::InvalidTimeout { .. } => None,
        }
    }
}
