use crate::analysis::AnalysisRules;
use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_GENERATOR_MODEL: &str = "llama3";
const DEFAULT_GENERATOR_TIMEOUT_SECS: u64 = 30;

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
    pub generator: GeneratorConfig,
    pub rules_path: Option<PathBuf>,
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

        let endpoint = env::var("ANALYZER_LLM_URL")
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty());
        let model = env::var("ANALYZER_LLM_MODEL")
            .unwrap_or_else(|_| DEFAULT_GENERATOR_MODEL.to_string());
        let timeout_secs = match env::var("ANALYZER_LLM_TIMEOUT_SECS") {
            Ok(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => secs,
                _ => return Err(ConfigError::InvalidTimeout),
            },
            Err(_) => DEFAULT_GENERATOR_TIMEOUT_SECS,
        };

        let rules_path = env::var("ANALYZER_RULES_PATH").ok().map(PathBuf::from);

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            generator: GeneratorConfig {
                endpoint,
                model,
                timeout: Duration::from_secs(timeout_secs),
            },
            rules_path,
        })
    }

    /// Analysis rules from `ANALYZER_RULES_PATH`, or the built-in defaults.
    pub fn analysis_rules(&self) -> Result<AnalysisRules, ConfigError> {
        match &self.rules_path {
            Some(path) => {
                let raw = std::fs::read_to_string(path).map_err(|err| ConfigError::Rules {
                    path: path.clone(),
                    reason: err.to_string(),
                })?;
                serde_json::from_str(&raw).map_err(|err| ConfigError::Rules {
                    path: path.clone(),
                    reason: err.to_string(),
                })
            }
            None => Ok(AnalysisRules::default()),
        }
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

/// Where narrative synthesis sends its prompts.
///
/// Without an endpoint the scripted reference generator answers every prompt.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub endpoint: Option<String>,
    pub model: String,
    pub timeout: Duration,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            model: DEFAULT_GENERATOR_MODEL.to_string(),
            timeout: Duration::from_secs(DEFAULT_GENERATOR_TIMEOUT_SECS),
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidTimeout,
    Rules { path: PathBuf, reason: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidTimeout => {
                write!(f, "ANALYZER_LLM_TIMEOUT_SECS must be a positive integer")
            }
            ConfigError::Rules { path, reason } => write!(
                f,
                "ANALYZER_RULES_PATH '{}' could not be loaded: {}",
                path.display(),
                reason
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort | ConfigError::InvalidTimeout | ConfigError::Rules { .. } => {
                None
            }
        }
    }
}
