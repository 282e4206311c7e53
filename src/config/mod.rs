use std::env;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use crate::workflows::financial::NonFinitePolicy;

/// Deployment stage the service runs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Test => "test",
            Self::Production => "production",
        }
    }
}

/// Top-level configuration, read from the environment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub decisions: DecisionConfig,
    pub advice: AdviceConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::parse(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let non_finite_policy = match env::var("APP_NON_FINITE_POLICY") {
            Ok(value) => NonFinitePolicy::parse(&value)
                .ok_or(ConfigError::InvalidPolicy { value })?,
            Err(_) => NonFinitePolicy::default(),
        };

        let history_path = env::var("APP_HISTORY_PATH")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);

        let endpoint = env::var("APP_ADVICE_ENDPOINT")
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty());
        let api_key = env::var("APP_ADVICE_API_KEY")
            .ok()
            .filter(|value| !value.trim().is_empty());
        let timeout = match env::var("APP_ADVICE_TIMEOUT_SECS") {
            Ok(value) => match value.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => return Err(ConfigError::InvalidTimeout { value }),
            },
            Err(_) => DEFAULT_ADVICE_TIMEOUT,
        };

        let config = Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            decisions: DecisionConfig {
                non_finite_policy,
                history_path,
            },
            advice: AdviceConfig {
                endpoint,
                api_key,
                timeout,
            },
        };
        config.server.socket_addr()?;
        Ok(config)
    }
}

/// HTTP server binding.
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

#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Calculator policy and history storage.
#[derive(Debug, Clone, Default)]
pub struct DecisionConfig {
    pub non_finite_policy: NonFinitePolicy,
    /// JSON file backing the history; `None` keeps it in memory.
    pub history_path: Option<PathBuf>,
}

/// Language-model advice endpoint; without one the rule-based advisor answers.
#[derive(Debug, Clone)]
pub struct AdviceConfig {
    pub endpoint: Option<String>,
    pub api_key: Option<String>,
    pub timeout: Duration,
}

const DEFAULT_ADVICE_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("APP_PORT must be a valid u16")]
    InvalidPort,
    #[error("APP_HOST must parse to an IPv4 or IPv6 address")]
    InvalidHost {
        #[source]
        source: std::net::AddrParseError,
    },
    #[error("APP_NON_FINITE_POLICY must be 'strict' or 'zero', got '{value}'")]
    InvalidPolicy { value: String },
    #[error("APP_ADVICE_TIMEOUT_SECS must be a positive number of seconds, got '{value}'")]
    InvalidTimeout { value: String },
}
