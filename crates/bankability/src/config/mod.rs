use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
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

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub diagnostic: DiagnosticConfig,
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
            diagnostic: DiagnosticConfig::from_env()?,
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

/// Tracing and metrics controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Submission handling around the scoring engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticConfig {
    /// Endpoint receiving a copy of every scored submission; disabled when unset.
    pub webhook_url: Option<String>,
    pub webhook_timeout: Duration,
    /// Pause before returning a result, purely for presentation pacing.
    pub presentation_delay: Duration,
    pub require_consent: bool,
}

impl Default for DiagnosticConfig {
    fn default() -> Self {
        Self {
            webhook_url: None,
            webhook_timeout: Duration::from_secs(10),
            presentation_delay: Duration::from_millis(2000),
            require_consent: true,
        }
    }
}

impl DiagnosticConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let webhook_url = match env::var("DIAGNOSTIC_WEBHOOK_URL") {
            Ok(url) if url.trim().is_empty() => None,
            Ok(url) => {
                let url = url.trim().to_string();
                if !(url.starts_with("http://") || url.starts_with("https://")) {
                    return Err(ConfigError::InvalidWebhookUrl(url));
                }
                Some(url)
            }
            Err(_) => None,
        };

        let webhook_timeout = match env::var("DIAGNOSTIC_WEBHOOK_TIMEOUT_SECS") {
            Ok(raw) => Duration::from_secs(raw.trim().parse::<u64>().map_err(|_| {
                ConfigError::InvalidDuration {
                    variable: "DIAGNOSTIC_WEBHOOK_TIMEOUT_SECS",
                }
            })?),
            Err(_) => defaults.webhook_timeout,
        };

        let presentation_delay = match env::var("DIAGNOSTIC_PRESENTATION_DELAY_MS") {
            Ok(raw) => Duration::from_millis(raw.trim().parse::<u64>().map_err(|_| {
                ConfigError::InvalidDuration {
                    variable: "DIAGNOSTIC_PRESENTATION_DELAY_MS",
                }
            })?),
            Err(_) => defaults.presentation_delay,
        };

        let require_consent = match env::var("DIAGNOSTIC_REQUIRE_CONSENT") {
            Ok(raw) => !matches!(
                raw.trim().to_ascii_lowercase().as_str(),
                "false" | "0" | "no" | "non"
            ),
            Err(_) => defaults.require_consent,
        };

        Ok(Self {
            webhook_url,
            webhook_timeout,
            presentation_delay,
            require_consent,
        })
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidWebhookUrl(String),
    InvalidDuration { variable: &'static str },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidWebhookUrl(url) => write!(
                f,
                "DIAGNOSTIC_WEBHOOK_URL must be an http(s) URL, got '{url}'"
            ),
            ConfigError::InvalidDuration { variable } => {
                write!(f, "{variable} must be a non-negative integer")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidWebhookUrl(_)
            | ConfigError::InvalidDuration { .. } => None,
        }
    }
}
