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

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub pacing: PacingConfig,
    pub content: ContentConfig,
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

        let max_sessions = match env::var("APP_MAX_SESSIONS") {
            Ok(raw) => raw
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|limit| *limit > 0)
                .ok_or(ConfigError::InvalidSessionLimit)?,
            Err(_) => ServerConfig::DEFAULT_MAX_SESSIONS,
        };

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let defaults = PacingConfig::default();
        let pacing = PacingConfig {
            typing: delay_var("APP_TYPING_DELAY_MS", defaults.typing)?,
            think: delay_var("APP_THINK_DELAY_MS", defaults.think)?,
            voice_capture: delay_var("APP_VOICE_DELAY_MS", defaults.voice_capture)?,
            follow_up: delay_var("APP_FOLLOW_UP_DELAY_MS", defaults.follow_up)?,
            long_typing: delay_var("APP_DETAIL_TYPING_DELAY_MS", defaults.long_typing)?,
        };

        let follow_up_probability = match env::var("APP_FOLLOW_UP_PROBABILITY") {
            Ok(raw) => raw
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|value| (0.0..=1.0).contains(value))
                .ok_or(ConfigError::InvalidProbability)?,
            Err(_) => ContentConfig::DEFAULT_FOLLOW_UP_PROBABILITY,
        };

        let content = ContentConfig {
            chat_script: path_var("APP_CHAT_SCRIPT"),
            listings_csv: path_var("APP_LISTINGS_CSV"),
            follow_up_probability,
        };

        Ok(Self {
            environment,
            server: ServerConfig {
                host,
                port,
                max_sessions,
            },
            telemetry: TelemetryConfig { log_level },
            pacing,
            content,
        })
    }
}

fn delay_var(name: &'static str, default: Duration) -> Result<Duration, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<u64>()
            .map(Duration::from_millis)
            .map_err(|_| ConfigError::InvalidDelay { name }),
        Err(_) => Ok(default),
    }
}

fn path_var(name: &str) -> Option<PathBuf> {
    env::var(name)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .map(PathBuf::from)
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Live onboarding sessions kept in memory before eviction.
    pub max_sessions: usize,
}

impl ServerConfig {
    pub const DEFAULT_MAX_SESSIONS: usize = 1024;

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

/// Simulated latency used by the scripted conversations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacingConfig {
    /// How long the agent shows the typing indicator before a message lands.
    pub typing: Duration,
    /// Silent pause before the interviewer reacts to an answer.
    pub think: Duration,
    /// Length of the simulated voice recording.
    pub voice_capture: Duration,
    /// Pause between a chatbot acknowledgement and its detailed answer.
    pub follow_up: Duration,
    /// Typing time for long chatbot answers.
    pub long_typing: Duration,
}

impl PacingConfig {
    /// Zero-latency pacing for demos and tests.
    pub const fn instant() -> Self {
        Self {
            typing: Duration::ZERO,
            think: Duration::ZERO,
            voice_capture: Duration::ZERO,
            follow_up: Duration::ZERO,
            long_typing: Duration::ZERO,
        }
    }
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            typing: Duration::from_millis(1500),
            think: Duration::from_millis(2000),
            voice_capture: Duration::from_millis(3000),
            follow_up: Duration::from_millis(500),
            long_typing: Duration::from_millis(2000),
        }
    }
}

/// Optional overrides for the data tables driving the flow.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentConfig {
    pub chat_script: Option<PathBuf>,
    pub listings_csv: Option<PathBuf>,
    pub follow_up_probability: f64,
}

impl ContentConfig {
    pub const DEFAULT_FOLLOW_UP_PROBABILITY: f64 = 0.5;
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            chat_script: None,
            listings_csv: None,
            follow_up_probability: Self::DEFAULT_FOLLOW_UP_PROBABILITY,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidDelay { name: &'static str },
    InvalidProbability,
    InvalidSessionLimit,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidDelay { name } => {
                write!(f, "{name} must be a whole number of milliseconds")
            }
            ConfigError::InvalidProbability => {
                write!(f, "APP_FOLLOW_UP_PROBABILITY must be a number between 0 and 1")
            }
            ConfigError::InvalidSessionLimit => {
                write!(f, "APP_MAX_SESSIONS must be a positive whole number")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidDelay { .. }
            | ConfigError::InvalidProbability
            | ConfigError::InvalidSessionLimit => None,
        }
    }
}
