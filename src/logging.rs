//! Logging subsystem
//!
//! Installs a `tracing` subscriber. Handlers only emit events; level and
//! format are decided here, once, at startup.

use std::fmt;
use std::str::FromStr;
use tracing_subscriber::{fmt as fmt_layer, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Output format of log lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// One JSON object per line
    #[default]
    Json,
    /// Human readable text
    Text,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(LogFormat::Json),
            "text" | "pretty" => Ok(LogFormat::Text),
            other => Err(format!("unknown log format '{}', expected json or text", other)),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogFormat::Json => write!(f, "json"),
            LogFormat::Text => write!(f, "text"),
        }
    }
}

/// Configuration for the logging subsystem
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Minimum level, as accepted by `EnvFilter` (trace, debug, info, ...)
    pub level: String,
    /// Output format
    pub format: LogFormat,
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl LogConfig {
    pub fn new(level: impl Into<String>, format: LogFormat) -> Self {
        LogConfig {
            level: level.into(),
            format,
        }
    }

    /// The configured level if it is a known one, `None` otherwise
    fn parsed_level(&self) -> Option<tracing::Level> {
        tracing::Level::from_str(&self.level).ok()
    }
}

/// Initialize the global subscriber
///
/// `RUST_LOG` overrides the configured level. An unknown level falls back
/// to `info` and is reported once the subscriber is up.
pub fn init(config: &LogConfig) -> anyhow::Result<()> {
    let level = config.parsed_level();
    let default_level = level.unwrap_or(tracing::Level::INFO);

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level.as_str().to_ascii_lowercase()));

    let registry = tracing_subscriber::registry().with(env_filter);
    match config.format {
        LogFormat::Json => registry.with(fmt_layer::layer().json()).try_init(),
        LogFormat::Text => registry.with(fmt_layer::layer()).try_init(),
    }
    .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    if level.is_none() {
        tracing::error!(
            "Error while setting input log level '{}', using default INFO level",
            config.level
        );
    }

    Ok(())
}
