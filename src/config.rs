//! Process configuration
//!
//! Read once at startup from command-line flags (or the matching
//! environment variables) and never changed afterwards.

use clap::Parser;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use crate::logging::{LogConfig, LogFormat};
use crate::web::ServerConfig;

#[derive(Parser, Debug, Clone)]
#[command(name = "messaging-service")]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Logging level for the application (trace, debug, info, warn, error)
    #[arg(long, env = "MSG_LOG_LEVEL", default_value = "debug")]
    pub log_level: String,

    /// Logging format for the application (json or text)
    #[arg(long, env = "MSG_LOG_FORMAT", default_value_t = LogFormat::Json)]
    pub log_format: LogFormat,

    /// Address to listen on
    #[arg(long, env = "MSG_HOST", default_value = "0.0.0.0")]
    pub host: IpAddr,

    /// Port for incoming requests
    #[arg(long, env = "MSG_REQ_PORT", default_value_t = 8090)]
    pub req_port: u16,

    /// Character limit of an input message
    #[arg(long, env = "MSG_CHAR_LIMIT", default_value_t = 280)]
    pub char_limit: usize,

    /// Read timeout for the HTTP server, in seconds
    #[arg(long, env = "MSG_READ_TIMEOUT", default_value_t = 3)]
    pub read_timeout: u64,

    /// Write timeout for the HTTP server, in seconds
    #[arg(long, env = "MSG_WRITE_TIMEOUT", default_value_t = 5)]
    pub write_timeout: u64,
}

impl Config {
    /// Reject values the server cannot run with
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.char_limit == 0 {
            anyhow::bail!("char-limit must be at least 1");
        }
        if self.read_timeout == 0 || self.write_timeout == 0 {
            anyhow::bail!("read-timeout and write-timeout must be at least 1 second");
        }
        Ok(())
    }

    pub fn logging(&self) -> LogConfig {
        LogConfig::new(self.log_level.clone(), self.log_format)
    }

    pub fn server(&self) -> ServerConfig {
        ServerConfig {
            addr: SocketAddr::new(self.host, self.req_port),
            char_limit: self.char_limit,
            read_timeout: Duration::from_secs(self.read_timeout),
            write_timeout: Duration::from_secs(self.write_timeout),
        }
    }
}
