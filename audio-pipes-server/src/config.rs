use crate::error::{Result, ServerError};
use crate::observability::LogConfig;
use audio_pipes_core::HubConfig;
use clap::Parser;
use std::net::SocketAddr;
use std::time::Duration;

#[derive(Debug, Clone, Parser)]
#[command(name = "audio-pipes-server")]
#[command(
    version,
    about = "Signaling hub and mixer coordinator for browser audio endpoints"
)]
pub struct ServerConfig {
    /// Address to listen on
    #[arg(short = 'b', long, env = "AUDIO_PIPES_BIND", default_value = "127.0.0.1:3000")]
    pub bind: SocketAddr,

    /// Tear the topology down if a source has not offered within this many
    /// milliseconds (disabled when unset)
    #[arg(long, env = "AUDIO_PIPES_OFFER_TIMEOUT_MS")]
    pub offer_timeout_ms: Option<u64>,

    /// How often offer deadlines are checked, in milliseconds
    #[arg(long, env = "AUDIO_PIPES_DEADLINE_CHECK_MS", default_value_t = 500)]
    pub deadline_check_ms: u64,

    /// Outbound frames buffered per connection before sends fail
    #[arg(long, env = "AUDIO_PIPES_CHANNEL_CAPACITY", default_value_t = 64)]
    pub channel_capacity: usize,

    /// Commands buffered between connections and the hub task
    #[arg(long, env = "AUDIO_PIPES_COMMAND_CAPACITY", default_value_t = 256)]
    pub command_capacity: usize,

    /// Max commands processed per hub poll
    #[arg(long, env = "AUDIO_PIPES_BATCH_SIZE", default_value_t = 32)]
    pub batch_size: usize,

    /// Max commands waiting inside the hub
    #[arg(long, env = "AUDIO_PIPES_MAX_QUEUE_SIZE", default_value_t = 1024)]
    pub max_queue_size: usize,

    /// Default log level when RUST_LOG is not set
    #[arg(long, env = "AUDIO_PIPES_LOG_LEVEL", default_value = "info")]
    pub log_level: tracing::Level,

    /// Emit logs as JSON
    #[arg(long, env = "AUDIO_PIPES_LOG_JSON")]
    pub log_json: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 3000)),
            offer_timeout_ms: None,
            deadline_check_ms: 500,
            channel_capacity: 64,
            command_capacity: 256,
            batch_size: 32,
            max_queue_size: 1024,
            log_level: tracing::Level::INFO,
            log_json: false,
        }
    }
}

impl ServerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.channel_capacity == 0 {
            return Err(ServerError::invalid_config(
                "channel capacity must be at least 1",
            ));
        }
        if self.command_capacity == 0 {
            return Err(ServerError::invalid_config(
                "command capacity must be at least 1",
            ));
        }
        if self.batch_size == 0 || self.max_queue_size < self.batch_size {
            return Err(ServerError::invalid_config(format!(
                "batch size {} must be between 1 and the max queue size {}",
                self.batch_size, self.max_queue_size
            )));
        }
        if self.offer_timeout_ms == Some(0) {
            return Err(ServerError::invalid_config(
                "offer timeout must be positive; omit it to disable",
            ));
        }
        if self.offer_timeout_ms.is_some() && self.deadline_check_ms == 0 {
            return Err(ServerError::invalid_config(
                "deadline check interval must be positive",
            ));
        }
        Ok(())
    }

    pub fn hub_config(&self) -> HubConfig {
        HubConfig {
            offer_timeout: self.offer_timeout_ms.map(Duration::from_millis),
            batch_size: self.batch_size,
            max_queue_size: self.max_queue_size,
        }
    }

    /// `None` when offer deadlines are disabled
    pub fn deadline_check_interval(&self) -> Option<Duration> {
        self.offer_timeout_ms
            .map(|_| Duration::from_millis(self.deadline_check_ms))
    }

    pub fn log_config(&self) -> LogConfig {
        LogConfig {
            default_level: self.log_level,
            json_format: self.log_json,
            ..Default::default()
        }
    }
}
