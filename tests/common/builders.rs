//! Test data builders for creating test objects

use squitterrator::{LogLevel, PipelineConfig};
use std::net::SocketAddr;

/// Builder for pipeline configs pointed at a local test server
pub struct ConfigBuilder {
    config: PipelineConfig,
}

impl ConfigBuilder {
    pub fn new(addr: SocketAddr) -> Self {
        Self {
            config: PipelineConfig {
                remote_host: addr.ip().to_string(),
                remote_port: addr.port(),
                log_level: LogLevel::Debug,
                poll_interval_ms: 10,
                connect_timeout_ms: Some(1000),
                ..Default::default()
            },
        }
    }

    pub fn queue_capacity(mut self, capacity: usize) -> Self {
        self.config.queue_capacity = capacity;
        self
    }

    pub fn read_chunk_size(mut self, size: usize) -> Self {
        self.config.read_chunk_size = size;
        self
    }

    pub fn build(self) -> PipelineConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let addr: SocketAddr = "127.0.0.1:4000".parse().unwrap();
        let config = ConfigBuilder::new(addr).queue_capacity(8).build();

        assert_eq!(config.remote_addr(), "127.0.0.1:4000");
        assert_eq!(config.queue_capacity, 8);
        assert!(config.validate().is_ok());
    }
}
