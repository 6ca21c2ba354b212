//! Configuration for framewire connections
//!
//! Centralized configuration with sensible defaults.

/// Configuration applied to each [`crate::FrameConnection`]
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Buffer Configuration
    // -------------------------------------------------------------------------
    /// Internal read buffer capacity in bytes.
    ///
    /// Caps the size of a single internal read request; larger payloads
    /// are assembled from multiple capped chunks. If small messages
    /// dominate, decrease it to lower the memory footprint; if
    /// throughput matters, increase it.
    pub read_buffer_capacity: usize,

    // -------------------------------------------------------------------------
    // Network Configuration
    // -------------------------------------------------------------------------
    /// Disable Nagle's algorithm for low latency
    pub nodelay: bool,

    /// Connection read timeout in milliseconds (0 = no timeout).
    ///
    /// A timeout firing mid-read is fatal to the connection: a
    /// partially received message cannot be resumed.
    pub read_timeout_ms: u64,

    /// Connection write timeout in milliseconds (0 = no timeout)
    pub write_timeout_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            read_buffer_capacity: 1024 * 1024, // 1 MiB
            nodelay: true,
            read_timeout_ms: 0,
            write_timeout_ms: 0,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the internal read buffer capacity (in bytes)
    pub fn read_buffer_capacity(mut self, bytes: usize) -> Self {
        self.config.read_buffer_capacity = bytes;
        self
    }

    /// Enable or disable TCP_NODELAY
    pub fn nodelay(mut self, nodelay: bool) -> Self {
        self.config.nodelay = nodelay;
        self
    }

    /// Set the read timeout (in milliseconds, 0 = none)
    pub fn read_timeout_ms(mut self, ms: u64) -> Self {
        self.config.read_timeout_ms = ms;
        self
    }

    /// Set the write timeout (in milliseconds, 0 = none)
    pub fn write_timeout_ms(mut self, ms: u64) -> Self {
        self.config.write_timeout_ms = ms;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
