//! Configuration for kvlink
//!
//! Centralized configuration with sensible defaults.

/// Configuration for a single session
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Timeout Configuration
    // -------------------------------------------------------------------------
    /// Connection establishment timeout (milliseconds, 0 disables)
    pub connect_timeout_ms: u64,

    /// Response receipt timeout after the request is sent (milliseconds, 0 disables)
    pub response_timeout_ms: u64,

    // -------------------------------------------------------------------------
    // Response Policy Configuration
    // -------------------------------------------------------------------------
    /// When the accumulated response is considered complete
    pub read_policy: ReadPolicy,
}

/// When a session treats the response as complete.
///
/// The wire protocol has no framing, so completeness is a client-side
/// policy rather than a protocol guarantee.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadPolicy {
    /// The first stream delivery completes the exchange and the session
    /// closes the connection. This is the historical client behavior;
    /// a reply split across deliveries gets truncated to its first chunk.
    FirstChunk,

    /// Accumulate deliveries until the peer closes the connection.
    /// Correct for multi-chunk replies, at the cost of waiting for the
    /// server to hang up.
    UntilClose,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            connect_timeout_ms: 5000,
            response_timeout_ms: 5000,
            read_policy: ReadPolicy::FirstChunk,
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
    /// Set the connect timeout (in milliseconds, 0 disables)
    pub fn connect_timeout_ms(mut self, ms: u64) -> Self {
        self.config.connect_timeout_ms = ms;
        self
    }

    /// Set the response timeout (in milliseconds, 0 disables)
    pub fn response_timeout_ms(mut self, ms: u64) -> Self {
        self.config.response_timeout_ms = ms;
        self
    }

    /// Set the response completion policy
    pub fn read_policy(mut self, policy: ReadPolicy) -> Self {
        self.config.read_policy = policy;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
