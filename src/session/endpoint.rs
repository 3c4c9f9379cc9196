//! Endpoint definition
//!
//! Identifies the remote server. Created at startup, never mutated.

use std::fmt;

use crate::error::{KvlinkError, Result};

/// An immutable (host, port) pair identifying the remote server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    host: String,
    port: u16,
}

impl Endpoint {
    /// Create an endpoint.
    ///
    /// Rejects an empty host and port 0; reachability is the
    /// transport's job and is not checked here.
    pub fn new(host: impl Into<String>, port: u16) -> Result<Self> {
        let host = host.into();
        if host.is_empty() {
            return Err(KvlinkError::Config("host must not be empty".to_string()));
        }
        if port == 0 {
            return Err(KvlinkError::Config("port must be in 1..=65535".to_string()));
        }
        Ok(Self { host, port })
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}
