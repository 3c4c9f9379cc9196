//! Error types for kvlink
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

/// Result type alias using KvlinkError
pub type Result<T> = std::result::Result<T, KvlinkError>;

/// Unified error type for kvlink operations
#[derive(Debug, Error)]
pub enum KvlinkError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Connection Errors
    // -------------------------------------------------------------------------
    #[error("Connect failed: {0}")]
    Connect(String),

    #[error("Transport failure: {0}")]
    Transport(String),

    #[error("Timed out: {0}")]
    Timeout(String),

    /// The peer closed the connection before any response data arrived.
    /// A zero-byte closure is reported as an error, not as an empty reply.
    #[error("Peer closed connection before any response data arrived")]
    PrematureClose,

    // -------------------------------------------------------------------------
    // Protocol Errors
    // -------------------------------------------------------------------------
    #[error("Protocol error: {0}")]
    Protocol(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}
