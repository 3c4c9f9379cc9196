//! Command definitions
//!
//! Typed construction of request lines sent to the server.

use bytes::Bytes;

use crate::error::{KvlinkError, Result};

/// Command verbs understood by the server
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    Get,
    Set,
    Del,
}

impl Verb {
    /// Wire spelling of the verb
    pub fn as_str(&self) -> &'static str {
        match self {
            Verb::Get => "get",
            Verb::Set => "set",
            Verb::Del => "del",
        }
    }
}

/// A command to send to the key-value store
#[derive(Debug, Clone)]
pub enum Command {
    /// Get a value by key
    Get { key: String },

    /// Set a key-value pair, optionally expiring after `ttl_secs`
    Set {
        key: String,
        value: String,
        ttl_secs: Option<u32>,
    },

    /// Delete a key
    Del { key: String },
}

impl Command {
    /// Get the command verb
    pub fn verb(&self) -> Verb {
        match self {
            Command::Get { .. } => Verb::Get,
            Command::Set { .. } => Verb::Set,
            Command::Del { .. } => Verb::Del,
        }
    }

    /// Encode the command as request bytes.
    ///
    /// Format: verb and arguments joined by single spaces, no trailing
    /// terminator. The server tokenizes on whitespace, so empty or
    /// whitespace-bearing keys and values cannot round-trip and are
    /// rejected here rather than silently corrupted on the wire.
    pub fn encode(&self) -> Result<Bytes> {
        let line = match self {
            Command::Get { key } => {
                validate_token("key", key)?;
                format!("get {}", key)
            }
            Command::Set {
                key,
                value,
                ttl_secs,
            } => {
                validate_token("key", key)?;
                validate_token("value", value)?;
                match ttl_secs {
                    Some(ttl) => format!("set {} {} {}", key, value, ttl),
                    None => format!("set {} {}", key, value),
                }
            }
            Command::Del { key } => {
                validate_token("key", key)?;
                format!("del {}", key)
            }
        };

        Ok(Bytes::from(line))
    }
}

/// Reject tokens the server's whitespace tokenizer cannot represent
fn validate_token(what: &str, token: &str) -> Result<()> {
    if token.is_empty() {
        return Err(KvlinkError::Protocol(format!("{} must not be empty", what)));
    }
    if token.chars().any(|c| c.is_whitespace()) {
        return Err(KvlinkError::Protocol(format!(
            "{} must not contain whitespace: {:?}",
            what, token
        )));
    }
    Ok(())
}
