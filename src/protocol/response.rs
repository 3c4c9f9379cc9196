//! Response definitions
//!
//! Raw reply bytes received from the server, with text helpers.

use bytes::Bytes;

/// A server reply.
///
/// The protocol carries no framing or status byte; the reply is whatever
/// bytes the server wrote before the session stopped reading. Server-side
/// failures are reported in-band as text starting with `ERROR`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    payload: Bytes,
}

impl Response {
    /// Wrap accumulated reply bytes
    pub fn new(payload: Bytes) -> Self {
        Self { payload }
    }

    /// Raw reply bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.payload
    }

    /// Number of reply bytes received
    pub fn len(&self) -> usize {
        self.payload.len()
    }

    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }

    /// Reply as text, replacing invalid UTF-8
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.payload).into_owned()
    }

    /// Whether the server reported an in-band failure
    pub fn is_server_error(&self) -> bool {
        self.payload.starts_with(b"ERROR")
    }
}
