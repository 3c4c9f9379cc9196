//! Session state machine
//!
//! Tracks one session's lifecycle independently of any I/O, so ordering
//! and terminality invariants can be checked without a socket.

use bytes::{Bytes, BytesMut};

use crate::config::ReadPolicy;

/// Lifecycle state of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Outbound connection initiated, outcome pending
    Connecting,

    /// Connection established, request not yet written
    Connected,

    /// Request written, accumulating response bytes
    AwaitingResponse,

    /// A terminal failure was recorded; the resource is still being released
    Failed,

    /// Connection fully closed; the sole terminal state
    Closed,
}

impl SessionState {
    /// Whether no further events are valid for this session
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionState::Closed)
    }
}

/// What the caller must do after a data delivery
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataAction {
    /// Keep listening for more response bytes
    Continue,

    /// The response is complete under the active policy; close the connection
    Close,
}

/// Explicit state machine for one session.
///
/// The machine owns the append-only response buffer and enforces:
/// - data is only accepted while awaiting a response and before any error
/// - the terminal close transition happens exactly once
/// - a failure is terminal (no data accepted afterwards)
#[derive(Debug)]
pub struct SessionMachine {
    state: SessionState,
    policy: ReadPolicy,
    response: BytesMut,
    failed: bool,
}

impl SessionMachine {
    /// Create a machine in the initial `Connecting` state
    pub fn new(policy: ReadPolicy) -> Self {
        Self {
            state: SessionState::Connecting,
            policy,
            response: BytesMut::new(),
            failed: false,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Response bytes accumulated so far, in delivery order
    pub fn response(&self) -> &[u8] {
        &self.response
    }

    /// Take ownership of the accumulated response
    pub fn take_response(&mut self) -> Bytes {
        std::mem::take(&mut self.response).freeze()
    }

    /// Connection established. Valid only from `Connecting`.
    ///
    /// Returns whether the transition was applied.
    pub fn on_connected(&mut self) -> bool {
        if self.state != SessionState::Connecting {
            tracing::warn!(state = ?self.state, "ignoring connected event");
            return false;
        }
        self.state = SessionState::Connected;
        true
    }

    /// The single request was written. Valid only from `Connected`.
    pub fn on_request_sent(&mut self) -> bool {
        if self.state != SessionState::Connected {
            tracing::warn!(state = ?self.state, "ignoring request-sent event");
            return false;
        }
        self.state = SessionState::AwaitingResponse;
        true
    }

    /// Response bytes arrived.
    ///
    /// Appends to the response buffer and reports whether the active
    /// policy considers the exchange complete. Returns `None` when the
    /// delivery is ignored (not awaiting a response, or already failed).
    pub fn on_data(&mut self, chunk: &[u8]) -> Option<DataAction> {
        if self.failed || self.state != SessionState::AwaitingResponse {
            tracing::warn!(state = ?self.state, len = chunk.len(), "ignoring data event");
            return None;
        }

        let first_delivery = self.response.is_empty();
        self.response.extend_from_slice(chunk);

        match self.policy {
            ReadPolicy::FirstChunk if first_delivery => Some(DataAction::Close),
            _ => Some(DataAction::Continue),
        }
    }

    /// A transport failure occurred. Terminal; the resource still has to
    /// be released, so `Failed` is en route to `Closed`, not an endpoint.
    pub fn on_error(&mut self) {
        if self.state == SessionState::Closed {
            tracing::warn!("ignoring error event after close");
            return;
        }
        self.failed = true;
        self.state = SessionState::Failed;
    }

    /// The underlying connection is fully closed.
    ///
    /// Returns `true` only for the first close, so the terminal notice
    /// is reported exactly once regardless of path.
    pub fn on_closed(&mut self) -> bool {
        if self.state == SessionState::Closed {
            return false;
        }
        self.state = SessionState::Closed;
        true
    }

    /// Whether a failure was recorded at any point
    pub fn has_failed(&self) -> bool {
        self.failed
    }
}
