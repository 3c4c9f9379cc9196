//! Session handle
//!
//! An explicitly constructed, explicitly owned session value. Multiple
//! independent sessions can coexist; nothing is process-global.

use std::net::Shutdown;
use std::sync::Arc;
use std::thread::JoinHandle;

use bytes::Bytes;
use crossbeam::channel::{unbounded, Receiver};
use parking_lot::Mutex;

use crate::config::Config;
use crate::error::{KvlinkError, Result};
use crate::protocol::Response;

use super::driver::{Driver, StreamSlot};
use super::endpoint::Endpoint;
use super::event::SessionEvent;
use super::machine::{DataAction, SessionMachine, SessionState};

/// Observer for the reports a session surfaces to its operator.
///
/// All methods have empty defaults; implement only what you need.
pub trait SessionObserver {
    /// The outbound connection was established
    fn on_connected(&mut self, _endpoint: &Endpoint) {}

    /// Response bytes arrived (in stream order, possibly fragmented)
    fn on_data(&mut self, _chunk: &[u8]) {}

    /// A failure terminated the exchange
    fn on_error(&mut self, _error: &KvlinkError) {}

    /// The connection is fully closed; fires exactly once, always last
    fn on_close(&mut self) {}
}

/// Observer that ignores every report
pub struct NullObserver;

impl SessionObserver for NullObserver {}

/// One client connection from open to close, performing exactly one
/// request/response exchange.
pub struct Session {
    endpoint: Endpoint,
    machine: SessionMachine,
    events: Receiver<SessionEvent>,
    slot: StreamSlot,
    driver: Option<JoinHandle<()>>,
    finished: bool,
}

impl Session {
    /// Open a session: spawn the transport driver and return immediately.
    ///
    /// The request is an opaque byte sequence; it is written exactly once,
    /// immediately after the connection is established. Establishment
    /// results are delivered through [`Session::run`].
    pub fn open(endpoint: Endpoint, request: impl Into<Bytes>, config: Config) -> Self {
        let (tx, rx) = unbounded();
        let slot: StreamSlot = Arc::new(Mutex::new(None));
        let machine = SessionMachine::new(config.read_policy);

        tracing::debug!(endpoint = %endpoint, "opening session");
        let driver = Driver::spawn(
            endpoint.clone(),
            request.into(),
            config,
            tx,
            Arc::clone(&slot),
        );

        Self {
            endpoint,
            machine,
            events: rx,
            slot,
            driver: Some(driver),
            finished: false,
        }
    }

    /// The endpoint this session targets
    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Current lifecycle state
    pub fn state(&self) -> SessionState {
        self.machine.state()
    }

    /// Request local termination of the connection.
    ///
    /// Idempotent: repeated calls (or a close racing the driver's own
    /// teardown) produce no extra terminal notifications.
    pub fn close(&self) {
        if let Some(stream) = self.slot.lock().take() {
            tracing::debug!(endpoint = %self.endpoint, "local close requested");
            let _ = stream.shutdown(Shutdown::Both);
        }
    }

    /// Drive the session to completion, reporting each event to the
    /// observer, and return the terminal outcome.
    ///
    /// Events are processed one at a time in delivery order. On success
    /// the accumulated response is returned; any transport failure is
    /// terminal and returned as the error. A zero-byte closure is
    /// reported as [`KvlinkError::PrematureClose`].
    pub fn run(&mut self, observer: &mut dyn SessionObserver) -> Result<Response> {
        if self.finished {
            return Err(KvlinkError::Transport(
                "session already terminated".to_string(),
            ));
        }

        let mut failure: Option<KvlinkError> = None;

        while let Ok(event) = self.events.recv() {
            match event {
                SessionEvent::Connected => {
                    if self.machine.on_connected() {
                        tracing::debug!(endpoint = %self.endpoint, "session connected");
                        observer.on_connected(&self.endpoint);
                    }
                }
                SessionEvent::RequestSent => {
                    self.machine.on_request_sent();
                }
                SessionEvent::Data(chunk) => match self.machine.on_data(&chunk) {
                    Some(action) => {
                        tracing::trace!(len = chunk.len(), "response data");
                        observer.on_data(&chunk);
                        if action == DataAction::Close {
                            self.close();
                        }
                    }
                    None => {} // out-of-order or post-failure delivery, dropped
                },
                SessionEvent::Error(e) => {
                    self.machine.on_error();
                    tracing::warn!(endpoint = %self.endpoint, error = %e, "session failed");
                    observer.on_error(&e);
                    if failure.is_none() {
                        failure = Some(e);
                    }
                }
                SessionEvent::Closed => {
                    if self.machine.on_closed() {
                        tracing::debug!(endpoint = %self.endpoint, "session closed");
                        observer.on_close();
                    }
                    break;
                }
            }
        }

        self.finished = true;
        if let Some(handle) = self.driver.take() {
            let _ = handle.join();
        }

        match failure {
            Some(e) => Err(e),
            None => {
                let response = self.machine.take_response();
                if response.is_empty() {
                    // Peer accepted the connection but closed without
                    // sending a single byte
                    Err(KvlinkError::PrematureClose)
                } else {
                    Ok(Response::new(response))
                }
            }
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.close();
        if let Some(handle) = self.driver.take() {
            let _ = handle.join();
        }
    }
}
