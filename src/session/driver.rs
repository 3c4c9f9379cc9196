//! Transport driver
//!
//! One thread per session owning the `TcpStream`. Connects, writes the
//! single request, reads response bytes, and publishes every outcome as
//! a [`SessionEvent`]. The `Closed` event is sent exactly once, last,
//! on every path.

use std::io::{Read, Write};
use std::net::{TcpStream, ToSocketAddrs};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use bytes::Bytes;
use crossbeam::channel::Sender;
use parking_lot::Mutex;

use crate::config::{Config, ReadPolicy};
use crate::error::{KvlinkError, Result};

use super::endpoint::Endpoint;
use super::event::SessionEvent;

/// Shared handle to the live stream, used for idempotent local close
pub(crate) type StreamSlot = Arc<Mutex<Option<TcpStream>>>;

/// Read buffer size for response deliveries
const READ_BUF_SIZE: usize = 4096;

pub(crate) struct Driver {
    endpoint: Endpoint,
    request: Bytes,
    config: Config,
    events: Sender<SessionEvent>,
    slot: StreamSlot,
}

impl Driver {
    /// Spawn the driver thread for one session
    pub(crate) fn spawn(
        endpoint: Endpoint,
        request: Bytes,
        config: Config,
        events: Sender<SessionEvent>,
        slot: StreamSlot,
    ) -> JoinHandle<()> {
        let driver = Self {
            endpoint,
            request,
            config,
            events,
            slot,
        };
        std::thread::spawn(move || driver.run())
    }

    fn run(self) {
        if let Err(e) = self.exchange() {
            tracing::debug!(endpoint = %self.endpoint, error = %e, "session transport failed");
            let _ = self.events.send(SessionEvent::Error(e));
        }

        // Release the close handle before announcing termination
        self.slot.lock().take();
        let _ = self.events.send(SessionEvent::Closed);
    }

    /// Connect, write the request once, then read until the exchange is
    /// complete under the configured policy or the transport fails.
    fn exchange(&self) -> Result<()> {
        let mut stream = self.connect()?;

        // Disable Nagle's algorithm for low latency
        stream.set_nodelay(true)?;

        // Publish a handle so Session::close can shut the stream down
        *self.slot.lock() = Some(stream.try_clone()?);

        let _ = self.events.send(SessionEvent::Connected);
        tracing::debug!(endpoint = %self.endpoint, "connection established");

        // Exactly one write per session, immediately after establishment;
        // failures surface on the error channel, not as a return value
        stream
            .write_all(&self.request)
            .map_err(|e| KvlinkError::Transport(format!("request write failed: {}", e)))?;
        let _ = self.events.send(SessionEvent::RequestSent);
        tracing::trace!(len = self.request.len(), "request written");

        if self.config.response_timeout_ms > 0 {
            stream.set_read_timeout(Some(Duration::from_millis(self.config.response_timeout_ms)))?;
        }

        let mut buf = [0u8; READ_BUF_SIZE];
        loop {
            match stream.read(&mut buf) {
                Ok(0) => {
                    tracing::debug!(endpoint = %self.endpoint, "peer closed connection");
                    return Ok(());
                }
                Ok(n) => {
                    let _ = self
                        .events
                        .send(SessionEvent::Data(Bytes::copy_from_slice(&buf[..n])));
                    if self.config.read_policy == ReadPolicy::FirstChunk {
                        // First delivery completes the exchange under the
                        // legacy policy; stop listening and close locally
                        return Ok(());
                    }
                }
                Err(ref e)
                    if matches!(
                        e.kind(),
                        std::io::ErrorKind::WouldBlock | std::io::ErrorKind::TimedOut
                    ) =>
                {
                    return Err(KvlinkError::Timeout(format!(
                        "no response from {} within {} ms",
                        self.endpoint, self.config.response_timeout_ms
                    )));
                }
                Err(e) => {
                    if self.close_requested() {
                        // Local shutdown raced the blocking read
                        return Ok(());
                    }
                    return Err(KvlinkError::Transport(format!("read failed: {}", e)));
                }
            }
        }
    }

    /// Resolve the endpoint and connect, honoring the connect timeout.
    ///
    /// Tries each resolved address once; there is no retry beyond that.
    fn connect(&self) -> Result<TcpStream> {
        let addrs = (self.endpoint.host(), self.endpoint.port())
            .to_socket_addrs()
            .map_err(|e| KvlinkError::Connect(format!("resolve {}: {}", self.endpoint, e)))?;

        let timeout_ms = self.config.connect_timeout_ms;
        let mut last_err: Option<std::io::Error> = None;

        for addr in addrs {
            let attempt = if timeout_ms > 0 {
                TcpStream::connect_timeout(&addr, Duration::from_millis(timeout_ms))
            } else {
                TcpStream::connect(addr)
            };
            match attempt {
                Ok(stream) => return Ok(stream),
                Err(e) => {
                    tracing::debug!(%addr, error = %e, "connect attempt failed");
                    last_err = Some(e);
                }
            }
        }

        Err(match last_err {
            Some(e) if e.kind() == std::io::ErrorKind::TimedOut => KvlinkError::Timeout(format!(
                "connect to {} within {} ms",
                self.endpoint, timeout_ms
            )),
            Some(e) => KvlinkError::Connect(format!("{}: {}", self.endpoint, e)),
            None => KvlinkError::Connect(format!("{}: no addresses resolved", self.endpoint)),
        })
    }

    /// Whether a local close already took the stream handle
    fn close_requested(&self) -> bool {
        self.slot.lock().is_none()
    }
}
