//! Session Module
//!
//! One client-initiated TCP connection from creation to termination,
//! performing exactly one request/response exchange.
//!
//! ## Architecture
//! - `Session` runs the event loop: an explicit state machine plus
//!   observer notifications
//! - A driver thread owns the `TcpStream` and publishes transport
//!   events over a crossbeam channel
//! - Events for one session arrive in state-machine order; the close
//!   event is always last and fires exactly once
//!
//! ## State Machine
//!
//! ```text
//! Connecting --(connect succeeds)--> Connected --(request sent)--> AwaitingResponse
//! Connecting --(connect fails)--> Failed --(resource released)--> Closed
//! AwaitingResponse --(data arrives)--> AwaitingResponse
//! AwaitingResponse --(close completes)--> Closed
//! AwaitingResponse --(transport error)--> Failed --(resource released)--> Closed
//! ```

mod endpoint;
mod event;
mod machine;
mod driver;
mod session;

pub use endpoint::Endpoint;
pub use event::SessionEvent;
pub use machine::{DataAction, SessionMachine, SessionState};
pub use session::{NullObserver, Session, SessionObserver};
