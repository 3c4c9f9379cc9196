//! # kvlink
//!
//! A minimal TCP client for text-protocol key-value stores:
//! - One outbound connection per session
//! - Exactly one request/response exchange, then teardown
//! - Explicit session state machine, independent of the transport
//! - Selectable response policy (legacy first-chunk vs. wait-for-close)
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                        Session                           │
//! │   (event loop: state machine + observer notifications)   │
//! └────────────────────────────┬─────────────────────────────┘
//!                              │ SessionEvent (crossbeam channel)
//! ┌────────────────────────────▼─────────────────────────────┐
//! │                        Driver                            │
//! │      (thread: connect → write request → read reply)      │
//! └────────────────────────────┬─────────────────────────────┘
//!                              │
//!                              ▼
//!                        TCP byte stream
//! ```
//!
//! ## Session Lifecycle
//!
//! ```text
//! Connecting ──connected──> Connected ──request sent──> AwaitingResponse
//!     │                                                      │
//!     └──────failure──> Failed <──failure───────────────────┤
//!                          │                                 │ data / peer close
//!                          └────────────> Closed <───────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod protocol;
pub mod session;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{KvlinkError, Result};
pub use config::{Config, ReadPolicy};
pub use protocol::{Command, Response};
pub use session::{Endpoint, Session, SessionObserver, SessionState};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of kvlink
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
