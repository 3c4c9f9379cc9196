//! Protocol Module
//!
//! Command construction and reply inspection for the kvstore text protocol.
//!
//! ## Protocol Format
//!
//! ### Request Format
//! A single whitespace-separated text line, no trailing terminator:
//! ```text
//! get <key>
//! set <key> <value> [ttl_seconds]
//! del <key>
//! ```
//!
//! ### Response Format
//! Unframed text. The server writes the value (GET), an `OK ...`
//! acknowledgement (SET/DEL), or a line starting with `ERROR`.
//! No length prefix or delimiter exists; message boundaries are a
//! client-side policy (see [`crate::config::ReadPolicy`]).

mod command;
mod response;

pub use command::{Command, Verb};
pub use response::Response;
