//! Session events
//!
//! Transport outcomes delivered from the driver thread to the session's
//! event loop, one at a time, in the order the transport produced them.

use bytes::Bytes;

use crate::error::KvlinkError;

/// An event on a session's transport.
///
/// For any one session: `Connected` (or `Error`) comes first,
/// `RequestSent` follows `Connected`, `Data` preserves stream order,
/// and `Closed` is always the final event.
#[derive(Debug)]
pub enum SessionEvent {
    /// The outbound connection was established
    Connected,

    /// The single pending request was written in full
    RequestSent,

    /// Response bytes arrived
    Data(Bytes),

    /// A transport failure occurred; terminal for the session
    Error(KvlinkError),

    /// The underlying connection is fully closed; no further events follow
    Closed,
}
