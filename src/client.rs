//! Client session state
//!
//! One `Client` exists per registered connection, tracking exactly what the
//! moderation policy needs: when the last accepted message arrived and how
//! many consecutive violations the client has accumulated.

use std::time::Instant;

use crate::connection::Connection;

/// A registered client session
#[derive(Debug)]
pub struct Client {
    /// Outbound handle for this client's socket
    pub conn: Connection,
    /// Time the last accepted message was processed
    pub last_message: Instant,
    /// Consecutive violations; resets to zero on any accepted message
    pub strike_count: u32,
}

impl Client {
    /// Create a fresh session.
    ///
    /// `last_message` is supplied by the caller so a new session can be
    /// backdated, letting a client's first message pass the rate check.
    pub fn new(conn: Connection, last_message: Instant) -> Self {
        Self {
            conn,
            last_message,
            strike_count: 0,
        }
    }
}
