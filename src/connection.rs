//! Per-connection outbound handle
//!
//! The coordinator never touches a socket directly. Each handler owns its
//! socket and drains a channel of outbound frames; the coordinator keeps a
//! cloneable `Connection` holding the sending side. Sending to a handler
//! that is already gone is a silent no-op, which makes broadcast writes and
//! closes fire-and-forget.

use std::net::{IpAddr, SocketAddr};

use tokio::sync::mpsc;

/// Instruction consumed by a handler's write path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outbound {
    /// Raw bytes to write to the socket
    Data(Vec<u8>),
    /// Shut the connection down
    Shutdown,
}

/// Cloneable handle to one client connection
///
/// Carries the remote address (the session identity key) and the sender
/// half of the handler's outbound frame channel.
#[derive(Debug, Clone)]
pub struct Connection {
    addr: SocketAddr,
    tx: mpsc::UnboundedSender<Outbound>,
}

impl Connection {
    pub fn new(addr: SocketAddr, tx: mpsc::UnboundedSender<Outbound>) -> Self {
        Self { addr, tx }
    }

    /// Remote address, stable for the lifetime of the connection
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Remote IP, the granularity bans apply at
    pub fn ip(&self) -> IpAddr {
        self.addr.ip()
    }

    /// Queue bytes for delivery. Best-effort: a closed handler drops them.
    pub fn send(&self, bytes: Vec<u8>) {
        let _ = self.tx.send(Outbound::Data(bytes));
    }

    /// Ask the handler to close the socket. Safe to call more than once.
    pub fn shutdown(&self) {
        let _ = self.tx.send(Outbound::Shutdown);
    }
}
