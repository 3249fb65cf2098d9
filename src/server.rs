//! ChatServer actor implementation
//!
//! The central actor that owns all shared state: the active session map and
//! the ban list. Uses the Actor pattern with mpsc channels for message
//! passing; every connect, disconnect, and inbound chunk is funneled through
//! one ordered event stream, so no locks are needed anywhere.

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::time::Instant;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::client::Client;
use crate::config::ServerConfig;
use crate::connection::Connection;

/// Notice written to a client banned for exhausting its strikes
const BAN_NOTICE: &str = "You are banned MF\n";

/// Events sent from connection handlers to the ChatServer actor
#[derive(Debug)]
pub enum Event {
    /// A new client connection was accepted
    Connected { conn: Connection },
    /// A handler terminated and closed its socket
    Disconnected { addr: SocketAddr },
    /// A chunk of bytes was read from a client socket
    ///
    /// Chunk boundaries carry no meaning: one logical message may span
    /// several chunks and one chunk may hold several messages.
    MessageReceived { conn: Connection, bytes: Vec<u8> },
}

/// The main ChatServer actor
///
/// Processes events strictly in arrival order and applies connection
/// lifecycle, rate-limiting, and ban-list policy. The two maps are touched
/// by no other task.
pub struct ChatServer {
    config: ServerConfig,
    /// Active sessions, keyed by full remote address
    clients: HashMap<SocketAddr, Client>,
    /// Ban start times, keyed by IP so all ports from one host share a ban
    banned: HashMap<IpAddr, Instant>,
    /// Event receiver channel
    receiver: mpsc::Receiver<Event>,
}

impl ChatServer {
    /// Create a new ChatServer with the given config and event receiver
    pub fn new(config: ServerConfig, receiver: mpsc::Receiver<Event>) -> Self {
        Self {
            config,
            clients: HashMap::new(),
            banned: HashMap::new(),
            receiver,
        }
    }

    /// Run the ChatServer event loop
    ///
    /// Continuously receives and processes events until all senders are
    /// dropped. This is the only place the coordinator suspends; outbound
    /// writes below are non-blocking fire-and-forget sends.
    pub async fn run(mut self) {
        info!("ChatServer started");

        while let Some(event) = self.receiver.recv().await {
            self.handle_event(event);
        }

        info!("ChatServer shutting down");
    }

    /// Process a single event
    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Connected { conn } => self.handle_connected(conn),
            Event::Disconnected { addr } => self.handle_disconnected(addr),
            Event::MessageReceived { conn, bytes } => self.handle_message(conn, bytes),
        }
    }

    /// Handle a new client connection
    ///
    /// A still-banned IP gets a remaining-time notice and a close, with no
    /// session created. Ban records are only ever expired here, lazily, on
    /// the next connection attempt from that IP.
    fn handle_connected(&mut self, conn: Connection) {
        let addr = conn.addr();
        let now = Instant::now();

        if let Some(banned_at) = self.banned.get(&addr.ip()).copied() {
            let elapsed = now.duration_since(banned_at);
            if elapsed >= self.config.ban_timeout {
                self.banned.remove(&addr.ip());
            } else {
                let secs = (self.config.ban_timeout - elapsed).as_secs_f32();
                info!(
                    "Client {} tried to connect but is banned for {} more secs",
                    self.config.sens(addr),
                    secs
                );
                conn.send(format!("You are banned MF: {secs} secs left\n").into_bytes());
                conn.shutdown();
                return;
            }
        }

        info!("Client {} connected", self.config.sens(addr));

        // Backdate so the first message is never a rate violation
        let last_message = now
            .checked_sub(2 * self.config.message_rate)
            .unwrap_or(now);
        self.clients.insert(addr, Client::new(conn, last_message));

        debug!("Total clients: {}", self.clients.len());
    }

    /// Handle a client disconnection. No-op for an unknown address.
    fn handle_disconnected(&mut self, addr: SocketAddr) {
        if self.clients.remove(&addr).is_some() {
            info!("Client {} disconnected", self.config.sens(addr));
            debug!("Total clients: {}", self.clients.len());
        }
    }

    /// Handle an inbound chunk from a client
    ///
    /// An accepted chunk (rate-compliant and valid UTF-8) is relayed
    /// verbatim to every other session. A rejected chunk earns a strike;
    /// enough strikes ban the author's IP.
    fn handle_message(&mut self, conn: Connection, bytes: Vec<u8>) {
        let addr = conn.addr();
        let Some(author) = self.clients.get_mut(&addr) else {
            // No session: the author was already banned or never registered
            warn!(
                "Dropping message from unregistered client {}",
                self.config.sens(addr)
            );
            conn.shutdown();
            return;
        };

        let now = Instant::now();
        let rate_ok = now.duration_since(author.last_message) >= self.config.message_rate;
        let accepted = rate_ok && std::str::from_utf8(&bytes).is_ok();

        if accepted {
            author.last_message = now;
            author.strike_count = 0;
            info!(
                "Client {} sent message {:?}",
                self.config.sens(addr),
                bytes
            );
            for (peer_addr, peer) in &self.clients {
                if *peer_addr != addr {
                    peer.conn.send(bytes.clone());
                }
            }
        } else {
            author.strike_count += 1;
            debug!(
                "Client {} struck ({}/{})",
                self.config.sens(addr),
                author.strike_count,
                self.config.strike_limit
            );
            if author.strike_count >= self.config.strike_limit {
                info!("Client {} got banned", self.config.sens(addr));
                self.banned.insert(addr.ip(), now);
                author.conn.send(BAN_NOTICE.as_bytes().to_vec());
                author.conn.shutdown();
                // The session stays registered until the handler reports the
                // disconnect caused by the close above.
            }
        }
    }
}
