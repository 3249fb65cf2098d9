//! Multi-client TCP Chat Relay Library
//!
//! A chat relay that accepts raw TCP connections, relays every accepted
//! chunk of text to all other connected clients, and moderates abuse with
//! a per-client message-rate limit and a strike-based temporary IP ban.
//!
//! # Features
//! - Raw TCP transport, no framing: chunks are relayed verbatim
//! - Per-client message-rate limiting
//! - Strike accounting for rate and encoding violations
//! - Time-boxed IP bans, expired lazily on reconnect
//! - Safe-mode redaction of addresses and error text in logs
//!
//! # Architecture
//! Uses the Actor pattern with `mpsc` channels:
//! - `ChatServer` is the central coordinator owning all shared state
//!   (active sessions and the ban list)
//! - Each connection has a handler task that turns socket reads into
//!   `Event`s and applies the coordinator's outbound frames
//! - No locks needed - all state access goes through message passing
//!
//! # Example
//! ```ignore
//! use tokio::net::TcpListener;
//! use tokio::sync::mpsc;
//! use chat_relay::{ChatServer, ServerConfig, handle_connection};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = ServerConfig::default();
//!     let listener = TcpListener::bind(config.bind_addr()).await.unwrap();
//!     let (event_tx, event_rx) = mpsc::channel(256);
//!
//!     tokio::spawn(ChatServer::new(config.clone(), event_rx).run());
//!
//!     while let Ok((stream, _)) = listener.accept().await {
//!         tokio::spawn(handle_connection(stream, event_tx.clone(), config.clone()));
//!     }
//! }
//! ```

pub mod client;
pub mod config;
pub mod connection;
pub mod error;
pub mod handler;
pub mod server;

// Re-export main types for convenience
pub use client::Client;
pub use config::{Sens, ServerConfig};
pub use connection::{Connection, Outbound};
pub use error::AppError;
pub use handler::handle_connection;
pub use server::{ChatServer, Event};
