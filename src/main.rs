//! TCP Chat Relay - Entry Point
//!
//! Starts the TCP listener and the ChatServer actor, spawning one handler
//! task per accepted connection.

use std::env;

use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use chat_relay::{handle_connection, ChatServer, ServerConfig};

/// Channel buffer size for coordinator events
const CHANNEL_BUFFER_SIZE: usize = 256;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging with environment filter
    // Use RUST_LOG env var to control log level
    // e.g., RUST_LOG=debug or RUST_LOG=chat_relay=trace
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("chat_relay=info")),
        )
        .init();

    let config = ServerConfig::from_env();

    // Bind address from the command line wins over the configured port
    let addr = env::args().nth(1).unwrap_or_else(|| config.bind_addr());

    // A relay without its listener is useless, so a bind failure is fatal
    let listener = TcpListener::bind(&addr).await.inspect_err(|err| {
        error!("Could not bind {}: {}", config.sens(&addr), config.sens(err));
    })?;
    info!("Listening for TCP connections on {}", config.sens(&addr));

    // Create the coordinator channel and start the actor
    let (event_tx, event_rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);
    tokio::spawn(ChatServer::new(config.clone(), event_rx).run());

    // Connection accept loop; accept failures never stop the listener
    loop {
        match listener.accept().await {
            Ok((stream, _)) => {
                let event_tx = event_tx.clone();
                let config = config.clone();
                tokio::spawn(async move {
                    if let Err(e) = handle_connection(stream, event_tx, config).await {
                        error!("Connection handler error: {}", e);
                    }
                });
            }
            Err(e) => {
                error!("Failed to accept connection: {}", config.sens(e));
            }
        }
    }
}
