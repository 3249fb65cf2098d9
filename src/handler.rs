//! TCP connection handler
//!
//! Bridges one accepted socket to the coordinator's event stream: raw
//! chunks read from the socket become `MessageReceived` events, and
//! outbound frames queued by the coordinator are written back to the
//! socket or shut it down.

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tracing::debug;

use crate::config::ServerConfig;
use crate::connection::{Connection, Outbound};
use crate::error::AppError;
use crate::server::Event;

/// Fixed read buffer size. A chunk boundary is not a message boundary.
pub const READ_BUFFER_SIZE: usize = 64;

/// Handle one accepted TCP connection until it closes.
///
/// Emits exactly one `Connected` event up front and exactly one
/// `Disconnected` event when the loop ends, whether the remote hung up,
/// the read failed, or the coordinator ordered a shutdown.
pub async fn handle_connection(
    stream: TcpStream,
    events: mpsc::Sender<Event>,
    config: ServerConfig,
) -> Result<(), AppError> {
    let addr = stream.peer_addr()?;
    let (mut read_half, mut write_half) = stream.into_split();

    let (out_tx, mut out_rx) = mpsc::unbounded_channel();
    let conn = Connection::new(addr, out_tx);

    events
        .send(Event::Connected { conn: conn.clone() })
        .await
        .map_err(|_| AppError::ChannelClosed)?;

    let mut buffer = [0u8; READ_BUFFER_SIZE];
    loop {
        tokio::select! {
            read = read_half.read(&mut buffer) => match read {
                Ok(0) => break,
                Ok(n) => {
                    let event = Event::MessageReceived {
                        conn: conn.clone(),
                        bytes: buffer[..n].to_vec(),
                    };
                    if events.send(event).await.is_err() {
                        break;
                    }
                }
                Err(err) => {
                    debug!(
                        "Read error from {}: {}",
                        config.sens(addr),
                        config.sens(err)
                    );
                    break;
                }
            },
            frame = out_rx.recv() => match frame {
                Some(Outbound::Data(bytes)) => {
                    // Best-effort: a peer that stopped reading is the
                    // problem of its own handler, not this one
                    let _ = write_half.write_all(&bytes).await;
                }
                Some(Outbound::Shutdown) | None => break,
            },
        }
    }

    let _ = write_half.shutdown().await;
    let _ = events.send(Event::Disconnected { addr }).await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;

    /// Accept one localhost connection and run a handler for it
    async fn start() -> (TcpStream, mpsc::Receiver<Event>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (event_tx, event_rx) = mpsc::channel(16);

        let remote = TcpStream::connect(addr).await.unwrap();
        let (stream, _) = listener.accept().await.unwrap();
        let config = ServerConfig {
            safe_mode: false,
            ..ServerConfig::default()
        };
        tokio::spawn(handle_connection(stream, event_tx, config));

        (remote, event_rx)
    }

    #[tokio::test]
    async fn test_chunks_become_message_events() {
        let (mut remote, mut events) = start().await;

        let Some(Event::Connected { conn }) = events.recv().await else {
            panic!("expected Connected first");
        };
        assert_eq!(conn.addr(), remote.local_addr().unwrap());

        remote.write_all(b"hello").await.unwrap();
        let Some(Event::MessageReceived { bytes, .. }) = events.recv().await else {
            panic!("expected MessageReceived");
        };
        assert_eq!(bytes, b"hello");
    }

    #[tokio::test]
    async fn test_remote_close_emits_one_disconnect() {
        let (remote, mut events) = start().await;

        let Some(Event::Connected { conn }) = events.recv().await else {
            panic!("expected Connected first");
        };

        drop(remote);
        let Some(Event::Disconnected { addr }) = events.recv().await else {
            panic!("expected Disconnected");
        };
        assert_eq!(addr, conn.addr());
        assert!(events.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_coordinator_writes_reach_the_socket() {
        let (mut remote, mut events) = start().await;

        let Some(Event::Connected { conn }) = events.recv().await else {
            panic!("expected Connected first");
        };

        conn.send(b"welcome\n".to_vec());
        let mut buf = [0u8; READ_BUFFER_SIZE];
        let n = remote.read(&mut buf).await.unwrap();
        assert_eq!(&buf[..n], b"welcome\n");
    }

    #[tokio::test]
    async fn test_coordinator_shutdown_closes_socket_and_disconnects() {
        let (mut remote, mut events) = start().await;

        let Some(Event::Connected { conn }) = events.recv().await else {
            panic!("expected Connected first");
        };

        conn.send(b"bye\n".to_vec());
        conn.shutdown();

        let mut received = Vec::new();
        let mut buf = [0u8; READ_BUFFER_SIZE];
        loop {
            // EOF once the handler has shut the socket down
            let n = remote.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            received.extend_from_slice(&buf[..n]);
        }
        assert_eq!(received, b"bye\n");

        let Some(Event::Disconnected { addr }) = events.recv().await else {
            panic!("expected Disconnected");
        };
        assert_eq!(addr, conn.addr());
    }
}
