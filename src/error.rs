//! Error types for the relay
//!
//! Uses thiserror for ergonomic error definitions. Policy violations
//! (rate abuse, bad encoding) are state transitions handled by the
//! coordinator, not errors; only transport and internal-channel failures
//! appear here.

use thiserror::Error;

/// Errors surfaced by connection handling
///
/// All variants are terminal for the affected handler only; none of them
/// take the process down.
#[derive(Debug, Error)]
pub enum AppError {
    /// IO error on the socket
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The coordinator's event channel is closed
    #[error("event channel closed")]
    ChannelClosed,
}
