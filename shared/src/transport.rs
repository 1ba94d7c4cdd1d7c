use std::time::Duration;

use thiserror::Error;

/// Errors surfaced by a concrete transport implementation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The transport could not deliver a payload.
    #[error("Failed to send {payload_size} byte payload")]
    SendFailed { payload_size: usize },

    /// The transport is no longer connected to the peer.
    #[error("Transport is disconnected")]
    Disconnected,
}

/// Delivery guarantee requested for an outgoing payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reliability {
    /// Must arrive, in order. Used for control signals.
    Reliable,
    /// Best effort. Used for per-tick data, which carries its own
    /// retransmission window.
    Unreliable,
}

/// An event surfaced by polling the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    /// A raw datagram payload arrived.
    Data(Vec<u8>),
    /// The peer completed its connection.
    PeerConnected,
    /// The peer disconnected or left the session.
    PeerDisconnected,
}

/// The boundary to the raw datagram transport.
///
/// The core only ever sends byte buffers and polls for received ones;
/// connection establishment, encryption, and reconnection policy belong to
/// the concrete implementation behind this trait. Timeouts on waits are the
/// transport's concern too: the core's only obligation is to observe
/// `PeerDisconnected` and unwind instead of blocking forever.
pub trait Transport {
    fn send(&mut self, payload: &[u8], reliability: Reliability) -> Result<(), TransportError>;

    /// Polls for the next received event, waiting up to `timeout`.
    /// `Ok(None)` means nothing arrived in time.
    fn poll_received(
        &mut self,
        timeout: Duration,
    ) -> Result<Option<TransportEvent>, TransportError>;
}
