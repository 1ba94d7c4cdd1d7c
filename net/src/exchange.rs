use std::time::Duration;

use lockstep_shared::{
    ByteReader, ByteWriter, GameSnapshot, HostRole, InputBatch, InputFlags, InputFrame,
    InputOutcome, InputSource, MessageKind, PlayerId, Reliability, Tick, TickInputs, Timer,
    Transport, TransportError, TransportEvent, WireSerde,
};

use crate::input_ring::{ReceivedBatchRing, RingConfig, SentInputRing};

const RESEND_INTERVAL: Duration = Duration::from_millis(50);

/// Result of waiting for the peer's input for a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    /// The peer's input for the requested tick.
    PeerInput(InputFlags),
    /// The session is over; the wait returned instead of blocking forever.
    Disconnected,
}

/// The lock-step synchronization point between two simulations.
///
/// Every tick, each side sends its local input (wrapped in the whole
/// retransmission window) and then blocks until the peer's input for the
/// same tick has arrived. Physics for tick N never runs before both inputs
/// for tick N are known, which is what keeps the two simulations in
/// lock-step without any authoritative state transfer.
///
/// The wait loop is cooperative: it pumps the transport, scans the received
/// ring, and yields the scheduling quantum between polls. It never sleeps
/// and never blocks the transport's receive path.
pub struct InputExchange<T: Transport> {
    transport: T,
    role: HostRole,
    local_player: PlayerId,
    remote_player: PlayerId,
    sent: SentInputRing,
    received: ReceivedBatchRing,
    arrived_snapshots: Vec<GameSnapshot>,
    resend: Timer,
    stopped: bool,
}

impl<T: Transport> InputExchange<T> {
    pub fn new(
        transport: T,
        role: HostRole,
        local_player: PlayerId,
        remote_player: PlayerId,
        config: RingConfig,
    ) -> Self {
        Self {
            transport,
            role,
            local_player,
            remote_player,
            sent: SentInputRing::new(config.sent_capacity),
            received: ReceivedBatchRing::new(config.received_capacity),
            arrived_snapshots: Vec::new(),
            resend: Timer::new(RESEND_INTERVAL),
            stopped: false,
        }
    }

    /// Which side of the session this exchange plays; the remote side
    /// plays `role().invert()`.
    pub fn role(&self) -> HostRole {
        self.role
    }

    /// Whether a disconnect or leave signal has been observed.
    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Records and transmits the local input for `tick`, then waits until
    /// the peer's input for the same tick is known.
    ///
    /// Returns `Disconnected` as soon as a peer-leave or transport
    /// disconnect has been observed, including mid-wait.
    pub fn send_and_wait_for_peer_input(&mut self, tick: Tick, local: InputFlags) -> WaitOutcome {
        if self.stopped {
            return WaitOutcome::Disconnected;
        }

        self.sent.push(InputFrame {
            player_id: self.local_player,
            tick,
            flags: local,
        });
        self.send_input_window();

        loop {
            self.pump();
            if self.stopped {
                return WaitOutcome::Disconnected;
            }
            if let Some(flags) = self.received.find(self.remote_player, tick) {
                return WaitOutcome::PeerInput(flags);
            }
            if self.resend.ringing() {
                // the peer may have lost our batch; the window covers it
                self.send_input_window();
            }
            std::thread::yield_now();
        }
    }

    /// Sends an authoritative snapshot to the peer. Only the host side
    /// holds authority; a peer-side call is refused.
    pub fn send_snapshot(&mut self, snapshot: &GameSnapshot) {
        if self.role != HostRole::Host {
            log::warn!("refusing to send snapshot from the non-authoritative side");
            return;
        }
        let mut writer = ByteWriter::new();
        MessageKind::Snapshot.ser(&mut writer);
        snapshot.ser(&mut writer);
        self.send_payload(&writer.to_bytes(), Reliability::Reliable);
    }

    /// Snapshots received since the last call, oldest first.
    pub fn take_arrived_snapshots(&mut self) -> Vec<GameSnapshot> {
        std::mem::take(&mut self.arrived_snapshots)
    }

    /// Tells the peer this side is leaving, and stops the exchange.
    pub fn notify_peer_left(&mut self) {
        let mut writer = ByteWriter::new();
        MessageKind::Leave.ser(&mut writer);
        self.send_payload(&writer.to_bytes(), Reliability::Reliable);
        self.stopped = true;
    }

    fn send_input_window(&mut self) {
        let batch = self.sent.batch(self.local_player);
        let mut writer = ByteWriter::new();
        MessageKind::GameData.ser(&mut writer);
        batch.ser(&mut writer);
        self.send_payload(&writer.to_bytes(), Reliability::Unreliable);
        self.resend.reset();
    }

    fn send_payload(&mut self, payload: &[u8], reliability: Reliability) {
        match self.transport.send(payload, reliability) {
            Ok(()) => {}
            Err(TransportError::Disconnected) => self.stopped = true,
            Err(error) => {
                // unreliable traffic is covered by the retransmission window
                log::warn!("send failed: {}", error);
            }
        }
    }

    /// Drains every event the transport has ready, without waiting.
    fn pump(&mut self) {
        loop {
            match self.transport.poll_received(Duration::ZERO) {
                Ok(Some(TransportEvent::Data(payload))) => self.handle_payload(&payload),
                Ok(Some(TransportEvent::PeerConnected)) => {
                    log::debug!("peer connected");
                }
                Ok(Some(TransportEvent::PeerDisconnected)) => {
                    log::info!("peer disconnected");
                    self.stopped = true;
                }
                Ok(None) => return,
                Err(TransportError::Disconnected) => {
                    self.stopped = true;
                    return;
                }
                Err(error) => {
                    log::warn!("transport poll failed: {}", error);
                    return;
                }
            }
        }
    }

    // Malformed payloads are dropped, never fatal: the peer retransmits
    // inputs anyway, and a corrupted snapshot just delays reconciliation.
    fn handle_payload(&mut self, payload: &[u8]) {
        let mut reader = ByteReader::new(payload);
        let kind = match MessageKind::de(&mut reader) {
            Ok(kind) => kind,
            Err(error) => {
                log::warn!("dropping message with unreadable kind: {}", error);
                return;
            }
        };

        match kind {
            MessageKind::GameData => match InputBatch::de(&mut reader) {
                Ok(batch) => self.received.push(batch),
                Err(error) => log::warn!("dropping malformed input batch: {}", error),
            },
            MessageKind::Snapshot => match GameSnapshot::de(&mut reader) {
                Ok(snapshot) => self.arrived_snapshots.push(snapshot),
                Err(error) => log::warn!("dropping malformed snapshot: {}", error),
            },
            MessageKind::Start => {
                log::debug!("session start signal received");
            }
            MessageKind::Leave => {
                log::info!("peer left the session");
                self.stopped = true;
            }
        }
    }
}

impl<T: Transport> InputSource for InputExchange<T> {
    fn inputs_for_tick(&mut self, tick: Tick, local: InputFlags) -> InputOutcome {
        match self.send_and_wait_for_peer_input(tick, local) {
            WaitOutcome::PeerInput(remote) => {
                let mut inputs = TickInputs::new();
                inputs.insert(self.local_player, local);
                inputs.insert(self.remote_player, remote);
                InputOutcome::Ready(inputs)
            }
            WaitOutcome::Disconnected => InputOutcome::Stopped,
        }
    }
}
