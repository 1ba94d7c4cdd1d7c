use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use lockstep_shared::{Reliability, Transport, TransportError, TransportEvent};

type EventQueue = Arc<Mutex<VecDeque<TransportEvent>>>;

/// One half of an in-memory transport pair. Sends land in the other half's
/// receive queue; delivery is immediate, ordered, and lossless, which is
/// enough to exercise everything above the transport boundary.
pub struct LoopbackTransport {
    outgoing: EventQueue,
    incoming: EventQueue,
}

/// Creates two connected transport halves.
pub fn loopback_pair() -> (LoopbackTransport, LoopbackTransport) {
    let a_to_b: EventQueue = Arc::new(Mutex::new(VecDeque::new()));
    let b_to_a: EventQueue = Arc::new(Mutex::new(VecDeque::new()));

    let a = LoopbackTransport {
        outgoing: a_to_b.clone(),
        incoming: b_to_a.clone(),
    };
    let b = LoopbackTransport {
        outgoing: b_to_a,
        incoming: a_to_b,
    };
    (a, b)
}

impl LoopbackTransport {
    /// Simulates the underlying connection dropping: the peer sees a
    /// disconnect event on its next poll.
    pub fn drop_connection(&mut self) {
        self.outgoing
            .lock()
            .unwrap()
            .push_back(TransportEvent::PeerDisconnected);
    }
}

impl Transport for LoopbackTransport {
    fn send(&mut self, payload: &[u8], _reliability: Reliability) -> Result<(), TransportError> {
        self.outgoing
            .lock()
            .unwrap()
            .push_back(TransportEvent::Data(payload.to_vec()));
        Ok(())
    }

    fn poll_received(
        &mut self,
        _timeout: Duration,
    ) -> Result<Option<TransportEvent>, TransportError> {
        Ok(self.incoming.lock().unwrap().pop_front())
    }
}
