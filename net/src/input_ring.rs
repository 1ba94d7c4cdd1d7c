use std::collections::VecDeque;
use std::sync::Mutex;

use lockstep_shared::{InputBatch, InputFlags, InputFrame, PlayerId, Tick};

/// Ring capacities for the exchange's send and receive sides.
#[derive(Debug, Clone, Copy)]
pub struct RingConfig {
    pub sent_capacity: usize,
    pub received_capacity: usize,
}

impl Default for RingConfig {
    fn default() -> Self {
        Self {
            sent_capacity: 32,
            received_capacity: 32,
        }
    }
}

/// Recently sent local input frames, oldest evicted past capacity.
///
/// Every outgoing batch carries the whole ring, so a lost datagram costs
/// the receiver nothing once any later batch arrives. The capacity bounds
/// how far behind a peer can fall and still recover from retransmission
/// alone.
pub struct SentInputRing {
    frames: VecDeque<InputFrame>,
    capacity: usize,
}

impl SentInputRing {
    pub fn new(capacity: usize) -> Self {
        Self {
            frames: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, frame: InputFrame) {
        if self.frames.len() == self.capacity {
            self.frames.pop_front();
        }
        self.frames.push_back(frame);
    }

    /// The current retransmission window as one outgoing batch.
    pub fn batch(&self, player_id: PlayerId) -> InputBatch {
        InputBatch {
            player_id,
            frames: self.frames.iter().copied().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

/// Received remote-input batches, shared between the transport poll path
/// and the simulation's blocking wait.
///
/// Appends and scans take the same mutex; the wait loop holds it only for
/// the duration of one scan and yields between polls.
pub struct ReceivedBatchRing {
    batches: Mutex<VecDeque<InputBatch>>,
    capacity: usize,
}

impl ReceivedBatchRing {
    pub fn new(capacity: usize) -> Self {
        Self {
            batches: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity,
        }
    }

    pub fn push(&self, batch: InputBatch) {
        let mut batches = self.batches.lock().unwrap();
        if batches.len() == self.capacity {
            batches.pop_front();
        }
        batches.push_back(batch);
    }

    /// Scans newest-first for the given player's input at `tick`.
    pub fn find(&self, player_id: PlayerId, tick: Tick) -> Option<InputFlags> {
        let batches = self.batches.lock().unwrap();
        batches
            .iter()
            .rev()
            .find_map(|batch| batch.find(player_id, tick))
    }

    pub fn len(&self) -> usize {
        self.batches.lock().unwrap().len()
    }
}
