use std::collections::BTreeMap;

use crate::types::{PlayerId, Tick};
use crate::wire::input_message::InputFlags;

/// All players' inputs for one tick, keyed by player.
///
/// Backed by a `BTreeMap` so iteration order is deterministic across both
/// simulations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickInputs {
    inputs: BTreeMap<PlayerId, InputFlags>,
}

impl TickInputs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, player_id: PlayerId, flags: InputFlags) {
        self.inputs.insert(player_id, flags);
    }

    pub fn get(&self, player_id: PlayerId) -> InputFlags {
        self.inputs.get(&player_id).copied().unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = (PlayerId, InputFlags)> + '_ {
        self.inputs.iter().map(|(id, flags)| (*id, *flags))
    }

    pub fn len(&self) -> usize {
        self.inputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }
}

/// Outcome of asking the input source for a tick's inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputOutcome {
    /// Both players' inputs for the tick are known; physics may run.
    Ready(TickInputs),
    /// The source has stopped (peer left, session over). The simulation
    /// must not run this tick.
    Stopped,
}

/// Supplies the complete set of player inputs for each tick.
///
/// This is the synchronization point that makes the simulation lock-step:
/// the implementation may block (cooperatively) until every player's input
/// for `tick` is known, and must return `Stopped` instead of blocking
/// forever once the session is over.
pub trait InputSource {
    fn inputs_for_tick(&mut self, tick: Tick, local: InputFlags) -> InputOutcome;
}

/// An input source for offline play: the local player's input is the only
/// one, available immediately.
pub struct LocalInputSource {
    player_id: PlayerId,
}

impl LocalInputSource {
    pub fn new(player_id: PlayerId) -> Self {
        Self { player_id }
    }
}

impl InputSource for LocalInputSource {
    fn inputs_for_tick(&mut self, _tick: Tick, local: InputFlags) -> InputOutcome {
        let mut inputs = TickInputs::new();
        inputs.insert(self.player_id, local);
        InputOutcome::Ready(inputs)
    }
}
