use lockstep_shared::{InputFlags, InputOutcome, InputSource, PlayerId, Tick, TickInputs};

/// A single-player input source that stops the session after a fixed
/// number of ticks, so a scheduler-driven test terminates on its own.
pub struct StopAfterSource {
    player_id: PlayerId,
    stop_at: Tick,
}

impl StopAfterSource {
    pub fn new(player_id: PlayerId, stop_at: Tick) -> Self {
        Self { player_id, stop_at }
    }
}

impl InputSource for StopAfterSource {
    fn inputs_for_tick(&mut self, tick: Tick, local: InputFlags) -> InputOutcome {
        if tick >= self.stop_at {
            return InputOutcome::Stopped;
        }
        let mut inputs = TickInputs::new();
        inputs.insert(self.player_id, local);
        InputOutcome::Ready(inputs)
    }
}
