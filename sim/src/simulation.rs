use std::sync::Arc;

use lockstep_shared::{
    GameSnapshot, InputFlags, InputOutcome, InputSource, PlayerId, SnapshotEntry, Tick, TickInputs,
};

use crate::collision::engine::CollisionEngine;
use crate::entity::entity::BehaviourCtx;
use crate::entity::store::EntityStore;
use crate::render::render_buffers::RenderBuffers;
use crate::scheduler::scheduler::{TickFlow, TickHost};

/// The complete game-side state driven by a scheduler: entity store,
/// collision engine, render hand-off, and the input source that gates each
/// tick.
///
/// `step_with_inputs` is the deterministic heart: given the same entity
/// state and the same inputs it produces the same next state, which is what
/// rollback resimulation relies on.
pub struct Simulation<S: InputSource> {
    store: EntityStore,
    collision: CollisionEngine,
    render: Arc<RenderBuffers>,
    input_source: S,
    local_player: PlayerId,
    local_input: InputFlags,
    last_inputs: TickInputs,
}

impl<S: InputSource> Simulation<S> {
    pub fn new(input_source: S, local_player: PlayerId) -> Self {
        Self {
            store: EntityStore::new(),
            collision: CollisionEngine::new(),
            render: Arc::new(RenderBuffers::new()),
            input_source,
            local_player,
            local_input: InputFlags::none(),
            last_inputs: TickInputs::new(),
        }
    }

    pub fn store(&self) -> &EntityStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut EntityStore {
        &mut self.store
    }

    pub fn local_player(&self) -> PlayerId {
        self.local_player
    }

    /// Sets the local input sampled for the next fixed tick. Called from
    /// whatever reads the real input device, between ticks.
    pub fn set_local_input(&mut self, flags: InputFlags) {
        self.local_input = flags;
    }

    /// The render-thread side of the double buffer.
    pub fn render_handle(&self) -> Arc<RenderBuffers> {
        self.render.clone()
    }

    /// Advances entity state by exactly one tick under the given inputs:
    /// previous positions snap to current, fixed-update hooks run in
    /// traversal order, then the collision pass.
    ///
    /// Called with live inputs from `fixed_tick` and with recorded inputs
    /// when resimulating after a rollback; both paths are identical.
    pub fn step_with_inputs(&mut self, tick: Tick, inputs: &TickInputs) {
        self.store.snap_previous_positions();

        for id in self.store.traversal_order() {
            self.store.with_behaviour(id, |behaviour, store| {
                let mut ctx = BehaviourCtx {
                    store,
                    entity: id,
                    tick,
                    inputs,
                };
                behaviour.fixed_update(&mut ctx);
            });
        }

        self.collision.run_pass(&mut self.store, tick, inputs);
        self.last_inputs = inputs.clone();
    }

    /// Captures the authoritative entity state for divergence checks and
    /// rollback restore. Entries follow flat-index (registration) order,
    /// which is itself part of deterministic state.
    pub fn capture_snapshot(&self, tick: Tick) -> GameSnapshot {
        let entries = self
            .store
            .ids()
            .into_iter()
            .map(|id| {
                let entity = self.store.entity(id);
                SnapshotEntry {
                    entity_id: id,
                    position: entity.position,
                    velocity: entity.velocity,
                    active: entity.active,
                }
            })
            .collect();
        GameSnapshot { tick, entries }
    }

    /// Restores entity state from a snapshot before resimulating.
    ///
    /// Previous positions are snapped to the restored positions so the
    /// first resimulated tick does not interpolate across the rollback.
    /// Entries for entities no longer in the store are skipped with a
    /// warning; entity removal itself is outside the snapshot's scope.
    pub fn apply_snapshot(&mut self, snapshot: &GameSnapshot) {
        for entry in &snapshot.entries {
            let Some(entity) = self.store.find_by_id_mut(entry.entity_id) else {
                log::warn!(
                    "snapshot for tick {} references missing entity {:?}",
                    snapshot.tick,
                    entry.entity_id
                );
                continue;
            };
            entity.position = entry.position;
            entity.previous_position = entry.position;
            entity.velocity = entry.velocity;
            entity.active = entry.active;
        }
    }
}

impl<S: InputSource> TickHost for Simulation<S> {
    fn drain_pending_inits(&mut self, tick: Tick) {
        self.store.drain_pending_inits(tick);
    }

    fn fixed_tick(&mut self, tick: Tick) -> TickFlow {
        match self.input_source.inputs_for_tick(tick, self.local_input) {
            InputOutcome::Ready(inputs) => {
                self.step_with_inputs(tick, &inputs);
                TickFlow::Continue
            }
            InputOutcome::Stopped => {
                log::info!("input source stopped at tick {}", tick);
                TickFlow::Stop
            }
        }
    }

    fn frame_update(&mut self, tick: Tick) {
        let inputs = self.last_inputs.clone();
        for id in self.store.traversal_order() {
            self.store.with_behaviour(id, |behaviour, store| {
                let mut ctx = BehaviourCtx {
                    store,
                    entity: id,
                    tick,
                    inputs: &inputs,
                };
                behaviour.update(&mut ctx);
            });
        }
    }

    fn flush_events(&mut self) {
        self.store.flush_despawns();
    }

    fn sync_render(&mut self, alpha: f32) {
        self.render.sync(&self.store, alpha);
    }
}
