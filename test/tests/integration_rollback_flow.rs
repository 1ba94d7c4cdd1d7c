//! Integration test for the full host-authoritative reconciliation flow:
//! predict with stale remote input, detect divergence against authoritative
//! snapshots, roll back, resimulate from the corrected inputs, and merge.

use glam::Vec2;
use lockstep_net::{CompareOutcome, ReconcileManager};
use lockstep_shared::{
    EntityKind, InputFlags, LocalInputSource, PlayerId, Tick, TickInputs,
};
use lockstep_sim::{Behaviour, BehaviourCtx, Entity, Simulation, TickHost};

const LOCAL: PlayerId = PlayerId::new(1);
const REMOTE: PlayerId = PlayerId::new(2);
const PAWN: EntityKind = EntityKind::new(1);

/// Moves one unit per tick in the direction of the owning player's input.
struct Pawn {
    player: PlayerId,
}

impl Behaviour for Pawn {
    fn fixed_update(&mut self, ctx: &mut BehaviourCtx) {
        let flags = ctx.inputs.get(self.player);
        let me = ctx.me_mut();
        me.velocity = Vec2::new(
            (flags.right as i32 - flags.left as i32) as f32,
            (flags.up as i32 - flags.down as i32) as f32,
        );
        let velocity = me.velocity;
        me.position += velocity;
    }
}

fn build_sim() -> Simulation<LocalInputSource> {
    let mut sim = Simulation::new(LocalInputSource::new(LOCAL), LOCAL);
    for player in [LOCAL, REMOTE] {
        sim.store_mut()
            .add_root(Entity::with_behaviour(PAWN, Box::new(Pawn { player })));
    }
    sim.drain_pending_inits(0);
    sim
}

fn local_flags(tick: Tick) -> InputFlags {
    InputFlags {
        up: tick % 2 == 0,
        ..InputFlags::none()
    }
}

/// What the remote player actually pressed, every tick.
fn true_inputs(tick: Tick) -> TickInputs {
    let mut inputs = TickInputs::new();
    inputs.insert(LOCAL, local_flags(tick));
    inputs.insert(
        REMOTE,
        InputFlags {
            right: true,
            ..InputFlags::none()
        },
    );
    inputs
}

/// The peer's prediction: real remote input through tick 2, then a stale
/// "nothing pressed" guess.
fn predicted_inputs(tick: Tick) -> TickInputs {
    let mut inputs = TickInputs::new();
    inputs.insert(LOCAL, local_flags(tick));
    if tick < 3 {
        inputs.insert(
            REMOTE,
            InputFlags {
                right: true,
                ..InputFlags::none()
            },
        );
    }
    inputs
}

#[test]
fn divergence_rollback_resimulate_merge() {
    let mut host = build_sim();
    let mut peer = build_sim();
    let mut manager = ReconcileManager::new();

    for tick in 1..=6 {
        host.step_with_inputs(tick, &true_inputs(tick));
        manager.record_arrived(host.capture_snapshot(tick));

        peer.step_with_inputs(tick, &predicted_inputs(tick));
        manager.save_game_tick(peer.capture_snapshot(tick));
    }

    // prediction went stale at tick 3
    assert_eq!(
        manager.compare_arrived_and_pending(),
        CompareOutcome::Divergent { tick: 3 }
    );

    // restore the authoritative state and discard the bad predictions
    let restore = manager.restore_point(3).expect("host sent tick 3").clone();
    peer.apply_snapshot(&restore);
    let discarded = manager.rollback(3);
    assert_eq!(discarded, vec![3, 4, 5, 6]);
    assert_eq!(manager.pending_len(), 2);

    // the restore point stands in for tick 3; resimulate the rest with the
    // now-known true inputs, one fresh snapshot per discarded tick
    manager.save_game_tick(restore);
    for tick in 4..=6 {
        peer.step_with_inputs(tick, &true_inputs(tick));
        manager.save_game_tick(peer.capture_snapshot(tick));
    }
    assert_eq!(manager.pending_len(), 6);

    // the resimulated window now agrees with the authority
    assert_eq!(
        manager.compare_arrived_and_pending(),
        CompareOutcome::MergeForward { up_to: 6 }
    );

    let before = manager.earliest_pending_tick().unwrap();
    manager.merge_correct_game_state_tick(5);
    let after = manager.earliest_pending_tick().unwrap();
    assert!(after > before);
    assert_eq!(after, 6);

    // and the peer simulation is bit-identical to the host's
    assert!(!peer
        .capture_snapshot(6)
        .diverges_from(&host.capture_snapshot(6)));
}
