//! End-to-end collision lifecycle: a scheduler-driven simulation in which
//! one body crosses another must report exactly one Started, one Ended, and
//! an Ongoing count matching the ticks spent overlapping.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use glam::Vec2;
use lockstep_shared::{EntityKind, PlayerId};
use lockstep_sim::{
    Behaviour, BehaviourCtx, Collider, CollisionEvent, Entity, ManualClock, Scheduler,
    SchedulerConfig, SchedulerState, Shape, Simulation,
};
use lockstep_test::StopAfterSource;

const BODY: EntityKind = EntityKind::new(1);
const HITBOX: EntityKind = EntityKind::new(2);

#[derive(Default)]
struct Counts {
    started: AtomicU32,
    ongoing: AtomicU32,
    ended: AtomicU32,
}

/// Drifts right one unit per tick and counts its collision lifecycle.
struct CrossingBody {
    counts: Arc<Counts>,
}

impl Behaviour for CrossingBody {
    fn fixed_update(&mut self, ctx: &mut BehaviourCtx) {
        ctx.me_mut().position += Vec2::new(1.0, 0.0);
    }

    fn on_collision_started(&mut self, _ctx: &mut BehaviourCtx, _event: &CollisionEvent) {
        self.counts.started.fetch_add(1, Ordering::SeqCst);
    }

    fn on_collision(&mut self, _ctx: &mut BehaviourCtx, _event: &CollisionEvent) {
        self.counts.ongoing.fetch_add(1, Ordering::SeqCst);
    }

    fn on_collision_ended(&mut self, _ctx: &mut BehaviourCtx, _event: &CollisionEvent) {
        self.counts.ended.fetch_add(1, Ordering::SeqCst);
    }
}

#[test]
fn crossing_bodies_report_one_started_and_one_ended() {
    let player = PlayerId::new(1);
    let mut sim = Simulation::new(StopAfterSource::new(player, 12), player);
    let counts = Arc::new(Counts::default());

    let mover = sim.store_mut().add_root(
        Entity::with_behaviour(
            BODY,
            Box::new(CrossingBody {
                counts: counts.clone(),
            }),
        )
        .at(Vec2::new(-5.0, 0.0)),
    );
    sim.store_mut().add_child(
        mover,
        Entity::collider(HITBOX, Collider::solid(Shape::Circle { radius: 2.0 })),
    );

    // offset vertically so the circle centers never coincide mid-crossing
    let obstacle = sim
        .store_mut()
        .add_root(Entity::new(BODY).at(Vec2::new(0.0, 1.0)));
    sim.store_mut().add_child(
        obstacle,
        Entity::collider(HITBOX, Collider::solid(Shape::Circle { radius: 2.0 })),
    );

    let mut scheduler = Scheduler::new(SchedulerConfig::default(), ManualClock::new());
    scheduler.run(&mut sim).unwrap();
    assert_eq!(scheduler.state(), SchedulerState::Stopped);

    // after tick t the mover sits at (t - 4, 0), so the squared center
    // distance is (t - 4)^2 + 1 < 16 exactly for ticks 1..=7: 7 Ongoing
    assert_eq!(counts.started.load(Ordering::SeqCst), 1);
    assert_eq!(counts.ongoing.load(Ordering::SeqCst), 7);
    assert_eq!(counts.ended.load(Ordering::SeqCst), 1);
}

#[test]
fn render_buffer_tracks_the_scheduled_simulation() {
    let player = PlayerId::new(1);
    let mut sim = Simulation::new(StopAfterSource::new(player, 5), player);

    let body = sim
        .store_mut()
        .add_root(Entity::new(BODY).at(Vec2::new(1.0, 2.0)));
    sim.store_mut().add_child(
        body,
        Entity::collider(HITBOX, Collider::solid(Shape::Circle { radius: 1.0 })),
    );

    let render = sim.render_handle();
    let mut scheduler = Scheduler::new(SchedulerConfig::default(), ManualClock::new());
    scheduler.run(&mut sim).unwrap();

    render.with_active(|items| {
        // the collider child never renders; the body does
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].entity_id, body);
        assert_eq!(items[0].position, Vec2::new(1.0, 2.0));
    });
}
