use std::collections::BTreeMap;

use lockstep_shared::{EntityId, Tick, TickInputs};

use crate::entity::entity::BehaviourCtx;
use crate::entity::store::EntityStore;

use super::shapes::{shapes_collide, Contact};

/// A collision delivered to game logic: the receiving entity's own
/// collider, the other participant, and the contact seen from the
/// receiver's side (normal pointing toward the receiver).
#[derive(Debug, Clone, Copy)]
pub struct CollisionEvent {
    pub own_collider: EntityId,
    pub other_entity: EntityId,
    pub other_collider: EntityId,
    pub contact: Contact,
    /// True when either collider in the pair is a sensor; such a pair
    /// reports events but must never be physically resolved.
    pub sensor: bool,
}

// a < b, so each unordered entity pair has exactly one key
type PairKey = (EntityId, EntityId);

#[derive(Debug, Clone, Copy)]
struct PairHit {
    a_collider: EntityId,
    b_collider: EntityId,
    // normal toward entity a
    contact: Contact,
    sensor: bool,
}

enum Phase {
    Started,
    Ongoing,
    Ended,
}

/// Detects overlaps between the colliders of physics-participating
/// entities and tracks started/ongoing/ended transitions tick over tick.
///
/// The pair walk is naive O(n²) over the flat index, which is the intended
/// regime for tens of entities. Pairs are keyed by the unordered owning
/// entity pair: however many collider sub-shapes overlap, an entity pair
/// produces at most one event per tick.
pub struct CollisionEngine {
    previous: BTreeMap<PairKey, PairHit>,
}

impl CollisionEngine {
    pub fn new() -> Self {
        Self {
            previous: BTreeMap::new(),
        }
    }

    /// Number of entity pairs overlapping as of the last pass.
    pub fn overlapping_pairs(&self) -> usize {
        self.previous.len()
    }

    /// Runs one collision pass: detect current overlaps, classify against
    /// the previous tick's set, and dispatch callbacks.
    ///
    /// Dispatch order is all Started first, then Ongoing for every
    /// currently overlapping pair (including the just-started ones), then
    /// all Ended; each event is delivered symmetrically to both
    /// participants with roles swapped. Iteration follows ordered pair
    /// keys, so dispatch order is deterministic across peers.
    pub fn run_pass(&mut self, store: &mut EntityStore, tick: Tick, inputs: &TickInputs) {
        let current = self.detect(store);

        let started: Vec<PairKey> = current
            .keys()
            .filter(|key| !self.previous.contains_key(*key))
            .copied()
            .collect();
        let ended: Vec<PairKey> = self
            .previous
            .keys()
            .filter(|key| !current.contains_key(*key))
            .copied()
            .collect();

        for key in &started {
            self.deliver(store, tick, inputs, *key, &current[key], Phase::Started);
        }
        for (key, hit) in &current {
            self.deliver(store, tick, inputs, *key, hit, Phase::Ongoing);
        }
        for key in &ended {
            // the last known contact, from the tick the pair still overlapped
            let hit = self.previous[key];
            self.deliver(store, tick, inputs, *key, &hit, Phase::Ended);
        }

        self.previous = current;
    }

    fn detect(&self, store: &EntityStore) -> BTreeMap<PairKey, PairHit> {
        let participants = store.physics_participants();
        let mut current = BTreeMap::new();

        for i in 0..participants.len() {
            for j in (i + 1)..participants.len() {
                let a = participants[i];
                let b = participants[j];
                if !store.is_effectively_active(a) || !store.is_effectively_active(b) {
                    continue;
                }

                if let Some(hit) = self.deepest_hit(store, a, b) {
                    let key = if a < b { (a, b) } else { (b, a) };
                    current.insert(key, hit);
                }
            }
        }
        current
    }

    // Tests every collider sub-shape pair and keeps the deepest
    // penetration, so the pair reports a single representative contact.
    fn deepest_hit(&self, store: &EntityStore, a: EntityId, b: EntityId) -> Option<PairHit> {
        let mut best: Option<PairHit> = None;

        for a_collider in store.collider_children(a) {
            let a_shape = store
                .entity(a_collider)
                .collider_shape()
                .copied()
                .expect("collider child lost its collider");
            let a_pos = store.global_position(a_collider);

            for b_collider in store.collider_children(b) {
                let b_shape = store
                    .entity(b_collider)
                    .collider_shape()
                    .copied()
                    .expect("collider child lost its collider");
                let b_pos = store.global_position(b_collider);

                let Some(contact) = shapes_collide(a_pos, a_shape.shape, b_pos, b_shape.shape)
                else {
                    continue;
                };

                let deeper = best
                    .map(|hit| contact.penetration > hit.contact.penetration)
                    .unwrap_or(true);
                if deeper {
                    best = Some(PairHit {
                        a_collider,
                        b_collider,
                        contact,
                        sensor: a_shape.is_sensor() || b_shape.is_sensor(),
                    });
                }
            }
        }
        best
    }

    fn deliver(
        &self,
        store: &mut EntityStore,
        tick: Tick,
        inputs: &TickInputs,
        key: PairKey,
        hit: &PairHit,
        phase: Phase,
    ) {
        let (a, b) = key;
        // a's view: normal toward a; b's view: roles and normal swapped
        let views = [
            (a, b, hit.a_collider, hit.b_collider, hit.contact),
            (b, a, hit.b_collider, hit.a_collider, hit.contact.flipped()),
        ];

        for (own, other, own_collider, other_collider, contact) in views {
            let event = CollisionEvent {
                own_collider,
                other_entity: other,
                other_collider,
                contact,
                sensor: hit.sensor,
            };
            store.with_behaviour(own, |behaviour, store| {
                let mut ctx = BehaviourCtx {
                    store,
                    entity: own,
                    tick,
                    inputs,
                };
                match phase {
                    Phase::Started => behaviour.on_collision_started(&mut ctx, &event),
                    Phase::Ongoing => behaviour.on_collision(&mut ctx, &event),
                    Phase::Ended => behaviour.on_collision_ended(&mut ctx, &event),
                }
            });
        }
    }
}

impl Default for CollisionEngine {
    fn default() -> Self {
        Self::new()
    }
}
