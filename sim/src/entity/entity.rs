use glam::Vec2;

use lockstep_shared::{EntityId, EntityKind, Tick, TickInputs};

use crate::collision::engine::CollisionEvent;
use crate::collision::shapes::Collider;

use super::store::EntityStore;

/// Context handed to every behaviour hook.
///
/// The hook's own entity has had its behaviour temporarily taken out of the
/// store while the hook runs, so `store` can be freely mutated (including
/// spawning and despawning) without aliasing the running behaviour.
pub struct BehaviourCtx<'a> {
    pub store: &'a mut EntityStore,
    pub entity: EntityId,
    pub tick: Tick,
    pub inputs: &'a TickInputs,
}

impl<'a> BehaviourCtx<'a> {
    /// The hook's own entity.
    ///
    /// # Panics
    /// Panics if the entity was removed out from under a running hook,
    /// which is a broken invariant.
    pub fn me(&self) -> &Entity {
        self.store.entity(self.entity)
    }

    /// Mutable access to the hook's own entity.
    pub fn me_mut(&mut self) -> &mut Entity {
        self.store.entity_mut(self.entity)
    }

    /// Queues the entity for removal at the end of the current frame's
    /// deferred-event flush, so removal never invalidates an in-progress
    /// traversal.
    pub fn despawn_later(&mut self, id: EntityId) {
        self.store.queue_despawn(id);
    }
}

/// Game-specific logic attached to an entity.
///
/// Hooks are invoked via tree traversal in registration order and skipped
/// entirely for a deactivated subtree. All hooks default to no-ops so game
/// code only overrides what it needs.
pub trait Behaviour: Send {
    /// Called exactly once, on the first tick after the entity was added.
    fn init(&mut self, _ctx: &mut BehaviourCtx) {}

    /// Called once per rendered frame (variable rate).
    fn update(&mut self, _ctx: &mut BehaviourCtx) {}

    /// Called once per simulation tick (fixed rate).
    fn fixed_update(&mut self, _ctx: &mut BehaviourCtx) {}

    /// The entity pair began overlapping this tick.
    fn on_collision_started(&mut self, _ctx: &mut BehaviourCtx, _event: &CollisionEvent) {}

    /// Called every tick while the entity pair overlaps, including the
    /// tick the overlap started.
    fn on_collision(&mut self, _ctx: &mut BehaviourCtx, _event: &CollisionEvent) {}

    /// The entity pair stopped overlapping this tick.
    fn on_collision_ended(&mut self, _ctx: &mut BehaviourCtx, _event: &CollisionEvent) {}
}

/// A node in the entity ownership tree.
///
/// Parent/child relationships are id pairs resolved through the owning
/// `EntityStore`, never language-level references, so removal can never
/// leave a dangling pointer behind.
pub struct Entity {
    id: EntityId,
    kind: EntityKind,
    pub position: Vec2,
    pub previous_position: Vec2,
    pub velocity: Vec2,
    pub active: bool,
    pub draw_order: i32,
    renderable: bool,
    collider: Option<Collider>,
    parent: Option<EntityId>,
    children: Vec<EntityId>,
    pub(crate) behaviour: Option<Box<dyn Behaviour>>,
}

impl Entity {
    /// A plain entity with no behaviour hooks.
    pub fn new(kind: EntityKind) -> Self {
        Self {
            id: EntityId::UNSET,
            kind,
            position: Vec2::ZERO,
            previous_position: Vec2::ZERO,
            velocity: Vec2::ZERO,
            active: true,
            draw_order: 0,
            renderable: true,
            collider: None,
            parent: None,
            children: Vec::new(),
            behaviour: None,
        }
    }

    pub fn with_behaviour(kind: EntityKind, behaviour: Box<dyn Behaviour>) -> Self {
        let mut entity = Self::new(kind);
        entity.behaviour = Some(behaviour);
        entity
    }

    /// A collider node: carries a shape, is never rendered itself.
    pub fn collider(kind: EntityKind, collider: Collider) -> Self {
        let mut entity = Self::new(kind);
        entity.collider = Some(collider);
        entity.renderable = false;
        entity
    }

    pub fn at(mut self, position: Vec2) -> Self {
        self.position = position;
        self.previous_position = position;
        self
    }

    pub fn with_draw_order(mut self, draw_order: i32) -> Self {
        self.draw_order = draw_order;
        self
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    pub fn parent(&self) -> Option<EntityId> {
        self.parent
    }

    pub fn children(&self) -> &[EntityId] {
        &self.children
    }

    pub fn collider_shape(&self) -> Option<&Collider> {
        self.collider.as_ref()
    }

    pub fn is_renderable(&self) -> bool {
        self.renderable
    }

    pub(crate) fn assign_id(&mut self, id: EntityId) {
        debug_assert!(self.id.is_unset(), "entity id is immutable once assigned");
        self.id = id;
    }

    pub(crate) fn set_parent(&mut self, parent: Option<EntityId>) {
        self.parent = parent;
    }

    pub(crate) fn push_child(&mut self, child: EntityId) {
        self.children.push(child);
    }

    pub(crate) fn unlink_child(&mut self, child: EntityId) {
        self.children.retain(|c| *c != child);
    }
}
