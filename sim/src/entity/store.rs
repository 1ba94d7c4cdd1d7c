use std::collections::{HashMap, HashSet};

use glam::Vec2;

use lockstep_shared::{EntityId, EntityKind, Tick, TickInputs};

use super::entity::{Behaviour, BehaviourCtx, Entity};

/// Owns the tree of entities and assigns their identifiers.
///
/// Alongside the tree, the store maintains a flat index of every entity in
/// registration order, so lookups and pair walks never need a tree
/// traversal. The two structures are kept in sync inside each operation:
/// every entity reachable from a root is in the flat index, and removal
/// from the tree removes from the flat index in the same call.
///
/// Identifiers come from a counter owned by the store itself; they are
/// monotonic, process-wide within the store, and never reused.
pub struct EntityStore {
    entities: HashMap<EntityId, Entity>,
    flat_index: Vec<EntityId>,
    roots: Vec<EntityId>,
    pending_init: Vec<EntityId>,
    despawn_queue: Vec<EntityId>,
    next_id: u64,
}

impl EntityStore {
    pub fn new() -> Self {
        Self {
            entities: HashMap::new(),
            flat_index: Vec::new(),
            roots: Vec::new(),
            pending_init: Vec::new(),
            despawn_queue: Vec::new(),
            next_id: 1,
        }
    }

    fn generate_id(&mut self) -> EntityId {
        let id = EntityId::from_u64(self.next_id);
        self.next_id += 1;
        id
    }

    fn register(&mut self, mut entity: Entity) -> EntityId {
        if entity.id().is_unset() {
            let id = self.generate_id();
            entity.assign_id(id);
        }
        let id = entity.id();
        self.flat_index.push(id);
        self.pending_init.push(id);
        self.entities.insert(id, entity);
        id
    }

    /// Adds an entity as a root, assigning an identifier if unset, and
    /// enqueues it for deferred initialization so an entity spawned
    /// mid-tick never sees stale per-tick state.
    pub fn add_root(&mut self, entity: Entity) -> EntityId {
        let id = self.register(entity);
        self.roots.push(id);
        id
    }

    /// Adds an entity as a child of `parent`; same identifier and indexing
    /// contract as `add_root`.
    ///
    /// # Panics
    /// Panics if `parent` is not in the store: passing an invalid parent
    /// reference is a programming error, not a recoverable condition.
    pub fn add_child(&mut self, parent: EntityId, entity: Entity) -> EntityId {
        assert!(
            self.entities.contains_key(&parent),
            "add_child: parent entity {:?} is not in the store",
            parent
        );
        let id = self.register(entity);
        self.entity_mut(id).set_parent(Some(parent));
        self.entity_mut(parent).push_child(id);
        id
    }

    /// Removes the entity and its whole subtree from the tree and the flat
    /// index in one operation. No-op if the id is absent (idempotent).
    pub fn remove_by_id(&mut self, id: EntityId) {
        if !self.entities.contains_key(&id) {
            return;
        }

        // unlink from the owner first
        if let Some(parent) = self.entities[&id].parent() {
            if let Some(parent_entity) = self.entities.get_mut(&parent) {
                parent_entity.unlink_child(id);
            }
        } else {
            self.roots.retain(|root| *root != id);
        }

        let mut removed = HashSet::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(entity) = self.entities.remove(&current) {
                stack.extend_from_slice(entity.children());
                removed.insert(current);
            }
        }

        self.flat_index.retain(|entry| !removed.contains(entry));
        self.pending_init.retain(|entry| !removed.contains(entry));
    }

    pub fn find_by_id(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    pub fn find_by_id_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(&id)
    }

    /// Direct access for callers that know the entity exists.
    ///
    /// # Panics
    /// Panics if the id is not in the store.
    pub fn entity(&self, id: EntityId) -> &Entity {
        self.entities
            .get(&id)
            .unwrap_or_else(|| panic!("entity {:?} is not in the store", id))
    }

    /// # Panics
    /// Panics if the id is not in the store.
    pub fn entity_mut(&mut self, id: EntityId) -> &mut Entity {
        self.entities
            .get_mut(&id)
            .unwrap_or_else(|| panic!("entity {:?} is not in the store", id))
    }

    /// First entity of the given kind, in registration order.
    pub fn find_first_by_kind(&self, kind: EntityKind) -> Option<EntityId> {
        self.flat_index
            .iter()
            .copied()
            .find(|id| self.entities[id].kind() == kind)
    }

    /// All entities of the given kind, in registration order.
    pub fn find_all_by_kind(&self, kind: EntityKind) -> Vec<EntityId> {
        self.flat_index
            .iter()
            .copied()
            .filter(|id| self.entities[id].kind() == kind)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn flat_len(&self) -> usize {
        self.flat_index.len()
    }

    /// Every entity id in registration order.
    pub fn ids(&self) -> Vec<EntityId> {
        self.flat_index.clone()
    }

    pub fn roots(&self) -> &[EntityId] {
        &self.roots
    }

    /// Runs each newly added entity's `init` hook exactly once, then
    /// clears the queue. Invoked once per frame, before physics.
    pub fn drain_pending_inits(&mut self, tick: Tick) {
        let pending = std::mem::take(&mut self.pending_init);
        let inputs = TickInputs::new();
        for id in pending {
            self.with_behaviour(id, |behaviour, store| {
                let mut ctx = BehaviourCtx {
                    store,
                    entity: id,
                    tick,
                    inputs: &inputs,
                };
                behaviour.init(&mut ctx);
            });
        }
    }

    /// Overwrites every entity's previous-tick position with its current
    /// one. Runs exactly once per simulation tick, before physics
    /// integration of that tick.
    pub fn snap_previous_positions(&mut self) {
        for id in &self.flat_index {
            if let Some(entity) = self.entities.get_mut(id) {
                entity.previous_position = entity.position;
            }
        }
    }

    /// Entity ids visited by a hook traversal: roots in registration
    /// order, depth-first through child lists, skipping every deactivated
    /// subtree entirely.
    pub fn traversal_order(&self) -> Vec<EntityId> {
        let mut order = Vec::with_capacity(self.flat_index.len());
        for root in &self.roots {
            self.collect_active(*root, &mut order);
        }
        order
    }

    fn collect_active(&self, id: EntityId, order: &mut Vec<EntityId>) {
        let Some(entity) = self.entities.get(&id) else {
            return;
        };
        if !entity.active {
            return;
        }
        order.push(id);
        for child in entity.children() {
            self.collect_active(*child, order);
        }
    }

    /// Whether the entity and every ancestor up to its root are active.
    pub fn is_effectively_active(&self, id: EntityId) -> bool {
        let mut current = Some(id);
        while let Some(entity_id) = current {
            let Some(entity) = self.entities.get(&entity_id) else {
                return false;
            };
            if !entity.active {
                return false;
            }
            current = entity.parent();
        }
        true
    }

    /// Sum of local positions along the ancestor chain.
    pub fn global_position(&self, id: EntityId) -> Vec2 {
        self.accumulate(id, |entity| entity.position)
    }

    /// Same as `global_position`, over the previous-tick positions.
    pub fn global_previous_position(&self, id: EntityId) -> Vec2 {
        self.accumulate(id, |entity| entity.previous_position)
    }

    fn accumulate(&self, id: EntityId, select: impl Fn(&Entity) -> Vec2) -> Vec2 {
        let mut total = Vec2::ZERO;
        let mut current = Some(id);
        while let Some(entity_id) = current {
            let entity = self.entity(entity_id);
            total += select(entity);
            current = entity.parent();
        }
        total
    }

    /// Children of `id` that carry a collider, in child-list order.
    pub fn collider_children(&self, id: EntityId) -> Vec<EntityId> {
        let Some(entity) = self.entities.get(&id) else {
            return Vec::new();
        };
        entity
            .children()
            .iter()
            .copied()
            .filter(|child| {
                self.entities
                    .get(child)
                    .is_some_and(|c| c.collider_shape().is_some())
            })
            .collect()
    }

    /// Entities that participate in collision: those with at least one
    /// collider child, in flat-index (registration) order.
    pub fn physics_participants(&self) -> Vec<EntityId> {
        self.flat_index
            .iter()
            .copied()
            .filter(|id| !self.collider_children(*id).is_empty())
            .collect()
    }

    /// Queues an entity for removal at the next deferred flush.
    pub fn queue_despawn(&mut self, id: EntityId) {
        self.despawn_queue.push(id);
    }

    /// Applies queued despawns. Already-removed ids are skipped
    /// (`remove_by_id` is idempotent).
    pub fn flush_despawns(&mut self) {
        let queued = std::mem::take(&mut self.despawn_queue);
        for id in queued {
            self.remove_by_id(id);
        }
    }

    /// Temporarily takes the entity's behaviour out of its slot, runs `f`,
    /// and puts it back. Skips entities with no behaviour, and entities
    /// removed before the traversal reached them.
    pub(crate) fn with_behaviour(
        &mut self,
        id: EntityId,
        f: impl FnOnce(&mut Box<dyn Behaviour>, &mut EntityStore),
    ) {
        let Some(entity) = self.entities.get_mut(&id) else {
            return;
        };
        let Some(mut behaviour) = entity.behaviour.take() else {
            return;
        };

        f(&mut behaviour, self);

        // the hook may have despawned its own entity
        if let Some(entity) = self.entities.get_mut(&id) {
            entity.behaviour = Some(behaviour);
        }
    }
}

impl Default for EntityStore {
    fn default() -> Self {
        Self::new()
    }
}
