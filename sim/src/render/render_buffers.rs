use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use glam::Vec2;

use lockstep_shared::{EntityId, EntityKind};

use crate::entity::store::EntityStore;

/// One renderable entity, with its position already interpolated between
/// the last two simulation ticks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawItem {
    pub entity_id: EntityId,
    pub kind: EntityKind,
    pub position: Vec2,
    pub draw_order: i32,
}

/// Double-buffered hand-off from the simulation thread to a render thread.
///
/// The simulation writes the inactive buffer, then flips the active index
/// with release ordering; a reader acquires the index and locks the active
/// buffer. Writer and reader therefore never contend on the same buffer
/// except across a flip, where the mutex covers the remainder.
pub struct RenderBuffers {
    buffers: [Mutex<Vec<DrawItem>>; 2],
    active: AtomicUsize,
}

impl RenderBuffers {
    pub fn new() -> Self {
        Self {
            buffers: [Mutex::new(Vec::new()), Mutex::new(Vec::new())],
            active: AtomicUsize::new(0),
        }
    }

    /// Rebuilds the inactive buffer from the store and flips it active.
    ///
    /// Captures every renderable, effectively-active entity at its global
    /// position interpolated by `alpha` between the previous and current
    /// tick, sorted by draw order (stable, so ties keep registration
    /// order). Calling twice with the same store and alpha publishes the
    /// same items.
    pub fn sync(&self, store: &EntityStore, alpha: f32) {
        let inactive = 1 - self.active.load(Ordering::Relaxed);
        let mut items: Vec<DrawItem> = store
            .ids()
            .into_iter()
            .filter(|id| store.entity(*id).is_renderable() && store.is_effectively_active(*id))
            .map(|id| {
                let previous = store.global_previous_position(id);
                let current = store.global_position(id);
                let entity = store.entity(id);
                DrawItem {
                    entity_id: id,
                    kind: entity.kind(),
                    position: previous.lerp(current, alpha),
                    draw_order: entity.draw_order,
                }
            })
            .collect();
        items.sort_by_key(|item| item.draw_order);

        *self.buffers[inactive].lock().unwrap() = items;
        self.active.store(inactive, Ordering::Release);
    }

    /// Runs `f` against the most recently published frame.
    pub fn with_active<R>(&self, f: impl FnOnce(&[DrawItem]) -> R) -> R {
        let active = self.active.load(Ordering::Acquire);
        let buffer = self.buffers[active].lock().unwrap();
        f(&buffer)
    }
}

impl Default for RenderBuffers {
    fn default() -> Self {
        Self::new()
    }
}
