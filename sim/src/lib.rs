//! # Lockstep Sim
//! The deterministic simulation core: an entity/scene store, a shape
//! overlap engine with lifecycle events, a fixed-step scheduler decoupled
//! from render rate, and a double-buffered render synchronization layer.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

mod collision;
mod entity;
mod render;
mod scheduler;
mod simulation;

pub use collision::{
    engine::{CollisionEngine, CollisionEvent},
    shapes::{circle_circle, circle_rect, rect_rect, resolve_velocity, shapes_collide},
    shapes::{Collider, ColliderKind, Contact, Shape},
};
pub use entity::{
    entity::{Behaviour, BehaviourCtx, Entity},
    store::EntityStore,
};
pub use render::render_buffers::{DrawItem, RenderBuffers};
pub use scheduler::{
    clock::{Clock, ManualClock, MonotonicClock},
    scheduler::{
        Scheduler, SchedulerConfig, SchedulerError, SchedulerHandle, SchedulerState, TickFlow,
        TickHost,
    },
};
pub use simulation::Simulation;
