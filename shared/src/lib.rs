//! # Lockstep Shared
//! Common functionality shared between the lockstep-sim & lockstep-net crates.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

mod input_source;
mod timer;
mod transport;
mod types;
mod wire;

pub use input_source::{InputOutcome, InputSource, LocalInputSource, TickInputs};
pub use timer::Timer;
pub use transport::{Reliability, Transport, TransportError, TransportEvent};
pub use types::{EntityId, EntityKind, HostRole, PlayerId, Tick};
pub use wire::{
    byte_reader::ByteReader,
    byte_writer::ByteWriter,
    error::WireError,
    input_message::{InputBatch, InputFlags, InputFrame},
    message_kind::MessageKind,
    snapshot_message::{GameSnapshot, SnapshotEntry},
    WireSerde,
};
