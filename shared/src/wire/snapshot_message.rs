use glam::Vec2;

use crate::types::{EntityId, Tick};

use super::{byte_reader::ByteReader, byte_writer::ByteWriter, error::WireError, WireSerde};

/// The authoritative subset of one entity's state inside a snapshot.
///
/// Compared field-by-field with exact bit equality: both peers run the same
/// deterministic simulation, so any difference at all is divergence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapshotEntry {
    pub entity_id: EntityId,
    pub position: Vec2,
    pub velocity: Vec2,
    pub active: bool,
}

impl SnapshotEntry {
    /// Serialized size in bytes; used for count sanity checks on receipt.
    pub const WIRE_SIZE: usize = 8 + 16 + 1;

    /// Exact comparison, treating floats by bit pattern so that NaN or
    /// negative-zero drift is still caught.
    pub fn bits_equal(&self, other: &SnapshotEntry) -> bool {
        self.entity_id == other.entity_id
            && self.position.x.to_bits() == other.position.x.to_bits()
            && self.position.y.to_bits() == other.position.y.to_bits()
            && self.velocity.x.to_bits() == other.velocity.x.to_bits()
            && self.velocity.y.to_bits() == other.velocity.y.to_bits()
            && self.active == other.active
    }
}

impl WireSerde for SnapshotEntry {
    fn ser(&self, writer: &mut ByteWriter) {
        writer.write_u64(self.entity_id.to_u64());
        writer.write_f32(self.position.x);
        writer.write_f32(self.position.y);
        writer.write_f32(self.velocity.x);
        writer.write_f32(self.velocity.y);
        writer.write_bool(self.active);
    }

    fn de(reader: &mut ByteReader) -> Result<Self, WireError> {
        Ok(Self {
            entity_id: EntityId::from_u64(reader.read_u64()?),
            position: Vec2::new(reader.read_f32()?, reader.read_f32()?),
            velocity: Vec2::new(reader.read_f32()?, reader.read_f32()?),
            active: reader.read_bool()?,
        })
    }
}

/// A per-tick capture of the authoritative entity state needed to verify
/// agreement between peers.
///
/// Created locally every tick while pending remote confirmation; discarded
/// once confirmed equal to the remote snapshot for the same tick, or used
/// as the rollback point if found to differ.
///
/// Wire layout: `[tick: 8][count: 4][count × SnapshotEntry]`.
#[derive(Debug, Clone, PartialEq)]
pub struct GameSnapshot {
    pub tick: Tick,
    pub entries: Vec<SnapshotEntry>,
}

impl GameSnapshot {
    /// Returns the tick of the first field-by-field mismatch against
    /// `other`, or `None` when the snapshots agree exactly.
    ///
    /// A difference in entry count or entry order is also divergence: the
    /// flat index is part of deterministic state.
    pub fn diverges_from(&self, other: &GameSnapshot) -> bool {
        if self.tick != other.tick || self.entries.len() != other.entries.len() {
            return true;
        }
        self.entries
            .iter()
            .zip(other.entries.iter())
            .any(|(a, b)| !a.bits_equal(b))
    }
}

impl WireSerde for GameSnapshot {
    fn ser(&self, writer: &mut ByteWriter) {
        writer.write_u64(self.tick);
        writer.write_u32(self.entries.len() as u32);
        for entry in &self.entries {
            entry.ser(writer);
        }
    }

    fn de(reader: &mut ByteReader) -> Result<Self, WireError> {
        let tick = reader.read_u64()?;
        let count = reader.read_u32()?;
        reader.check_count(count, SnapshotEntry::WIRE_SIZE)?;

        let mut entries = Vec::with_capacity(count as usize);
        for _ in 0..count {
            entries.push(SnapshotEntry::de(reader)?);
        }
        Ok(Self { tick, entries })
    }
}
