use crate::types::{PlayerId, Tick};

use super::{byte_reader::ByteReader, byte_writer::ByteWriter, error::WireError, WireSerde};

/// One player's input value for one tick: four directional flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InputFlags {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl InputFlags {
    pub fn none() -> Self {
        Self::default()
    }
}

impl WireSerde for InputFlags {
    fn ser(&self, writer: &mut ByteWriter) {
        writer.write_bool(self.up);
        writer.write_bool(self.down);
        writer.write_bool(self.left);
        writer.write_bool(self.right);
    }

    fn de(reader: &mut ByteReader) -> Result<Self, WireError> {
        Ok(Self {
            up: reader.read_bool()?,
            down: reader.read_bool()?,
            left: reader.read_bool()?,
            right: reader.read_bool()?,
        })
    }
}

/// A single `(player, tick, input)` record.
///
/// Wire layout: `[player_id: 8][tick: 8][4 × bool]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputFrame {
    pub player_id: PlayerId,
    pub tick: Tick,
    pub flags: InputFlags,
}

impl InputFrame {
    /// Serialized size in bytes; used for count sanity checks on receipt.
    pub const WIRE_SIZE: usize = 8 + 8 + 4;
}

impl WireSerde for InputFrame {
    fn ser(&self, writer: &mut ByteWriter) {
        writer.write_u64(self.player_id.to_u64());
        writer.write_u64(self.tick);
        self.flags.ser(writer);
    }

    fn de(reader: &mut ByteReader) -> Result<Self, WireError> {
        Ok(Self {
            player_id: PlayerId::new(reader.read_u64()?),
            tick: reader.read_u64()?,
            flags: InputFlags::de(reader)?,
        })
    }
}

/// A batch of recently sent input frames from one sender.
///
/// Senders retransmit a sliding window of frames in every batch, so a lost
/// datagram only delays the receiver until the next batch arrives.
///
/// Wire layout: `[player_id: 8][count: 4][count × InputFrame]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputBatch {
    pub player_id: PlayerId,
    pub frames: Vec<InputFrame>,
}

impl InputBatch {
    /// Finds the input flags for the given player and tick, if this batch
    /// carries them.
    pub fn find(&self, player_id: PlayerId, tick: Tick) -> Option<InputFlags> {
        self.frames
            .iter()
            .find(|frame| frame.player_id == player_id && frame.tick == tick)
            .map(|frame| frame.flags)
    }
}

impl WireSerde for InputBatch {
    fn ser(&self, writer: &mut ByteWriter) {
        writer.write_u64(self.player_id.to_u64());
        writer.write_u32(self.frames.len() as u32);
        for frame in &self.frames {
            frame.ser(writer);
        }
    }

    fn de(reader: &mut ByteReader) -> Result<Self, WireError> {
        let player_id = PlayerId::new(reader.read_u64()?);
        let count = reader.read_u32()?;
        reader.check_count(count, InputFrame::WIRE_SIZE)?;

        let mut frames = Vec::with_capacity(count as usize);
        for _ in 0..count {
            frames.push(InputFrame::de(reader)?);
        }
        Ok(Self { player_id, frames })
    }
}
