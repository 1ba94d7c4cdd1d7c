use super::{byte_reader::ByteReader, byte_writer::ByteWriter, error::WireError, WireSerde};

// An enum representing the different types of messages that can be
// sent/received
#[derive(Copy, Debug, Clone, Eq, PartialEq)]
pub enum MessageKind {
    // A message carrying a batch of per-tick player inputs
    GameData,
    // A message carrying an authoritative game-state snapshot
    Snapshot,
    // A control signal: the session is starting
    Start,
    // A control signal: the peer is leaving the session
    Leave,
}

impl WireSerde for MessageKind {
    fn ser(&self, writer: &mut ByteWriter) {
        let index: u8 = match self {
            MessageKind::GameData => 0,
            MessageKind::Snapshot => 1,
            MessageKind::Start => 2,
            MessageKind::Leave => 3,
        };
        writer.write_u8(index);
    }

    fn de(reader: &mut ByteReader) -> Result<Self, WireError> {
        match reader.read_u8()? {
            0 => Ok(MessageKind::GameData),
            1 => Ok(MessageKind::Snapshot),
            2 => Ok(MessageKind::Start),
            3 => Ok(MessageKind::Leave),
            // Malicious or malformed packets could send invalid indices;
            // return an error instead of panicking.
            kind => Err(WireError::UnknownMessageKind { kind }),
        }
    }
}
