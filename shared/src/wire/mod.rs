pub mod byte_reader;
pub mod byte_writer;
pub mod error;
pub mod input_message;
pub mod message_kind;
pub mod snapshot_message;

use byte_reader::ByteReader;
use byte_writer::ByteWriter;
use error::WireError;

/// Fixed-layout binary serialization for wire records.
///
/// Layouts are little-endian and position-dependent; there is no schema or
/// tagging beyond the leading `MessageKind` byte. Deserialization of a
/// buffer shorter than any declared field must return an error, never panic.
pub trait WireSerde: Sized {
    fn ser(&self, writer: &mut ByteWriter);
    fn de(reader: &mut ByteReader) -> Result<Self, WireError>;
}
