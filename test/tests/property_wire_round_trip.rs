//! PROPERTY-BASED TESTS: wire format invariants
//!
//! Key invariants:
//! 1. Any input record round-trips through the byte codec exactly
//! 2. Decoding never panics, whatever bytes arrive

use proptest::prelude::*;

use lockstep_shared::{
    ByteReader, ByteWriter, GameSnapshot, InputBatch, InputFlags, InputFrame, PlayerId, WireSerde,
};

fn flags_strategy() -> impl Strategy<Value = InputFlags> {
    (any::<bool>(), any::<bool>(), any::<bool>(), any::<bool>()).prop_map(
        |(up, down, left, right)| InputFlags {
            up,
            down,
            left,
            right,
        },
    )
}

fn frame_strategy() -> impl Strategy<Value = InputFrame> {
    (any::<u64>(), any::<u64>(), flags_strategy()).prop_map(|(player, tick, flags)| InputFrame {
        player_id: PlayerId::new(player),
        tick,
        flags,
    })
}

proptest! {
    /// Serializing and deserializing an input record reproduces the
    /// original values exactly, for arbitrary (player, tick, flags).
    #[test]
    fn prop_input_batch_round_trips(
        player in any::<u64>(),
        frames in prop::collection::vec(frame_strategy(), 0..20),
    ) {
        let batch = InputBatch {
            player_id: PlayerId::new(player),
            frames,
        };

        let mut writer = ByteWriter::new();
        batch.ser(&mut writer);
        let bytes = writer.to_bytes();

        let mut reader = ByteReader::new(&bytes);
        let decoded = InputBatch::de(&mut reader).unwrap();

        prop_assert_eq!(decoded, batch);
        prop_assert_eq!(reader.remaining(), 0);
    }

    /// Every truncation of a valid batch is rejected, never mis-decoded
    /// into a full-length read.
    #[test]
    fn prop_truncated_batch_never_decodes(
        frames in prop::collection::vec(frame_strategy(), 1..8),
        cut in any::<prop::sample::Index>(),
    ) {
        let batch = InputBatch {
            player_id: PlayerId::new(1),
            frames,
        };
        let mut writer = ByteWriter::new();
        batch.ser(&mut writer);
        let bytes = writer.to_bytes();

        let len = cut.index(bytes.len()); // strictly shorter than the whole
        let mut reader = ByteReader::new(&bytes[..len]);
        prop_assert!(InputBatch::de(&mut reader).is_err());
    }

    /// Arbitrary garbage must produce a clean error, not a panic or an
    /// attempt to allocate a huge declared count.
    #[test]
    fn prop_garbage_never_panics(payload in prop::collection::vec(any::<u8>(), 0..256)) {
        let mut reader = ByteReader::new(&payload);
        let _ = InputBatch::de(&mut reader);

        let mut reader = ByteReader::new(&payload);
        let _ = GameSnapshot::de(&mut reader);
    }
}
