use thiserror::Error;

/// Errors that can occur while decoding wire records.
///
/// Wire data arrives from the network and must be treated as untrusted:
/// every decode failure is reported as an error so the caller can drop the
/// message and continue, never as a panic.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WireError {
    /// The buffer ended before a declared field's offset + size.
    #[error("Buffer too short: needed {needed} more bytes, {remaining} remaining")]
    UnexpectedEnd { needed: usize, remaining: usize },

    /// A boolean field held a byte other than 0 or 1.
    #[error("Invalid boolean byte {value} (expected 0 or 1)")]
    InvalidBool { value: u8 },

    /// The leading message-kind byte did not match any known message.
    #[error("Unknown message kind {kind}. This may indicate a malformed or malicious packet")]
    UnknownMessageKind { kind: u8 },

    /// A declared element count exceeds what the remaining buffer could hold.
    #[error("Declared count {count} exceeds remaining buffer of {remaining} bytes")]
    CountTooLarge { count: u32, remaining: usize },
}
