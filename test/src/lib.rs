//! # Lockstep Test
//! Shared helpers for the cross-crate integration tests: an in-memory
//! loopback transport pair and a scripted input source.

pub mod helpers;
pub mod loopback;

pub use helpers::StopAfterSource;
pub use loopback::{loopback_pair, LoopbackTransport};
