//! # Lockstep Net
//! Keeps two deterministic simulations in agreement: a lock-step input
//! exchange that gates each tick on both players' inputs, bounded rings for
//! loss-tolerant retransmission, and a snapshot reconciliation manager for
//! host-authoritative rollback.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

mod exchange;
mod input_ring;
mod reconcile;

pub use exchange::{InputExchange, WaitOutcome};
pub use input_ring::{ReceivedBatchRing, RingConfig, SentInputRing};
pub use reconcile::{CompareOutcome, ReconcileManager};
