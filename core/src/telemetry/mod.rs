//! telemetry/mod.rs
//! Per-stream counters and immutable snapshots.
//!
//! Notes:
//! - Counters are plain fields owned by one stream; no synchronization.
//! - Snapshots serialize with serde for logs and reports.

pub mod counters;
pub mod snapshot;

pub use counters::*;
pub use snapshot::*;
