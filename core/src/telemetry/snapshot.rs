//! telemetry/snapshot.rs
//! Immutable view of a stream's counters with derived ratios.
use serde::Serialize;

use crate::telemetry::counters::StreamCounters;

/// Which side of the engine the counters were collected on.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StreamKind {
    Compress,
    Decompress,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StreamSnapshot {
    pub kind: StreamKind,
    pub bytes_in: u64,
    pub bytes_out: u64,
    pub engine_steps: u64,
    pub buffer_grows: u64,
    /// Compressed size over decompressed size; 0.0 while nothing was decoded or written.
    pub compression_ratio: f64,
}

impl StreamSnapshot {
    pub fn from(kind: StreamKind, counters: &StreamCounters) -> Self {
        let (compressed, plain) = match kind {
            StreamKind::Compress => (counters.bytes_out, counters.bytes_in),
            StreamKind::Decompress => (counters.bytes_in, counters.bytes_out),
        };
        let compression_ratio = if plain > 0 { compressed as f64 / plain as f64 } else { 0.0 };

        Self {
            kind,
            bytes_in: counters.bytes_in,
            bytes_out: counters.bytes_out,
            engine_steps: counters.engine_steps,
            buffer_grows: counters.buffer_grows,
            compression_ratio,
        }
    }
}
