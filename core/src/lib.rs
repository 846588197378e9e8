//! zstd-stream-core
//!
//! Incremental `Write`/`Read` adapters over a block/session compression
//! engine (zstd by default).
//!
//! - `compression::Writer` stages caller writes, drives compress steps and
//!   forwards produced bytes to a borrowed sink.
//! - `compression::Reader` pulls compressed bytes on demand, carries undecoded
//!   input across steps and buffers surplus decoded output across reads.
//!
//! Both streams own their engine session and must be closed (or dropped) to
//! release it.

#![forbid(unsafe_code)]

// Shared and top level
pub mod config;
pub mod constants;
pub mod io;
pub mod types;

pub mod compression;
pub mod telemetry;

// -----------------------------------------------------------------------------
// Prelude (Rust users)
// -----------------------------------------------------------------------------
pub mod prelude {
    pub use crate::compression::{compress, decompress, Reader, Writer};
    pub use crate::config::StreamConfig;
    pub use crate::constants::{BEST_COMPRESSION, BEST_SPEED, DEFAULT_COMPRESSION};
    pub use crate::types::{Result, StreamError};
}
