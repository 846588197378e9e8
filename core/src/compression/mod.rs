//! compression/mod.rs
//! Streaming compression and decompression over a session engine.
//!
//! Layout:
//! - `engine`: capability contract the streams drive
//! - `codecs`: concrete engines (zstd)
//! - `status`: raw status → `StepStatus` / `EngineError`
//! - `sizing`: worst-case bounds and recommended chunk sizes
//! - `pool`: reusable buffers shared across readers
//! - `writer` / `reader`: the streams
//! - `stream`: whole-stream helpers

pub mod codecs;
pub mod engine;
pub mod pool;
pub mod reader;
pub mod sizing;
pub mod status;
pub mod stream;
pub mod writer;

pub use engine::*;
pub use pool::{BufferPool, BufferRole, PooledBuffer};
pub use reader::Reader;
pub use sizing::SizeAdvisor;
pub use status::StepStatus;
pub use stream::*;
pub use writer::Writer;
