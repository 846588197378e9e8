//! types.rs
//! Unified stream error covering configuration, engine status, upstream and
//! downstream I/O, and the closed/errored lifecycle.
//!
//! - Every engine status code is decoded once (see `compression::status`) and
//!   carried as an `EngineError`; nothing downstream looks at raw codes again.
//! - `StreamError` is `Clone` so a sticky first error can be handed back on
//!   every later call. I/O errors are kept behind an `Arc` for that reason.
use std::io;
use std::sync::Arc;

use thiserror::Error;

/// Raw signed status returned by an engine call.
/// - `> 0` success, value is a resize hint
/// - `== 0` success, operation complete
/// - `< 0` failure, engine-specific encoding
pub type RawStatus = isize;

pub type Result<T> = std::result::Result<T, StreamError>;

/// A negative engine status, decoded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{reason} (code {code})")]
pub struct EngineError {
    pub code: RawStatus,
    pub reason: &'static str,
}

/// Construction-time configuration failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid compression level {level}, expected {min}..={max}")]
    InvalidLevel { level: i32, min: i32, max: i32 },

    #[error("failed to create {engine} session: {source}")]
    SessionInit { engine: &'static str, source: EngineError },

    #[error("failed to apply compression level {level}: {source}")]
    Level { level: i32, source: EngineError },

    #[error("failed to load dictionary ({len} bytes): {source}")]
    Dictionary { len: usize, source: EngineError },
}

#[derive(Debug, Clone, Error)]
pub enum StreamError {
    /// Bad level or dictionary at construction. Sticky.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Compress step returned a negative status.
    #[error("failed to compress: {0}")]
    Engine(EngineError),

    /// Decompress step returned a negative status.
    #[error("failed to decompress: {0}")]
    Decode(EngineError),

    /// Reading from the source failed (not a short read).
    #[error("failed to read from underlying reader: {0}")]
    Upstream(#[source] Arc<io::Error>),

    /// Writing to the sink failed.
    #[error("failed to write to underlying writer: {0}")]
    Downstream(#[source] Arc<io::Error>),

    /// Source ran dry in the middle of a frame.
    #[error("compressed stream ended unexpectedly")]
    Truncated,

    /// Engine consumed and produced nothing although input was offered.
    #[error("decoder made no progress on {pending} buffered input bytes")]
    Stalled { pending: usize },

    /// Any call after `close()`.
    #[error("stream is closed")]
    Closed,
}

impl StreamError {
    pub fn upstream(e: io::Error) -> Self {
        StreamError::Upstream(Arc::new(e))
    }

    pub fn downstream(e: io::Error) -> Self {
        StreamError::Downstream(Arc::new(e))
    }

    pub fn is_closed(&self) -> bool {
        matches!(self, StreamError::Closed)
    }
}

impl PartialEq for StreamError {
    fn eq(&self, other: &Self) -> bool {
        use StreamError::*;
        match (self, other) {
            (Config(a), Config(b)) => a == b,
            (Engine(a), Engine(b)) => a == b,
            (Decode(a), Decode(b)) => a == b,
            // Same underlying failure instance
            (Upstream(a), Upstream(b)) => Arc::ptr_eq(a, b),
            (Downstream(a), Downstream(b)) => Arc::ptr_eq(a, b),
            (Truncated, Truncated) => true,
            (Stalled { pending: a }, Stalled { pending: b }) => a == b,
            (Closed, Closed) => true,
            _ => false,
        }
    }
}

impl From<StreamError> for io::Error {
    fn from(e: StreamError) -> Self {
        let kind = match &e {
            StreamError::Config(_) => io::ErrorKind::InvalidInput,
            StreamError::Engine(_) => io::ErrorKind::Other,
            StreamError::Decode(_) | StreamError::Stalled { .. } => io::ErrorKind::InvalidData,
            StreamError::Upstream(inner) | StreamError::Downstream(inner) => inner.kind(),
            StreamError::Truncated => io::ErrorKind::UnexpectedEof,
            StreamError::Closed => io::ErrorKind::BrokenPipe,
        };
        io::Error::new(kind, e)
    }
}
