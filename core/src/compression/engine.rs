//! compression/engine.rs
//! Capability contract for the block/session compression engine.
//!
//! The streams never see the algorithm, only these calls:
//! create session, step over fixed-capacity buffers, release session, and a
//! handful of sizing queries. Every status comes back as a `RawStatus` and is
//! decoded by `compression::status::translate`.
use std::ops::RangeInclusive;

use crate::types::RawStatus;

/// End-of-input signal for a compress step.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FlushMode {
    /// More input may follow.
    Continue,
    /// No more input; drain and close the frame.
    Finish,
}

/// Outcome of one engine step.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct StepReport {
    pub code: RawStatus,
    /// Bytes taken from the front of the input view.
    pub consumed: usize,
    /// Bytes written to the front of the output buffer.
    pub produced: usize,
}

pub trait CompressionSession: Send {
    fn compress_step(&mut self, output: &mut [u8], input: &[u8], mode: FlushMode) -> StepReport;

    /// Free the native state. Consumes the session, so it can only happen once.
    fn release(self: Box<Self>) -> RawStatus;
}

pub trait DecompressionSession: Send {
    fn decompress_step(&mut self, output: &mut [u8], input: &[u8]) -> StepReport;

    fn release(self: Box<Self>) -> RawStatus;
}

pub trait Engine: Send + Sync {
    /// Short name used in errors and logs.
    fn name(&self) -> &'static str;

    /// `level` is already validated against `level_range` (or is the default sentinel).
    fn create_compression_session(
        &self,
        level: i32,
        dict: Option<&[u8]>,
    ) -> Result<Box<dyn CompressionSession>, SessionInitError>;

    fn create_decompression_session(
        &self,
        dict: Option<&[u8]>,
    ) -> Result<Box<dyn DecompressionSession>, SessionInitError>;

    fn recommended_input_chunk_size(&self) -> RawStatus;
    fn recommended_output_chunk_size(&self) -> RawStatus;
    fn worst_case_compressed_size(&self, input_len: usize) -> usize;

    /// Accepted explicit levels. The default sentinel is always accepted.
    fn level_range(&self) -> RangeInclusive<i32>;

    /// Human-readable reason for a negative status.
    fn error_name(&self, code: RawStatus) -> &'static str;
}

impl std::fmt::Debug for dyn Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Engine({})", self.name())
    }
}

/// Which part of session setup failed, with the raw status the engine returned.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SessionInitError {
    Create(RawStatus),
    Level(RawStatus),
    Dictionary(RawStatus),
}
