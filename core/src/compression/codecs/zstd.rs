//! compression/codecs/zstd.rs
//!
//! Zstd engine over `zstd-safe` streaming contexts.
//!
//! Design notes:
//! - `CCtx::compress_stream2` drives both `Continue` (`ZSTD_e_continue`) and
//!   `Finish` (`ZSTD_e_end`) steps.
//! - `DCtx::decompress_stream` drives decode steps; its positive return value
//!   is the suggested size of the next input read.
//! - zstd reports failures as `(size_t)-err`; reinterpreted as `isize` they
//!   are negative, which is the raw status convention of `Engine`.
//! - Dictionaries are copied into the context by `load_dictionary`.
use std::ops::RangeInclusive;

use zstd_safe::{zstd_sys::ZSTD_EndDirective, CCtx, CParameter, DCtx, InBuffer, OutBuffer, SafeResult};

use crate::compression::engine::{
    CompressionSession, DecompressionSession, Engine, FlushMode, SessionInitError, StepReport,
};
use crate::constants::DEFAULT_COMPRESSION;
use crate::types::RawStatus;

/// Error code zstd uses for allocation failure (`ZSTD_error_memory_allocation`).
const MEMORY_ALLOCATION: usize = 64;

#[inline]
fn raw(result: SafeResult) -> RawStatus {
    match result {
        Ok(n) => n as RawStatus,
        Err(code) => code as RawStatus,
    }
}

#[inline]
fn check(result: SafeResult) -> Result<(), RawStatus> {
    result.map(|_| ()).map_err(|code| code as RawStatus)
}

/// Stateless handle; all state lives in the sessions it creates.
#[derive(Copy, Clone, Debug, Default)]
pub struct ZstdEngine;

impl ZstdEngine {
    pub fn new() -> Self {
        ZstdEngine
    }
}

pub struct ZstdCompressionSession {
    ctx: CCtx<'static>,
}

pub struct ZstdDecompressionSession {
    ctx: DCtx<'static>,
}

impl CompressionSession for ZstdCompressionSession {
    fn compress_step(&mut self, output: &mut [u8], input: &[u8], mode: FlushMode) -> StepReport {
        let directive = match mode {
            FlushMode::Continue => ZSTD_EndDirective::ZSTD_e_continue,
            FlushMode::Finish => ZSTD_EndDirective::ZSTD_e_end,
        };
        let mut in_buf = InBuffer::around(input);
        let mut out_buf = OutBuffer::around(output);
        let code = raw(self.ctx.compress_stream2(&mut out_buf, &mut in_buf, directive));
        StepReport { code, consumed: in_buf.pos, produced: out_buf.pos() }
    }

    fn release(self: Box<Self>) -> RawStatus {
        // ZSTD_freeCCtx runs in Drop and cannot fail on a context we created.
        drop(self);
        0
    }
}

impl DecompressionSession for ZstdDecompressionSession {
    fn decompress_step(&mut self, output: &mut [u8], input: &[u8]) -> StepReport {
        let mut in_buf = InBuffer::around(input);
        let mut out_buf = OutBuffer::around(output);
        let code = raw(self.ctx.decompress_stream(&mut out_buf, &mut in_buf));
        StepReport { code, consumed: in_buf.pos, produced: out_buf.pos() }
    }

    fn release(self: Box<Self>) -> RawStatus {
        drop(self);
        0
    }
}

impl Engine for ZstdEngine {
    fn name(&self) -> &'static str {
        "zstd"
    }

    fn create_compression_session(
        &self,
        level: i32,
        dict: Option<&[u8]>,
    ) -> Result<Box<dyn CompressionSession>, SessionInitError> {
        let mut ctx = CCtx::try_create()
            .ok_or(SessionInitError::Create(-(MEMORY_ALLOCATION as RawStatus)))?;

        if let Some(d) = dict {
            check(ctx.load_dictionary(d)).map_err(SessionInitError::Dictionary)?;
        }
        // Only set level once the dictionary is in place
        if level != DEFAULT_COMPRESSION {
            check(ctx.set_parameter(CParameter::CompressionLevel(level)))
                .map_err(SessionInitError::Level)?;
        }
        Ok(Box::new(ZstdCompressionSession { ctx }))
    }

    fn create_decompression_session(
        &self,
        dict: Option<&[u8]>,
    ) -> Result<Box<dyn DecompressionSession>, SessionInitError> {
        let mut ctx = DCtx::try_create()
            .ok_or(SessionInitError::Create(-(MEMORY_ALLOCATION as RawStatus)))?;

        if let Some(d) = dict {
            check(ctx.load_dictionary(d)).map_err(SessionInitError::Dictionary)?;
        }
        Ok(Box::new(ZstdDecompressionSession { ctx }))
    }

    fn recommended_input_chunk_size(&self) -> RawStatus {
        DCtx::in_size() as RawStatus
    }

    fn recommended_output_chunk_size(&self) -> RawStatus {
        DCtx::out_size() as RawStatus
    }

    fn worst_case_compressed_size(&self, input_len: usize) -> usize {
        zstd_safe::compress_bound(input_len)
    }

    fn level_range(&self) -> RangeInclusive<i32> {
        zstd_safe::min_c_level()..=zstd_safe::max_c_level()
    }

    fn error_name(&self, code: RawStatus) -> &'static str {
        zstd_safe::get_error_name(code as usize)
    }
}
