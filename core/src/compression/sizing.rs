//! compression/sizing.rs
//! Worst-case output capacity and recommended chunk sizes.
//!
//! Chunk sizes are queried from the engine on first use and cached for the
//! lifetime of the advisor. A non-positive answer is a broken engine build,
//! not a runtime condition, and aborts with a panic.
use std::sync::{Arc, OnceLock};

use crate::compression::engine::Engine;
use crate::types::RawStatus;

pub struct SizeAdvisor {
    engine: Arc<dyn Engine>,
    input_chunk: OnceLock<usize>,
    output_chunk: OnceLock<usize>,
}

impl SizeAdvisor {
    pub fn new(engine: Arc<dyn Engine>) -> Self {
        Self { engine, input_chunk: OnceLock::new(), output_chunk: OnceLock::new() }
    }

    /// Capacity that always holds the compressed form of `n` input bytes.
    #[inline]
    pub fn compress_bound(&self, n: usize) -> usize {
        self.engine.worst_case_compressed_size(n)
    }

    /// Recommended size of the decompressor's compressed-input buffer.
    pub fn recommended_input_chunk(&self) -> usize {
        *self.input_chunk.get_or_init(|| {
            positive_or_panic("recommended input chunk size", self.engine.recommended_input_chunk_size())
        })
    }

    /// Recommended size of the decompressor's decoded-output buffer.
    pub fn recommended_output_chunk(&self) -> usize {
        *self.output_chunk.get_or_init(|| {
            positive_or_panic("recommended output chunk size", self.engine.recommended_output_chunk_size())
        })
    }
}

impl std::fmt::Debug for SizeAdvisor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SizeAdvisor")
            .field("engine", &self.engine.name())
            .field("input_chunk", &self.input_chunk.get())
            .field("output_chunk", &self.output_chunk.get())
            .finish()
    }
}

fn positive_or_panic(what: &str, value: RawStatus) -> usize {
    if value <= 0 {
        panic!("engine returned invalid {what}: {value}");
    }
    value as usize
}
