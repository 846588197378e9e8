// Shared fixtures: a scripted identity engine and misbehaving sources/sinks.
#![allow(dead_code)]

use std::io::{self, Read, Write};
use std::ops::RangeInclusive;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use rand::{rngs::StdRng, RngCore, SeedableRng};
use zstd_stream_core::compression::{
    CompressionSession, DecompressionSession, Engine, FlushMode, SessionInitError, StepReport,
};

pub const SCRIPTED_FAILURE: isize = -1;
pub const UNKNOWN_FAILURE: isize = -7;

/// Call counters shared by the engine and every session it creates.
#[derive(Default, Debug)]
pub struct Calls {
    pub creates: AtomicUsize,
    pub steps: AtomicUsize,
    pub releases: AtomicUsize,
}

impl Calls {
    pub fn creates(&self) -> usize {
        self.creates.load(Ordering::SeqCst)
    }
    pub fn steps(&self) -> usize {
        self.steps.load(Ordering::SeqCst)
    }
    pub fn releases(&self) -> usize {
        self.releases.load(Ordering::SeqCst)
    }
}

/// Identity "codec": compressed bytes are the plain bytes, plus an optional
/// trailer emitted on finish. Consumption per step is capped so staging and
/// carryover paths get exercised deterministically.
#[derive(Debug, Clone)]
pub struct FakeEngine {
    pub calls: Arc<Calls>,
    pub max_consume: usize,
    pub trailer: Vec<u8>,
    pub fail_create: bool,
    pub fail_dict: bool,
    /// Step index (0-based, per session) that returns `SCRIPTED_FAILURE`.
    pub fail_step: Option<usize>,
    /// Status returned by decode steps that succeed.
    pub decode_hint: isize,
    pub input_chunk: isize,
    pub output_chunk: isize,
}

impl Default for FakeEngine {
    fn default() -> Self {
        Self {
            calls: Arc::new(Calls::default()),
            max_consume: usize::MAX,
            trailer: Vec::new(),
            fail_create: false,
            fail_dict: false,
            fail_step: None,
            decode_hint: 0,
            input_chunk: 64,
            output_chunk: 64,
        }
    }
}

struct FakeCompression {
    calls: Arc<Calls>,
    max_consume: usize,
    trailer: Vec<u8>,
    fail_step: Option<usize>,
    step: usize,
}

struct FakeDecompression {
    calls: Arc<Calls>,
    max_consume: usize,
    fail_step: Option<usize>,
    hint: isize,
    step: usize,
}

fn identity_step(output: &mut [u8], input: &[u8], max_consume: usize) -> usize {
    let n = input.len().min(output.len()).min(max_consume);
    output[..n].copy_from_slice(&input[..n]);
    n
}

impl CompressionSession for FakeCompression {
    fn compress_step(&mut self, output: &mut [u8], input: &[u8], mode: FlushMode) -> StepReport {
        self.calls.steps.fetch_add(1, Ordering::SeqCst);
        let step = self.step;
        self.step += 1;
        if self.fail_step == Some(step) {
            return StepReport { code: SCRIPTED_FAILURE, consumed: 0, produced: 0 };
        }

        let n = identity_step(output, input, self.max_consume);
        if mode == FlushMode::Continue {
            return StepReport { code: 0, consumed: n, produced: n };
        }
        if n < input.len() {
            return StepReport { code: (input.len() - n) as isize, consumed: n, produced: n };
        }
        // Input drained: emit the trailer if it fits, otherwise ask for room
        let room = output.len() - n;
        if room >= self.trailer.len() {
            output[n..n + self.trailer.len()].copy_from_slice(&self.trailer);
            let produced = n + self.trailer.len();
            self.trailer.clear();
            StepReport { code: 0, consumed: n, produced }
        } else {
            StepReport { code: self.trailer.len() as isize, consumed: n, produced: n }
        }
    }

    fn release(self: Box<Self>) -> isize {
        self.calls.releases.fetch_add(1, Ordering::SeqCst);
        0
    }
}

impl DecompressionSession for FakeDecompression {
    fn decompress_step(&mut self, output: &mut [u8], input: &[u8]) -> StepReport {
        self.calls.steps.fetch_add(1, Ordering::SeqCst);
        let step = self.step;
        self.step += 1;
        if self.fail_step == Some(step) {
            return StepReport { code: SCRIPTED_FAILURE, consumed: 0, produced: 0 };
        }
        let n = identity_step(output, input, self.max_consume);
        StepReport { code: self.hint, consumed: n, produced: n }
    }

    fn release(self: Box<Self>) -> isize {
        self.calls.releases.fetch_add(1, Ordering::SeqCst);
        0
    }
}

impl Engine for FakeEngine {
    fn name(&self) -> &'static str {
        "fake"
    }

    fn create_compression_session(
        &self,
        _level: i32,
        dict: Option<&[u8]>,
    ) -> Result<Box<dyn CompressionSession>, SessionInitError> {
        self.calls.creates.fetch_add(1, Ordering::SeqCst);
        if self.fail_create {
            return Err(SessionInitError::Create(SCRIPTED_FAILURE));
        }
        if self.fail_dict && dict.is_some() {
            return Err(SessionInitError::Dictionary(SCRIPTED_FAILURE));
        }
        Ok(Box::new(FakeCompression {
            calls: self.calls.clone(),
            max_consume: self.max_consume,
            trailer: self.trailer.clone(),
            fail_step: self.fail_step,
            step: 0,
        }))
    }

    fn create_decompression_session(
        &self,
        dict: Option<&[u8]>,
    ) -> Result<Box<dyn DecompressionSession>, SessionInitError> {
        self.calls.creates.fetch_add(1, Ordering::SeqCst);
        if self.fail_create {
            return Err(SessionInitError::Create(SCRIPTED_FAILURE));
        }
        if self.fail_dict && dict.is_some() {
            return Err(SessionInitError::Dictionary(SCRIPTED_FAILURE));
        }
        Ok(Box::new(FakeDecompression {
            calls: self.calls.clone(),
            max_consume: self.max_consume,
            fail_step: self.fail_step,
            hint: self.decode_hint,
            step: 0,
        }))
    }

    fn recommended_input_chunk_size(&self) -> isize {
        self.input_chunk
    }

    fn recommended_output_chunk_size(&self) -> isize {
        self.output_chunk
    }

    fn worst_case_compressed_size(&self, input_len: usize) -> usize {
        input_len + 16
    }

    fn level_range(&self) -> RangeInclusive<i32> {
        1..=9
    }

    fn error_name(&self, code: isize) -> &'static str {
        match code {
            SCRIPTED_FAILURE => "scripted failure",
            _ => "unknown fake error",
        }
    }
}

// ---------------------------------------------------------------------------
// Sources and sinks
// ---------------------------------------------------------------------------

/// Returns at most one byte per `read` call.
pub struct OneByteReader<R: Read>(pub R);

impl<R: Read> Read for OneByteReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        self.0.read(&mut buf[..1])
    }
}

/// Counts `read` calls on the wrapped reader.
pub struct CountingReader<R: Read> {
    pub inner: R,
    pub reads: usize,
}

impl<R: Read> CountingReader<R> {
    pub fn new(inner: R) -> Self {
        Self { inner, reads: 0 }
    }
}

impl<R: Read> Read for CountingReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.reads += 1;
        self.inner.read(buf)
    }
}

/// Serves `prefix`, then fails every call with `kind`.
pub struct FailingReader {
    pub prefix: Vec<u8>,
    pub pos: usize,
    pub kind: io::ErrorKind,
}

impl Read for FailingReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.pos < self.prefix.len() {
            let n = buf.len().min(self.prefix.len() - self.pos);
            buf[..n].copy_from_slice(&self.prefix[self.pos..self.pos + n]);
            self.pos += n;
            return Ok(n);
        }
        Err(io::Error::new(self.kind, "upstream went away"))
    }
}

/// Fails every write with `kind`.
pub struct FailingWriter(pub io::ErrorKind);

impl Write for FailingWriter {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(self.0, "sink went away"))
    }
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Accepts at most `max` bytes per `write` call.
pub struct TrickleWriter {
    pub inner: Vec<u8>,
    pub max: usize,
    pub writes: usize,
}

impl Write for TrickleWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.writes += 1;
        let n = buf.len().min(self.max);
        self.inner.extend_from_slice(&buf[..n]);
        Ok(n)
    }
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Refuses every write by reporting zero bytes written.
pub struct ZeroWriter;

impl Write for ZeroWriter {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Ok(0)
    }
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

pub fn random_bytes(len: usize, seed: u64) -> Vec<u8> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut buf = vec![0u8; len];
    rng.fill_bytes(&mut buf);
    buf
}

/// Repetitive text that compresses well.
pub fn text_bytes(len: usize) -> Vec<u8> {
    let line = b"the quick brown fox jumps over the lazy dog 0123456789\n";
    line.iter().copied().cycle().take(len).collect()
}
