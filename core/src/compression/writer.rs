//! compression/writer.rs
//! Streaming compressor: arbitrary-sized writes in, engine frames out to a sink.
//!
//! Design notes:
//! - Caller bytes the engine has not consumed yet sit in `staging`, in write
//!   order. When `staging` is empty the caller slice is fed to the engine
//!   directly, without a copy.
//! - `output` is sized to `compress_bound(len)` before each step and never shrinks.
//! - A successful `write` means the bytes were accepted, not that they reached
//!   the sink. `close` drains the engine and completes the frame.
//! - The sink is borrowed; the writer never closes it.
use std::io::{self, Write};

use tracing::{debug, trace, warn};

use crate::compression::engine::{CompressionSession, FlushMode};
use crate::compression::status::{translate, translate_init, translate_release, StepStatus};
use crate::config::{normalize_dictionary, validate_level, StreamConfig};
use crate::constants::{DEFAULT_COMPRESSION, INITIAL_BOUND_INPUT};
use crate::telemetry::{StreamCounters, StreamKind, StreamSnapshot};
use crate::types::{Result, StreamError};

#[derive(Debug)]
enum State {
    Open,
    /// Sticky first error. Absorbing.
    Errored(StreamError),
    Closed,
}

/// `std::io::Write` adapter that zstd-compresses everything written to it.
///
/// # Example
///
/// ```
/// use zstd_stream_core::compression::{Reader, Writer};
/// use std::io::Read;
///
/// let mut compressed = Vec::new();
/// let mut w = Writer::new(&mut compressed);
/// w.write(b"hello hello hello").unwrap();
/// w.close().unwrap();
/// drop(w);
///
/// let mut r = Reader::new(compressed.as_slice());
/// let mut out = Vec::new();
/// r.read_to_end(&mut out).unwrap();
/// r.close().unwrap();
/// assert_eq!(out, b"hello hello hello");
/// ```
pub struct Writer<'d, W: Write> {
    level: i32,
    session: Option<Box<dyn CompressionSession>>,
    dict: Option<&'d [u8]>,
    staging: Vec<u8>,
    output: Vec<u8>,
    state: State,
    sink: W,
    config: StreamConfig,
    counters: StreamCounters,
}

impl<'d, W: Write> Writer<'d, W> {
    /// Writer at the engine's default level.
    pub fn new(sink: W) -> Self {
        Self::with_level_dict(sink, DEFAULT_COMPRESSION, None)
    }

    /// `level` is `DEFAULT_COMPRESSION` or any level the engine accepts.
    pub fn with_level(sink: W, level: i32) -> Self {
        Self::with_level_dict(sink, level, None)
    }

    /// Like `with_level` with a preset dictionary. An empty dictionary is ignored.
    /// The dictionary must stay unmodified until the writer is closed.
    pub fn with_level_dict(sink: W, level: i32, dict: Option<&'d [u8]>) -> Self {
        Self::with_config(sink, level, dict, StreamConfig::default())
    }

    /// Construction never fails; a bad level or dictionary is reported by
    /// every later call instead.
    pub fn with_config(sink: W, level: i32, dict: Option<&'d [u8]>, config: StreamConfig) -> Self {
        let dict = normalize_dictionary(dict);
        let engine = config.engine.as_ref();

        let opened = validate_level(engine, level).and_then(|_| {
            engine
                .create_compression_session(level, dict)
                .map_err(|e| translate_init(engine, e, level, dict.map_or(0, <[u8]>::len)))
        });
        let (session, state) = match opened {
            Ok(s) => {
                debug!(engine = engine.name(), level, dict = dict.is_some(), "compression stream opened");
                (Some(s), State::Open)
            }
            Err(e) => {
                warn!(engine = engine.name(), level, error = %e, "compression stream failed to open");
                (None, State::Errored(e.into()))
            }
        };
        let output = vec![0u8; config.sizes.compress_bound(INITIAL_BOUND_INPUT)];

        Self {
            level,
            session,
            dict,
            staging: Vec::new(),
            output,
            state,
            sink,
            config,
            counters: StreamCounters::default(),
        }
    }

    pub fn level(&self) -> i32 {
        self.level
    }

    pub fn dictionary(&self) -> Option<&'d [u8]> {
        self.dict
    }

    pub fn get_ref(&self) -> &W {
        &self.sink
    }

    pub fn get_mut(&mut self) -> &mut W {
        &mut self.sink
    }

    /// Bytes accepted but not yet consumed by the engine.
    pub fn staged(&self) -> usize {
        self.staging.len()
    }

    pub fn error(&self) -> Option<&StreamError> {
        match &self.state {
            State::Errored(e) => Some(e),
            _ => None,
        }
    }

    pub fn is_closed(&self) -> bool {
        matches!(self.state, State::Closed)
    }

    pub fn stats(&self) -> StreamSnapshot {
        StreamSnapshot::from(StreamKind::Compress, &self.counters)
    }

    fn check_open(&self) -> Result<()> {
        match &self.state {
            State::Open => Ok(()),
            State::Errored(e) => Err(e.clone()),
            State::Closed => Err(StreamError::Closed),
        }
    }

    fn fail(&mut self, e: StreamError) -> StreamError {
        self.state = State::Errored(e.clone());
        e
    }

    /// Compresses `bytes` and forwards whatever the engine produced.
    /// Returns `bytes.len()` on success.
    pub fn write(&mut self, bytes: &[u8]) -> Result<usize> {
        self.check_open()?;
        if bytes.is_empty() {
            return Ok(0);
        }
        match self.step_continue(bytes) {
            Ok(()) => Ok(bytes.len()),
            Err(e) => Err(self.fail(e)),
        }
    }

    fn step_continue(&mut self, bytes: &[u8]) -> Result<()> {
        let bound = self.config.sizes.compress_bound(bytes.len());
        if self.output.len() < bound {
            self.output.resize(bound, 0);
            self.counters.add_grow();
        }

        let fast_path = self.staging.is_empty();
        if !fast_path {
            self.staging.extend_from_slice(bytes);
        }

        let Some(session) = self.session.as_mut() else {
            return Err(StreamError::Closed);
        };
        let input: &[u8] = if fast_path { bytes } else { &self.staging };
        let step = session.compress_step(&mut self.output, input, FlushMode::Continue);
        self.counters.add_step();
        trace!(offered = input.len(), consumed = step.consumed, produced = step.produced, code = step.code, "compress step");

        translate(self.config.engine.as_ref(), step.code).map_err(StreamError::Engine)?;

        if fast_path {
            if step.consumed < bytes.len() {
                self.staging.extend_from_slice(&bytes[step.consumed..]);
            }
        } else {
            self.staging.drain(..step.consumed);
        }
        self.counters.add_in(bytes.len());

        self.forward(step.produced)
    }

    fn forward(&mut self, produced: usize) -> Result<()> {
        if produced == 0 {
            return Ok(());
        }
        self.sink.write_all(&self.output[..produced]).map_err(StreamError::downstream)?;
        self.counters.add_out(produced);
        Ok(())
    }

    /// Flushes staged input, completes the frame and releases the session.
    /// Not idempotent: a second call returns `StreamError::Closed`.
    pub fn close(&mut self) -> Result<()> {
        match &self.state {
            State::Open => {}
            State::Errored(e) => {
                let e = e.clone();
                // Never-created sessions are simply absent here
                let _ = self.release_session();
                return Err(e);
            }
            State::Closed => return Err(StreamError::Closed),
        }

        let finished = self.finish();
        let released = self.release_session();
        match finished.and(released) {
            Ok(()) => {
                self.state = State::Closed;
                debug!(bytes_in = self.counters.bytes_in, bytes_out = self.counters.bytes_out, "compression stream closed");
                Ok(())
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    fn finish(&mut self) -> Result<()> {
        loop {
            let Some(session) = self.session.as_mut() else {
                return Err(StreamError::Closed);
            };
            let step = session.compress_step(&mut self.output, &self.staging, FlushMode::Finish);
            self.counters.add_step();
            trace!(offered = self.staging.len(), consumed = step.consumed, produced = step.produced, code = step.code, "finish step");

            let status = translate(self.config.engine.as_ref(), step.code).map_err(StreamError::Engine)?;
            self.staging.drain(..step.consumed);
            self.forward(step.produced)?;

            match status {
                StepStatus::Complete => return Ok(()),
                StepStatus::Hint(size) if size > self.output.len() => {
                    self.output.resize(size, 0);
                    self.counters.add_grow();
                }
                StepStatus::Hint(_) => {}
            }
        }
    }

    fn release_session(&mut self) -> Result<()> {
        let Some(session) = self.session.take() else {
            return Ok(());
        };
        let code = session.release();
        debug!(code, "compression session released");
        translate_release(self.config.engine.as_ref(), code).map_err(StreamError::Engine)
    }
}

impl<W: Write> Write for Writer<'_, W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Writer::write(self, buf).map_err(io::Error::from)
    }

    /// Flushes the sink only; data still inside the engine stays there until `close`.
    fn flush(&mut self) -> io::Result<()> {
        self.check_open().map_err(io::Error::from)?;
        self.sink.flush()
    }
}

impl<W: Write> Drop for Writer<'_, W> {
    fn drop(&mut self) {
        if self.session.is_some() {
            if matches!(self.state, State::Open) {
                warn!(staged = self.staging.len(), "compression stream dropped without close, frame left incomplete");
            }
            let _ = self.release_session();
        }
    }
}
