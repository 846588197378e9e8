//! compression/reader.rs
//! Streaming decompressor: pulls compressed bytes from a source on demand and
//! serves decoded bytes through `read`.
//!
//! Buffers (both borrowed from the `BufferPool` until `close`):
//! - `input` holds compressed bytes. The first `carryover` bytes are input the
//!   engine did not consume last step; new upstream bytes land right after them.
//! - `output` holds one step's decoded bytes. `out_cursor..out_filled` is what
//!   the caller has not received yet, and it is always served before the
//!   engine runs again.
//!
//! Invariant: `out_cursor <= out_filled <= output.len()`.
use std::io::{self, Read};

use tracing::{debug, trace, warn};

use crate::compression::engine::DecompressionSession;
use crate::compression::pool::{BufferRole, PooledBuffer};
use crate::compression::status::{translate, translate_init, translate_release};
use crate::config::{normalize_dictionary, StreamConfig};
use crate::io::{try_read_full, ReadOutcome};
use crate::telemetry::{StreamCounters, StreamKind, StreamSnapshot};
use crate::types::{Result, StreamError};

#[derive(Debug)]
enum State {
    Open,
    Errored(StreamError),
    Closed,
}

pub struct Reader<'d, R: Read> {
    session: Option<Box<dyn DecompressionSession>>,
    dict: Option<&'d [u8]>,
    input: Option<PooledBuffer>,
    output: Option<PooledBuffer>,
    out_cursor: usize,
    out_filled: usize,
    carryover: usize,
    input_chunk: usize,
    /// Last step filled `output` completely; the engine may hold more decoded bytes.
    pending_output: bool,
    /// Last step left a frame unfinished.
    frame_open: bool,
    state: State,
    source: R,
    config: StreamConfig,
    counters: StreamCounters,
}

impl<'d, R: Read> Reader<'d, R> {
    /// The caller must `close` the reader (or drop it) to release the session.
    pub fn new(source: R) -> Self {
        Self::with_dict(source, None)
    }

    /// Like `new` with a preset dictionary. An empty dictionary is ignored.
    pub fn with_dict(source: R, dict: Option<&'d [u8]>) -> Self {
        Self::with_config(source, dict, StreamConfig::default())
    }

    pub fn with_config(source: R, dict: Option<&'d [u8]>, config: StreamConfig) -> Self {
        let dict = normalize_dictionary(dict);
        let engine = config.engine.as_ref();
        let input_chunk = config.sizes.recommended_input_chunk();

        let opened = engine
            .create_decompression_session(dict)
            .map_err(|e| translate_init(engine, e, 0, dict.map_or(0, <[u8]>::len)));

        let (session, input, output, state) = match opened {
            Ok(s) => {
                let input = config.pool.acquire(BufferRole::CompressedInput, input_chunk);
                let output =
                    config.pool.acquire(BufferRole::DecodedOutput, config.sizes.recommended_output_chunk());
                debug!(engine = engine.name(), dict = dict.is_some(), "decompression stream opened");
                (Some(s), Some(input), Some(output), State::Open)
            }
            Err(e) => {
                warn!(engine = engine.name(), error = %e, "decompression stream failed to open");
                (None, None, None, State::Errored(e.into()))
            }
        };

        Self {
            session,
            dict,
            input,
            output,
            out_cursor: 0,
            out_filled: 0,
            carryover: 0,
            input_chunk,
            pending_output: false,
            frame_open: false,
            state,
            source,
            config,
            counters: StreamCounters::default(),
        }
    }

    pub fn dictionary(&self) -> Option<&'d [u8]> {
        self.dict
    }

    pub fn get_ref(&self) -> &R {
        &self.source
    }

    pub fn get_mut(&mut self) -> &mut R {
        &mut self.source
    }

    /// Decoded bytes buffered for the next `read`.
    pub fn buffered(&self) -> usize {
        self.out_filled - self.out_cursor
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
        StreamSnapshot::from(StreamKind::Decompress, &self.counters)
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

    /// Fills `dest` from buffered output, decoding more as needed.
    ///
    /// Returns the number of bytes copied. `Ok(0)` for a non-empty `dest`
    /// means the source is exhausted and every frame is complete.
    pub fn read(&mut self, dest: &mut [u8]) -> Result<usize> {
        self.check_open()?;
        match self.fill(dest) {
            Ok(n) => {
                self.counters.add_out(n);
                Ok(n)
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    fn fill(&mut self, dest: &mut [u8]) -> Result<usize> {
        let (Some(input), Some(output), Some(session)) =
            (self.input.as_mut(), self.output.as_mut(), self.session.as_mut())
        else {
            return Err(StreamError::Closed);
        };
        let engine = self.config.engine.as_ref();

        // Enough already decoded: no I/O this call
        let buffered = self.out_filled - self.out_cursor;
        if buffered >= dest.len() {
            let end = self.out_cursor + dest.len();
            dest.copy_from_slice(&output[self.out_cursor..end]);
            self.out_cursor = end;
            return Ok(dest.len());
        }

        dest[..buffered].copy_from_slice(&output[self.out_cursor..self.out_filled]);
        let mut got = buffered;
        self.out_cursor = 0;
        self.out_filled = 0;

        while got < dest.len() {
            let carry = self.carryover;
            let (n, outcome) =
                try_read_full(&mut self.source, &mut input[carry..]).map_err(StreamError::upstream)?;
            self.counters.add_in(n);
            let avail = carry + n;

            if avail == 0 && !self.pending_output {
                if self.frame_open && got == 0 {
                    return Err(StreamError::Truncated);
                }
                break;
            }

            let step = session.decompress_step(&mut output[..], &input[..avail]);
            self.counters.add_step();
            trace!(offered = avail, consumed = step.consumed, produced = step.produced, code = step.code, "decompress step");

            let status = translate(engine, step.code).map_err(StreamError::Decode)?;
            if step.consumed == 0 && step.produced == 0 {
                if avail > 0 {
                    return Err(match outcome {
                        ReadOutcome::Short => StreamError::Truncated,
                        ReadOutcome::Full => StreamError::Stalled { pending: avail },
                    });
                }
                // Drained with empty input and nothing came out
                self.pending_output = false;
                continue;
            }

            // Unconsumed suffix moves to the front, ahead of the next upstream read
            self.carryover = avail - step.consumed;
            if self.carryover > 0 {
                input.copy_within(step.consumed..avail, 0);
            }
            self.pending_output = step.produced == output.len() && !status.is_complete();
            self.frame_open = !status.is_complete();

            let take = (dest.len() - got).min(step.produced);
            dest[got..got + take].copy_from_slice(&output[..take]);
            got += take;
            self.out_cursor = take;
            self.out_filled = step.produced;

            let next = status.hint().unwrap_or(self.input_chunk).max(self.carryover);
            if next > input.len() {
                self.counters.add_grow();
            }
            input.resize(next, 0);
        }
        Ok(got)
    }

    /// Returns pooled buffers and releases the session.
    /// A second call returns `StreamError::Closed`.
    pub fn close(&mut self) -> Result<()> {
        let sticky = match &self.state {
            State::Open => None,
            State::Errored(e) => Some(e.clone()),
            State::Closed => return Err(StreamError::Closed),
        };

        self.return_buffers();
        let released = self.release_session();
        if let Some(e) = sticky {
            return Err(e);
        }
        match released {
            Ok(()) => {
                self.state = State::Closed;
                debug!(bytes_in = self.counters.bytes_in, bytes_out = self.counters.bytes_out, "decompression stream closed");
                Ok(())
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    fn return_buffers(&mut self) {
        // Taking the buffers out guarantees nothing here touches them after release
        if let Some(buf) = self.input.take() {
            self.config.pool.release(buf);
        }
        if let Some(buf) = self.output.take() {
            self.config.pool.release(buf);
        }
        self.out_cursor = 0;
        self.out_filled = 0;
        self.carryover = 0;
    }

    fn release_session(&mut self) -> Result<()> {
        let Some(session) = self.session.take() else {
            return Ok(());
        };
        let code = session.release();
        debug!(code, "decompression session released");
        translate_release(self.config.engine.as_ref(), code).map_err(StreamError::Decode)
    }
}

impl<R: Read> Read for Reader<'_, R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        Reader::read(self, buf).map_err(io::Error::from)
    }
}

impl<R: Read> Drop for Reader<'_, R> {
    fn drop(&mut self) {
        if self.session.is_some() && matches!(self.state, State::Open) {
            debug!("decompression stream dropped without close");
        }
        self.return_buffers();
        let _ = self.release_session();
    }
}
