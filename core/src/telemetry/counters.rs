//! telemetry/counters.rs
//! Mutable counters updated by a stream while it runs.
//!
//! Summary: byte counts on both sides of the engine, engine step calls and
//! buffer growth events. Converted into an immutable `StreamSnapshot` on demand.
use std::ops::AddAssign;

#[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
pub struct StreamCounters {
    /// Bytes handed to the stream by the caller (writer) or pulled from upstream (reader).
    pub bytes_in: u64,
    /// Bytes forwarded to the sink (writer) or delivered to the caller (reader).
    pub bytes_out: u64,
    pub engine_steps: u64,
    pub buffer_grows: u64,
}

impl StreamCounters {
    #[inline]
    pub fn add_in(&mut self, n: usize) {
        self.bytes_in += n as u64;
    }

    #[inline]
    pub fn add_out(&mut self, n: usize) {
        self.bytes_out += n as u64;
    }

    #[inline]
    pub fn add_step(&mut self) {
        self.engine_steps += 1;
    }

    #[inline]
    pub fn add_grow(&mut self) {
        self.buffer_grows += 1;
    }
}

impl AddAssign for StreamCounters {
    fn add_assign(&mut self, other: Self) {
        self.bytes_in += other.bytes_in;
        self.bytes_out += other.bytes_out;
        self.engine_steps += other.engine_steps;
        self.buffer_grows += other.buffer_grows;
    }
}
