//! compression/pool.rs
//! Reusable byte buffers shared across short-lived decompressor streams.
//!
//! Summary:
//! - Two independent bounded queues, one per `BufferRole`.
//! - `acquire` pops a retained buffer or allocates a fresh one; `release`
//!   pushes it back, dropping it if the role already retains the maximum.
//! - A buffer moves out of the queue on `acquire`, so two live streams can
//!   never hold the same storage.
use crossbeam::queue::ArrayQueue;

use crate::constants::DEFAULT_POOL_RETAIN;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum BufferRole {
    /// Raw compressed bytes read from upstream.
    CompressedInput,
    /// Decoded bytes waiting for the caller.
    DecodedOutput,
}

/// A buffer borrowed from a `BufferPool`.
/// Dereferences to its `Vec<u8>`; hand it back with `BufferPool::release`.
#[derive(Debug)]
pub struct PooledBuffer {
    role: BufferRole,
    buf: Vec<u8>,
}

impl PooledBuffer {
    pub fn role(&self) -> BufferRole {
        self.role
    }
}

impl std::ops::Deref for PooledBuffer {
    type Target = Vec<u8>;
    fn deref(&self) -> &Vec<u8> {
        &self.buf
    }
}

impl std::ops::DerefMut for PooledBuffer {
    fn deref_mut(&mut self) -> &mut Vec<u8> {
        &mut self.buf
    }
}

pub struct BufferPool {
    compressed_input: ArrayQueue<Vec<u8>>,
    decoded_output: ArrayQueue<Vec<u8>>,
}

impl BufferPool {
    pub fn new() -> Self {
        Self::with_retain(DEFAULT_POOL_RETAIN)
    }

    /// `retain` buffers are kept per role (at least one).
    pub fn with_retain(retain: usize) -> Self {
        let retain = retain.max(1);
        Self {
            compressed_input: ArrayQueue::new(retain),
            decoded_output: ArrayQueue::new(retain),
        }
    }

    fn queue(&self, role: BufferRole) -> &ArrayQueue<Vec<u8>> {
        match role {
            BufferRole::CompressedInput => &self.compressed_input,
            BufferRole::DecodedOutput => &self.decoded_output,
        }
    }

    /// Returns a buffer of length `min_len` (contents unspecified).
    pub fn acquire(&self, role: BufferRole, min_len: usize) -> PooledBuffer {
        let mut buf = self.queue(role).pop().unwrap_or_default();
        if buf.len() < min_len {
            buf.resize(min_len, 0);
        } else {
            buf.truncate(min_len);
        }
        PooledBuffer { role, buf }
    }

    /// Hands `buffer` back for reuse. Consumes it, so the caller cannot touch it again.
    pub fn release(&self, buffer: PooledBuffer) {
        let PooledBuffer { role, buf } = buffer;
        // Pool full: let the allocation go
        let _ = self.queue(role).push(buf);
    }

    /// Buffers currently retained for `role`.
    pub fn retained(&self, role: BufferRole) -> usize {
        self.queue(role).len()
    }
}

impl Default for BufferPool {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for BufferPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BufferPool")
            .field("compressed_input", &self.compressed_input.len())
            .field("decoded_output", &self.decoded_output.len())
            .finish()
    }
}
