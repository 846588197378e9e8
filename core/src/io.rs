//! io.rs
//! Upstream read helper that tells a short read apart from a failure.
use std::io::{self, Read};

/// How a `try_read_full` call ended.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ReadOutcome {
    /// The buffer was filled.
    Full,
    /// The reader hit end-of-stream before the buffer was filled.
    Short,
}

/// Reads until `buf` is full or the reader reports end-of-stream.
///
/// Unlike `Read::read_exact`, running out of data is not an error: it
/// returns the byte count with `ReadOutcome::Short`. `Interrupted` is retried;
/// every other reader error is returned as-is, never masked as EOF.
pub fn try_read_full<R: Read + ?Sized>(reader: &mut R, buf: &mut [u8]) -> io::Result<(usize, ReadOutcome)> {
    let mut n = 0;
    while n < buf.len() {
        match reader.read(&mut buf[n..]) {
            Ok(0) => return Ok((n, ReadOutcome::Short)),
            Ok(nn) => n += nn,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok((n, ReadOutcome::Full))
}
