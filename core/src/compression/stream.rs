//! compression/stream.rs
//! Whole-stream helpers built on `Writer` and `Reader`.
use std::io::{Read, Write};

use crate::compression::{Reader, Writer};
use crate::config::StreamConfig;
use crate::io::{try_read_full, ReadOutcome};
use crate::types::{Result, StreamError};

/// Copy buffer size for the helpers.
const COPY_CHUNK: usize = 64 * 1024;

#[inline]
/// Summary: Compress everything readable from `r` into `w`.
/// - Reads in `COPY_CHUNK` pieces and closes the writer at EOF.
/// - Returns the number of uncompressed bytes consumed.
pub fn compress_stream<R: Read, W: Write>(
    mut r: R,
    w: W,
    level: i32,
    dict: Option<&[u8]>,
) -> Result<u64> {
    let mut writer = Writer::with_config(w, level, dict, StreamConfig::default());
    let mut buf = vec![0u8; COPY_CHUNK];
    let mut total = 0u64;

    loop {
        let (n, outcome) = try_read_full(&mut r, &mut buf).map_err(StreamError::upstream)?;
        if n > 0 {
            writer.write(&buf[..n])?;
            total += n as u64;
        }
        if outcome == ReadOutcome::Short {
            break;
        }
    }
    writer.close()?;
    Ok(total)
}

#[inline]
/// Summary: Decompress everything readable from `r` into `w`.
/// - Returns the number of decompressed bytes written.
pub fn decompress_stream<R: Read, W: Write>(r: R, mut w: W, dict: Option<&[u8]>) -> Result<u64> {
    let mut reader = Reader::with_config(r, dict, StreamConfig::default());
    let mut buf = vec![0u8; COPY_CHUNK];
    let mut total = 0u64;

    loop {
        let n = reader.read(&mut buf)?;
        if n == 0 {
            break;
        }
        w.write_all(&buf[..n]).map_err(StreamError::downstream)?;
        total += n as u64;
    }
    reader.close()?;
    Ok(total)
}

/// One-shot compression into a fresh `Vec`.
pub fn compress(data: &[u8], level: i32) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    compress_stream(data, &mut out, level, None)?;
    Ok(out)
}

/// One-shot decompression into a fresh `Vec`.
pub fn decompress(data: &[u8]) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    decompress_stream(data, &mut out, None)?;
    Ok(out)
}
