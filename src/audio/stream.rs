//! Chunked sample transfer
//!
//! Samples move between the caller's buffer and the underlying stream
//! through a scratch buffer of at most [`CHUNK_SAMPLES`] packed samples,
//! whatever the size of the request.

use std::io::{self, Read, Write};

use crate::audio::dispatch::{DecodeFn, EncodeFn};
use crate::error::Result;

/// Samples converted per chunk.
pub const CHUNK_SAMPLES: usize = 32 * 1024;

/// Reads up to `out.len()` samples of `width` bytes each, decoding them into `out`.
///
/// Returns the number of samples delivered. Running out of input before
/// `out` is full is not an error: the loop stops and the partial count is
/// returned. Trailing bytes that do not make up a whole sample are dropped.
pub fn read_samples<R, T>(reader: &mut R, width: usize, decode: DecodeFn<T>, out: &mut [T]) -> Result<usize>
where
    R: Read + ?Sized,
{
    read_chunked(reader, width, decode, out, CHUNK_SAMPLES)
}

/// Encodes all of `input` to samples of `width` bytes and writes them out.
///
/// Returns the number of samples written. Any write error aborts the
/// transfer; how much was written before the error is not reported.
pub fn write_samples<W, T>(writer: &mut W, width: usize, encode: EncodeFn<T>, input: &[T]) -> Result<usize>
where
    W: Write + ?Sized,
{
    write_chunked(writer, width, encode, input, CHUNK_SAMPLES)
}

fn read_chunked<R, T>(
    reader: &mut R,
    width: usize,
    decode: DecodeFn<T>,
    out: &mut [T],
    chunk: usize,
) -> Result<usize>
where
    R: Read + ?Sized,
{
    let mut scratch = vec![0u8; out.len().min(chunk) * width];
    let mut total = 0;

    while total < out.len() {
        let want = (out.len() - total).min(chunk);
        let buf = &mut scratch[..want * width];
        let got = fill(reader, buf)?;
        let samples = got / width;

        decode(&buf[..samples * width], &mut out[total..total + samples]);
        total += samples;
        log::trace!("Read chunk of {} samples ({} total)", samples, total);

        if samples < want {
            log::debug!("Short read: {} of {} samples", total, out.len());
            break;
        }
    }

    Ok(total)
}

fn write_chunked<W, T>(
    writer: &mut W,
    width: usize,
    encode: EncodeFn<T>,
    input: &[T],
    chunk: usize,
) -> Result<usize>
where
    W: Write + ?Sized,
{
    let mut scratch = vec![0u8; input.len().min(chunk) * width];
    let mut total = 0;

    for samples in input.chunks(chunk) {
        let buf = &mut scratch[..samples.len() * width];
        encode(samples, buf);
        writer.write_all(buf)?;
        total += samples.len();
        log::trace!("Wrote chunk of {} samples ({} total)", samples.len(), total);
    }
    writer.flush()?;

    Ok(total)
}

/// Reads until `buf` is full or the reader is exhausted.
fn fill<R: Read + ?Sized>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
