//! Binary codec helpers
//!
//! All readers here turn a premature end of input into `Error::Corrupt`, so the
//! object and index decoders can use `?` without re-mapping I/O errors.

use crate::errors::{Error, Result};
use byteorder::{NetworkEndian, ReadBytesExt};
use std::io::{BufRead, Read};

/// Read up to (and excluding) `delimiter`.
///
/// Returns `Ok(None)` on a clean end of input (nothing read). Input that ends
/// before the delimiter is found is corrupt.
pub fn read_until(reader: &mut impl BufRead, delimiter: u8, what: &str) -> Result<Option<Vec<u8>>> {
    let mut buffer = Vec::new();
    let n = reader
        .read_until(delimiter, &mut buffer)
        .map_err(|e| Error::corrupt(format!("failed reading {what}: {e}")))?;

    if n == 0 {
        return Ok(None);
    }
    if buffer.last() != Some(&delimiter) {
        return Err(Error::corrupt(format!("unexpected end of input in {what}")));
    }
    buffer.pop();

    Ok(Some(buffer))
}

/// Like [`read_until`], but an empty input is also an error.
pub fn expect_until(reader: &mut impl BufRead, delimiter: u8, what: &str) -> Result<Vec<u8>> {
    read_until(reader, delimiter, what)?
        .ok_or_else(|| Error::corrupt(format!("unexpected end of input, expected {what}")))
}

pub fn read_exact_bytes(reader: &mut impl Read, size: usize, what: &str) -> Result<Vec<u8>> {
    let mut buffer = vec![0; size];
    reader
        .read_exact(&mut buffer)
        .map_err(|_| Error::corrupt(format!("unexpected end of input in {what}")))?;

    Ok(buffer)
}

pub fn read_u32(reader: &mut impl Read, what: &str) -> Result<u32> {
    reader
        .read_u32::<NetworkEndian>()
        .map_err(|_| Error::corrupt(format!("unexpected end of input in {what}")))
}

pub fn read_u16(reader: &mut impl Read, what: &str) -> Result<u16> {
    reader
        .read_u16::<NetworkEndian>()
        .map_err(|_| Error::corrupt(format!("unexpected end of input in {what}")))
}

pub fn read_to_end(reader: &mut impl Read) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    reader
        .read_to_end(&mut buffer)
        .map_err(|e| Error::corrupt(format!("failed reading input: {e}")))?;

    Ok(buffer)
}

pub fn utf8(bytes: Vec<u8>, what: &str) -> Result<String> {
    String::from_utf8(bytes).map_err(|_| Error::corrupt(format!("{what} is not valid UTF-8")))
}
