//! Incremental UTF-8 rune decoding.

use std::io::{self, BufReader, Read};
use std::str;

/// Reads one `char` at a time from a byte stream without buffering the whole
/// document.
pub(crate) struct RuneReader<R> {
    inner: BufReader<R>,
}

impl<R: Read> RuneReader<R> {
    pub(crate) fn new(inner: R) -> Self {
        Self {
            inner: BufReader::new(inner),
        }
    }

    /// Decodes the next scalar value, or `None` at end of input.
    ///
    /// Invalid UTF-8 and a stream ending in the middle of a multi-byte
    /// sequence surface as `InvalidData` / `UnexpectedEof` I/O errors.
    pub(crate) fn next_rune(&mut self) -> io::Result<Option<char>> {
        let mut buf = [0u8; 4];
        if self.inner.read(&mut buf[..1])? == 0 {
            return Ok(None);
        }

        let len = sequence_len(buf[0]).ok_or_else(|| {
            io::Error::new(io::ErrorKind::InvalidData, "invalid UTF-8 leading byte")
        })?;
        if len > 1 {
            self.inner.read_exact(&mut buf[1..len])?;
        }

        let decoded = str::from_utf8(&buf[..len])
            .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?;
        match decoded.chars().next() {
            Some(c) => Ok(Some(c)),
            None => Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "empty UTF-8 sequence",
            )),
        }
    }
}

/// Byte length of the UTF-8 sequence introduced by `first`.
fn sequence_len(first: u8) -> Option<usize> {
    match first {
        0x00..=0x7F => Some(1),
        0xC2..=0xDF => Some(2),
        0xE0..=0xEF => Some(3),
        0xF0..=0xF4 => Some(4),
        _ => None,
    }
}
