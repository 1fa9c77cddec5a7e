use std::fmt;
use std::io::{Read, Write};

use crate::error::{CodecError, Result};

/// Anything that accepts bits one at a time.
pub trait BitSink {
    fn write_bit(&mut self, bit: bool) -> Result<()>;
}

/// Anything that yields bits one at a time; `Ok(None)` means exhausted.
pub trait BitSource {
    fn read_bit(&mut self) -> Result<Option<bool>>;
}

/// In-memory bit sequence, packed MSB-first. Written bits can be read back
/// from the start with [`BitSource`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BitBuffer {
    bytes: Vec<u8>,
    len: usize,
    cursor: usize,
}

impl BitBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every bit of `bytes` is considered written, padding included.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self {
            bytes: bytes.to_vec(),
            len: bytes.len() * 8,
            cursor: 0,
        }
    }

    pub fn push(&mut self, bit: bool) {
        let byte_index = self.len / 8;
        let bit_offset = self.len % 8;

        if byte_index >= self.bytes.len() {
            self.bytes.push(0);
        }
        if bit {
            self.bytes[byte_index] |= 1 << (7 - bit_offset);
        }
        self.len += 1;
    }

    pub fn get(&self, index: usize) -> Option<bool> {
        if index >= self.len {
            return None;
        }
        Some((self.bytes[index / 8] >> (7 - index % 8)) & 1 == 1)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Packed bytes; the last one is zero-padded.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        (0..self.len).filter_map(move |i| self.get(i))
    }

    pub fn rewind(&mut self) {
        self.cursor = 0;
    }
}

impl BitSink for BitBuffer {
    fn write_bit(&mut self, bit: bool) -> Result<()> {
        self.push(bit);
        Ok(())
    }
}

impl BitSource for BitBuffer {
    fn read_bit(&mut self) -> Result<Option<bool>> {
        let bit = self.get(self.cursor);
        if bit.is_some() {
            self.cursor += 1;
        }
        Ok(bit)
    }
}

impl fmt::Display for BitBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for bit in self.iter() {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

/// Packs bits MSB-first into a byte writer.
pub struct BitWriter<W: Write> {
    inner: W,
    current_byte: u8,
    bit_count: u8,
    bits_written: usize,
}

impl<W: Write> BitWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            current_byte: 0,
            bit_count: 0,
            bits_written: 0,
        }
    }

    pub fn bits_written(&self) -> usize {
        self.bits_written
    }

    /// Zero-pads and writes any partial byte, flushes, and returns the writer.
    pub fn finish(mut self) -> Result<W> {
        if self.bit_count > 0 {
            self.inner
                .write_all(&[self.current_byte])
                .map_err(CodecError::sink_io)?;
        }
        self.inner.flush().map_err(CodecError::sink_io)?;
        Ok(self.inner)
    }
}

impl<W: Write> BitSink for BitWriter<W> {
    fn write_bit(&mut self, bit: bool) -> Result<()> {
        if bit {
            self.current_byte |= 1 << (7 - self.bit_count);
        }
        self.bit_count += 1;
        self.bits_written += 1;

        if self.bit_count == 8 {
            self.inner
                .write_all(&[self.current_byte])
                .map_err(CodecError::sink_io)?;
            self.current_byte = 0;
            self.bit_count = 0;
        }
        Ok(())
    }
}

/// Reads bits MSB-first from a byte reader.
pub struct BitReader<R: Read> {
    inner: R,
    current_byte: u8,
    remaining: u8,
}

impl<R: Read> BitReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            current_byte: 0,
            remaining: 0,
        }
    }
}

impl<R: Read> BitSource for BitReader<R> {
    fn read_bit(&mut self) -> Result<Option<bool>> {
        if self.remaining == 0 {
            let mut byte = [0u8; 1];
            loop {
                match self.inner.read(&mut byte) {
                    Ok(0) => return Ok(None),
                    Ok(_) => break,
                    Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                    Err(e) => return Err(CodecError::source_io(e)),
                }
            }
            self.current_byte = byte[0];
            self.remaining = 8;
        }

        self.remaining -= 1;
        Ok(Some((self.current_byte >> self.remaining) & 1 == 1))
    }
}
