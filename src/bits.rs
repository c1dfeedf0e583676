//! Bit-granular I/O over byte sinks and sources.
//!
//! The writer shifts each bit in as the new least-significant bit, so a full
//! byte holds its bits in arrival order from the high end. The reader hands
//! them back from most- to least-significant. Each side buffers one byte.

use std::io::{self, Read, Write};

use crate::error::{HuffmanError, Result};

pub struct BitWriter<W: Write> {
    inner: W,
    buffer: u8,
    pending: u8,
    written: u64,
}

impl<W: Write> BitWriter<W> {
    pub fn new(inner: W) -> Self {
        BitWriter {
            inner,
            buffer: 0,
            pending: 0,
            written: 0,
        }
    }

    pub fn write_bit(&mut self, bit: u8) -> Result<()> {
        if bit > 1 {
            return Err(HuffmanError::InvalidBit(bit.to_string()));
        }

        self.buffer = (self.buffer << 1) | bit;
        self.pending += 1;
        self.written += 1;

        if self.pending == 8 {
            self.flush_buffer()?;
        }
        Ok(())
    }

    /// Writes a code given as a string of `'0'` and `'1'` characters.
    pub fn write_code(&mut self, code: &str) -> Result<()> {
        for c in code.chars() {
            match c {
                '0' => self.write_bit(0)?,
                '1' => self.write_bit(1)?,
                other => return Err(HuffmanError::InvalidBit(other.to_string())),
            }
        }
        Ok(())
    }

    pub fn bits_written(&self) -> u64 {
        self.written
    }

    /// Emits the partial byte, if any, with its bits moved to the high end
    /// and zero padding below. Flushes and returns the sink.
    pub fn finish(mut self) -> Result<W> {
        if self.pending > 0 {
            self.buffer <<= 8 - self.pending;
            self.flush_buffer()?;
        }
        self.inner.flush()?;
        Ok(self.inner)
    }

    fn flush_buffer(&mut self) -> io::Result<()> {
        self.inner.write_all(&[self.buffer])?;
        self.buffer = 0;
        self.pending = 0;
        Ok(())
    }
}

pub struct BitReader<R: Read> {
    inner: R,
    buffer: u8,
    remaining: u8,
}

impl<R: Read> BitReader<R> {
    pub fn new(inner: R) -> Self {
        BitReader {
            inner,
            buffer: 0,
            remaining: 0,
        }
    }

    /// Next bit, or `None` once the source has no more bytes.
    pub fn read_bit(&mut self) -> Result<Option<u8>> {
        if self.remaining == 0 {
            let mut byte = [0u8; 1];
            loop {
                match self.inner.read(&mut byte) {
                    Ok(0) => return Ok(None),
                    Ok(_) => break,
                    Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                    Err(e) => return Err(e.into()),
                }
            }
            self.buffer = byte[0];
            self.remaining = 8;
        }

        let bit = (self.buffer >> 7) & 1;
        self.buffer <<= 1;
        self.remaining -= 1;
        Ok(Some(bit))
    }
}
