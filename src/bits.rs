//! Bit-granular reading and writing over byte streams.
//!
//! Both ends are MSB-first: the first bit of a stream is the high bit of its
//! first byte.

use bitvec::prelude::*;
use std::io::{self, BufReader, BufWriter, ErrorKind, Read, Seek, SeekFrom, Write};

fn mask(n: u32) -> u64 {
    (1u64 << n) - 1
}

pub struct BitReader<R: Read> {
    inner: BufReader<R>,
    buf: u64,
    avail: u32,
    bits_read: u64,
}

impl<R: Read> BitReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner: BufReader::new(inner),
            buf: 0,
            avail: 0,
            bits_read: 0,
        }
    }

    /// Reads the next `n` bits (1 to 32) as an unsigned value.
    ///
    /// Returns `Ok(None)` once fewer than `n` bits are left in the stream.
    ///
    /// # Panics
    ///
    /// Panics if `n` is 0 or greater than 32.
    pub fn read_bits(&mut self, n: u32) -> io::Result<Option<u32>> {
        assert!((1..=32).contains(&n), "bit group of {n} bits");

        while self.avail < n {
            match self.next_byte()? {
                Some(byte) => {
                    self.buf = (self.buf << 8) | u64::from(byte);
                    self.avail += 8;
                }
                None => return Ok(None),
            }
        }

        self.avail -= n;
        let value = (self.buf >> self.avail) & mask(n);
        self.buf &= mask(self.avail);
        self.bits_read += u64::from(n);

        Ok(Some(value as u32))
    }

    pub fn read_bit(&mut self) -> io::Result<Option<bool>> {
        Ok(self.read_bits(1)?.map(|b| b == 1))
    }

    /// Total bits handed out since construction, across resets.
    pub fn bits_read(&self) -> u64 {
        self.bits_read
    }

    pub fn into_inner(self) -> R {
        self.inner.into_inner()
    }

    fn next_byte(&mut self) -> io::Result<Option<u8>> {
        let mut byte = [0u8];
        loop {
            match self.inner.read(&mut byte) {
                Ok(0) => return Ok(None),
                Ok(_) => return Ok(Some(byte[0])),
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }
}

impl<R: Read + Seek> BitReader<R> {
    /// Rewinds to the first bit of the underlying stream.
    pub fn reset(&mut self) -> io::Result<()> {
        self.inner.seek(SeekFrom::Start(0))?;
        self.buf = 0;
        self.avail = 0;
        Ok(())
    }
}

pub struct BitWriter<W: Write> {
    inner: BufWriter<W>,
    buf: u64,
    pending: u32,
    bits_written: u64,
}

impl<W: Write> BitWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner: BufWriter::new(inner),
            buf: 0,
            pending: 0,
            bits_written: 0,
        }
    }

    /// Appends the low `n` bits (0 to 32) of `value`, most significant first.
    ///
    /// # Panics
    ///
    /// Panics if `n` is greater than 32.
    pub fn write_bits(&mut self, n: u32, value: u32) -> io::Result<()> {
        assert!(n <= 32, "bit group of {n} bits");

        self.buf = (self.buf << n) | (u64::from(value) & mask(n));
        self.pending += n;
        self.bits_written += u64::from(n);

        while self.pending >= 8 {
            self.pending -= 8;
            let byte = (self.buf >> self.pending) as u8;
            self.inner.write_all(&[byte])?;
        }
        self.buf &= mask(self.pending);

        Ok(())
    }

    /// Appends every bit of `code` in order, whatever its length.
    pub fn write_code(&mut self, code: &BitSlice<u8, Msb0>) -> io::Result<()> {
        for chunk in code.chunks(32) {
            let value = chunk
                .iter()
                .by_vals()
                .fold(0u32, |acc, bit| (acc << 1) | u32::from(bit));
            self.write_bits(chunk.len() as u32, value)?;
        }
        Ok(())
    }

    pub fn bits_written(&self) -> u64 {
        self.bits_written
    }

    /// Pads the last partial byte with zeros and flushes everything written so
    /// far. Returns the number of data bits written, padding excluded.
    pub fn close(&mut self) -> io::Result<u64> {
        if self.pending > 0 {
            let byte = (self.buf << (8 - self.pending)) as u8;
            self.inner.write_all(&[byte])?;
            self.buf = 0;
            self.pending = 0;
        }
        self.inner.flush()?;
        Ok(self.bits_written)
    }

    /// Closes the writer and hands back the underlying sink.
    pub fn into_inner(mut self) -> io::Result<W> {
        self.close()?;
        self.inner.into_inner().map_err(|e| e.into_error())
    }
}
