//! Byte accounting for unit emission.
//!
//! Multi-part writes (a composite unit, a cursor bracket) must report how many
//! bytes reached the stream before a failure. `CountingWriter` tallies every
//! successful `write`; `WriteError` carries that tally alongside the source
//! error. Nothing here retries.

use std::io::{self, Write};
use thiserror::Error;

#[derive(Debug, Error)]
#[error("terminal write failed after {written} bytes")]
pub struct WriteError {
    /// Bytes accepted by the stream before the failure.
    pub written: usize,
    #[source]
    pub source: io::Error,
}

impl WriteError {
    pub fn new(written: usize, source: io::Error) -> Self {
        Self { written, source }
    }

    pub fn kind(&self) -> io::ErrorKind {
        self.source.kind()
    }
}

#[derive(Debug)]
pub struct CountingWriter<'a, W: Write + ?Sized> {
    inner: &'a mut W,
    written: usize,
}

impl<'a, W: Write + ?Sized> CountingWriter<'a, W> {
    pub fn new(inner: &'a mut W) -> Self {
        Self { inner, written: 0 }
    }

    #[inline]
    pub fn written(&self) -> usize {
        self.written
    }

    /// Convert an emission result into a byte count or a `WriteError` that
    /// keeps the partial count.
    pub fn finish(&self, res: io::Result<()>) -> Result<usize, WriteError> {
        match res {
            Ok(()) => Ok(self.written),
            Err(source) => Err(WriteError::new(self.written, source)),
        }
    }
}

impl<W: Write + ?Sized> Write for CountingWriter<'_, W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.written += n;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}
