//! I/O adapters that checksum data as it passes through.
//!
//! [`Crc32cReader`] and [`Crc32cWriter`] wrap any [`Read`] or [`Write`] and
//! feed exactly the bytes actually transferred into a [`Crc32c`] hasher, so
//! short reads and short writes never skew the checksum.
//!
//! # Example
//!
//! ```
//! use std::io::{Cursor, Read};
//!
//! use crc32c::io::Crc32cReader;
//!
//! let mut reader = Crc32cReader::new(Cursor::new(b"hello world".to_vec()));
//! let mut contents = Vec::new();
//! reader.read_to_end(&mut contents)?;
//! assert_eq!(reader.crc(), crc32c::compute(&contents));
//! # Ok::<(), std::io::Error>(())
//! ```

use std::io::{IoSlice, IoSliceMut, Read, Result, Write};

use crate::Crc32c;

// ─────────────────────────────────────────────────────────────────────────────
// Reader
// ─────────────────────────────────────────────────────────────────────────────

/// Wraps a [`Read`] and checksums every byte read.
#[derive(Clone, Debug)]
pub struct Crc32cReader<R> {
  inner: R,
  hasher: Crc32c,
}

impl<R> Crc32cReader<R> {
  #[inline]
  #[must_use]
  pub fn new(inner: R) -> Self {
    Self::with_hasher(inner, Crc32c::new())
  }

  /// Wrap `inner`, continuing from `hasher`'s state.
  #[inline]
  #[must_use]
  pub fn with_hasher(inner: R, hasher: Crc32c) -> Self {
    Self { inner, hasher }
  }

  /// Checksum of the bytes read so far.
  #[inline]
  #[must_use]
  pub fn crc(&self) -> u32 {
    self.hasher.finalize()
  }

  /// Return the inner reader and the final checksum.
  #[inline]
  pub fn into_parts(self) -> (R, u32) {
    let crc = self.crc();
    (self.inner, crc)
  }

  #[inline]
  pub fn into_inner(self) -> R {
    self.inner
  }

  #[inline]
  pub fn inner(&self) -> &R {
    &self.inner
  }

  /// Mutable access to the inner reader. Bytes read through it directly are
  /// not checksummed.
  #[inline]
  pub fn inner_mut(&mut self) -> &mut R {
    &mut self.inner
  }
}

impl<R: Read> Read for Crc32cReader<R> {
  #[inline]
  fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
    let n = self.inner.read(buf)?;
    if let Some(data) = buf.get(..n) {
      self.hasher.update(data);
    }
    Ok(n)
  }

  fn read_vectored(&mut self, bufs: &mut [IoSliceMut<'_>]) -> Result<usize> {
    let n = self.inner.read_vectored(bufs)?;
    let mut remaining = n;
    for buf in bufs.iter() {
      let take = remaining.min(buf.len());
      if take == 0 {
        break;
      }
      if let Some(data) = buf.get(..take) {
        self.hasher.update(data);
      }
      remaining -= take;
    }
    Ok(n)
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// Writer
// ─────────────────────────────────────────────────────────────────────────────

/// Wraps a [`Write`] and checksums every byte the inner writer accepts.
///
/// The hasher is updated after the inner write returns, with only the prefix
/// it reports as written. A failed write leaves the checksum untouched.
#[derive(Clone, Debug)]
pub struct Crc32cWriter<W> {
  inner: W,
  hasher: Crc32c,
}

impl<W> Crc32cWriter<W> {
  #[inline]
  #[must_use]
  pub fn new(inner: W) -> Self {
    Self::with_hasher(inner, Crc32c::new())
  }

  #[inline]
  #[must_use]
  pub fn with_hasher(inner: W, hasher: Crc32c) -> Self {
    Self { inner, hasher }
  }

  /// Checksum of the bytes written so far.
  #[inline]
  #[must_use]
  pub fn crc(&self) -> u32 {
    self.hasher.finalize()
  }

  #[inline]
  pub fn into_parts(self) -> (W, u32) {
    let crc = self.crc();
    (self.inner, crc)
  }

  #[inline]
  pub fn into_inner(self) -> W {
    self.inner
  }

  #[inline]
  pub fn inner(&self) -> &W {
    &self.inner
  }

  #[inline]
  pub fn inner_mut(&mut self) -> &mut W {
    &mut self.inner
  }
}

impl<W: Write> Write for Crc32cWriter<W> {
  #[inline]
  fn write(&mut self, buf: &[u8]) -> Result<usize> {
    let n = self.inner.write(buf)?;
    if let Some(data) = buf.get(..n) {
      self.hasher.update(data);
    }
    Ok(n)
  }

  fn write_vectored(&mut self, bufs: &[IoSlice<'_>]) -> Result<usize> {
    let n = self.inner.write_vectored(bufs)?;
    let mut remaining = n;
    for buf in bufs {
      let take = remaining.min(buf.len());
      if take == 0 {
        break;
      }
      if let Some(data) = buf.get(..take) {
        self.hasher.update(data);
      }
      remaining -= take;
    }
    Ok(n)
  }

  #[inline]
  fn flush(&mut self) -> Result<()> {
    self.inner.flush()
  }
}
