//! Streaming CRC32-C hasher.

use crate::dispatch::{Engine, initialize};

/// Incremental CRC32-C.
///
/// Feeds chunks through the process-wide engine (or an explicitly chosen
/// one). Any partition of the input gives the same result as a one-shot
/// [`compute`](crate::compute).
///
/// # Example
///
/// ```
/// use crc32c::Crc32c;
///
/// let mut hasher = Crc32c::new();
/// hasher.update(b"hello ");
/// hasher.update(b"world");
/// assert_eq!(hasher.finalize(), crc32c::compute(b"hello world"));
/// ```
#[derive(Clone, Debug)]
pub struct Crc32c {
  /// Raw register (complemented on finalize).
  state: u32,
  /// Raw register restored by [`reset`](Self::reset).
  initial: u32,
  engine: Engine,
}

impl Crc32c {
  const INIT: u32 = 0xFFFF_FFFF;

  /// New hasher on the process-wide engine.
  #[inline]
  #[must_use]
  pub fn new() -> Self {
    Self::with_engine(initialize())
  }

  /// New hasher on a specific engine.
  #[inline]
  #[must_use]
  pub const fn with_engine(engine: Engine) -> Self {
    Self {
      state: Self::INIT,
      initial: Self::INIT,
      engine,
    }
  }

  /// Continue from a finalized checksum of earlier data.
  ///
  /// ```
  /// use crc32c::Crc32c;
  ///
  /// let (first, second) = b"hello world".split_at(6);
  /// let mut hasher = Crc32c::resume(crc32c::compute(first));
  /// hasher.update(second);
  /// assert_eq!(hasher.finalize(), crc32c::compute(b"hello world"));
  /// ```
  #[inline]
  #[must_use]
  pub fn resume(crc: u32) -> Self {
    let mut hasher = Self::new();
    hasher.state = crc ^ Self::INIT;
    hasher.initial = hasher.state;
    hasher
  }

  /// One-shot checksum; same as [`crate::compute`].
  #[inline]
  #[must_use]
  pub fn checksum(data: &[u8]) -> u32 {
    initialize().compute(data)
  }

  #[inline]
  pub fn update(&mut self, data: &[u8]) {
    self.state = self.engine.update(self.state, data);
  }

  /// Checksum of everything fed so far. Does not consume the hasher.
  #[inline]
  #[must_use]
  pub const fn finalize(&self) -> u32 {
    self.state ^ Self::INIT
  }

  /// Return to the state at construction (or at [`resume`](Self::resume)).
  #[inline]
  pub fn reset(&mut self) {
    self.state = self.initial;
  }

  /// Engine this hasher feeds.
  #[inline]
  #[must_use]
  pub const fn engine(&self) -> Engine {
    self.engine
  }

  /// `crc(A || B)` from `crc(A)`, `crc(B)` and `len(B)`; see [`crate::combine`].
  #[inline]
  #[must_use]
  pub const fn combine(crc_a: u32, crc_b: u32, len_b: usize) -> u32 {
    crate::combine(crc_a, crc_b, len_b)
  }
}

impl Default for Crc32c {
  #[inline]
  fn default() -> Self {
    Self::new()
  }
}

#[cfg(feature = "std")]
impl std::io::Write for Crc32c {
  #[inline]
  fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
    self.update(buf);
    Ok(buf.len())
  }

  #[inline]
  fn flush(&mut self) -> std::io::Result<()> {
    Ok(())
  }
}
