//! Portable CRC32-C using slicing-by-8.
//!
//! For each 8-byte word:
//! 1. XOR the low half of the little-endian word with the current CRC
//! 2. Look up each byte in its table (`TABLES[7]` for byte 0, `TABLES[0]` for byte 7)
//! 3. XOR the eight entries together
//!
//! The eight lookups are independent, which hides table latency. Functions here
//! operate on the raw register; callers apply the seed and final complement.

use crate::tables::TABLES;

/// Advance the raw register `crc` over `data`.
#[inline]
#[must_use]
pub fn compute(crc: u32, data: &[u8]) -> u32 {
  let (words, tail) = data.as_chunks::<8>();

  let mut crc = crc;
  for word in words {
    crc = update_word(crc, u64::from_le_bytes(*word));
  }

  update_bytewise(crc, tail)
}

/// Advance the raw register over one little-endian 8-byte word.
#[inline(always)]
#[must_use]
#[allow(clippy::indexing_slicing)] // u8 indices into 256-entry tables
fn update_word(crc: u32, word: u64) -> u32 {
  let lo = crc ^ word as u32;
  let hi = (word >> 32) as u32;
  let [t0, t1, t2, t3, t4, t5, t6, t7] = &TABLES;

  t7[(lo & 0xFF) as usize]
    ^ t6[((lo >> 8) & 0xFF) as usize]
    ^ t5[((lo >> 16) & 0xFF) as usize]
    ^ t4[(lo >> 24) as usize]
    ^ t3[(hi & 0xFF) as usize]
    ^ t2[((hi >> 8) & 0xFF) as usize]
    ^ t1[((hi >> 16) & 0xFF) as usize]
    ^ t0[(hi >> 24) as usize]
}

/// Advance the raw register one byte at a time.
///
/// Accelerated kernels finish their sub-word tails with this.
#[inline]
#[must_use]
pub fn update_bytewise(crc: u32, data: &[u8]) -> u32 {
  data.iter().fold(crc, |crc, &byte| update_byte(crc, byte))
}

#[inline(always)]
#[must_use]
#[allow(clippy::indexing_slicing)] // u8 index into a 256-entry table
fn update_byte(crc: u32, byte: u8) -> u32 {
  TABLES[0][usize::from(crc as u8 ^ byte)] ^ (crc >> 8)
}
