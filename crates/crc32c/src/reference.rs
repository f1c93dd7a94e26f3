//! Bitwise CRC32-C reference.
//!
//! One bit per step, no tables. Every optimized path in this crate must agree
//! with [`crc32c_bitwise`]; tests and fuzz targets use it as the oracle.
//!
//! Intentionally slow (about eight operations per bit).

// All indexing uses the loop bound `i < data.len()`.
#![allow(clippy::indexing_slicing)]

use crate::tables::POLY;

/// Bitwise CRC32-C over `data` starting from the raw register `init`.
///
/// Returns the raw register; the caller applies the final complement.
#[must_use]
pub const fn crc32c_bitwise(init: u32, data: &[u8]) -> u32 {
  let mut crc = init;
  let mut i = 0;
  while i < data.len() {
    crc ^= data[i] as u32;
    let mut bit = 0;
    while bit < 8 {
      crc = if crc & 1 != 0 { (crc >> 1) ^ POLY } else { crc >> 1 };
      bit += 1;
    }
    i += 1;
  }
  crc
}

/// Finalized CRC32-C of `data` (all-ones seed and complement).
#[must_use]
pub const fn checksum(data: &[u8]) -> u32 {
  crc32c_bitwise(!0, data) ^ !0
}

const _: () = assert!(checksum(b"123456789") == 0xE306_9283);
