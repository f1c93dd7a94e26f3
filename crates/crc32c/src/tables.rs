//! Compile-time slicing-by-8 tables for the Castagnoli polynomial.
//!
//! `TABLES[0]` is the classic byte-at-a-time table. Each further table advances
//! an entry by one more zero byte:
//!
//! ```text
//! TABLES[k][i] = TABLES[0][TABLES[k-1][i] & 0xFF] ^ (TABLES[k-1][i] >> 8)
//! ```

// All indexing uses bounded loop indices (0..256, 0..8).
#![allow(clippy::indexing_slicing)]

/// Castagnoli polynomial `0x1EDC6F41`, bit-reflected.
pub const POLY: u32 = 0x82F6_3B78;

/// Table entry for `index`: eight rounds of reflected polynomial division.
#[must_use]
pub const fn table_entry(index: u8) -> u32 {
  let mut crc = index as u32;
  let mut i = 0;
  while i < 8 {
    crc = if crc & 1 != 0 { (crc >> 1) ^ POLY } else { crc >> 1 };
    i += 1;
  }
  crc
}

/// Generate the eight slicing tables.
#[must_use]
pub const fn generate_tables() -> [[u32; 256]; 8] {
  let mut tables = [[0u32; 256]; 8];

  let mut i = 0usize;
  while i < 256 {
    tables[0][i] = table_entry(i as u8);
    i += 1;
  }

  let mut k = 1usize;
  while k < 8 {
    i = 0;
    while i < 256 {
      let prev = tables[k - 1][i];
      tables[k][i] = tables[0][(prev & 0xFF) as usize] ^ (prev >> 8);
      i += 1;
    }
    k += 1;
  }

  tables
}

pub static TABLES: [[u32; 256]; 8] = generate_tables();
