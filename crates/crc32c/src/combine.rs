//! GF(2) polynomial algebra for shifting and combining CRC32-C states.
//!
//! Values use the reflected representation of the CRC register: bit 31 is the
//! coefficient of `x^0` and bit 0 the coefficient of `x^31`. Appending `n` zero
//! bytes to a message multiplies its raw CRC register by `x^(8n) mod P`, so:
//!
//! ```text
//! crc(A || B) = crc(A) * x^(8*len(B)) mod P  XOR  crc(B)
//! ```
//!
//! The same identity merges the three lanes of the interleaved hardware
//! kernels. Every function here is `const` so stride constants are computed at
//! compile time from the polynomial alone.

// All indexing uses bounded loop indices (0..64).
#![allow(clippy::indexing_slicing)]

use crate::tables::POLY;

// ─────────────────────────────────────────────────────────────────────────────
// Field Arithmetic
// ─────────────────────────────────────────────────────────────────────────────

/// `x^0` in the reflected representation.
const ONE: u32 = 0x8000_0000;

/// Multiply `a * b mod P`.
#[must_use]
pub const fn multiply(a: u32, b: u32) -> u32 {
  let mut b = b;
  let mut product = 0u32;
  let mut i = 0;
  while i < 32 {
    if a & (ONE >> i) != 0 {
      product ^= b;
    }
    b = if b & 1 != 0 { (b >> 1) ^ POLY } else { b >> 1 };
    i += 1;
  }
  product
}

/// `X2N[k] = x^(2^k) mod P`.
///
/// `x^(2^32)` is not `x` for this polynomial, so the table covers every bit
/// of a `u64` exponent.
const X2N: [u32; 64] = {
  let mut table = [0u32; 64];
  let mut p = ONE >> 1;
  let mut k = 0;
  while k < 64 {
    table[k] = p;
    p = multiply(p, p);
    k += 1;
  }
  table
};

/// `x^n mod P`.
#[must_use]
pub const fn xpow(n: u64) -> u32 {
  let mut n = n;
  let mut p = ONE;
  let mut k = 0;
  while n != 0 {
    if n & 1 != 0 {
      p = multiply(X2N[k], p);
    }
    n >>= 1;
    k += 1;
  }
  p
}

/// `x^(8 * len) mod P`: the operator that appends `len` zero bytes.
#[must_use]
pub const fn xpow8n(len: u64) -> u32 {
  let p = xpow(len);
  let p = multiply(p, p);
  let p = multiply(p, p);
  multiply(p, p)
}

/// Advance a raw CRC register past `len` zero bytes.
#[inline]
#[must_use]
pub const fn shift(crc: u32, len: u64) -> u32 {
  multiply(xpow8n(len), crc)
}

/// CRC of `A || B` from `crc(A)`, `crc(B)` and `len(B)`.
///
/// Works on finalized checksums (all-ones seed and complement cancel) and on
/// raw registers where `crc_b` started from zero.
#[inline]
#[must_use]
pub const fn combine(crc_a: u32, crc_b: u32, len_b: u64) -> u32 {
  shift(crc_a, len_b) ^ crc_b
}

// ─────────────────────────────────────────────────────────────────────────────
// Interleave Strides
// ─────────────────────────────────────────────────────────────────────────────

/// Bytes per lane while at least three of them remain.
pub const LONG_STRIDE: usize = 8 * 1024;
/// Bytes per lane for the remainder; `3 * SHORT_STRIDE` is the interleave threshold.
pub const SHORT_STRIDE: usize = 256;

/// Shift constants for one lane length.
#[cfg_attr(not(any(target_arch = "x86_64", target_arch = "aarch64")), allow(dead_code))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StrideKeys {
  /// Lane length in bytes (a multiple of 8).
  pub stride: usize,
  /// `x^(8 * stride) mod P`, for [`multiply`].
  pub soft: u32,
  /// `x^(8 * stride - 33) mod P`, for a carryless multiply followed by one
  /// 64-bit hardware CRC step (which contributes the missing `x^33`).
  pub clmul: u32,
}

#[cfg_attr(not(any(target_arch = "x86_64", target_arch = "aarch64")), allow(dead_code))]
impl StrideKeys {
  #[must_use]
  pub const fn new(stride: usize) -> Self {
    let bits = stride as u64 * 8;
    Self {
      stride,
      soft: xpow(bits),
      clmul: xpow(bits - 33),
    }
  }

  /// Bytes consumed by one three-lane group.
  #[inline]
  #[must_use]
  pub const fn group(&self) -> usize {
    self.stride * 3
  }

  /// Merge three lane registers with the portable multiply.
  #[inline]
  #[must_use]
  pub const fn merge_soft(&self, a: u32, b: u32, c: u32) -> u32 {
    multiply(self.soft, multiply(self.soft, a) ^ b) ^ c
  }
}

/// Lane strides, longest first.
#[cfg_attr(not(any(target_arch = "x86_64", target_arch = "aarch64")), allow(dead_code))]
pub const STRIDES: [StrideKeys; 2] = [StrideKeys::new(LONG_STRIDE), StrideKeys::new(SHORT_STRIDE)];

const _: () = assert!(LONG_STRIDE % 8 == 0 && SHORT_STRIDE % 8 == 0);
const _: () = assert!(SHORT_STRIDE * 8 > 33);
