//! x86_64-accelerated CRC32-C.
//!
//! Uses SSE4.2 `crc32` on 8-byte words. Buffers of at least one short group
//! (`3 * SHORT_STRIDE` bytes) run three independent lanes in lockstep to hide
//! the instruction's latency; lane registers are merged either with the
//! portable GF(2) multiply or with one PCLMULQDQ plus one `crc32` step.
//!
//! Safety:
//! - This file is allowed to use `unsafe` for ISA-specific intrinsics.
//! - All unsafe is contained within this module.

#![allow(unsafe_code)]
#![allow(unsafe_op_in_unsafe_fn)]

use core::arch::x86_64::{_mm_clmulepi64_si128, _mm_crc32_u64, _mm_cvtsi32_si128, _mm_cvtsi128_si64};

use crate::{
  combine::{STRIDES, StrideKeys},
  portable,
};

// ─────────────────────────────────────────────────────────────────────────────
// Building Blocks
// ─────────────────────────────────────────────────────────────────────────────

/// Hardware word loop, then the portable byte step for the tail.
#[inline(always)]
unsafe fn update_words(crc: u32, data: &[u8]) -> u32 {
  let (words, tail) = data.as_chunks::<8>();
  let mut crc = u64::from(crc);
  for word in words {
    crc = _mm_crc32_u64(crc, u64::from_le_bytes(*word));
  }
  portable::update_bytewise(crc as u32, tail)
}

/// Run three consecutive `stride`-byte lanes of `group` in lockstep.
///
/// Lane A continues from `crc`; lanes B and C start from zero.
#[inline(always)]
unsafe fn lanes3(crc: u32, group: &[u8], stride: usize) -> (u32, u32, u32) {
  let (a, rest) = group.split_at(stride);
  let (b, c) = rest.split_at(stride);
  let (a, _) = a.as_chunks::<8>();
  let (b, _) = b.as_chunks::<8>();
  let (c, _) = c.as_chunks::<8>();

  let (mut ca, mut cb, mut cc) = (u64::from(crc), 0u64, 0u64);
  for ((wa, wb), wc) in a.iter().zip(b).zip(c) {
    ca = _mm_crc32_u64(ca, u64::from_le_bytes(*wa));
    cb = _mm_crc32_u64(cb, u64::from_le_bytes(*wb));
    cc = _mm_crc32_u64(cc, u64::from_le_bytes(*wc));
  }
  (ca as u32, cb as u32, cc as u32)
}

/// `crc * x^(8 * stride) mod P` via carryless multiply.
///
/// `key` is `x^(8 * stride - 33)`; the 64-bit `crc32` step supplies `x^33`.
#[inline(always)]
unsafe fn shift_clmul(crc: u32, key: u32) -> u32 {
  let product = _mm_clmulepi64_si128::<0x00>(_mm_cvtsi32_si128(crc as i32), _mm_cvtsi32_si128(key as i32));
  _mm_crc32_u64(0, _mm_cvtsi128_si64(product) as u64) as u32
}

#[inline(always)]
unsafe fn merge<const CLMUL: bool>(keys: &StrideKeys, a: u32, b: u32, c: u32) -> u32 {
  if CLMUL {
    shift_clmul(shift_clmul(a, keys.clmul) ^ b, keys.clmul) ^ c
  } else {
    keys.merge_soft(a, b, c)
  }
}

#[inline(always)]
unsafe fn compute_interleaved<const CLMUL: bool>(crc: u32, data: &[u8]) -> u32 {
  let mut crc = crc;
  let mut rest = data;

  for keys in &STRIDES {
    while let Some((group, tail)) = rest.split_at_checked(keys.group()) {
      let (a, b, c) = lanes3(crc, group, keys.stride);
      crc = merge::<CLMUL>(keys, a, b, c);
      rest = tail;
    }
  }

  update_words(crc, rest)
}

// ─────────────────────────────────────────────────────────────────────────────
// Kernels
// ─────────────────────────────────────────────────────────────────────────────

/// CRC32-C over the raw register using SSE4.2.
///
/// # Safety
/// Caller must ensure the CPU supports `sse4.2`.
#[target_feature(enable = "sse4.2")]
unsafe fn compute_sse42_unchecked(crc: u32, data: &[u8]) -> u32 {
  compute_interleaved::<false>(crc, data)
}

/// CRC32-C over the raw register using SSE4.2 and PCLMULQDQ.
///
/// # Safety
/// Caller must ensure the CPU supports `sse4.2` and `pclmulqdq`.
#[target_feature(enable = "sse4.2", enable = "pclmulqdq")]
unsafe fn compute_sse42_clmul_unchecked(crc: u32, data: &[u8]) -> u32 {
  compute_interleaved::<true>(crc, data)
}

#[inline]
pub(crate) fn compute_sse42(crc: u32, data: &[u8]) -> u32 {
  debug_assert!(platform::caps().has(platform::caps::x86::CRC32C_READY));
  // SAFETY: only reachable through an `Engine` built after `CRC32C_READY` was detected.
  unsafe { compute_sse42_unchecked(crc, data) }
}

#[inline]
pub(crate) fn compute_sse42_clmul(crc: u32, data: &[u8]) -> u32 {
  debug_assert!(platform::caps().has(platform::caps::x86::CRC32C_CLMUL_READY));
  // SAFETY: only reachable through an `Engine` built after `CRC32C_CLMUL_READY` was detected.
  unsafe { compute_sse42_clmul_unchecked(crc, data) }
}
