//! aarch64-accelerated CRC32-C.
//!
//! Uses the ARMv8 CRC32 extension (`crc32cx`) on 8-byte words, with the same
//! three-lane interleave as the x86_64 kernels. Lane registers are merged
//! with the portable GF(2) multiply or with one `pmull` plus one `crc32cx`.
//!
//! Safety:
//! - This file is allowed to use `unsafe` for ISA-specific intrinsics.
//! - All unsafe is contained within this module.

#![allow(unsafe_code)]
#![allow(unsafe_op_in_unsafe_fn)]

use core::arch::aarch64::{__crc32cd, vmull_p64};

use crate::{
  combine::{STRIDES, StrideKeys},
  portable,
};

#[inline(always)]
unsafe fn update_words(crc: u32, data: &[u8]) -> u32 {
  let (words, tail) = data.as_chunks::<8>();
  let mut crc = crc;
  for word in words {
    crc = __crc32cd(crc, u64::from_le_bytes(*word));
  }
  portable::update_bytewise(crc, tail)
}

#[inline(always)]
unsafe fn lanes3(crc: u32, group: &[u8], stride: usize) -> (u32, u32, u32) {
  let (a, rest) = group.split_at(stride);
  let (b, c) = rest.split_at(stride);
  let (a, _) = a.as_chunks::<8>();
  let (b, _) = b.as_chunks::<8>();
  let (c, _) = c.as_chunks::<8>();

  let (mut ca, mut cb, mut cc) = (crc, 0u32, 0u32);
  for ((wa, wb), wc) in a.iter().zip(b).zip(c) {
    ca = __crc32cd(ca, u64::from_le_bytes(*wa));
    cb = __crc32cd(cb, u64::from_le_bytes(*wb));
    cc = __crc32cd(cc, u64::from_le_bytes(*wc));
  }
  (ca, cb, cc)
}

/// `crc * x^(8 * stride) mod P`; `key` is `x^(8 * stride - 33)`.
#[inline(always)]
unsafe fn shift_pmull(crc: u32, key: u32) -> u32 {
  let product = vmull_p64(u64::from(crc), u64::from(key)) as u64;
  __crc32cd(0, product)
}

#[inline(always)]
unsafe fn merge<const PMULL: bool>(keys: &StrideKeys, a: u32, b: u32, c: u32) -> u32 {
  if PMULL {
    shift_pmull(shift_pmull(a, keys.clmul) ^ b, keys.clmul) ^ c
  } else {
    keys.merge_soft(a, b, c)
  }
}

#[inline(always)]
unsafe fn compute_interleaved<const PMULL: bool>(crc: u32, data: &[u8]) -> u32 {
  let mut crc = crc;
  let mut rest = data;

  for keys in &STRIDES {
    while let Some((group, tail)) = rest.split_at_checked(keys.group()) {
      let (a, b, c) = lanes3(crc, group, keys.stride);
      crc = merge::<PMULL>(keys, a, b, c);
      rest = tail;
    }
  }

  update_words(crc, rest)
}

/// # Safety
/// Caller must ensure the CPU supports `crc`.
#[target_feature(enable = "crc")]
unsafe fn compute_crc_unchecked(crc: u32, data: &[u8]) -> u32 {
  compute_interleaved::<false>(crc, data)
}

/// # Safety
/// Caller must ensure the CPU supports `crc` and `aes` (PMULL).
#[target_feature(enable = "crc", enable = "aes")]
unsafe fn compute_crc_pmull_unchecked(crc: u32, data: &[u8]) -> u32 {
  compute_interleaved::<true>(crc, data)
}

#[inline]
pub(crate) fn compute_crc(crc: u32, data: &[u8]) -> u32 {
  debug_assert!(platform::caps().has(platform::caps::aarch64::CRC_READY));
  // SAFETY: only reachable through an `Engine` built after `CRC_READY` was detected.
  unsafe { compute_crc_unchecked(crc, data) }
}

#[inline]
pub(crate) fn compute_crc_pmull(crc: u32, data: &[u8]) -> u32 {
  debug_assert!(platform::caps().has(platform::caps::aarch64::CRC_PMULL_READY));
  // SAFETY: only reachable through an `Engine` built after `CRC_PMULL_READY` was detected.
  unsafe { compute_crc_pmull_unchecked(crc, data) }
}
