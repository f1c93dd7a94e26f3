//! CRC32-C (Castagnoli) checksums with runtime-selected hardware acceleration.
//!
//! CRC32-C uses polynomial `0x1EDC6F41` (reflected `0x82F63B78`), an all-ones
//! seed and an all-ones output complement. It protects iSCSI PDUs, ext4 and
//! Btrfs metadata, and many storage record formats.
//!
//! # Usage
//!
//! ```
//! // One-shot
//! assert_eq!(crc32c::compute(b"123456789"), 0xE306_9283);
//!
//! // Incremental: extend a checksum with more data
//! let crc = crc32c::compute(b"hello ");
//! assert_eq!(crc32c::extend(crc, b"world"), crc32c::compute(b"hello world"));
//!
//! // Combine checksums of adjacent spans without rehashing
//! let (a, b) = (crc32c::compute(b"hello "), crc32c::compute(b"world"));
//! assert_eq!(crc32c::combine(a, b, 5), crc32c::compute(b"hello world"));
//! ```
//!
//! # Hardware Acceleration
//!
//! The first call detects the CPU once and selects the fastest backend:
//!
//! - **x86_64**: SSE4.2 + PCLMULQDQ → SSE4.2 → portable
//! - **aarch64**: CRC + PMULL → CRC → portable
//! - **other**: portable slicing-by-8
//!
//! Every backend produces bit-identical results. Set `CRC32C_FORCE` to
//! `portable`, `hwcrc` or `clmul` to cap the tier; requests the CPU cannot
//! honor fall back to the best supported tier below them.
//!
//! # Features
//!
//! - `std` (default): runtime CPU detection, environment configuration,
//!   [`io`] adapters and `std::io::Write` for [`Crc32c`]. Without it only
//!   compile-time target features are used.

#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::indexing_slicing))]
#![no_std]

#[cfg(feature = "std")]
extern crate std;

mod combine;
pub mod config;
mod dispatch;
mod hasher;
#[cfg(feature = "std")]
pub mod io;
mod portable;
mod reference;
mod tables;

#[cfg(target_arch = "aarch64")]
mod aarch64;
#[cfg(target_arch = "x86_64")]
mod x86_64;

pub use dispatch::{Backend, Crc32cFn, Engine, initialize, select_backend};
pub use hasher::Crc32c;
pub use platform::Caps;

/// CRC32-C of `data` using the process-wide backend.
///
/// ```
/// assert_eq!(crc32c::compute(&[0u8; 32]), 0x8A91_36AA);
/// assert_eq!(crc32c::compute(b""), 0);
/// ```
#[inline]
#[must_use]
pub fn compute(data: &[u8]) -> u32 {
  initialize().compute(data)
}

/// CRC32-C of `A ++ data`, given `crc = compute(A)`.
///
/// `extend(crc, &[]) == crc` for every `crc`.
#[inline]
#[must_use]
pub fn extend(crc: u32, data: &[u8]) -> u32 {
  initialize().extend(crc, data)
}

/// CRC32-C of `A ++ B` from `compute(A)`, `compute(B)` and `len(B)`.
///
/// Runs in O(log len_b) without touching the data.
#[inline]
#[must_use]
pub const fn combine(crc_a: u32, crc_b: u32, len_b: usize) -> u32 {
  combine::combine(crc_a, crc_b, len_b as u64)
}

/// CRC32-C of `data` using the portable tables, bypassing dispatch.
#[inline]
#[must_use]
pub fn compute_portable(data: &[u8]) -> u32 {
  Engine::portable().compute(data)
}

/// [`extend`] using the portable tables, bypassing dispatch.
#[inline]
#[must_use]
pub fn extend_portable(crc: u32, data: &[u8]) -> u32 {
  Engine::portable().extend(crc, data)
}

/// Diagnostic name of the process-wide backend (e.g. `"x86_64/sse4.2+pclmulqdq"`).
#[inline]
#[must_use]
pub fn backend_name() -> &'static str {
  initialize().backend().name()
}

/// Raw-register primitives for differential fuzzing. Not a stable API.
#[doc(hidden)]
pub mod __internal {
  pub use crate::{
    combine::{LONG_STRIDE, shift},
    portable::compute as portable_update,
    reference::checksum as reference_checksum,
  };
}
