//! Runtime CPU detection.
//!
//! Detection combines two sources:
//!
//! - Compile-time target features (`cfg!(target_feature = "...")`), which are
//!   always valid for the running binary.
//! - Runtime probes (`is_x86_feature_detected!`, `is_aarch64_feature_detected!`)
//!   when the `std` feature is enabled.
//!
//! A missing feature is an ordinary outcome, never an error. Under Miri the
//! result is always [`Caps::NONE`] so only portable code is interpreted.

use crate::caps::Caps;

/// Probe the executing processor.
///
/// This is a pure read of processor state: calling it repeatedly returns the
/// same value. Prefer [`caps`], which runs the probe once per process.
#[must_use]
pub fn detect() -> Caps {
  if cfg!(miri) {
    return Caps::NONE;
  }
  compile_time().union(runtime())
}

/// Detected capabilities, probed at most once per process.
///
/// With `std` the result is cached in a `OnceLock`; concurrent first callers
/// block until the single probe finishes and all observe the same value.
/// Without `std` only compile-time features are reported, which needs no cache.
#[inline]
#[must_use]
pub fn caps() -> Caps {
  #[cfg(feature = "std")]
  {
    static CACHE: std::sync::OnceLock<Caps> = std::sync::OnceLock::new();
    *CACHE.get_or_init(detect)
  }

  #[cfg(not(feature = "std"))]
  {
    detect()
  }
}

/// Features the compiler was told it may assume.
#[allow(unused_mut)]
const fn compile_time() -> Caps {
  let mut caps = Caps::NONE;

  #[cfg(all(target_arch = "x86_64", target_feature = "sse4.2"))]
  {
    caps = caps.union(crate::caps::x86::SSE42);
  }
  #[cfg(all(target_arch = "x86_64", target_feature = "pclmulqdq"))]
  {
    caps = caps.union(crate::caps::x86::PCLMULQDQ);
  }
  #[cfg(all(target_arch = "aarch64", target_feature = "crc"))]
  {
    caps = caps.union(crate::caps::aarch64::CRC);
  }
  #[cfg(all(target_arch = "aarch64", target_feature = "aes"))]
  {
    caps = caps.union(crate::caps::aarch64::PMULL);
  }

  caps
}

#[cfg(all(feature = "std", target_arch = "x86_64"))]
fn runtime() -> Caps {
  use crate::caps::x86;

  let mut caps = Caps::NONE;
  if std::arch::is_x86_feature_detected!("sse4.2") {
    caps |= x86::SSE42;
  }
  if std::arch::is_x86_feature_detected!("pclmulqdq") {
    caps |= x86::PCLMULQDQ;
  }
  caps
}

#[cfg(all(feature = "std", target_arch = "aarch64"))]
fn runtime() -> Caps {
  use crate::caps::aarch64;

  let mut caps = Caps::NONE;
  if std::arch::is_aarch64_feature_detected!("crc") {
    caps |= aarch64::CRC;
  }
  if std::arch::is_aarch64_feature_detected!("pmull") {
    caps |= aarch64::PMULL;
  }
  caps
}

#[cfg(not(all(feature = "std", any(target_arch = "x86_64", target_arch = "aarch64"))))]
fn runtime() -> Caps {
  Caps::NONE
}
