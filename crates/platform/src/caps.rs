//! CPU capability flags.
//!
//! [`Caps`] answers one question: "which CRC-relevant instructions can this
//! process legally execute?" It is a small `Copy` bitset; dispatch code checks
//! a required set against the detected set with [`Caps::has`].
//!
//! # Bit Layout
//!
//! - Bits 0-31: x86_64 features
//! - Bits 32-63: aarch64 features
//!
//! Flags for a foreign architecture are never set by detection, so a kernel
//! requiring them is simply never selected.
//!
//! # Usage
//!
//! ```
//! use platform::caps::{Caps, x86};
//!
//! let detected = x86::SSE42 | x86::PCLMULQDQ;
//! assert!(detected.has(x86::CRC32C_READY));
//! assert!(detected.has(x86::CRC32C_CLMUL_READY));
//! assert!(!Caps::NONE.has(x86::CRC32C_READY));
//! ```

use core::fmt;

/// CPU capabilities: a 64-bit feature bitset.
///
/// `Caps` is `Copy`, `Send` and `Sync`; detection produces one value per
/// process and every thread reads the same copy.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Caps(pub(crate) u64);

impl Caps {
  /// Empty capability set.
  pub const NONE: Self = Self(0);

  /// Capability set with a single bit set.
  #[inline]
  #[must_use]
  pub const fn bit(bit: u8) -> Self {
    Self(1u64 << (bit & 63))
  }

  /// Check if every feature in `required` is present.
  #[inline(always)]
  #[must_use]
  pub const fn has(self, required: Self) -> bool {
    self.0 & required.0 == required.0
  }

  /// Union of two capability sets.
  #[inline]
  #[must_use]
  pub const fn union(self, other: Self) -> Self {
    Self(self.0 | other.0)
  }

  /// Names of the features present, in bit order.
  pub fn names(self) -> impl Iterator<Item = &'static str> {
    FEATURES.iter().filter(move |(flag, _)| self.has(*flag)).map(|&(_, name)| name)
  }
}

impl core::ops::BitOr for Caps {
  type Output = Self;

  #[inline]
  fn bitor(self, rhs: Self) -> Self {
    self.union(rhs)
  }
}

impl core::ops::BitOrAssign for Caps {
  #[inline]
  fn bitor_assign(&mut self, rhs: Self) {
    *self = self.union(rhs);
  }
}

impl fmt::Debug for Caps {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_set().entries(self.names()).finish()
  }
}

/// x86_64 feature flags.
pub mod x86 {
  use super::Caps;

  /// SSE4.2 (`crc32` instruction, Castagnoli polynomial only).
  pub const SSE42: Caps = Caps::bit(0);
  /// PCLMULQDQ carryless multiply.
  pub const PCLMULQDQ: Caps = Caps::bit(1);

  /// Hardware CRC32-C word steps.
  pub const CRC32C_READY: Caps = SSE42;
  /// Hardware CRC32-C word steps plus carryless-multiply merging.
  pub const CRC32C_CLMUL_READY: Caps = SSE42.union(PCLMULQDQ);
}

/// aarch64 feature flags.
pub mod aarch64 {
  use super::Caps;

  /// ARMv8 CRC32 extension (`crc32c*` instructions).
  pub const CRC: Caps = Caps::bit(32);
  /// 64x64 -> 128 polynomial multiply (`pmull`, part of FEAT_PMULL / `aes`).
  pub const PMULL: Caps = Caps::bit(33);

  pub const CRC_READY: Caps = CRC;
  pub const CRC_PMULL_READY: Caps = CRC.union(PMULL);
}

const FEATURES: [(Caps, &str); 4] = [
  (x86::SSE42, "sse4.2"),
  (x86::PCLMULQDQ, "pclmulqdq"),
  (aarch64::CRC, "crc"),
  (aarch64::PMULL, "pmull"),
];

#[cfg(test)]
mod tests {
  extern crate alloc;

  use alloc::{format, vec::Vec};

  use super::*;

  #[test]
  fn none_is_empty() {
    assert_eq!(Caps::NONE, Caps::default());
    assert!(Caps::NONE.has(Caps::NONE));
    assert_eq!(Caps::NONE.names().next(), None);
  }

  #[test]
  fn has_requires_every_bit() {
    let sse = x86::SSE42;
    assert!(sse.has(x86::CRC32C_READY));
    assert!(!sse.has(x86::CRC32C_CLMUL_READY));
    assert!((sse | x86::PCLMULQDQ).has(x86::CRC32C_CLMUL_READY));
  }

  #[test]
  fn architectures_do_not_overlap() {
    let x86_all = x86::SSE42 | x86::PCLMULQDQ;
    let arm_all = aarch64::CRC | aarch64::PMULL;
    assert_eq!(x86_all.union(arm_all).names().count(), 4);
    assert!(!x86_all.has(aarch64::CRC_READY));
    assert!(!arm_all.has(x86::CRC32C_READY));
  }

  #[test]
  fn names_follow_bit_order() {
    let caps = aarch64::PMULL | x86::SSE42;
    let names: Vec<_> = caps.names().collect();
    assert_eq!(names, ["sse4.2", "pmull"]);
    assert_eq!(format!("{caps:?}"), r#"{"sse4.2", "pmull"}"#);
  }
}
