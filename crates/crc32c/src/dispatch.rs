//! Backend selection and the process-wide engine.
//!
//! Selection runs once: detect capabilities, apply the force configuration,
//! pick the first supported candidate, cache the resulting [`Engine`]. After
//! that every call is a single indirect call through the engine's kernel.
//!
//! Order (best first):
//! - x86_64: SSE4.2 + PCLMULQDQ, SSE4.2, portable
//! - aarch64: CRC + PMULL, CRC, portable
//! - other targets: portable

use core::fmt;

use backend::{
  OnceCache, candidates,
  dispatch::{Candidate, Selected},
};
use platform::Caps;

use crate::{
  config::{self, Force},
  portable,
};

/// Kernel signature: advance a raw CRC register over a buffer.
pub type Crc32cFn = fn(u32, &[u8]) -> u32;

// ─────────────────────────────────────────────────────────────────────────────
// Backends
// ─────────────────────────────────────────────────────────────────────────────

/// The closed set of CRC32-C implementations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Backend {
  /// Slicing-by-8 tables; always available.
  Portable,
  /// x86_64 SSE4.2 `crc32`, lanes merged in software.
  Sse42,
  /// x86_64 SSE4.2 `crc32`, lanes merged with PCLMULQDQ.
  Sse42Clmul,
  /// aarch64 CRC extension, lanes merged in software.
  ArmCrc,
  /// aarch64 CRC extension, lanes merged with PMULL.
  ArmCrcPmull,
}

impl Backend {
  /// Every backend, in no particular order.
  pub const ALL: [Self; 5] = [
    Self::Portable,
    Self::Sse42,
    Self::Sse42Clmul,
    Self::ArmCrc,
    Self::ArmCrcPmull,
  ];

  /// Stable diagnostic name.
  #[must_use]
  pub const fn name(self) -> &'static str {
    match self {
      Self::Portable => "portable/slice8",
      Self::Sse42 => "x86_64/sse4.2",
      Self::Sse42Clmul => "x86_64/sse4.2+pclmulqdq",
      Self::ArmCrc => "aarch64/crc",
      Self::ArmCrcPmull => "aarch64/crc+pmull",
    }
  }

  /// Capabilities the backend needs.
  #[must_use]
  pub const fn requires(self) -> Caps {
    use platform::caps::{aarch64, x86};

    match self {
      Self::Portable => Caps::NONE,
      Self::Sse42 => x86::CRC32C_READY,
      Self::Sse42Clmul => x86::CRC32C_CLMUL_READY,
      Self::ArmCrc => aarch64::CRC_READY,
      Self::ArmCrcPmull => aarch64::CRC_PMULL_READY,
    }
  }

  /// The force tier this backend belongs to.
  #[must_use]
  pub const fn tier(self) -> Force {
    match self {
      Self::Portable => Force::Portable,
      Self::Sse42 | Self::ArmCrc => Force::Hwcrc,
      Self::Sse42Clmul | Self::ArmCrcPmull => Force::Clmul,
    }
  }

  /// Kernel for this backend, if it is compiled for the current target.
  #[must_use]
  fn kernel(self) -> Option<Crc32cFn> {
    match self {
      Self::Portable => Some(portable::compute),
      #[cfg(target_arch = "x86_64")]
      Self::Sse42 => Some(crate::x86_64::compute_sse42),
      #[cfg(target_arch = "x86_64")]
      Self::Sse42Clmul => Some(crate::x86_64::compute_sse42_clmul),
      #[cfg(target_arch = "aarch64")]
      Self::ArmCrc => Some(crate::aarch64::compute_crc),
      #[cfg(target_arch = "aarch64")]
      Self::ArmCrcPmull => Some(crate::aarch64::compute_crc_pmull),
      _ => None,
    }
  }
}

impl fmt::Display for Backend {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name())
  }
}

#[cfg(target_arch = "x86_64")]
const CANDIDATES: &[Candidate<Backend>] = candidates![
  "x86_64/sse4.2+pclmulqdq" => platform::caps::x86::CRC32C_CLMUL_READY => Backend::Sse42Clmul,
  "x86_64/sse4.2"           => platform::caps::x86::CRC32C_READY       => Backend::Sse42,
  "portable/slice8"         => Caps::NONE                              => Backend::Portable,
];

#[cfg(target_arch = "aarch64")]
const CANDIDATES: &[Candidate<Backend>] = candidates![
  "aarch64/crc+pmull" => platform::caps::aarch64::CRC_PMULL_READY => Backend::ArmCrcPmull,
  "aarch64/crc"       => platform::caps::aarch64::CRC_READY       => Backend::ArmCrc,
  "portable/slice8"   => Caps::NONE                               => Backend::Portable,
];

#[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
const CANDIDATES: &[Candidate<Backend>] = candidates!["portable/slice8" => Caps::NONE => Backend::Portable];

/// Best backend for `caps` under `force`.
///
/// Pure: the force is clamped to `caps` first, so the result is always
/// runnable on a processor reporting `caps`.
#[must_use]
pub fn select_backend(caps: Caps, force: Force) -> Backend {
  select_candidate(caps, force).value
}

fn select_candidate(caps: Caps, force: Force) -> Selected<Backend> {
  let force = config::clamp(force, caps);
  let admitted = CANDIDATES.iter().filter(|candidate| match force {
    Force::Auto | Force::Clmul => true,
    Force::Hwcrc => candidate.value.tier() != Force::Clmul,
    Force::Portable => candidate.value == Backend::Portable,
  });

  backend::select(caps, admitted).unwrap_or(Selected {
    name: Backend::Portable.name(),
    value: Backend::Portable,
  })
}

// ─────────────────────────────────────────────────────────────────────────────
// Engine
// ─────────────────────────────────────────────────────────────────────────────

/// An immutable handle to one CRC32-C backend.
///
/// Obtain the process-wide engine with [`initialize`](crate::initialize), or a
/// specific one with [`Engine::with_backend`]. Engines are `Copy` and can be
/// shared freely between threads.
#[derive(Clone, Copy)]
pub struct Engine {
  backend: Backend,
  kernel: Crc32cFn,
}

impl Engine {
  /// The portable engine; available on every target.
  #[must_use]
  pub const fn portable() -> Self {
    Self {
      backend: Backend::Portable,
      kernel: portable::compute,
    }
  }

  /// Engine for `backend`, if the detected capabilities allow it.
  #[must_use]
  pub fn with_backend(backend: Backend) -> Option<Self> {
    Self::for_caps(backend, platform::caps())
  }

  fn for_caps(backend: Backend, caps: Caps) -> Option<Self> {
    if !caps.has(backend.requires()) {
      return None;
    }
    Some(Self {
      backend,
      kernel: backend.kernel()?,
    })
  }

  /// Every engine the current processor can run, portable first.
  pub fn available() -> impl Iterator<Item = Self> {
    Backend::ALL.into_iter().filter_map(Self::with_backend)
  }

  #[inline]
  #[must_use]
  pub const fn backend(&self) -> Backend {
    self.backend
  }

  /// CRC32-C of `data`.
  #[inline]
  #[must_use]
  pub fn compute(&self, data: &[u8]) -> u32 {
    (self.kernel)(!0, data) ^ !0
  }

  /// CRC32-C of `A ++ data`, given `crc = CRC32-C(A)`.
  #[inline]
  #[must_use]
  pub fn extend(&self, crc: u32, data: &[u8]) -> u32 {
    (self.kernel)(crc ^ !0, data) ^ !0
  }

  /// Advance a raw (non-complemented) register.
  #[inline]
  pub(crate) fn update(&self, state: u32, data: &[u8]) -> u32 {
    (self.kernel)(state, data)
  }
}

impl PartialEq for Engine {
  fn eq(&self, other: &Self) -> bool {
    self.backend == other.backend
  }
}

impl Eq for Engine {}

impl fmt::Debug for Engine {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Engine").field("backend", &self.backend.name()).finish()
  }
}

impl Default for Engine {
  fn default() -> Self {
    initialize()
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// Process-wide Selection
// ─────────────────────────────────────────────────────────────────────────────

static ENGINE: OnceCache<Engine> = OnceCache::new();

/// Select the process-wide engine, once.
///
/// Concurrent first callers block (or spin, without `std`) until selection
/// finishes; every caller gets the same engine.
#[inline]
pub fn initialize() -> Engine {
  ENGINE.get_or_init(select_engine)
}

fn select_engine() -> Engine {
  let caps = platform::caps();
  let config = config::get();

  if config.is_clamped() {
    tracing::warn!(
      requested = config.requested.as_str(),
      effective = config.effective.as_str(),
      caps = ?caps,
      "forced CRC32-C backend is not supported by this CPU; falling back"
    );
  }

  let selected = select_candidate(caps, config.effective);
  let engine = Engine::for_caps(selected.value, caps).unwrap_or(Engine::portable());
  tracing::debug!(
    candidate = selected.name,
    backend = engine.backend.name(),
    forced = config.effective.as_str(),
    caps = ?caps,
    "selected CRC32-C backend"
  );
  engine
}
