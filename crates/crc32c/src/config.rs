//! CRC32-C runtime configuration (backend overrides).
//!
//! The only knob is a forced backend tier, read once from the environment:
//!
//! ```text
//! CRC32C_FORCE=auto | portable | hwcrc | clmul
//! ```
//!
//! Forced modes are always clamped to detected CPU capabilities, so forcing
//! can never select a kernel the processor cannot run.

use core::{fmt, str::FromStr};

use platform::Caps;

/// Environment variable holding the forced backend tier.
pub const ENV_FORCE: &str = "CRC32C_FORCE";

/// Forced backend selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Hash)]
pub enum Force {
  /// Fastest supported backend.
  #[default]
  Auto,
  /// Portable slicing-by-8 tables.
  Portable,
  /// Hardware CRC word steps with portable lane merging.
  ///
  /// - x86_64: SSE4.2 `crc32`
  /// - aarch64: ARMv8 CRC extension
  Hwcrc,
  /// Hardware CRC word steps with carryless-multiply lane merging.
  Clmul,
}

impl Force {
  #[must_use]
  pub const fn as_str(self) -> &'static str {
    match self {
      Self::Auto => "auto",
      Self::Portable => "portable",
      Self::Hwcrc => "hwcrc",
      Self::Clmul => "clmul",
    }
  }
}

impl fmt::Display for Force {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Error returned when a force value is not recognised.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ParseForceError {
  #[error("empty backend name")]
  Empty,
  #[error("unknown backend name (expected auto, portable, hwcrc or clmul)")]
  Unknown,
}

impl FromStr for Force {
  type Err = ParseForceError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let value = s.trim();
    if value.is_empty() {
      return Err(ParseForceError::Empty);
    }

    let is = |names: &[&str]| names.iter().any(|name| value.eq_ignore_ascii_case(name));
    if is(&["auto"]) {
      Ok(Self::Auto)
    } else if is(&["portable", "table", "scalar"]) {
      Ok(Self::Portable)
    } else if is(&["hwcrc", "crc", "sse42", "sse4.2"]) {
      Ok(Self::Hwcrc)
    } else if is(&["clmul", "pclmul", "pclmulqdq", "pmull"]) {
      Ok(Self::Clmul)
    } else {
      Err(ParseForceError::Unknown)
    }
  }
}

/// Effective configuration after applying overrides.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
  /// Force mode as requested (environment).
  pub requested: Force,
  /// Force mode clamped to detected CPU capabilities.
  pub effective: Force,
}

impl Config {
  /// Whether an explicit request was downgraded to fit the CPU.
  #[inline]
  #[must_use]
  pub fn is_clamped(&self) -> bool {
    self.requested != Force::Auto && self.effective != self.requested
  }
}

/// Interpret the raw value of [`ENV_FORCE`].
///
/// Unset or blank means [`Force::Auto`]. Unrecognised values are logged and
/// also mean `Auto`.
#[must_use]
pub fn force_from_env(value: Option<&str>) -> Force {
  let Some(value) = value else {
    return Force::Auto;
  };

  match value.parse::<Force>() {
    Ok(force) => force,
    Err(ParseForceError::Empty) => Force::Auto,
    Err(error) => {
      tracing::warn!(variable = ENV_FORCE, value = %value, %error, "ignoring CRC32-C backend override");
      Force::Auto
    }
  }
}

#[cfg(feature = "std")]
fn read_env_force() -> Force {
  force_from_env(std::env::var(ENV_FORCE).ok().as_deref())
}

#[cfg(feature = "std")]
fn requested_force() -> Force {
  use std::sync::OnceLock;
  static FORCE: OnceLock<Force> = OnceLock::new();
  *FORCE.get_or_init(read_env_force)
}

#[cfg(not(feature = "std"))]
fn requested_force() -> Force {
  Force::Auto
}

/// Clamp `requested` to what `caps` supports.
///
/// `Clmul` degrades to `Hwcrc`, and `Hwcrc` to `Auto`, as support disappears.
#[must_use]
pub fn clamp(requested: Force, caps: Caps) -> Force {
  let (hwcrc, clmul) = tier_requirements();
  match requested {
    Force::Auto | Force::Portable => requested,
    Force::Clmul if clmul.is_some_and(|req| caps.has(req)) => Force::Clmul,
    Force::Clmul | Force::Hwcrc if hwcrc.is_some_and(|req| caps.has(req)) => Force::Hwcrc,
    Force::Clmul | Force::Hwcrc => Force::Auto,
  }
}

/// Capabilities needed by the `Hwcrc` and `Clmul` tiers on this target.
const fn tier_requirements() -> (Option<Caps>, Option<Caps>) {
  #[cfg(target_arch = "x86_64")]
  {
    use platform::caps::x86;
    (Some(x86::CRC32C_READY), Some(x86::CRC32C_CLMUL_READY))
  }
  #[cfg(target_arch = "aarch64")]
  {
    use platform::caps::aarch64;
    (Some(aarch64::CRC_READY), Some(aarch64::CRC_PMULL_READY))
  }
  #[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
  {
    (None, None)
  }
}

/// Configuration for `requested` on a processor reporting `caps`.
#[must_use]
pub fn resolve(requested: Force, caps: Caps) -> Config {
  Config {
    requested,
    effective: clamp(requested, caps),
  }
}

/// Effective configuration for this process.
#[must_use]
pub fn get() -> Config {
  resolve(requested_force(), platform::caps())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parses_aliases_case_insensitively() {
    assert_eq!("AUTO".parse(), Ok(Force::Auto));
    assert_eq!(" table ".parse(), Ok(Force::Portable));
    assert_eq!("Scalar".parse(), Ok(Force::Portable));
    assert_eq!("crc".parse(), Ok(Force::Hwcrc));
    assert_eq!("SSE42".parse(), Ok(Force::Hwcrc));
    assert_eq!("pmull".parse(), Ok(Force::Clmul));
    assert_eq!("PCLMUL".parse(), Ok(Force::Clmul));
  }

  #[test]
  fn rejects_empty_and_unknown() {
    assert_eq!("".parse::<Force>(), Err(ParseForceError::Empty));
    assert_eq!("   ".parse::<Force>(), Err(ParseForceError::Empty));
    assert_eq!("avx512".parse::<Force>(), Err(ParseForceError::Unknown));
  }

  #[test]
  fn display_round_trips_names() {
    for force in [Force::Auto, Force::Portable, Force::Hwcrc, Force::Clmul] {
      assert_eq!(force.as_str().parse(), Ok(force));
    }
  }

  #[test]
  fn clamping_without_caps() {
    assert_eq!(clamp(Force::Auto, Caps::NONE), Force::Auto);
    assert_eq!(clamp(Force::Portable, Caps::NONE), Force::Portable);
    assert_eq!(clamp(Force::Hwcrc, Caps::NONE), Force::Auto);
    assert_eq!(clamp(Force::Clmul, Caps::NONE), Force::Auto);
  }

  #[test]
  #[cfg(target_arch = "x86_64")]
  fn clamping_steps_down_on_x86() {
    use platform::caps::x86;

    assert_eq!(clamp(Force::Clmul, x86::CRC32C_CLMUL_READY), Force::Clmul);
    assert_eq!(clamp(Force::Clmul, x86::SSE42), Force::Hwcrc);
    assert_eq!(clamp(Force::Hwcrc, x86::CRC32C_CLMUL_READY), Force::Hwcrc);
    assert_eq!(clamp(Force::Clmul, x86::PCLMULQDQ), Force::Auto);
  }

  #[test]
  #[cfg(target_arch = "aarch64")]
  fn clamping_steps_down_on_aarch64() {
    use platform::caps::aarch64;

    assert_eq!(clamp(Force::Clmul, aarch64::CRC_PMULL_READY), Force::Clmul);
    assert_eq!(clamp(Force::Clmul, aarch64::CRC), Force::Hwcrc);
    assert_eq!(clamp(Force::Clmul, aarch64::PMULL), Force::Auto);
  }

  #[test]
  fn env_unset_or_blank_is_auto() {
    assert_eq!(force_from_env(None), Force::Auto);
    assert_eq!(force_from_env(Some("")), Force::Auto);
    assert_eq!(force_from_env(Some("  ")), Force::Auto);
  }

  #[test]
  fn env_accepts_aliases() {
    assert_eq!(force_from_env(Some("portable")), Force::Portable);
    assert_eq!(force_from_env(Some("Table")), Force::Portable);
    assert_eq!(force_from_env(Some("sse4.2")), Force::Hwcrc);
    assert_eq!(force_from_env(Some(" PCLMULQDQ ")), Force::Clmul);
    assert_eq!(force_from_env(Some("auto")), Force::Auto);
  }

  #[test]
  fn env_garbage_falls_back_to_auto() {
    assert_eq!(force_from_env(Some("nonsense")), Force::Auto);
    assert_eq!(force_from_env(Some("avx512")), Force::Auto);
  }

  #[test]
  fn resolve_reports_clamping() {
    let config = resolve(Force::Clmul, Caps::NONE);
    assert_eq!(config.effective, Force::Auto);
    assert!(config.is_clamped());

    assert!(!resolve(Force::Auto, Caps::NONE).is_clamped());
    assert!(!resolve(Force::Portable, Caps::NONE).is_clamped());
  }

  #[test]
  #[cfg(target_arch = "x86_64")]
  fn resolve_partial_support_on_x86() {
    use platform::caps::x86;

    let config = resolve(Force::Clmul, x86::SSE42);
    assert_eq!(config.effective, Force::Hwcrc);
    assert!(config.is_clamped());
    assert!(!resolve(Force::Clmul, x86::CRC32C_CLMUL_READY).is_clamped());
  }

  #[test]
  fn effective_never_exceeds_caps() {
    let config = get();
    assert_eq!(config.effective, clamp(config.requested, platform::caps()));
  }
}
