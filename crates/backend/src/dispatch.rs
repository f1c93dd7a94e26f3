//! Kernel candidates and first-match selection.
//!
//! - [`Candidate`]: a kernel (or any `Copy` value) with capability requirements
//! - [`Selected`]: the result of selection
//! - [`select`]: choose the best candidate for a capability set
//! - [`candidates!`](crate::candidates): build a candidate slice tersely
//!
//! Selection is a pure function of the capability set and the list, so
//! callers can test it with hand-built [`Caps`] values.

use platform::Caps;

// ─────────────────────────────────────────────────────────────────────────────
// Core Types
// ─────────────────────────────────────────────────────────────────────────────

/// A candidate with capability requirements.
///
/// Candidates are ordered from best to worst. The first one whose
/// requirements are a subset of the detected capabilities wins.
#[derive(Clone, Copy, Debug)]
pub struct Candidate<T> {
  /// Human-readable name for diagnostics (e.g. `"x86_64/sse4.2"`).
  pub name: &'static str,
  /// Required CPU capabilities.
  pub requires: Caps,
  /// The kernel, or whatever the caller selects between.
  pub value: T,
}

impl<T> Candidate<T> {
  #[inline]
  #[must_use]
  pub const fn new(name: &'static str, requires: Caps, value: T) -> Self {
    Self { name, requires, value }
  }
}

/// The result of selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Selected<T> {
  pub name: &'static str,
  pub value: T,
}

/// Select the first candidate whose requirements `caps` satisfies.
///
/// Returns `None` only when no candidate matches; a list ending in a
/// `Caps::NONE` fallback always yields `Some`.
#[inline]
#[must_use]
pub fn select<'a, T: Copy + 'a>(caps: Caps, candidates: impl IntoIterator<Item = &'a Candidate<T>>) -> Option<Selected<T>> {
  candidates
    .into_iter()
    .find(|candidate| caps.has(candidate.requires))
    .map(|candidate| Selected {
      name: candidate.name,
      value: candidate.value,
    })
}

/// Build a `&[Candidate<_>]` from `name => requires => value` rows.
///
/// ```
/// use backend::{candidates, dispatch::Candidate};
/// use platform::Caps;
///
/// let list: &[Candidate<u8>] = candidates![
///   "fast"     => Caps::bit(0) => 1,
///   "portable" => Caps::NONE   => 0,
/// ];
/// assert_eq!(list.len(), 2);
/// ```
#[macro_export]
macro_rules! candidates {
  ($($name:expr => $requires:expr => $value:expr),+ $(,)?) => {
    &[$($crate::dispatch::Candidate::new($name, $requires, $value)),+]
  };
}
