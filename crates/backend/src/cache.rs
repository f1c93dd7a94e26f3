//! Lazily initialized, process-wide values.
//!
//! [`OnceCache`] has the semantics of `std::sync::OnceLock` for `Copy`
//! values but also works without `std`.
//!
//! # Caching Strategy
//!
//! - **std**: `OnceLock`
//! - **no_std with atomics**: a three-state atomic machine; losers of the
//!   initialization race spin until the winner publishes
//! - **no_std without atomics**: recomputed on every call (single-threaded
//!   targets only)

#[cfg(all(not(feature = "std"), target_has_atomic = "8"))]
use core::cell::UnsafeCell;
#[cfg(all(not(feature = "std"), target_has_atomic = "8"))]
use core::mem::MaybeUninit;

/// A value computed on first use and then shared by every caller.
///
/// The initializer runs to completion at most once on targets with atomics.
/// Every caller, including ones that raced the first, observes the same value.
/// If the initializer panics the cache stays empty and the next caller runs
/// its own initializer, as with `OnceLock`.
pub struct OnceCache<T: Copy> {
  #[cfg(feature = "std")]
  inner: std::sync::OnceLock<T>,

  #[cfg(all(not(feature = "std"), target_has_atomic = "8"))]
  state: core::sync::atomic::AtomicU8,
  #[cfg(all(not(feature = "std"), target_has_atomic = "8"))]
  value: UnsafeCell<MaybeUninit<T>>,

  #[cfg(all(not(feature = "std"), not(target_has_atomic = "8")))]
  _marker: core::marker::PhantomData<T>,
}

// SAFETY: `value` is written exactly once, by the thread that moved `state`
// from UNINIT to INITING, and only read after `state` is READY (Acquire pairs
// with the Release store that publishes it).
#[allow(unsafe_code)]
#[cfg(all(not(feature = "std"), target_has_atomic = "8"))]
unsafe impl<T: Copy + Send + Sync> Sync for OnceCache<T> {}

#[cfg(all(not(feature = "std"), target_has_atomic = "8"))]
const UNINIT: u8 = 0;
#[cfg(all(not(feature = "std"), target_has_atomic = "8"))]
const INITING: u8 = 1;
#[cfg(all(not(feature = "std"), target_has_atomic = "8"))]
const READY: u8 = 2;

/// Puts the state back to UNINIT if the initializer unwinds.
#[cfg(all(not(feature = "std"), target_has_atomic = "8"))]
struct ResetOnUnwind<'a>(&'a core::sync::atomic::AtomicU8);

#[cfg(all(not(feature = "std"), target_has_atomic = "8"))]
impl Drop for ResetOnUnwind<'_> {
  fn drop(&mut self) {
    self.0.store(UNINIT, core::sync::atomic::Ordering::Release);
  }
}

impl<T: Copy> OnceCache<T> {
  /// Create an empty cache.
  #[must_use]
  pub const fn new() -> Self {
    Self {
      #[cfg(feature = "std")]
      inner: std::sync::OnceLock::new(),

      #[cfg(all(not(feature = "std"), target_has_atomic = "8"))]
      state: core::sync::atomic::AtomicU8::new(UNINIT),
      #[cfg(all(not(feature = "std"), target_has_atomic = "8"))]
      value: UnsafeCell::new(MaybeUninit::uninit()),

      #[cfg(all(not(feature = "std"), not(target_has_atomic = "8")))]
      _marker: core::marker::PhantomData,
    }
  }

  /// Return the cached value, running `f` first if nothing is cached yet.
  #[inline]
  pub fn get_or_init(&self, f: impl FnOnce() -> T) -> T {
    #[cfg(feature = "std")]
    {
      *self.inner.get_or_init(f)
    }

    #[cfg(all(not(feature = "std"), target_has_atomic = "8"))]
    {
      use core::sync::atomic::Ordering;

      if let Some(value) = self.get() {
        return value;
      }

      loop {
        match self
          .state
          .compare_exchange(UNINIT, INITING, Ordering::AcqRel, Ordering::Acquire)
        {
          Ok(_) => {
            let reset = ResetOnUnwind(&self.state);
            let value = f();
            core::mem::forget(reset);
            // SAFETY: INITING grants this thread exclusive write access.
            #[allow(unsafe_code)]
            unsafe {
              (*self.value.get()).write(value);
            }
            self.state.store(READY, Ordering::Release);
            return value;
          }
          Err(READY) => {
            if let Some(value) = self.get() {
              return value;
            }
          }
          // Another thread is initializing; retry if it unwinds back to UNINIT.
          Err(_) => core::hint::spin_loop(),
        }
      }
    }

    #[cfg(all(not(feature = "std"), not(target_has_atomic = "8")))]
    {
      f()
    }
  }

  /// Return the cached value without initializing it.
  #[inline]
  #[must_use]
  pub fn get(&self) -> Option<T> {
    #[cfg(feature = "std")]
    {
      self.inner.get().copied()
    }

    #[cfg(all(not(feature = "std"), target_has_atomic = "8"))]
    {
      use core::sync::atomic::Ordering;

      if self.state.load(Ordering::Acquire) == READY {
        // SAFETY: READY is only stored after the value is written.
        #[allow(unsafe_code)]
        return Some(unsafe { (*self.value.get()).assume_init() });
      }
      None
    }

    #[cfg(all(not(feature = "std"), not(target_has_atomic = "8")))]
    {
      None
    }
  }
}

impl<T: Copy> Default for OnceCache<T> {
  fn default() -> Self {
    Self::new()
  }
}

#[cfg(test)]
mod tests {
  extern crate std;

  use core::sync::atomic::{AtomicUsize, Ordering};

  use super::*;

  #[test]
  fn initializer_runs_once() {
    static CACHE: OnceCache<u32> = OnceCache::new();
    let mut calls = 0;

    assert_eq!(CACHE.get(), None);
    let first = CACHE.get_or_init(|| {
      calls += 1;
      42
    });
    let second = CACHE.get_or_init(|| {
      calls += 1;
      99
    });

    assert_eq!(first, 42);
    assert_eq!(second, 42);
    assert_eq!(CACHE.get(), Some(42));
    assert_eq!(calls, 1);
  }

  #[test]
  fn panicking_initializer_leaves_cache_empty() {
    static CACHE: OnceCache<u32> = OnceCache::new();

    let result = std::panic::catch_unwind(|| CACHE.get_or_init(|| panic!("initializer failed")));
    assert!(result.is_err());
    assert_eq!(CACHE.get(), None);
    assert_eq!(CACHE.get_or_init(|| 7), 7);
    assert_eq!(CACHE.get(), Some(7));
  }

  #[test]
  fn racing_threads_see_one_value() {
    static CACHE: OnceCache<usize> = OnceCache::new();
    static CALLS: AtomicUsize = AtomicUsize::new(0);

    let handles: std::vec::Vec<_> = (0..16)
      .map(|i| {
        std::thread::spawn(move || {
          CACHE.get_or_init(|| {
            CALLS.fetch_add(1, Ordering::SeqCst);
            i
          })
        })
      })
      .collect();

    let seen: std::vec::Vec<usize> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert!(seen.windows(2).all(|w| w[0] == w[1]));
    assert_eq!(CALLS.load(Ordering::SeqCst), 1);
  }
}
