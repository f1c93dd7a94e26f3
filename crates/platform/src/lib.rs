//! CPU capability detection for CRC32-C kernel selection.
//!
//! This crate is the single place where the workspace asks the processor what
//! it supports. It reports an immutable [`Caps`] bitset; selection policy lives
//! with the algorithm crates.
//!
//! # Main Entry Point
//!
//! ```
//! use platform::caps::x86;
//!
//! let caps = platform::caps();
//! if caps.has(x86::CRC32C_READY) {
//!   // SSE4.2 `crc32` kernels may run
//! }
//! ```
//!
//! # Design
//!
//! 1. **One probe**: [`caps()`] runs detection once per process and caches it.
//! 2. **Never fails**: a missing feature is a normal answer, not an error.
//! 3. **Miri-safe**: under Miri only portable code is ever selected.

#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![no_std]

#[cfg(feature = "std")]
extern crate std;

pub mod caps;
mod detect;

pub use caps::Caps;
pub use detect::{caps, detect};
