//! Kernel selection and once-only caching.
//!
//! Algorithm crates describe their kernels as an ordered list of
//! [`Candidate`]s, best first, each tagged with the CPU capabilities it needs.
//! [`select`] picks the first candidate the detected [`Caps`] satisfy, and
//! [`OnceCache`] holds the result so detection and selection run once per
//! process.
//!
//! # Usage
//!
//! ```
//! use backend::{OnceCache, candidates, dispatch::{Candidate, select}};
//! use platform::caps::{Caps, x86};
//!
//! type Kernel = fn(u32, &[u8]) -> u32;
//!
//! fn fast(crc: u32, _data: &[u8]) -> u32 {
//!   crc
//! }
//! fn portable(crc: u32, _data: &[u8]) -> u32 {
//!   crc
//! }
//!
//! const KERNELS: &[Candidate<Kernel>] = candidates![
//!   "x86_64/sse4.2" => x86::CRC32C_READY => fast,
//!   "portable"      => Caps::NONE        => portable,
//! ];
//! static KERNEL: OnceCache<Kernel> = OnceCache::new();
//!
//! let kernel = KERNEL.get_or_init(|| select(platform::caps(), KERNELS).map_or(portable as Kernel, |s| s.value));
//! assert_eq!(kernel(7, b""), 7);
//! ```

#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::indexing_slicing))]
#![no_std]

#[cfg(feature = "std")]
extern crate std;

pub mod cache;
pub mod dispatch;

pub use cache::OnceCache;
pub use dispatch::{Candidate, Selected, select};
pub use platform::{self, Caps};
