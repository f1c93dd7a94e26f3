//! Racing first calls to `initialize`.
//!
//! Kept as the only test in its binary so the threads below are the first
//! callers in the process.

use std::{
  sync::{Arc, Barrier},
  thread,
};

use crc32c::Engine;
use tracing_subscriber::EnvFilter;

/// Route selection events to the test output (`RUST_LOG=crc32c=debug`).
fn init_tracing() {
  let _ = tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::from_default_env())
    .with_test_writer()
    .try_init();
}

#[test]
fn concurrent_first_calls_agree() {
  const THREADS: usize = 16;
  init_tracing();
  let barrier = Arc::new(Barrier::new(THREADS));

  let handles: Vec<_> = (0..THREADS)
    .map(|_| {
      let barrier = Arc::clone(&barrier);
      thread::spawn(move || {
        barrier.wait();
        let engine = crc32c::initialize();
        (engine, engine.compute(b"123456789"))
      })
    })
    .collect();

  let results: Vec<(Engine, u32)> = handles.into_iter().map(|h| h.join().unwrap()).collect();
  let first = results[0].0;
  for (engine, crc) in results {
    assert_eq!(engine, first);
    assert_eq!(crc, 0xE306_9283);
  }
  assert_eq!(crc32c::initialize(), first);
}
