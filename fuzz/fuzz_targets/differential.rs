//! Differential fuzzing: every backend against the bitwise reference.

#![no_main]

use crc32c::{Engine, __internal::reference_checksum};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
  let reference = reference_checksum(data);

  assert_eq!(crc32c::compute_portable(data), reference, "portable mismatch, len={}", data.len());

  for engine in Engine::available() {
    let ours = engine.compute(data);
    assert_eq!(
      ours,
      reference,
      "{} mismatch: ours={ours:#010x}, reference={reference:#010x}, len={}",
      engine.backend(),
      data.len()
    );
  }
});
