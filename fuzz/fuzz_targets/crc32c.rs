//! Fuzz target for the CRC32-C public API.
//!
//! Tests that:
//! - No panics on arbitrary input
//! - `extend` over a split matches one-shot
//! - Resume and combine agree with one-shot

#![no_main]

use arbitrary::Arbitrary;
use crc32c::Crc32c;
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct Input {
  data: Vec<u8>,
  split_point: usize,
}

fuzz_target!(|input: Input| {
  let data = &input.data;
  let split = input.split_point % (data.len() + 1);
  let (a, b) = data.split_at(split);

  let oneshot = crc32c::compute(data);

  let crc_a = crc32c::compute(a);
  assert_eq!(crc32c::extend(crc_a, b), oneshot, "extend mismatch");
  assert_eq!(crc32c::extend(oneshot, &[]), oneshot, "empty extend changed the checksum");

  let mut resumed = Crc32c::resume(crc_a);
  resumed.update(b);
  assert_eq!(resumed.finalize(), oneshot, "resume mismatch");

  let combined = crc32c::combine(crc_a, crc32c::compute(b), b.len());
  assert_eq!(combined, oneshot, "combine mismatch");
});
