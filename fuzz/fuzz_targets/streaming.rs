//! Fuzz target for streaming updates with arbitrary chunk sizes.

#![no_main]

use arbitrary::Arbitrary;
use crc32c::Crc32c;
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct Input {
  data: Vec<u8>,
  chunk_sizes: Vec<u16>,
}

fuzz_target!(|input: Input| {
  let data = &input.data;
  let mut hasher = Crc32c::new();
  let mut rest = data.as_slice();

  for &size in input.chunk_sizes.iter().cycle().take(data.len().max(1)) {
    if rest.is_empty() {
      break;
    }
    let (part, tail) = rest.split_at(usize::from(size).min(rest.len()));
    hasher.update(part);
    rest = tail;
  }
  hasher.update(rest);

  assert_eq!(hasher.finalize(), crc32c::compute(data), "streaming mismatch, len={}", data.len());
});
