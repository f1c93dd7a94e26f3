//! Fuzz target for combining checksums over many spans.

#![no_main]

use arbitrary::Arbitrary;
use crc32c::__internal::{portable_update, shift};
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct Input {
  data: Vec<u8>,
  splits: Vec<usize>,
  state: u32,
  zeros: u16,
}

fuzz_target!(|input: Input| {
  let data = &input.data;

  let mut splits: Vec<usize> = input.splits.iter().map(|s| s % (data.len() + 1)).collect();
  splits.push(data.len());
  splits.sort_unstable();
  splits.dedup();

  let mut combined = crc32c::compute(&[]);
  let mut prev = 0;
  for split in splits {
    let part = &data[prev..split];
    combined = crc32c::combine(combined, crc32c::compute(part), part.len());
    prev = split;
  }

  assert_eq!(combined, crc32c::compute(data), "combine chain mismatch, len={}", data.len());

  let zeros = vec![0u8; usize::from(input.zeros)];
  assert_eq!(
    shift(input.state, zeros.len() as u64),
    portable_update(input.state, &zeros),
    "shift mismatch, len={}",
    zeros.len()
  );
});
