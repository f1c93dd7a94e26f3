//! Property tests for the public compute/extend/combine contract.

// Proptest uses getcwd() which fails under Miri isolation.
#![cfg(not(miri))]

use crc32c::{
  Crc32c,
  __internal::{portable_update, reference_checksum, shift},
};
use proptest::prelude::*;

fn arb_data() -> impl Strategy<Value = Vec<u8>> {
  prop::collection::vec(any::<u8>(), 0..8192)
}

/// Sorted, deduplicated split points ending at `len`.
fn arb_splits(len: usize, count: usize) -> impl Strategy<Value = Vec<usize>> {
  prop::collection::vec(0..=len, count).prop_map(move |mut splits| {
    splits.sort_unstable();
    splits.push(len);
    splits.dedup();
    splits
  })
}

fn data_and_splits() -> impl Strategy<Value = (Vec<u8>, Vec<usize>)> {
  arb_data().prop_flat_map(|data| {
    let len = data.len();
    (Just(data), arb_splits(len, 6))
  })
}

proptest! {
  #![proptest_config(ProptestConfig::with_cases(500))]

  #[test]
  fn compute_is_deterministic(data in arb_data()) {
    prop_assert_eq!(crc32c::compute(&data), crc32c::compute(&data));
  }

  #[test]
  fn compute_matches_bitwise(data in prop::collection::vec(any::<u8>(), 0..2048)) {
    prop_assert_eq!(crc32c::compute(&data), reference_checksum(&data));
  }

  #[test]
  fn extend_composes(data in arb_data(), split in any::<prop::sample::Index>()) {
    let split = split.index(data.len() + 1);
    let (a, b) = data.split_at(split);
    prop_assert_eq!(crc32c::extend(crc32c::compute(a), b), crc32c::compute(&data));
  }

  #[test]
  fn extend_empty_is_identity(crc in any::<u32>()) {
    prop_assert_eq!(crc32c::extend(crc, &[]), crc);
  }

  #[test]
  fn chunking_is_invisible((data, splits) in data_and_splits()) {
    let mut crc = crc32c::compute(&[]);
    let mut hasher = Crc32c::new();
    let mut prev = 0;
    for split in splits {
      let part = &data[prev..split];
      crc = crc32c::extend(crc, part);
      hasher.update(part);
      prev = split;
    }
    let expected = crc32c::compute(&data);
    prop_assert_eq!(crc, expected);
    prop_assert_eq!(hasher.finalize(), expected);
  }

  #[test]
  fn combine_matches_concatenation(data in arb_data(), split in any::<prop::sample::Index>()) {
    let split = split.index(data.len() + 1);
    let (a, b) = data.split_at(split);
    let combined = crc32c::combine(crc32c::compute(a), crc32c::compute(b), b.len());
    prop_assert_eq!(combined, crc32c::compute(&data));
  }

  #[test]
  fn shift_equals_zero_padding(state in any::<u32>(), len in 0usize..4096) {
    let zeros = vec![0u8; len];
    prop_assert_eq!(shift(state, len as u64), portable_update(state, &zeros));
  }

  #[test]
  fn reset_restarts(data in arb_data()) {
    let mut hasher = Crc32c::new();
    hasher.update(&data);
    hasher.reset();
    hasher.update(&data);
    prop_assert_eq!(hasher.finalize(), crc32c::compute(&data));
  }
}
