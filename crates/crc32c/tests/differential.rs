//! Cross-library validation against `crc-fast` (CRC-32/ISCSI is CRC32-C).

// Proptest uses getcwd() which fails under Miri isolation.
#![cfg(not(miri))]

use crc_fast::CrcAlgorithm;
use crc32c::{Crc32c, Engine};
use proptest::prelude::*;

fn reference(data: &[u8]) -> u32 {
  crc_fast::checksum(CrcAlgorithm::Crc32Iscsi, data) as u32
}

proptest! {
  #[test]
  fn compute_matches_crc_fast(data in proptest::collection::vec(any::<u8>(), 0..=4096)) {
    prop_assert_eq!(crc32c::compute(&data), reference(&data));
  }

  #[test]
  fn every_engine_matches_crc_fast(data in proptest::collection::vec(any::<u8>(), 0..=4096)) {
    let expected = reference(&data);
    for engine in Engine::available() {
      prop_assert_eq!(engine.compute(&data), expected, "{}", engine.backend());
    }
  }

  #[test]
  fn streaming_matches_crc_fast(data in proptest::collection::vec(any::<u8>(), 0..=4096), chunk in 1usize..=257) {
    let mut ours = Crc32c::new();
    let mut theirs = crc_fast::Digest::new(CrcAlgorithm::Crc32Iscsi);

    for part in data.chunks(chunk) {
      ours.update(part);
      theirs.update(part);
    }

    prop_assert_eq!(u64::from(ours.finalize()), theirs.finalize());
  }

  #[test]
  fn combine_matches_crc_fast(data in proptest::collection::vec(any::<u8>(), 0..=4096), split in any::<prop::sample::Index>()) {
    let split = split.index(data.len() + 1);
    let (a, b) = data.split_at(split);

    let combined = crc32c::combine(crc32c::compute(a), crc32c::compute(b), b.len());
    prop_assert_eq!(combined, reference(&data));
  }
}

#[test]
fn large_buffer_matches_crc_fast() {
  let data: Vec<u8> = (0..(3 << 20)).map(|i: u32| (i.wrapping_mul(0x9E37_79B9) >> 24) as u8).collect();
  assert_eq!(crc32c::compute(&data), reference(&data));
}
