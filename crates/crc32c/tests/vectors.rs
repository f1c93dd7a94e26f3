//! Known-answer vectors, checked through every available engine.

use crc32c::{Crc32c, Engine};

/// iSCSI SCSI Read (10) command PDU (RFC 3720, appendix B.4).
const ISCSI_READ_PDU: [u8; 48] = [
  0x01, 0xc0, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, //
  0x14, 0x00, 0x00, 0x00, 0x00, 0x00, 0x04, 0x00, 0x00, 0x00, 0x00, 0x14, 0x00, 0x00, 0x00, 0x18, //
  0x28, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x02, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, //
];

fn vectors() -> Vec<(&'static str, Vec<u8>, u32)> {
  vec![
    ("empty", Vec::new(), 0x0000_0000),
    ("single zero", vec![0x00], 0x527D_5351),
    ("check string", b"123456789".to_vec(), 0xE306_9283),
    ("32 zeros", vec![0x00; 32], 0x8A91_36AA),
    ("32 ones", vec![0xFF; 32], 0x62A8_AB43),
    ("ascending", (0..32).collect(), 0x46DD_794E),
    ("descending", (0..32).rev().collect(), 0x113F_DB5C),
    ("iscsi read pdu", ISCSI_READ_PDU.to_vec(), 0xD996_3A56),
  ]
}

#[test]
fn dispatched_vectors() {
  for (name, data, expected) in vectors() {
    assert_eq!(crc32c::compute(&data), expected, "{name}");
  }
}

#[test]
fn every_backend_vectors() {
  for engine in Engine::available() {
    for (name, data, expected) in vectors() {
      assert_eq!(engine.compute(&data), expected, "{name} via {}", engine.backend());
    }
  }
}

#[test]
fn portable_entry_points() {
  for (name, data, expected) in vectors() {
    assert_eq!(crc32c::compute_portable(&data), expected, "{name}");
  }
  assert_eq!(crc32c::extend_portable(crc32c::compute_portable(b"1234"), b"56789"), 0xE306_9283);
}

#[test]
fn hello_world_extends() {
  let hello = crc32c::compute(b"hello ");
  assert_eq!(crc32c::extend(hello, b"world"), crc32c::compute(b"hello world"));
}

#[test]
fn extend_with_nothing_is_identity() {
  for crc in [0, 1, 0xE306_9283, u32::MAX] {
    assert_eq!(crc32c::extend(crc, &[]), crc);
  }
}

#[test]
fn streaming_vectors() {
  for (name, data, expected) in vectors() {
    let mut hasher = Crc32c::new();
    for byte in &data {
      hasher.update(std::slice::from_ref(byte));
    }
    assert_eq!(hasher.finalize(), expected, "{name}");
  }
}

#[test]
fn combine_vectors() {
  let (head, tail) = ISCSI_READ_PDU.split_at(20);
  let combined = crc32c::combine(crc32c::compute(head), crc32c::compute(tail), tail.len());
  assert_eq!(combined, 0xD996_3A56);
  assert_eq!(crc32c::combine(0xE306_9283, 0, 0), 0xE306_9283);
}

#[test]
fn backend_name_is_known() {
  let name = crc32c::backend_name();
  assert!(crc32c::Backend::ALL.iter().any(|backend| backend.name() == name), "{name}");
}
