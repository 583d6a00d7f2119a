//! Round-trip tests for the ECC armor container
//!
//! Encode-then-decode must reproduce the payload exactly, report zero
//! corrected blocks on clean streams, and agree with the size helpers for
//! every payload length class: empty, single short block, block boundaries,
//! and multi-block streams.

use eccarmor::format::{BLOCK_SIZE, DATA_SIZE, FIRST_DATA_SIZE, FOOTER_SIZE, HEADER_SIZE};
use eccarmor::{decode, decoded_size, encode, encode_to_vec, encoded_size};

/// Deterministic payload that varies with both index and length
fn test_payload(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i * 31 + len * 7 + 1) as u8).collect()
}

fn round_trip(len: usize) {
    let payload = test_payload(len);
    let encoded = encode_to_vec(&payload);
    assert_eq!(encoded.len(), encoded_size(len), "encoded size for {}", len);

    let mut decoded = vec![0u8; decoded_size(encoded.len())];
    let summary = decode(&encoded, &mut decoded).unwrap();

    assert_eq!(summary.len, len, "decoded length for {}", len);
    assert_eq!(&decoded[..summary.len], &payload[..], "payload for {}", len);
    assert_eq!(summary.corrected_blocks, 0, "clean stream for {}", len);
}

#[test]
fn test_round_trip_empty_payload() {
    round_trip(0);
}

#[test]
fn test_round_trip_single_byte() {
    round_trip(1);
}

#[test]
fn test_round_trip_first_block_boundaries() {
    // The first block holds FIRST_DATA_SIZE payload bytes
    round_trip(FIRST_DATA_SIZE - 1);
    round_trip(FIRST_DATA_SIZE);
    round_trip(FIRST_DATA_SIZE + 1);
}

#[test]
fn test_round_trip_second_block_boundaries() {
    round_trip(FIRST_DATA_SIZE + DATA_SIZE - 1);
    round_trip(FIRST_DATA_SIZE + DATA_SIZE);
    round_trip(FIRST_DATA_SIZE + DATA_SIZE + 1);
}

#[test]
fn test_round_trip_codeword_sized_payloads() {
    // Payloads that happen to match codeword-related sizes
    round_trip(222);
    round_trip(223);
    round_trip(255);
}

#[test]
fn test_round_trip_multi_block() {
    round_trip(1000);
    round_trip(4096);
    round_trip(100_000);
}

#[test]
fn test_encode_into_oversized_destination() {
    let payload = test_payload(500);
    let mut dest = vec![0xEEu8; encoded_size(500) + 100];

    let written = encode(&payload, &mut dest).unwrap();
    assert_eq!(written, encoded_size(500));

    // Bytes past the encoded stream are untouched
    assert!(dest[written..].iter().all(|&b| b == 0xEE));

    let mut decoded = vec![0u8; decoded_size(written)];
    let summary = decode(&dest[..written], &mut decoded).unwrap();
    assert_eq!(&decoded[..summary.len], &payload[..]);
}

#[test]
fn test_decode_into_oversized_destination() {
    let payload = test_payload(300);
    let encoded = encode_to_vec(&payload);

    let mut decoded = vec![0u8; decoded_size(encoded.len()) + 64];
    let summary = decode(&encoded, &mut decoded).unwrap();
    assert_eq!(summary.len, 300);
    assert_eq!(&decoded[..300], &payload[..]);
}

#[test]
fn test_size_helper_inverse_on_full_blocks() {
    // decoded_size reports the stream's payload capacity; it equals the
    // original length exactly when the last block carries no padding.
    for blocks in 1..6usize {
        let len = blocks * DATA_SIZE - HEADER_SIZE;
        assert_eq!(decoded_size(encoded_size(len)), len);
    }
}

#[test]
fn test_size_helper_upper_bound() {
    for len in [0usize, 1, 100, 214, 215, 216, 1000, 65_536] {
        let capacity = decoded_size(encoded_size(len));
        assert!(capacity >= len);
        // Padding never exceeds one block's payload region
        assert!(capacity - len < DATA_SIZE);
    }
}

#[test]
fn test_encoded_size_block_structure() {
    // Every encoded stream is a whole number of blocks plus one footer
    for len in 0..2000usize {
        let size = encoded_size(len);
        assert_eq!((size - FOOTER_SIZE) % BLOCK_SIZE, 0, "length {}", len);
    }
}
