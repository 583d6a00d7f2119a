//! Property-based tests for the ECC armor codec
//!
//! These tests use proptest to validate encoding and decoding with randomly
//! generated payloads and randomly placed corruption, ensuring the
//! correction guarantees hold across a wide range of inputs.

use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use eccarmor::format::BLOCK_SIZE;
use eccarmor::reed_solomon::NPAR;
use eccarmor::{decode, decode_in_place, decoded_size, encode_to_vec, encoded_size};

proptest! {
    /// Property: decode(encode(payload)) == payload with no corrections
    #[test]
    fn prop_round_trip(payload in proptest::collection::vec(any::<u8>(), 0..4096)) {
        let encoded = encode_to_vec(&payload);
        prop_assert_eq!(encoded.len(), encoded_size(payload.len()));

        let mut decoded = vec![0u8; decoded_size(encoded.len())];
        let summary = decode(&encoded, &mut decoded).unwrap();

        prop_assert_eq!(summary.len, payload.len());
        prop_assert_eq!(&decoded[..summary.len], &payload[..]);
        prop_assert_eq!(summary.corrected_blocks, 0);
    }

    /// Property: the size helpers are consistent for any length
    #[test]
    fn prop_size_helpers(len in 0usize..200_000) {
        let encoded = encoded_size(len);
        let capacity = decoded_size(encoded);

        prop_assert!(capacity >= len);
        // Padding is bounded by one block's payload region
        prop_assert!(capacity - len < 222);
        // Adding bytes never shrinks the encoding
        prop_assert!(encoded_size(len + 1) >= encoded);
    }

    /// Property: up to NPAR/2 corrupted bytes inside a single block are
    /// always repaired, and the repair is attributed to exactly one block
    #[test]
    fn prop_corruption_within_radius_is_corrected(
        payload in proptest::collection::vec(any::<u8>(), 1..3000),
        seed in any::<u64>(),
        errors in 1usize..=NPAR / 2,
    ) {
        let mut rng = StdRng::seed_from_u64(seed);
        let encoded = encode_to_vec(&payload);

        // Pick a data block, then distinct offsets within its codeword
        let data_blocks = (encoded.len() - 53) / BLOCK_SIZE;
        let block = rng.random_range(0..data_blocks);
        let mut offsets: Vec<usize> = (0..BLOCK_SIZE).collect();
        offsets.shuffle(&mut rng);

        let mut damaged = encoded.clone();
        for &off in offsets.iter().take(errors) {
            damaged[block * BLOCK_SIZE + off] ^= rng.random_range(1..=255u8);
        }

        let mut decoded = vec![0u8; decoded_size(damaged.len())];
        let summary = decode(&damaged, &mut decoded).unwrap();

        prop_assert_eq!(summary.len, payload.len());
        prop_assert_eq!(&decoded[..summary.len], &payload[..]);
        prop_assert_eq!(summary.corrected_blocks, 1);
    }

    /// Property: a corrupted footer is repaired like any other block
    #[test]
    fn prop_footer_corruption_is_corrected(
        payload in proptest::collection::vec(any::<u8>(), 0..1000),
        seed in any::<u64>(),
    ) {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut damaged = encode_to_vec(&payload);

        let footer_start = damaged.len() - 53;
        let off = rng.random_range(0..53usize);
        damaged[footer_start + off] ^= rng.random_range(1..=255u8);

        let mut decoded = vec![0u8; decoded_size(damaged.len())];
        let summary = decode(&damaged, &mut decoded).unwrap();

        prop_assert_eq!(&decoded[..summary.len], &payload[..]);
        prop_assert_eq!(summary.corrected_blocks, 1);
    }

    /// Property: the in-place and out-of-place paths agree
    #[test]
    fn prop_in_place_matches_out_of_place(
        payload in proptest::collection::vec(any::<u8>(), 0..4096),
    ) {
        let encoded = encode_to_vec(&payload);

        let mut out = vec![0u8; decoded_size(encoded.len())];
        let separate = decode(&encoded, &mut out).unwrap();

        let mut buf = encoded.clone();
        let in_place = decode_in_place(&mut buf).unwrap();

        prop_assert_eq!(separate.len, in_place.len);
        prop_assert_eq!(&out[..separate.len], &buf[..in_place.len]);
    }
}
