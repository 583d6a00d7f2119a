//! Block-oriented forward error correction ("ECC armor")
//!
//! Wraps arbitrary byte payloads in fixed-size Reed-Solomon protected blocks
//! so that bit rot in storage can be detected and repaired: a magic header
//! identifies the format, every 255-byte block carries 32 parity symbols,
//! and a footer closes the stream with the payload length and an MD5 of the
//! whole payload.
//!
//! The codec does no I/O. Callers hand in source and destination buffers
//! (sized via [`encoded_size`] / [`decoded_size`]) and get back a length and
//! a corrected-block count; feeding those buffers from flash, files or the
//! network is someone else's job.
//!
//! ```
//! let payload = b"hello, armored world";
//! let encoded = eccarmor::encode_to_vec(payload);
//!
//! let mut decoded = vec![0u8; eccarmor::decoded_size(encoded.len())];
//! let summary = eccarmor::decode(&encoded, &mut decoded).unwrap();
//! assert_eq!(&decoded[..summary.len], payload);
//! assert_eq!(summary.corrected_blocks, 0);
//! ```

pub mod digest;
pub mod error;
pub mod format;
pub mod reed_solomon;

pub use error::{CorrectionError, DecodeError, EncodeError};
pub use format::{
    decode, decode_in_place, decoded_size, encode, encode_to_vec, encoded_size, DecodeSummary,
};
pub use reed_solomon::NPAR;
