//! Reed-Solomon Error Correction Module
//!
//! Encoder and decoder for RS(255, 223) codewords over GF(256): 32 parity
//! symbols appended to at most 223 message bytes. The encoder is an LFSR
//! driven by a memoized generator polynomial; the decoder runs the classical
//! syndrome / Berlekamp-Massey / Chien search / Forney pipeline and can take
//! advantage of known erasure locations.
//!
//! Everything here operates on a single codeword. Multi-block streams, the
//! magic header and the whole-payload digest live in [`crate::format`].

pub mod decoder;
pub mod encoder;
pub mod galois;
pub mod poly;

pub use decoder::Decoder;
pub use encoder::{generator_poly, parity};
pub use galois::{galois_field, gf_exp, gf_inv, gf_mul, GaloisField};

/// Number of parity symbols per codeword.
///
/// Fixed for the whole format: changing it invalidates every previously
/// encoded stream.
pub const NPAR: usize = 32;

/// Capacity of the working polynomials used by the decoder
pub const MAXDEG: usize = NPAR * 2;

/// A codeword (message plus parity) never exceeds the field's natural limit
pub const MAX_CODEWORD_SIZE: usize = 255;

/// Longest message that still fits a single codeword
pub const MAX_MESSAGE_SIZE: usize = MAX_CODEWORD_SIZE - NPAR;
