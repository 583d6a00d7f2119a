//! Error types for ECC armor encoding and decoding

use thiserror::Error;

/// Why a single codeword could not be repaired
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum CorrectionError {
    /// The error locator polynomial has no roots in the field, so the
    /// damage cannot be located
    #[error("error locator has no roots despite a nonzero syndrome")]
    NoRootsFound,

    /// More error locations than parity symbols can describe
    #[error("{found} error locations exceed the parity capacity")]
    TooManyErrors { found: usize },

    /// The locator points outside the codeword
    #[error("error location {location} lies outside the codeword")]
    LocationOutOfBounds { location: u8 },

    /// The locator derivative vanished at a claimed error location, so no
    /// magnitude can be computed
    #[error("degenerate error locator at location {location}")]
    DegenerateLocator { location: u8 },
}

/// Errors surfaced by [`crate::format::decode`] and
/// [`crate::format::decode_in_place`]
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The first block carries no ECC armor header: the buffer is probably
    /// not this format at all. Kept distinct so callers can probe.
    #[error("buffer does not begin with an ECC armor header")]
    NotEccFormat,

    /// The stream ends before the blocks it implies
    #[error("encoded stream of {len} bytes is truncated at offset {offset}")]
    Truncated { offset: usize, len: usize },

    /// A block tag that is neither data, last, nor footer
    #[error("block {block} has unknown block type {tag:#04x}")]
    BadBlockType { block: usize, tag: u8 },

    /// A block's damage exceeds what the parity symbols can repair
    #[error("block {block} is unrecoverable")]
    Unrecoverable {
        block: usize,
        #[source]
        source: CorrectionError,
    },

    /// The footer's payload length disagrees with the decoded block count
    #[error("footer payload length {stored} is inconsistent with the decoded stream")]
    BadPayloadLength { stored: u32 },

    /// The reassembled payload does not hash to the footer digest
    #[error(
        "payload digest mismatch: footer has {}, computed {}",
        hex::encode(.stored),
        hex::encode(.computed)
    )]
    DigestMismatch {
        stored: [u8; 16],
        computed: [u8; 16],
    },

    /// The destination buffer cannot hold the decoded payload; nothing was
    /// written
    #[error("destination holds {available} bytes but decoding may need {needed}")]
    DestinationTooSmall { needed: usize, available: usize },
}

/// Errors surfaced by [`crate::format::encode`]
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum EncodeError {
    /// The destination buffer cannot hold the encoded stream; nothing was
    /// written
    #[error("destination holds {available} bytes but encoding needs {needed}")]
    DestinationTooSmall { needed: usize, available: usize },
}
