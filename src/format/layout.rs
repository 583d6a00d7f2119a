//! On-wire layout of the ECC armor container
//!
//! Every block is one Reed-Solomon codeword. Data blocks are 255 bytes:
//! 222 payload bytes (215 in the first block, which leads with the magic
//! header), a one-byte block-type tag, then 32 parity bytes. The stream ends
//! with a 53-byte footer codeword carrying the total payload length and the
//! whole-payload digest. All multi-byte integers are big-endian.

use std::io::Cursor;

use binrw::{BinRead, BinWrite};

use crate::digest::DIGEST_LEN;
use crate::reed_solomon::NPAR;

/// Signature at the top of every ECC armor stream
pub const FILE_MAGIC: &[u8; 6] = b"SXECCv";

/// The only version this implementation emits
pub const FILE_VERSION: u8 = b'1';

/// Magic plus version byte, carried in the first block's payload region
pub const HEADER_SIZE: usize = FILE_MAGIC.len() + 1;

/// One block is one codeword
pub const BLOCK_SIZE: usize = 255;

/// Payload bytes per block: block minus tag minus parity
pub const DATA_SIZE: usize = BLOCK_SIZE - NPAR - 1;

/// The first block loses the header bytes from its payload region
pub const FIRST_DATA_SIZE: usize = DATA_SIZE - HEADER_SIZE;

/// Footer codeword: tag, payload length, digest, parity
pub const FOOTER_SIZE: usize = 1 + 4 + DIGEST_LEN + NPAR;

/// The protected portion of the footer (everything but its parity)
pub const FOOTER_MESSAGE_SIZE: usize = FOOTER_SIZE - NPAR;

/// Conventional file extension for encoded streams
pub const ECC_EXTENSION: &str = "ecc";

/// An ordinary data block
pub const BLOCK_TYPE_DATA: u8 = b'*';
/// The final data block; its tail past the payload length is padding
pub const BLOCK_TYPE_LAST: u8 = b'$';
/// The footer block
pub const BLOCK_TYPE_FOOTER: u8 = b'!';

/// Byte offset of the block-type tag within a data block
pub const BLOCK_TAG_OFFSET: usize = DATA_SIZE;

/// Magic header at the front of the first block's payload region
#[derive(Debug, Clone, Copy, PartialEq, Eq, BinRead, BinWrite)]
#[brw(big, magic = b"SXECCv")]
pub struct FileHeader {
    pub version: u8,
}

impl FileHeader {
    pub fn new() -> Self {
        FileHeader {
            version: FILE_VERSION,
        }
    }

    /// Parse the header from the front of a decoded first block.
    /// `None` when the magic does not match.
    pub fn parse(bytes: &[u8]) -> Option<Self> {
        let mut cursor = Cursor::new(bytes);
        Self::read(&mut cursor).ok()
    }

    /// Write the header into the front of a block's payload region
    pub fn emit(&self, bytes: &mut [u8]) {
        debug_assert!(bytes.len() >= HEADER_SIZE);
        let mut cursor = Cursor::new(bytes);
        self.write(&mut cursor)
            .expect("header destination is at least HEADER_SIZE bytes");
    }
}

impl Default for FileHeader {
    fn default() -> Self {
        Self::new()
    }
}

/// The footer codeword closing every stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, BinRead, BinWrite)]
#[brw(big)]
pub struct Footer {
    pub block_type: u8,
    /// Total unpadded payload length
    pub payload_len: u32,
    /// Digest of the whole unpadded payload
    pub digest: [u8; DIGEST_LEN],
    /// Reed-Solomon parity over the preceding fields
    pub parity: [u8; NPAR],
}

impl Footer {
    /// Parse a footer from exactly one footer-sized buffer
    pub fn parse(bytes: &[u8; FOOTER_SIZE]) -> Self {
        let mut cursor = Cursor::new(&bytes[..]);
        Self::read(&mut cursor).expect("footer buffer is exactly one footer long")
    }

    /// Serialize into exactly one footer-sized buffer
    pub fn emit(&self, bytes: &mut [u8; FOOTER_SIZE]) {
        let mut cursor = Cursor::new(&mut bytes[..]);
        self.write(&mut cursor)
            .expect("footer buffer is exactly one footer long")
    }
}
