//! Whole-payload digest used by the container footer
//!
//! The footer stores an MD5 of the unpadded payload bytes; both encode and
//! decode feed payload bytes through this incremental wrapper as they walk
//! the block stream. MD5 is fine here: the format defends against accidental
//! corruption, not tampering.

use md5::{Digest, Md5};

/// Length of the digest stored in the footer
pub const DIGEST_LEN: usize = 16;

/// Incremental digest over the payload bytes of a block stream
pub struct PayloadDigest(Md5);

impl PayloadDigest {
    #[inline]
    pub fn new() -> Self {
        PayloadDigest(Md5::new())
    }

    #[inline]
    pub fn update(&mut self, data: &[u8]) {
        self.0.update(data);
    }

    #[inline]
    pub fn finalize(self) -> [u8; DIGEST_LEN] {
        self.0.finalize().into()
    }
}

impl Default for PayloadDigest {
    fn default() -> Self {
        Self::new()
    }
}

/// Compute the digest of a payload in one shot
#[inline]
pub fn payload_digest(data: &[u8]) -> [u8; DIGEST_LEN] {
    Md5::digest(data).into()
}
