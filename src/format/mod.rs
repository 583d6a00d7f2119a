//! ECC armor container format
//!
//! Frames an arbitrary-length payload into fixed-size Reed-Solomon protected
//! blocks: a magic header at the front of the first block, a tag byte and
//! parity on every block, and a footer codeword holding the total payload
//! length and a whole-payload digest.
//!
//! Decoding is two-strategy. Out-of-place decodes first run a cheap
//! checksum-only pass (syndrome checks plus the footer digest, no correction
//! attempted); if anything looks wrong the stream is re-walked with full
//! correction. In-place decodes always take the full-correction pass. The
//! container performs no I/O and allocates nothing: both sides work entirely
//! within caller-supplied buffers.

pub mod layout;

use log::{debug, warn};

use crate::digest::PayloadDigest;
use crate::error::{CorrectionError, DecodeError, EncodeError};
use crate::reed_solomon::{self, Decoder};

pub use layout::{
    FileHeader, Footer, BLOCK_SIZE, BLOCK_TAG_OFFSET, BLOCK_TYPE_DATA, BLOCK_TYPE_FOOTER,
    BLOCK_TYPE_LAST, DATA_SIZE, ECC_EXTENSION, FILE_MAGIC, FILE_VERSION, FIRST_DATA_SIZE,
    FOOTER_MESSAGE_SIZE, FOOTER_SIZE, HEADER_SIZE,
};

/// Exact size of the encoded stream for a payload of `payload_len` bytes
pub fn encoded_size(payload_len: usize) -> usize {
    (payload_len + HEADER_SIZE).div_ceil(DATA_SIZE) * BLOCK_SIZE + FOOTER_SIZE
}

/// Payload capacity of an encoded stream of `encoded_len` bytes.
///
/// This is the tight upper bound implied by the block count; the actual
/// payload length lives in the footer and may be smaller when the last block
/// carries padding. Callers size decode destinations with this.
pub fn decoded_size(encoded_len: usize) -> usize {
    (encoded_len.saturating_sub(FOOTER_SIZE) / BLOCK_SIZE * DATA_SIZE).saturating_sub(HEADER_SIZE)
}

/// Outcome of a successful decode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeSummary {
    /// Number of payload bytes written to the destination
    pub len: usize,
    /// Number of blocks that needed correction (zero on the checksum-only
    /// path)
    pub corrected_blocks: u32,
}

/// Encode `payload` into `dest`, returning the encoded length.
///
/// Fails without writing anything if `dest` is smaller than
/// [`encoded_size`]`(payload.len())`.
pub fn encode(payload: &[u8], dest: &mut [u8]) -> Result<usize, EncodeError> {
    // The footer stores the payload length as a u32
    assert!(
        payload.len() <= u32::MAX as usize,
        "payload of {} bytes exceeds the format's 4 GiB limit",
        payload.len()
    );

    let needed = encoded_size(payload.len());
    if dest.len() < needed {
        return Err(EncodeError::DestinationTooSmall {
            needed,
            available: dest.len(),
        });
    }

    let mut digest = PayloadDigest::new();
    let mut remaining = payload;
    let mut out = 0usize;
    let mut first = true;

    loop {
        let mut block = [0u8; BLOCK_SIZE];

        let payload_start = if first {
            FileHeader::new().emit(&mut block[..HEADER_SIZE]);
            HEADER_SIZE
        } else {
            0
        };

        let capacity = DATA_SIZE - payload_start;
        let take = remaining.len().min(capacity);
        block[payload_start..payload_start + take].copy_from_slice(&remaining[..take]);
        digest.update(&remaining[..take]);
        remaining = &remaining[take..];

        // Tagging the final data block lets a streaming reader know, before
        // it reaches the footer, that this block's tail is padding.
        block[BLOCK_TAG_OFFSET] = if remaining.is_empty() {
            BLOCK_TYPE_LAST
        } else {
            BLOCK_TYPE_DATA
        };

        let parity = reed_solomon::parity(&block[..BLOCK_TAG_OFFSET + 1]);
        block[BLOCK_TAG_OFFSET + 1..].copy_from_slice(&parity);

        dest[out..out + BLOCK_SIZE].copy_from_slice(&block);
        out += BLOCK_SIZE;
        first = false;

        if remaining.is_empty() {
            break;
        }
    }

    let mut footer = Footer {
        block_type: BLOCK_TYPE_FOOTER,
        payload_len: payload.len() as u32,
        digest: digest.finalize(),
        parity: [0; reed_solomon::NPAR],
    };

    let mut footer_buf = [0u8; FOOTER_SIZE];
    footer.emit(&mut footer_buf);
    footer.parity = reed_solomon::parity(&footer_buf[..FOOTER_MESSAGE_SIZE]);
    footer_buf[FOOTER_MESSAGE_SIZE..].copy_from_slice(&footer.parity);

    dest[out..out + FOOTER_SIZE].copy_from_slice(&footer_buf);
    out += FOOTER_SIZE;

    debug_assert_eq!(out, needed);
    Ok(out)
}

/// Encode `payload` into a freshly allocated, exactly sized buffer
pub fn encode_to_vec(payload: &[u8]) -> Vec<u8> {
    let mut dest = vec![0u8; encoded_size(payload.len())];
    let written = encode(payload, &mut dest).expect("destination sized by encoded_size");
    debug_assert_eq!(written, dest.len());
    dest
}

/// Decode an encoded stream from `src` into `dest`, returning the decoded
/// length and how many blocks needed correction.
///
/// Tries the cheap checksum-only pass first and transparently retries with
/// full Reed-Solomon correction when it reports trouble, so the undamaged
/// common case never pays for correction.
pub fn decode(src: &[u8], dest: &mut [u8]) -> Result<DecodeSummary, DecodeError> {
    let needed = decoded_size(src.len());
    if dest.len() < needed {
        return Err(DecodeError::DestinationTooSmall {
            needed,
            available: dest.len(),
        });
    }

    if let Some(summary) = fast_pass(src, dest) {
        return Ok(summary);
    }

    debug!("checksum-only pass failed; decoding with full correction");
    full_pass(Buffers::Separate { src, dest })
}

/// Decode an encoded stream within its own buffer.
///
/// Always takes the full-correction pass: the fast pass needs the source
/// intact for a retry, which an aliased destination cannot guarantee. On
/// failure the buffer's contents are unspecified.
pub fn decode_in_place(buf: &mut [u8]) -> Result<DecodeSummary, DecodeError> {
    full_pass(Buffers::InPlace(buf))
}

/// Checksum-only pass: verify every block's syndrome and the footer digest
/// without attempting correction. `None` means "fall back to the full pass";
/// the caller surfaces that pass's error instead of anything seen here.
fn fast_pass(src: &[u8], dest: &mut [u8]) -> Option<DecodeSummary> {
    let mut digest = PayloadDigest::new();
    let mut decoder = Decoder::new();
    let mut in_off = 0usize;
    let mut out_off = 0usize;
    let mut block_index = 0usize;

    let (tail, tail_start) = loop {
        if in_off + BLOCK_SIZE + FOOTER_SIZE > src.len() {
            return None;
        }
        let block = &src[in_off..in_off + BLOCK_SIZE];
        in_off += BLOCK_SIZE;

        decoder.compute_syndromes(block);
        if decoder.has_errors() {
            debug!("block {} has a nonzero syndrome", block_index);
            return None;
        }

        if block_index == 0 && check_header(block, true).is_err() {
            return None;
        }
        let payload_start = if block_index == 0 { HEADER_SIZE } else { 0 };

        let tag = block[BLOCK_TAG_OFFSET];
        block_index += 1;
        match tag {
            BLOCK_TYPE_LAST | BLOCK_TYPE_FOOTER => {
                break (&block[..BLOCK_TAG_OFFSET], payload_start)
            }
            BLOCK_TYPE_DATA => {
                let data = &block[payload_start..DATA_SIZE];
                digest.update(data);
                dest[out_off..out_off + data.len()].copy_from_slice(data);
                out_off += data.len();
            }
            _ => return None,
        }
    };

    let footer_bytes: &[u8; FOOTER_SIZE] = src[in_off..in_off + FOOTER_SIZE].try_into().ok()?;
    decoder.compute_syndromes(footer_bytes);
    if decoder.has_errors() {
        debug!("footer has a nonzero syndrome");
        return None;
    }

    let footer = Footer::parse(footer_bytes);
    if footer.block_type != BLOCK_TYPE_FOOTER {
        return None;
    }

    let payload_len = footer.payload_len as usize;
    let bytes_left = payload_len.checked_sub(out_off)?;
    if bytes_left > DATA_SIZE - tail_start {
        return None;
    }

    let tail_data = &tail[tail_start..tail_start + bytes_left];
    digest.update(tail_data);
    dest[out_off..out_off + bytes_left].copy_from_slice(tail_data);
    out_off += bytes_left;

    if digest.finalize() != footer.digest {
        debug!("payload digest mismatch on the checksum-only pass");
        return None;
    }

    Some(DecodeSummary {
        len: out_off,
        corrected_blocks: 0,
    })
}

/// Where a full-correction pass reads blocks from and writes payload to.
///
/// In-place decoding is safe because every block is staged through a stack
/// buffer and the write offset never catches up with the read offset.
enum Buffers<'a> {
    Separate { src: &'a [u8], dest: &'a mut [u8] },
    InPlace(&'a mut [u8]),
}

impl Buffers<'_> {
    fn src_len(&self) -> usize {
        match self {
            Buffers::Separate { src, .. } => src.len(),
            Buffers::InPlace(buf) => buf.len(),
        }
    }

    fn read_into(&self, offset: usize, out: &mut [u8]) {
        let src: &[u8] = match self {
            Buffers::Separate { src, .. } => src,
            Buffers::InPlace(buf) => buf,
        };
        out.copy_from_slice(&src[offset..offset + out.len()]);
    }

    fn write(&mut self, offset: usize, bytes: &[u8]) {
        let dest = match self {
            Buffers::Separate { dest, .. } => &mut **dest,
            Buffers::InPlace(buf) => &mut **buf,
        };
        dest[offset..offset + bytes.len()].copy_from_slice(bytes);
    }
}

/// Full-correction pass: every block, including the header block and the
/// footer, goes through syndrome computation and, when damaged, Reed-Solomon
/// correction before its payload is trusted.
fn full_pass(mut bufs: Buffers<'_>) -> Result<DecodeSummary, DecodeError> {
    let src_len = bufs.src_len();

    let mut digest = PayloadDigest::new();
    let mut decoder = Decoder::new();
    let mut corrected_blocks = 0u32;
    let mut in_off = 0usize;
    let mut out_off = 0usize;
    let mut block_index = 0usize;
    let mut block = [0u8; BLOCK_SIZE];

    let tail_start = loop {
        if in_off + BLOCK_SIZE + FOOTER_SIZE > src_len {
            return Err(DecodeError::Truncated {
                offset: in_off,
                len: src_len,
            });
        }
        bufs.read_into(in_off, &mut block);
        in_off += BLOCK_SIZE;

        let correction = correct_block(&mut decoder, &mut block, &mut corrected_blocks);

        // A bad header outranks a failed correction: random input is
        // "not this format", not "unrecoverable".
        if block_index == 0 {
            check_header(&block, false)?;
        }
        correction.map_err(|source| DecodeError::Unrecoverable {
            block: block_index,
            source,
        })?;

        let payload_start = if block_index == 0 { HEADER_SIZE } else { 0 };
        let tag = block[BLOCK_TAG_OFFSET];
        block_index += 1;
        match tag {
            BLOCK_TYPE_LAST | BLOCK_TYPE_FOOTER => break payload_start,
            BLOCK_TYPE_DATA => {
                let data = &block[payload_start..DATA_SIZE];
                digest.update(data);
                bufs.write(out_off, data);
                out_off += data.len();
            }
            tag => {
                return Err(DecodeError::BadBlockType {
                    block: block_index - 1,
                    tag,
                })
            }
        }
    };

    let mut footer_buf = [0u8; FOOTER_SIZE];
    bufs.read_into(in_off, &mut footer_buf);

    let correction = correct_block(&mut decoder, &mut footer_buf, &mut corrected_blocks);

    let footer = Footer::parse(&footer_buf);
    if footer.block_type != BLOCK_TYPE_FOOTER {
        return Err(DecodeError::BadBlockType {
            block: block_index,
            tag: footer.block_type,
        });
    }
    correction.map_err(|source| DecodeError::Unrecoverable {
        block: block_index,
        source,
    })?;

    // Cross-check the stored length against what the blocks provided; the
    // remainder must fit in the last data block's payload region.
    let payload_len = footer.payload_len as usize;
    let bytes_left = payload_len
        .checked_sub(out_off)
        .filter(|&left| left <= DATA_SIZE - tail_start)
        .ok_or(DecodeError::BadPayloadLength {
            stored: footer.payload_len,
        })?;

    let tail_data = &block[tail_start..tail_start + bytes_left];
    digest.update(tail_data);
    bufs.write(out_off, tail_data);
    out_off += bytes_left;

    let computed = digest.finalize();
    if computed != footer.digest {
        return Err(DecodeError::DigestMismatch {
            stored: footer.digest,
            computed,
        });
    }

    Ok(DecodeSummary {
        len: out_off,
        corrected_blocks,
    })
}

/// Verify one block's syndrome and repair it if damaged, counting the block
/// against the corrected-blocks tally
fn correct_block(
    decoder: &mut Decoder,
    block: &mut [u8],
    corrected_blocks: &mut u32,
) -> Result<(), CorrectionError> {
    decoder.compute_syndromes(block);
    if decoder.has_errors() {
        *corrected_blocks += 1;
        decoder.correct(block, &[])?;
    }
    Ok(())
}

/// Validate the first block's tag and magic header.
///
/// An unknown version is tolerated: the block already decoded, so the
/// payload is at worst laid out the way a newer writer framed it.
fn check_header(block: &[u8], quiet: bool) -> Result<(), DecodeError> {
    let tag = block[BLOCK_TAG_OFFSET];
    if tag != BLOCK_TYPE_DATA && tag != BLOCK_TYPE_LAST {
        return Err(DecodeError::NotEccFormat);
    }

    let header = FileHeader::parse(&block[..HEADER_SIZE]).ok_or(DecodeError::NotEccFormat)?;
    if header.version != FILE_VERSION && !quiet {
        warn!(
            "unsupported ECC armor version {:?}; attempting to decode anyway",
            header.version as char
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encoded_size() {
        // One 255-byte block plus the 53-byte footer for anything that fits
        // the first block's 215 payload bytes
        assert_eq!(encoded_size(0), 308);
        assert_eq!(encoded_size(1), 308);
        assert_eq!(encoded_size(FIRST_DATA_SIZE), 308);

        // One more byte spills into a second block
        assert_eq!(encoded_size(FIRST_DATA_SIZE + 1), 563);

        assert_eq!(encoded_size(1000), 5 * BLOCK_SIZE + FOOTER_SIZE);
    }

    #[test]
    fn test_decoded_size() {
        assert_eq!(decoded_size(308), FIRST_DATA_SIZE);
        assert_eq!(decoded_size(563), FIRST_DATA_SIZE + DATA_SIZE);

        // Degenerate inputs saturate instead of wrapping
        assert_eq!(decoded_size(0), 0);
        assert_eq!(decoded_size(FOOTER_SIZE), 0);
    }

    #[test]
    fn test_decoded_size_bounds_encoded_payload() {
        for len in [0usize, 1, 214, 215, 216, 221, 222, 223, 1000, 4096] {
            let capacity = decoded_size(encoded_size(len));
            assert!(capacity >= len, "capacity {} < payload {}", capacity, len);
            // Capacity is exact when the last block is full
            if (len + HEADER_SIZE) % DATA_SIZE == 0 && len > 0 {
                assert_eq!(capacity, len);
            }
        }
    }

    #[test]
    fn test_encode_layout() {
        let payload = [0x5Au8; 100];
        let encoded = encode_to_vec(&payload);

        assert_eq!(encoded.len(), 308);
        assert_eq!(&encoded[..6], FILE_MAGIC);
        assert_eq!(encoded[6], FILE_VERSION);
        assert_eq!(&encoded[HEADER_SIZE..HEADER_SIZE + 100], &payload[..]);
        // Zero padding up to the tag, then LAST because everything fit
        assert!(encoded[HEADER_SIZE + 100..BLOCK_TAG_OFFSET]
            .iter()
            .all(|&b| b == 0));
        assert_eq!(encoded[BLOCK_TAG_OFFSET], BLOCK_TYPE_LAST);

        // Footer: tag, big-endian length, digest over the unpadded payload
        let footer_bytes: &[u8; FOOTER_SIZE] = encoded[BLOCK_SIZE..].try_into().unwrap();
        let footer = Footer::parse(footer_bytes);
        assert_eq!(footer.block_type, BLOCK_TYPE_FOOTER);
        assert_eq!(footer.payload_len, 100);
        assert_eq!(footer.digest, crate::digest::payload_digest(&payload));
    }

    #[test]
    fn test_encode_multi_block_tags() {
        // 1000 bytes: 215 + 3*222 + 119 = five blocks, last one padded
        let payload: Vec<u8> = (0..1000u16).map(|i| i as u8).collect();
        let encoded = encode_to_vec(&payload);

        assert_eq!(encoded.len(), 5 * BLOCK_SIZE + FOOTER_SIZE);
        for blk in 0..4 {
            assert_eq!(
                encoded[blk * BLOCK_SIZE + BLOCK_TAG_OFFSET],
                BLOCK_TYPE_DATA,
                "block {} should be DATA",
                blk
            );
        }
        assert_eq!(encoded[4 * BLOCK_SIZE + BLOCK_TAG_OFFSET], BLOCK_TYPE_LAST);
        assert_eq!(encoded[5 * BLOCK_SIZE], BLOCK_TYPE_FOOTER);
    }

    #[test]
    fn test_encode_rejects_small_destination() {
        let payload = [0u8; 10];
        let mut dest = [0u8; 307]; // one short of encoded_size(10)

        let err = encode(&payload, &mut dest).unwrap_err();
        assert_eq!(
            err,
            EncodeError::DestinationTooSmall {
                needed: 308,
                available: 307
            }
        );
        // Nothing was written
        assert!(dest.iter().all(|&b| b == 0));
    }

    #[test]
    fn test_decode_rejects_small_destination() {
        let encoded = encode_to_vec(&[1u8, 2, 3]);
        let mut dest = [0u8; FIRST_DATA_SIZE - 1];

        let err = decode(&encoded, &mut dest).unwrap_err();
        assert!(matches!(err, DecodeError::DestinationTooSmall { .. }));
    }
}
