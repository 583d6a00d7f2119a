//! Reed-Solomon encoder
//!
//! Parity generation is a linear-feedback shift register clocked once per
//! message byte, with taps taken from the code's generator polynomial
//! `g(z) = Π (z + αⁱ)` for i = 1..=NPAR. The generator depends only on the
//! fixed `NPAR`, so it is computed once and memoized for the process
//! lifetime.

use std::sync::OnceLock;

use super::galois::galois_field;
use super::poly::{self, Poly};
use super::{MAX_MESSAGE_SIZE, MAXDEG, NPAR};

static GENERATOR: OnceLock<Poly> = OnceLock::new();

/// The generator polynomial for the code, lowest-degree coefficient first.
///
/// Computed on first use and immutable thereafter; degree is exactly `NPAR`.
pub fn generator_poly() -> &'static Poly {
    GENERATOR.get_or_init(build_generator)
}

/// Accumulate the product of (z + αⁱ) for i = 1..=NPAR
fn build_generator() -> Poly {
    let gf = galois_field();

    let mut gen: Poly = [0; MAXDEG];
    gen[0] = 1;

    for i in 1..=NPAR {
        let mut factor: Poly = [0; MAXDEG];
        factor[0] = gf.exp(i);
        factor[1] = 1;

        let product = poly::mul(&gen, &factor);
        gen.copy_from_slice(&product[..MAXDEG]);
    }

    gen
}

/// Compute the `NPAR` parity symbols for a message, in wire order.
///
/// Appending the returned bytes directly after `msg` yields a codeword with
/// all-zero syndromes. Parity generation cannot fail; a message longer than
/// [`MAX_MESSAGE_SIZE`] is a caller bug.
pub fn parity(msg: &[u8]) -> [u8; NPAR] {
    assert!(
        msg.len() <= MAX_MESSAGE_SIZE,
        "message of {} bytes exceeds the {} byte codeword capacity",
        msg.len(),
        MAX_MESSAGE_SIZE
    );

    let gf = galois_field();
    let gen = generator_poly();

    let mut lfsr = [0u8; NPAR];
    for &byte in msg {
        let feedback = byte ^ lfsr[NPAR - 1];
        for j in (1..NPAR).rev() {
            lfsr[j] = lfsr[j - 1] ^ gf.mul(gen[j], feedback);
        }
        lfsr[0] = gf.mul(gen[0], feedback);
    }

    // The register holds parity lowest cell first; the wire wants the
    // opposite order.
    let mut out = [0u8; NPAR];
    for (i, slot) in out.iter_mut().enumerate() {
        *slot = lfsr[NPAR - 1 - i];
    }
    out
}
