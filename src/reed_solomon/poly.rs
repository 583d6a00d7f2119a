//! Fixed-capacity polynomial arithmetic over GF(256)
//!
//! Working polynomials are `[u8; MAXDEG]` coefficient arrays, index 0 holding
//! the lowest-degree coefficient. Nothing here resizes: the decoder's
//! polynomials never exceed `MAXDEG` slots, and a full multiplication
//! produces at most `2 * MAXDEG` coefficients.

use super::galois::gf_mul;
use super::MAXDEG;

/// A working polynomial with fixed coefficient capacity
pub type Poly = [u8; MAXDEG];

/// Multiply every coefficient by a scalar field element
pub fn scale(k: u8, poly: &mut Poly) {
    for coeff in poly.iter_mut() {
        *coeff = gf_mul(k, *coeff);
    }
}

/// Multiply by the indeterminate z: shift every coefficient up one degree
pub fn shift_up(poly: &mut Poly) {
    for i in (1..MAXDEG).rev() {
        poly[i] = poly[i - 1];
    }
    poly[0] = 0;
}

/// Polynomial addition, which in characteristic 2 is element-wise XOR
pub fn add_assign(dst: &mut Poly, src: &Poly) {
    for (d, s) in dst.iter_mut().zip(src.iter()) {
        *d ^= s;
    }
}

/// Full polynomial multiplication: the discrete convolution of the
/// coefficient arrays under field multiplication, accumulated with XOR.
pub fn mul(p1: &Poly, p2: &Poly) -> [u8; MAXDEG * 2] {
    let mut dst = [0u8; MAXDEG * 2];

    for (i, &a) in p1.iter().enumerate() {
        if a == 0 {
            continue;
        }
        for (j, &b) in p2.iter().enumerate() {
            dst[i + j] ^= gf_mul(a, b);
        }
    }

    dst
}
