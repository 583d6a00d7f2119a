//! Reed-Solomon decoder
//!
//! Per-codeword pipeline: syndrome computation, the modified Berlekamp-Massey
//! solver (Cain & Clark's formulation, which folds known erasure locations
//! into the starting state), a brute-force Chien search for the roots of the
//! error locator, and Forney error-magnitude recovery.
//!
//! A [`Decoder`] is a scratch value: create one per codeword (or reuse it,
//! every entry point rewrites the state it reads), call
//! [`Decoder::compute_syndromes`], and if [`Decoder::has_errors`] reports
//! damage, [`Decoder::correct`] repairs the codeword in place.
//!
//! Locations use the classical convention: location `i` means the byte at
//! `codeword[len - 1 - i]`, i.e. the distance from the end of the codeword.

use smallvec::SmallVec;

use super::galois::{galois_field, gf_mul};
use super::poly::{self, Poly};
use super::{MAXDEG, NPAR};
use crate::error::CorrectionError;

/// Scratch state for decoding a single codeword
pub struct Decoder {
    /// Syndromes of the most recently examined codeword; only the first
    /// `NPAR` slots are ever nonzero
    syndromes: [u8; MAXDEG],

    /// Error locator polynomial (Lambda), `lambda[0] == 1`
    lambda: Poly,

    /// Error evaluator polynomial (Omega)
    omega: Poly,

    /// Error locations found by the root search
    error_locs: SmallVec<[u8; NPAR]>,
}

impl Decoder {
    pub fn new() -> Self {
        Decoder {
            syndromes: [0; MAXDEG],
            lambda: [0; MAXDEG],
            omega: [0; MAXDEG],
            error_locs: SmallVec::new(),
        }
    }

    /// Evaluate the codeword at α¹..α^NPAR by Horner's rule.
    ///
    /// All syndromes are zero if and only if the codeword carries no
    /// detectable damage.
    pub fn compute_syndromes(&mut self, codeword: &[u8]) {
        let gf = galois_field();

        for j in 0..NPAR {
            let alpha = gf.exp(j + 1);
            let mut sum = 0u8;
            for &byte in codeword {
                sum = byte ^ gf.mul(alpha, sum);
            }
            self.syndromes[j] = sum;
        }
    }

    /// Whether the last syndrome computation saw any damage
    pub fn has_errors(&self) -> bool {
        self.syndromes[..NPAR].iter().any(|&s| s != 0)
    }

    /// Number of error locations found by the last correction attempt
    pub fn error_count(&self) -> usize {
        self.error_locs.len()
    }

    /// Locate and repair the errors in `codeword` using the syndromes from
    /// the preceding [`Decoder::compute_syndromes`] call.
    ///
    /// `erasures` lists locations already known to be damaged (at most
    /// `NPAR`); byte errors at unknown positions are found on top of them.
    /// Returns the number of symbols repaired. On failure the codeword may
    /// hold partially applied corrections and must not be trusted.
    pub fn correct(
        &mut self,
        codeword: &mut [u8],
        erasures: &[u8],
    ) -> Result<usize, CorrectionError> {
        assert!(
            erasures.len() <= NPAR,
            "{} erasures exceed the {} parity symbols",
            erasures.len(),
            NPAR
        );

        self.berlekamp_massey(erasures);
        self.find_roots();

        let count = self.error_locs.len();
        if count == 0 {
            return Err(CorrectionError::NoRootsFound);
        }
        if count > NPAR {
            return Err(CorrectionError::TooManyErrors { found: count });
        }

        for &loc in &self.error_locs {
            if usize::from(loc) >= codeword.len() {
                return Err(CorrectionError::LocationOutOfBounds { location: loc });
            }
        }

        let gf = galois_field();
        for &loc in &self.error_locs {
            let i = usize::from(loc);

            // Forney: Omega evaluated at α^(255-i) over the derivative of
            // Lambda at the same point.
            let mut num = 0u8;
            for (j, &coeff) in self.omega.iter().enumerate() {
                num ^= gf.mul(coeff, gf.exp((255 - i) * j));
            }

            // Only odd-degree terms of Lambda survive differentiation in
            // characteristic 2.
            let mut denom = 0u8;
            for j in (1..MAXDEG).step_by(2) {
                denom ^= gf.mul(self.lambda[j], gf.exp((255 - i) * (j - 1)));
            }
            if denom == 0 {
                return Err(CorrectionError::DegenerateLocator { location: loc });
            }

            let magnitude = gf.mul(num, gf.inv(denom));
            codeword[codeword.len() - i - 1] ^= magnitude;
        }

        Ok(count)
    }

    /// Cain & Clark's modified Berlekamp-Massey iteration.
    ///
    /// Produces the error locator Lambda (seeded with the erasure locator so
    /// known-bad positions are forced to be roots) and the error evaluator
    /// Omega = (Lambda · S) mod z^NPAR.
    fn berlekamp_massey(&mut self, erasures: &[u8]) {
        let gf = galois_field();

        let gamma = erasure_locator(erasures);

        let mut d_poly = gamma;
        poly::shift_up(&mut d_poly);

        let mut psi = gamma;
        let mut k: i32 = -1;
        let mut l = erasures.len() as i32;

        for n in erasures.len()..NPAR {
            let d = self.discrepancy(&psi, l, n);

            if d != 0 {
                let mut psi2: Poly = [0; MAXDEG];
                for (i, slot) in psi2.iter_mut().enumerate() {
                    *slot = psi[i] ^ gf.mul(d, d_poly[i]);
                }

                // The tie-break below must stay strict: accepting equality
                // here breaks decoding for some error patterns.
                if l < n as i32 - k {
                    let l2 = n as i32 - k;
                    k = n as i32 - l;
                    let inv_d = gf.inv(d);
                    for (i, slot) in d_poly.iter_mut().enumerate() {
                        *slot = gf.mul(psi[i], inv_d);
                    }
                    l = l2;
                }

                psi = psi2;
            }

            poly::shift_up(&mut d_poly);
        }

        self.lambda = psi;

        let product = poly::mul(&self.lambda, &self.syndromes);
        self.omega = [0; MAXDEG];
        self.omega[..NPAR].copy_from_slice(&product[..NPAR]);
    }

    /// d = Σ ψ[i] · S[n-i] for i = 0..=L
    fn discrepancy(&self, psi: &Poly, l: i32, n: usize) -> u8 {
        let mut sum = 0u8;
        for i in 0..=l as usize {
            sum ^= gf_mul(psi[i], self.syndromes[n - i]);
        }
        sum
    }

    /// Chien search: evaluate Lambda at every nonzero field element.
    ///
    /// Intentionally the O(255 · NPAR) brute-force form; a root at αʳ means
    /// an error at location 255 - r.
    fn find_roots(&mut self) {
        let gf = galois_field();
        self.error_locs.clear();

        for r in 1..256usize {
            let mut sum = 0u8;
            for (k, &coeff) in self.lambda.iter().take(NPAR + 1).enumerate() {
                sum ^= gf.mul(gf.exp(k * r), coeff);
            }
            if sum == 0 {
                self.error_locs.push((255 - r) as u8);
            }
        }
    }
}

impl Default for Decoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Γ = Π (1 - z·α^loc) over the known erasure locations (1 when empty)
fn erasure_locator(erasures: &[u8]) -> Poly {
    let gf = galois_field();

    let mut gamma: Poly = [0; MAXDEG];
    gamma[0] = 1;

    for &loc in erasures {
        let mut term = gamma;
        poly::scale(gf.exp(usize::from(loc)), &mut term);
        poly::shift_up(&mut term);
        poly::add_assign(&mut gamma, &term);
    }

    gamma
}
