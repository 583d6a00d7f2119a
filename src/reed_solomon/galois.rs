//! Galois Field GF(256) arithmetic for Reed-Solomon operations
//!
//! All codec symbols are 8-bit field elements. Addition is XOR; multiplication
//! and inversion go through precomputed logarithm/exponential tables built
//! from the primitive polynomial 0x11D (x⁸ + x⁴ + x³ + x² + 1).

use std::sync::OnceLock;

/// Primitive polynomial for GF(256)
const GF_GENERATOR: u32 = 0x11D;

/// Precomputed logarithm and exponential tables
pub struct GaloisField {
    log_table: [u8; 256],
    exp_table: [u8; 510], // 2x size to avoid modulo in multiplication
}

impl GaloisField {
    /// Create a new Galois Field with precomputed tables
    pub fn new() -> Self {
        let mut gf = GaloisField {
            log_table: [0; 256],
            exp_table: [0; 510],
        };
        gf.build_tables();
        gf
    }

    fn build_tables(&mut self) {
        let mut value = 1u32;

        for i in 0..255 {
            self.exp_table[i] = value as u8;
            self.log_table[value as usize] = i as u8;

            value <<= 1;
            if value & 0x100 != 0 {
                value ^= GF_GENERATOR;
            }
        }

        // Duplicate the table so log(a) + log(b) never needs reducing
        for i in 255..510 {
            self.exp_table[i] = self.exp_table[i - 255];
        }

        // log(0) is mathematically undefined and must never be read
        self.log_table[0] = 0;
    }

    /// Add two elements in GF(256) - this is just XOR
    #[inline]
    pub fn add(&self, a: u8, b: u8) -> u8 {
        a ^ b
    }

    /// Multiply two elements in GF(256)
    #[inline]
    pub fn mul(&self, a: u8, b: u8) -> u8 {
        if a == 0 || b == 0 {
            return 0;
        }

        let log_a = self.log_table[a as usize] as usize;
        let log_b = self.log_table[b as usize] as usize;
        self.exp_table[log_a + log_b]
    }

    /// Get the multiplicative inverse of a nonzero element
    #[inline]
    pub fn inv(&self, a: u8) -> u8 {
        if a == 0 {
            panic!("Cannot invert zero in Galois Field");
        }

        let log_a = self.log_table[a as usize] as usize;
        self.exp_table[255 - log_a]
    }

    /// α raised to an arbitrary power, reduced mod 255
    #[inline]
    pub fn exp(&self, power: usize) -> u8 {
        self.exp_table[power % 255]
    }

    /// Discrete logarithm of a nonzero element
    #[inline]
    pub fn log(&self, a: u8) -> u8 {
        debug_assert_ne!(a, 0, "log(0) is undefined in GF(256)");
        self.log_table[a as usize]
    }
}

impl Default for GaloisField {
    fn default() -> Self {
        Self::new()
    }
}

/// Global Galois Field instance shared by the encoder and decoder
static GALOIS_FIELD: OnceLock<GaloisField> = OnceLock::new();

/// Get the global Galois Field instance
pub fn galois_field() -> &'static GaloisField {
    GALOIS_FIELD.get_or_init(GaloisField::new)
}

/// Convenience functions using the global Galois Field
#[inline]
pub fn gf_mul(a: u8, b: u8) -> u8 {
    galois_field().mul(a, b)
}

#[inline]
pub fn gf_inv(a: u8) -> u8 {
    galois_field().inv(a)
}

#[inline]
pub fn gf_exp(power: usize) -> u8 {
    galois_field().exp(power)
}
