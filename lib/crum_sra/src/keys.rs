//! Crumble (CRyptographic gaMBLE)
//!
//! Mental Poker (1979) implemented using Shamir–Rivest–Adleman (SRA) commutative encryption.
//!
//! Copyright (c) 2026 Sonia Code; See LICENSE file for license details.

use std::fmt;

use num_bigint::{BigUint, RandBigInt};
use rand::Rng;

use crate::{
    error::SraError,
    mask,
    modulus::SharedModulus,
    types::{Ciphertext, Exponent, Plaintext},
    util::{is_coprime, mod_inverse},
};

pub const MAX_KEYGEN_ATTEMPTS: usize = 64;

/// Per-player SRA exponents over the shared modulus.
#[derive(Clone)]
pub struct KeyPair {
    public_exp: Exponent,
    private_exp: Exponent,
    n: BigUint,
}

impl KeyPair {
    /// Picks `e` coprime to `phi` and computes `d = e^-1 mod phi`,
    /// retrying while `e == d`.
    pub fn generate<R: Rng + ?Sized>(
        modulus: &SharedModulus,
        rng: &mut R,
    ) -> Result<Self, SraError> {
        let low = BigUint::from(3u32);
        let phi = modulus.phi();
        if *phi <= low {
            return Err(SraError::InvalidModulus("totient too small for key selection"));
        }

        for attempt in 1..=MAX_KEYGEN_ATTEMPTS {
            let e = rng.gen_biguint_range(&low, phi);
            if !is_coprime(&e, phi) {
                continue;
            }
            let d = mod_inverse(&e, phi).ok_or(SraError::NoModularInverse)?;
            if d == e {
                tracing::debug!(attempt, "encryption and decryption exponents coincide");
                continue;
            }
            return Ok(Self {
                public_exp: e,
                private_exp: d,
                n: modulus.n().clone(),
            });
        }

        Err(SraError::KeyGenerationExhausted(MAX_KEYGEN_ATTEMPTS))
    }

    pub fn public_exp(&self) -> &Exponent {
        &self.public_exp
    }

    pub fn private_exp(&self) -> &Exponent {
        &self.private_exp
    }

    pub fn n(&self) -> &BigUint {
        &self.n
    }

    pub fn mask(&self, value: &Plaintext) -> Ciphertext {
        mask::mask(value, &self.public_exp, &self.n)
    }

    pub fn unmask(&self, value: &Ciphertext) -> Plaintext {
        mask::unmask(value, &self.private_exp, &self.n)
    }

    pub fn mask_all(&self, values: &mut [BigUint]) {
        mask::mask_all(values, &self.public_exp, &self.n);
    }

    pub fn unmask_all(&self, values: &mut [BigUint]) {
        mask::unmask_all(values, &self.private_exp, &self.n);
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KeyPair {{ n: {} bits, .. }}", self.n.bits())
    }
}
