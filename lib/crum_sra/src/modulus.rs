//! Crumble (CRyptographic gaMBLE)
//!
//! Mental Poker (1979) implemented using Shamir–Rivest–Adleman (SRA) commutative encryption.
//!
//! Copyright (c) 2026 Sonia Code; See LICENSE file for license details.

use std::{fmt, path::Path, str::FromStr};

use num_bigint::BigUint;
use rand::Rng;

use crate::{error::SraError, prime::generate_prime, util::parse_decimal};

/// Modulus `n = p * q` shared by every seat at the table.
///
/// All players must exponentiate under the same modulus, otherwise the
/// masking layers would not commute. The factorisation is pre-shared, and
/// each player derives their own key pair from `phi`.
#[derive(Clone, PartialEq, Eq)]
pub struct SharedModulus {
    p: BigUint,
    q: BigUint,
    n: BigUint,
    phi: BigUint,
}

impl SharedModulus {
    pub fn from_primes(p: BigUint, q: BigUint) -> Result<Self, SraError> {
        let three = BigUint::from(3u32);
        if p < three || q < three {
            return Err(SraError::InvalidModulus("primes must be odd and greater than 2"));
        }
        if p == q {
            return Err(SraError::InvalidModulus("p and q must differ"));
        }
        let n = &p * &q;
        let phi = (&p - 1u32) * (&q - 1u32);
        Ok(Self { p, q, n, phi })
    }

    /// Reads the three decimal lines `p`, `q` and `n` of a key file.
    pub fn from_key_file(path: impl AsRef<Path>) -> Result<Self, SraError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| SraError::KeyFile {
            path: path.to_path_buf(),
            source,
        })?;
        let modulus = text.parse::<Self>()?;
        tracing::info!(path = %path.display(), bits = modulus.bits(), "shared modulus loaded");
        Ok(modulus)
    }

    pub fn generate<R: Rng + ?Sized>(prime_bits: u64, rng: &mut R) -> Self {
        loop {
            let p = generate_prime(prime_bits, rng);
            let q = generate_prime(prime_bits, rng);
            if let Ok(modulus) = Self::from_primes(p, q) {
                return modulus;
            }
        }
    }

    pub fn to_key_file_string(&self) -> String {
        format!("{}\n{}\n{}\n", self.p, self.q, self.n)
    }

    pub fn n(&self) -> &BigUint {
        &self.n
    }

    pub fn phi(&self) -> &BigUint {
        &self.phi
    }

    pub fn bits(&self) -> u64 {
        self.n.bits()
    }
}

impl FromStr for SharedModulus {
    type Err = SraError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let mut lines = text.lines().map(str::trim).filter(|l| !l.is_empty());
        let p = parse_decimal("p", lines.next().ok_or(SraError::MissingLine("p"))?)?;
        let q = parse_decimal("q", lines.next().ok_or(SraError::MissingLine("q"))?)?;
        let n = parse_decimal("n", lines.next().ok_or(SraError::MissingLine("n"))?)?;

        let modulus = Self::from_primes(p, q)?;
        if modulus.n != n {
            return Err(SraError::ModulusMismatch);
        }
        Ok(modulus)
    }
}

impl fmt::Debug for SharedModulus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SharedModulus({} bits)", self.bits())
    }
}
