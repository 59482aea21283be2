//! Crumble (CRyptographic gaMBLE)
//!
//! Mental Poker (1979) implemented using Shamir–Rivest–Adleman (SRA) commutative encryption.
//!
//! Copyright (c) 2026 Sonia Code; See LICENSE file for license details.

use num_bigint::BigUint;

pub type Exponent = BigUint;
pub type Plaintext = BigUint;
pub type Ciphertext = BigUint;
