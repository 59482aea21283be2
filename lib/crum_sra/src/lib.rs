//! Crumble (CRyptographic gaMBLE)
//!
//! Mental Poker (1979) implemented using Shamir–Rivest–Adleman (SRA) commutative encryption.
//!
//! Copyright (c) 2026 Sonia Code; See LICENSE file for license details.

pub mod error;
pub mod keys;
pub mod mask;
pub mod modulus;
pub mod prime;
pub mod types;
pub mod util;

pub use error::SraError;
pub use keys::KeyPair;
pub use modulus::SharedModulus;
