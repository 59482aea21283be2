//! Number theory helpers over big integers.

use num_bigint::{BigInt, BigUint};

use crate::error::SraError;

/// Extended Euclidean algorithm over signed big integers.
///
/// Returns `(x, y, g)` such that `a * x + b * y == g == gcd(a, b)`.
pub fn extended_gcd(a: BigInt, b: BigInt) -> (BigInt, BigInt, BigInt) {
    let (mut old_r, mut r) = (a, b);
    let (mut old_s, mut s) = (BigInt::from(1), BigInt::ZERO);
    let (mut old_t, mut t) = (BigInt::ZERO, BigInt::from(1));

    while r != BigInt::ZERO {
        let q = &old_r / &r;
        (old_r, r) = (r.clone(), old_r - &q * &r);
        (old_s, s) = (s.clone(), old_s - &q * &s);
        (old_t, t) = (t.clone(), old_t - &q * &t);
    }
    (old_s, old_t, old_r)
}

pub fn is_coprime(a: &BigUint, b: &BigUint) -> bool {
    let (_, _, g) = extended_gcd(BigInt::from(a.clone()), BigInt::from(b.clone()));
    g == BigInt::from(1)
}

/// Computes `a^-1 mod m`, or `None` when `a` and `m` share a factor.
pub fn mod_inverse(a: &BigUint, m: &BigUint) -> Option<BigUint> {
    if *m == BigUint::ZERO {
        return None;
    }
    let m_signed = BigInt::from(m.clone());
    let (x, _, g) = extended_gcd(BigInt::from(a.clone()), m_signed.clone());
    if g != BigInt::from(1) {
        return None;
    }
    (((x % &m_signed) + &m_signed) % &m_signed).to_biguint()
}

pub fn parse_decimal(field: &'static str, value: &str) -> Result<BigUint, SraError> {
    value
        .trim()
        .parse::<BigUint>()
        .map_err(|_| SraError::InvalidInteger {
            field,
            value: value.to_string(),
        })
}
