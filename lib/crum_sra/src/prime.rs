//! Probable prime generation for the pre-shared modulus.

use num_bigint::{BigUint, RandBigInt};
use rand::Rng;

pub const MILLER_RABIN_ROUNDS: usize = 40;

const SMALL_PRIMES: [u32; 15] = [2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47];

/// Miller–Rabin probabilistic primality test.
pub fn is_probable_prime<R: Rng + ?Sized>(n: &BigUint, rounds: usize, rng: &mut R) -> bool {
    let one = BigUint::from(1u32);
    let two = BigUint::from(2u32);

    if *n < two {
        return false;
    }

    for p in SMALL_PRIMES {
        let p = BigUint::from(p);
        if *n == p {
            return true;
        }
        if n % &p == BigUint::ZERO {
            return false;
        }
    }

    let n_minus_one = n - &one;
    let s = n_minus_one.trailing_zeros().unwrap_or(0);
    let d = &n_minus_one >> s;

    'witness: for _ in 0..rounds {
        let a = rng.gen_biguint_range(&two, &n_minus_one);
        let mut x = a.modpow(&d, n);
        if x == one || x == n_minus_one {
            continue;
        }
        for _ in 1..s {
            x = x.modpow(&two, n);
            if x == n_minus_one {
                continue 'witness;
            }
        }
        return false;
    }

    true
}

/// Draws random odd candidates with the top bit set until one passes Miller–Rabin.
pub fn generate_prime<R: Rng + ?Sized>(bits: u64, rng: &mut R) -> BigUint {
    let bits = bits.max(8);
    loop {
        let mut candidate = rng.gen_biguint(bits);
        candidate.set_bit(bits - 1, true);
        candidate.set_bit(0, true);
        if is_probable_prime(&candidate, MILLER_RABIN_ROUNDS, rng) {
            tracing::debug!(bits, "found probable prime");
            return candidate;
        }
    }
}
