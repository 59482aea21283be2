/// SRA (Un)Masking
///
/// Masking and unmasking are the same operation, `value^exponent mod n`;
/// a layer added with `e` is peeled with the matching `d`. Layers from
/// different players commute because every exponent works mod the same `n`.
use num_bigint::BigUint;

use crate::types::{Ciphertext, Exponent, Plaintext};

pub fn mask(value: &Plaintext, exponent: &Exponent, n: &BigUint) -> Ciphertext {
    value.modpow(exponent, n)
}

pub fn unmask(value: &Ciphertext, exponent: &Exponent, n: &BigUint) -> Plaintext {
    value.modpow(exponent, n)
}

pub fn mask_all(values: &mut [BigUint], exponent: &Exponent, n: &BigUint) {
    values
        .iter_mut()
        .for_each(|value| *value = mask(value, exponent, n));
}

pub fn unmask_all(values: &mut [BigUint], exponent: &Exponent, n: &BigUint) {
    values
        .iter_mut()
        .for_each(|value| *value = unmask(value, exponent, n));
}
