//! Key material and key generation.
//!
//! Standard RLWE public-key setup: ternary secret `s`, uniform `a` per chain
//! prime, `b = -(a·s + e)`. Decryption computes `c0 + c1·s`, in which the
//! uniform component cancels and only the small error terms remain.

use rand::Rng;
use rand_distr::Distribution;

use crate::ckks::rns::{negacyclic_mul, RnsPolynomial};
use crate::params::CkksParams;

/// Ternary secret key, coefficients in {-1, 0, 1}.
#[derive(Debug, Clone)]
pub struct SecretKey {
    pub coeffs: Vec<i64>,
}

/// RLWE public key `(a, b)` with `b = -(a·s + e)`.
#[derive(Debug, Clone)]
pub struct PublicKey {
    pub a: RnsPolynomial,
    pub b: RnsPolynomial,
}

/// Key generation bound to one parameter set.
pub struct KeyContext {
    pub params: CkksParams,
}

impl KeyContext {
    pub fn new(params: CkksParams) -> Self {
        Self { params }
    }

    /// Generate a fresh public/secret key pair.
    pub fn keygen(&self) -> (PublicKey, SecretKey) {
        let n = self.params.n;
        let moduli = &self.params.moduli;
        let mut rng = rand::thread_rng();

        let s: Vec<i64> = (0..n).map(|_| rng.gen_range(-1..=1)).collect();

        // Gaussian errors are small signed integers regardless of the prime.
        let normal = self.params.noise();
        let e: Vec<i64> = (0..n).map(|_| normal.sample(&mut rng).round() as i64).collect();

        // a is uniform mod Q: independent uniform residues per prime.
        let a_residues: Vec<Vec<i64>> = moduli
            .iter()
            .map(|&q| (0..n).map(|_| rng.gen_range(0..q)).collect())
            .collect();
        let a = RnsPolynomial {
            residues: a_residues,
            n,
        };

        let s_rns = RnsPolynomial::from_coeffs(&s, moduli);
        let e_rns = RnsPolynomial::from_coeffs(&e, moduli);

        let a_s = negacyclic_mul(&a, &s_rns, moduli);
        let b = a_s.add(&e_rns, moduli).neg(moduli);

        (PublicKey { a, b }, SecretKey { coeffs: s })
    }
}
