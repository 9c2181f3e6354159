//! Plaintexts, ciphertexts and the CKKS operation context.
//!
//! Encoding is coefficient packing: a real vector is scaled by Δ, rounded,
//! and placed in the low coefficients of the message polynomial. The packed
//! inner product against a plaintext weight vector uses the negacyclic
//! arrangement `b(X) = w_0 - Σ_{j≥1} w_j X^{n-j}`, so the constant
//! coefficient of the product polynomial carries `Σ x_j w_j` at scale Δ².
//! This keeps the whole scoring protocol at ciphertext degree 1: no
//! relinearization, no rotations, no rescaling.

use crate::ckks::keys::{PublicKey, SecretKey};
use crate::ckks::rns::{negacyclic_mul, RnsPolynomial};
use crate::params::CkksParams;
use rand::Rng;
use rand_distr::Distribution;

/// Encoded message polynomial with its carried scale.
#[derive(Debug, Clone)]
pub struct Plaintext {
    pub poly: RnsPolynomial,
    pub scale: f64,
}

impl Plaintext {
    /// Pack a real vector into the low coefficients at the given scale.
    pub fn encode(values: &[f64], scale: f64, params: &CkksParams) -> Self {
        assert!(
            values.len() <= params.capacity(),
            "too many values to pack: {} > {}",
            values.len(),
            params.capacity()
        );
        let mut coeffs = vec![0i64; params.n];
        for (i, &v) in values.iter().enumerate() {
            coeffs[i] = (v * scale).round() as i64;
        }
        Self {
            poly: RnsPolynomial::from_coeffs(&coeffs, &params.moduli),
            scale,
        }
    }

    /// Encode a single scalar into the constant coefficient.
    pub fn encode_scalar(value: f64, scale: f64, params: &CkksParams) -> Self {
        Self::encode(&[value], scale, params)
    }

    /// Encode a weight vector in the negacyclic inner-product arrangement:
    /// multiplying a coefficient-packed ciphertext by this plaintext puts
    /// the inner product in the product's constant coefficient.
    pub fn encode_dot_weights(weights: &[f64], scale: f64, params: &CkksParams) -> Self {
        assert!(
            weights.len() <= params.capacity(),
            "too many weights to pack: {} > {}",
            weights.len(),
            params.capacity()
        );
        let n = params.n;
        let mut coeffs = vec![0i64; n];
        if let Some((&w0, rest)) = weights.split_first() {
            coeffs[0] = (w0 * scale).round() as i64;
            for (j, &wj) in rest.iter().enumerate() {
                coeffs[n - (j + 1)] = -((wj * scale).round() as i64);
            }
        }
        Self {
            poly: RnsPolynomial::from_coeffs(&coeffs, &params.moduli),
            scale,
        }
    }

    /// Decode all coefficients back to reals at the carried scale.
    pub fn decode(&self, params: &CkksParams) -> Vec<f64> {
        self.poly
            .lift_centered(&params.moduli)
            .iter()
            .map(|&c| c as f64 / self.scale)
            .collect()
    }

    /// Decode the constant coefficient only.
    pub fn decode_scalar(&self, params: &CkksParams) -> f64 {
        self.poly.lift_centered_coeff(0, &params.moduli) as f64 / self.scale
    }
}

/// RLWE ciphertext `(c0, c1)`; decryption is `c0 + c1·s`.
#[derive(Debug, Clone)]
pub struct Ciphertext {
    pub c0: RnsPolynomial,
    pub c1: RnsPolynomial,
    pub scale: f64,
    pub n: usize,
}

/// Stateless operation context bound to one parameter set.
pub struct CkksContext {
    pub params: CkksParams,
}

impl CkksContext {
    pub fn new(params: CkksParams) -> Self {
        Self { params }
    }

    /// Public-key encryption with ternary randomness and Gaussian errors.
    pub fn encrypt(&self, pt: &Plaintext, pk: &PublicKey) -> Ciphertext {
        let n = self.params.n;
        let moduli = &self.params.moduli;
        let mut rng = rand::thread_rng();

        let r: Vec<i64> = (0..n).map(|_| rng.gen_range(-1..=1)).collect();
        let normal = self.params.noise();
        let e0: Vec<i64> = (0..n).map(|_| normal.sample(&mut rng).round() as i64).collect();
        let e1: Vec<i64> = (0..n).map(|_| normal.sample(&mut rng).round() as i64).collect();

        let r_rns = RnsPolynomial::from_coeffs(&r, moduli);
        let e0_rns = RnsPolynomial::from_coeffs(&e0, moduli);
        let e1_rns = RnsPolynomial::from_coeffs(&e1, moduli);

        let c0 = negacyclic_mul(&pk.b, &r_rns, moduli)
            .add(&e0_rns, moduli)
            .add(&pt.poly, moduli);
        let c1 = negacyclic_mul(&pk.a, &r_rns, moduli).add(&e1_rns, moduli);

        Ciphertext {
            c0,
            c1,
            scale: pt.scale,
            n,
        }
    }

    /// Decrypt to an approximate message polynomial.
    pub fn decrypt(&self, ct: &Ciphertext, sk: &SecretKey) -> Plaintext {
        let moduli = &self.params.moduli;
        let s_rns = RnsPolynomial::from_coeffs(&sk.coeffs, moduli);
        let c1_s = negacyclic_mul(&ct.c1, &s_rns, moduli);
        let poly = ct.c0.add(&c1_s, moduli);
        Plaintext {
            poly,
            scale: ct.scale,
        }
    }

    /// Homomorphic ciphertext addition. Scales must match.
    pub fn add(&self, a: &Ciphertext, b: &Ciphertext) -> Ciphertext {
        assert_eq!(a.n, b.n, "ciphertexts must share the ring dimension");
        assert!(
            (a.scale - b.scale).abs() < 1.0,
            "ciphertexts must carry the same scale"
        );
        let moduli = &self.params.moduli;
        Ciphertext {
            c0: a.c0.add(&b.c0, moduli),
            c1: a.c1.add(&b.c1, moduli),
            scale: a.scale,
            n: a.n,
        }
    }

    /// Homomorphic plaintext addition (no encryption of the addend).
    pub fn add_plain(&self, ct: &Ciphertext, pt: &Plaintext) -> Ciphertext {
        assert!(
            (ct.scale - pt.scale).abs() < 1.0,
            "plaintext addend must be encoded at the ciphertext scale"
        );
        Ciphertext {
            c0: ct.c0.add(&pt.poly, &self.params.moduli),
            c1: ct.c1.clone(),
            scale: ct.scale,
            n: ct.n,
        }
    }

    /// Homomorphic multiplication by a plaintext polynomial. The result
    /// stays degree 1 and carries the product of the two scales.
    pub fn mul_plain(&self, ct: &Ciphertext, pt: &Plaintext) -> Ciphertext {
        let moduli = &self.params.moduli;
        Ciphertext {
            c0: negacyclic_mul(&ct.c0, &pt.poly, moduli),
            c1: negacyclic_mul(&ct.c1, &pt.poly, moduli),
            scale: ct.scale * pt.scale,
            n: ct.n,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ckks::keys::KeyContext;

    fn setup() -> (CkksParams, CkksContext, PublicKey, SecretKey) {
        let params = CkksParams::new_test_256();
        let ctx = CkksContext::new(params.clone());
        let (pk, sk) = KeyContext::new(params.clone()).keygen();
        (params, ctx, pk, sk)
    }

    #[test]
    fn test_encode_decode_roundtrip() {
        let params = CkksParams::new_test_256();
        let values = vec![1.5, -2.75, 0.0, 3.125, -0.001];
        let pt = Plaintext::encode(&values, params.scale, &params);
        let decoded = pt.decode(&params);
        for (i, &v) in values.iter().enumerate() {
            assert!(
                (decoded[i] - v).abs() < 1e-5,
                "slot {}: expected {}, got {}",
                i,
                v,
                decoded[i]
            );
        }
    }

    #[test]
    fn test_encrypt_decrypt_roundtrip() {
        let (params, ctx, pk, sk) = setup();
        let values = vec![0.5, -1.25, 2.0, 7.75];
        let pt = Plaintext::encode(&values, params.scale, &params);
        let ct = ctx.encrypt(&pt, &pk);
        let decoded = ctx.decrypt(&ct, &sk).decode(&params);
        for (i, &v) in values.iter().enumerate() {
            assert!(
                (decoded[i] - v).abs() < 1e-3,
                "slot {}: expected {}, got {}",
                i,
                v,
                decoded[i]
            );
        }
    }

    #[test]
    fn test_homomorphic_addition() {
        let (params, ctx, pk, sk) = setup();
        let pt_a = Plaintext::encode(&[1.0, 2.0], params.scale, &params);
        let pt_b = Plaintext::encode(&[0.25, -3.0], params.scale, &params);
        let sum = ctx.add(&ctx.encrypt(&pt_a, &pk), &ctx.encrypt(&pt_b, &pk));
        let decoded = ctx.decrypt(&sum, &sk).decode(&params);
        assert!((decoded[0] - 1.25).abs() < 1e-3);
        assert!((decoded[1] - (-1.0)).abs() < 1e-3);
    }

    #[test]
    fn test_plaintext_addition_without_reencryption() {
        let (params, ctx, pk, sk) = setup();
        let pt = Plaintext::encode(&[4.0], params.scale, &params);
        let ct = ctx.encrypt(&pt, &pk);
        let addend = Plaintext::encode_scalar(-1.5, ct.scale, &params);
        let shifted = ctx.add_plain(&ct, &addend);
        let got = ctx.decrypt(&shifted, &sk).decode_scalar(&params);
        assert!((got - 2.5).abs() < 1e-3, "got {}", got);
    }

    #[test]
    fn test_packed_inner_product() {
        let (params, ctx, pk, sk) = setup();
        let x = vec![1.0, -2.0, 0.5, 3.0];
        let w = vec![0.5, 1.5, -1.0, 2.0];
        let expected: f64 = x.iter().zip(&w).map(|(a, b)| a * b).sum();

        let ct = ctx.encrypt(&Plaintext::encode(&x, params.scale, &params), &pk);
        let w_pt = Plaintext::encode_dot_weights(&w, params.scale, &params);
        let prod = ctx.mul_plain(&ct, &w_pt);
        let got = ctx.decrypt(&prod, &sk).decode_scalar(&params);

        assert!(
            (got - expected).abs() < 1e-2,
            "inner product drifted: expected {}, got {}",
            expected,
            got
        );
    }

    #[test]
    fn test_inner_product_of_empty_vector_is_zero() {
        let (params, ctx, pk, sk) = setup();
        let ct = ctx.encrypt(&Plaintext::encode(&[], params.scale, &params), &pk);
        let w_pt = Plaintext::encode_dot_weights(&[], params.scale, &params);
        let prod = ctx.mul_plain(&ct, &w_pt);
        let got = ctx.decrypt(&prod, &sk).decode_scalar(&params);
        assert_eq!(got, 0.0, "empty inner product must be exactly zero");
    }
}
