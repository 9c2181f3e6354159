//! RNS polynomials over the coefficient modulus chain.
//!
//! A polynomial in `Z_Q[X]/(X^n + 1)` is stored prime-major: one residue
//! vector per chain prime. All arithmetic is exact per prime; decoding lifts
//! centered residues of the first prime only, which is valid while the
//! underlying integer coefficients stay below `q0 / 2` in magnitude (true at
//! the protocol's multiplicative depth of 1).

use rayon::prelude::*;

/// Polynomial in RNS form: `residues[p][i]` is coefficient `i` mod `moduli[p]`.
#[derive(Debug, Clone)]
pub struct RnsPolynomial {
    pub residues: Vec<Vec<i64>>,
    pub n: usize,
}

impl RnsPolynomial {
    /// All-zero polynomial.
    pub fn zero(n: usize, num_primes: usize) -> Self {
        Self {
            residues: vec![vec![0i64; n]; num_primes],
            n,
        }
    }

    /// Reduce signed integer coefficients into RNS form.
    pub fn from_coeffs(coeffs: &[i64], moduli: &[i64]) -> Self {
        let n = coeffs.len();
        let residues = moduli
            .iter()
            .map(|&q| coeffs.iter().map(|&c| ((c % q) + q) % q).collect())
            .collect();
        Self { residues, n }
    }

    /// Coefficient-wise addition.
    pub fn add(&self, other: &Self, moduli: &[i64]) -> Self {
        debug_assert_eq!(self.n, other.n, "polynomial length mismatch");
        let residues = moduli
            .iter()
            .enumerate()
            .map(|(p, &q)| {
                self.residues[p]
                    .iter()
                    .zip(&other.residues[p])
                    .map(|(&a, &b)| (a + b) % q)
                    .collect()
            })
            .collect();
        Self {
            residues,
            n: self.n,
        }
    }

    /// Coefficient-wise subtraction.
    pub fn sub(&self, other: &Self, moduli: &[i64]) -> Self {
        debug_assert_eq!(self.n, other.n, "polynomial length mismatch");
        let residues = moduli
            .iter()
            .enumerate()
            .map(|(p, &q)| {
                self.residues[p]
                    .iter()
                    .zip(&other.residues[p])
                    .map(|(&a, &b)| ((a - b) % q + q) % q)
                    .collect()
            })
            .collect();
        Self {
            residues,
            n: self.n,
        }
    }

    /// Coefficient-wise negation.
    pub fn neg(&self, moduli: &[i64]) -> Self {
        let residues = moduli
            .iter()
            .enumerate()
            .map(|(p, &q)| self.residues[p].iter().map(|&a| (q - a) % q).collect())
            .collect();
        Self {
            residues,
            n: self.n,
        }
    }

    /// Centered lift of one coefficient via the first chain prime.
    pub fn lift_centered_coeff(&self, idx: usize, moduli: &[i64]) -> i64 {
        let q0 = moduli[0];
        let half = q0 / 2;
        let v = self.residues[0][idx];
        if v > half {
            v - q0
        } else {
            v
        }
    }

    /// Lift to signed integer coefficients via the centered residues of the
    /// first chain prime.
    pub fn lift_centered(&self, moduli: &[i64]) -> Vec<i64> {
        (0..self.n)
            .map(|i| self.lift_centered_coeff(i, moduli))
            .collect()
    }
}

/// Negacyclic (mod `X^n + 1`) polynomial multiplication, schoolbook per
/// prime, with the per-prime loop running on the rayon pool.
///
/// Products are reduced before accumulation so the `i128` accumulator never
/// overflows for any chain of sub-61-bit primes and `n ≤ 2^16`. Zero
/// coefficients of `a` are skipped, which makes multiplication by sparse
/// polynomials (ternary randomness, packed weight vectors) proportional to
/// their support.
pub fn negacyclic_mul(a: &RnsPolynomial, b: &RnsPolynomial, moduli: &[i64]) -> RnsPolynomial {
    assert_eq!(a.n, b.n, "polynomial length mismatch");
    let n = a.n;

    let residues: Vec<Vec<i64>> = moduli
        .par_iter()
        .enumerate()
        .map(|(p, &q)| {
            let av = &a.residues[p];
            let bv = &b.residues[p];
            let q128 = q as i128;
            let mut acc = vec![0i128; n];
            for i in 0..n {
                let ai = av[i] as i128;
                if ai == 0 {
                    continue;
                }
                for j in 0..n {
                    let bj = bv[j] as i128;
                    if bj == 0 {
                        continue;
                    }
                    let prod = (ai * bj) % q128;
                    let idx = i + j;
                    if idx < n {
                        acc[idx] += prod;
                    } else {
                        // x^n = -1 reduction
                        acc[idx - n] -= prod;
                    }
                }
            }
            acc.iter()
                .map(|&c| (((c % q128) + q128) % q128) as i64)
                .collect()
        })
        .collect();

    RnsPolynomial { residues, n }
}
