//! CKKS parameter sets.
//!
//! A parameter set fixes the ring dimension `n` (polynomial modulus degree),
//! the coefficient modulus chain (NTT-friendly primes, `p ≡ 1 mod 2n` for
//! the largest supported ring), the fixed-point encoding scale and the
//! RLWE error width. The hybrid scoring protocol has multiplicative depth 1
//! (one ciphertext-plaintext product per class), so no rescaling ever runs
//! and the chain is never shortened; a product ciphertext simply carries
//! scale `Δ²`.

use rand_distr::Normal;
use serde::{Deserialize, Serialize};

/// 60-bit NTT-friendly prime (p ≡ 1 mod 16384).
const P60_A: i64 = 1_152_921_504_606_830_593;
/// Second 60-bit NTT-friendly prime.
const P60_B: i64 = 1_152_921_504_606_748_673;
/// 40-bit NTT-friendly primes.
const P40_A: i64 = 1_099_511_480_321;
const P40_B: i64 = 1_099_510_890_497;

/// Parameters for the approximate-arithmetic encryption layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CkksParams {
    /// Ring dimension (polynomial modulus degree). Power of two.
    pub n: usize,

    /// Coefficient modulus chain. Decoding lifts centered residues of
    /// `moduli[0]`, so the first prime bounds the representable magnitude.
    pub moduli: Vec<i64>,

    /// Per-operand fixed-point encoding scale Δ. A ciphertext-plaintext
    /// product carries Δ²; with Δ = 2^20 the working scale is 2^40.
    pub scale: f64,

    /// Standard deviation of the RLWE error distribution.
    pub error_std: f64,
}

impl CkksParams {
    /// Demonstration parameters: N = 8192, coefficient chain of
    /// [60, 40, 40, 60]-bit primes, working scale 2^40.
    pub fn new_demo_8192() -> Self {
        Self {
            n: 8192,
            moduli: vec![P60_A, P40_A, P40_B, P60_B],
            scale: (1u64 << 20) as f64,
            error_std: 3.2,
        }
    }

    /// Small insecure parameters for integration tests. Fast under the
    /// schoolbook negacyclic multiplier while leaving 1024 packing slots.
    pub fn new_test_1024() -> Self {
        Self {
            n: 1024,
            moduli: vec![P60_A, P40_A],
            scale: (1u64 << 20) as f64,
            error_std: 3.2,
        }
    }

    /// Tiny insecure parameters for unit tests of the encryption layer.
    pub fn new_test_256() -> Self {
        Self {
            n: 256,
            moduli: vec![P60_A, P40_A],
            scale: (1u64 << 20) as f64,
            error_std: 3.2,
        }
    }

    /// Number of real values a single ciphertext can pack.
    ///
    /// Coefficient packing uses every coefficient, unlike slot packing
    /// which would halve this.
    pub fn capacity(&self) -> usize {
        self.n
    }

    /// Number of primes in the modulus chain.
    pub fn num_primes(&self) -> usize {
        self.moduli.len()
    }

    /// Noise distribution for key generation and encryption.
    ///
    /// Panics on a non-positive or non-finite `error_std`: a parameter set
    /// with an invalid noise width must fail loudly at setup, never sample
    /// from a substitute width.
    pub(crate) fn noise(&self) -> Normal<f64> {
        assert!(
            self.error_std.is_finite() && self.error_std > 0.0,
            "invalid RLWE error width {}",
            self.error_std
        );
        match Normal::new(0.0, self.error_std) {
            Ok(dist) => dist,
            Err(_) => unreachable!("error width validated above"),
        }
    }
}
