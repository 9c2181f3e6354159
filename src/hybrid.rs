//! Hybrid plaintext/encrypted affine scoring.
//!
//! For each class `k` the affine score decomposes along the sensitivity
//! partition:
//!
//! ```text
//! z_k = <x_sens, W_k[sens]>  +  <x_plain, W_k[plain]> + b_k
//!       \____ encrypted ___/     \_______ plaintext ________/
//! ```
//!
//! The sensitive sub-vector is encrypted ONCE per record and reused across
//! all classes; each class costs one ciphertext-plaintext product (the
//! packed inner product) plus one plaintext addition folding in the clear
//! partial score and the bias. The protocol has multiplicative depth 1, so
//! the result ciphertexts never need relinearization or rescaling.

use log::debug;

use crate::ckks::Plaintext;
use crate::context::EncryptionContext;
use crate::error::{Error, Result};
use crate::model::{dot, ModelParameters, Prediction};
use crate::partition::FeatureIndexPartition;

/// Ciphertext packing a real vector in its low coefficients. Opaque: the
/// only ways out are homomorphic evaluation or decryption through a context
/// that holds the secret key.
pub struct EncryptedVector {
    ct: crate::ckks::Ciphertext,
    len: usize,
}

impl EncryptedVector {
    /// Encrypt a real vector under the context's public key.
    pub fn encrypt(ctx: &EncryptionContext, values: &[f64]) -> Result<Self> {
        if values.len() > ctx.params.capacity() {
            return Err(Error::DimensionMismatch {
                context: "ciphertext packing",
                expected: ctx.params.capacity(),
                actual: values.len(),
            });
        }
        let pt = Plaintext::encode(values, ctx.params.scale, &ctx.params);
        Ok(Self {
            ct: ctx.ckks.encrypt(&pt, &ctx.public_key),
            len: values.len(),
        })
    }

    /// Number of packed values.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Homomorphic inner product with a plaintext weight vector.
    pub fn dot(&self, ctx: &EncryptionContext, weights: &[f64]) -> Result<EncryptedScalar> {
        if weights.len() != self.len {
            return Err(Error::DimensionMismatch {
                context: "encrypted inner product",
                expected: self.len,
                actual: weights.len(),
            });
        }
        let w_pt = Plaintext::encode_dot_weights(weights, ctx.params.scale, &ctx.params);
        Ok(EncryptedScalar {
            ct: ctx.ckks.mul_plain(&self.ct, &w_pt),
        })
    }

    /// Decrypt back to the packed values. Fails on an evaluator-side
    /// context.
    pub fn decrypt(&self, ctx: &EncryptionContext) -> Result<Vec<f64>> {
        let sk = ctx.secret_key()?;
        let mut values = ctx.ckks.decrypt(&self.ct, sk).decode(&ctx.params);
        values.truncate(self.len);
        Ok(values)
    }
}

/// Ciphertext whose constant coefficient carries one real score.
pub struct EncryptedScalar {
    ct: crate::ckks::Ciphertext,
}

impl EncryptedScalar {
    /// Add a cleartext scalar homomorphically (no encryption of the addend).
    pub fn add_plain(&self, ctx: &EncryptionContext, value: f64) -> Self {
        let pt = Plaintext::encode_scalar(value, self.ct.scale, &ctx.params);
        Self {
            ct: ctx.ckks.add_plain(&self.ct, &pt),
        }
    }

    /// Homomorphic addition of two encrypted scalars.
    pub fn add(&self, ctx: &EncryptionContext, other: &Self) -> Self {
        Self {
            ct: ctx.ckks.add(&self.ct, &other.ct),
        }
    }

    /// Decrypt the scalar. Fails on an evaluator-side context.
    pub fn decrypt(&self, ctx: &EncryptionContext) -> Result<f64> {
        let sk = ctx.secret_key()?;
        Ok(ctx.ckks.decrypt(&self.ct, sk).decode_scalar(&ctx.params))
    }
}

/// Scores records against a linear multiclass model with the sensitive
/// feature block evaluated under encryption.
pub struct HybridScorer<'a> {
    model: &'a ModelParameters,
    partition: &'a FeatureIndexPartition,
}

impl<'a> HybridScorer<'a> {
    /// Bind a model to a sensitivity partition. The two must agree on the
    /// feature dimension.
    pub fn new(
        model: &'a ModelParameters,
        partition: &'a FeatureIndexPartition,
    ) -> Result<Self> {
        if model.dimension() != partition.dimension {
            return Err(Error::DimensionMismatch {
                context: "hybrid scorer setup",
                expected: partition.dimension,
                actual: model.dimension(),
            });
        }
        Ok(Self { model, partition })
    }

    /// Run the hybrid protocol up to (but not including) decryption.
    ///
    /// Works on any context, including an evaluator-side `public_view`.
    pub fn score_encrypted(
        &self,
        ctx: &EncryptionContext,
        x: &[f64],
    ) -> Result<Vec<EncryptedScalar>> {
        let (x_sens, x_plain) = self.partition.split(x)?;
        debug!(
            "hybrid scoring: {} encrypted slots, {} plaintext slots, {} classes",
            x_sens.len(),
            x_plain.len(),
            self.model.num_classes()
        );

        // One encryption per record, reused for every class.
        let enc_x = EncryptedVector::encrypt(ctx, &x_sens)?;

        let mut scores = Vec::with_capacity(self.model.num_classes());
        for (row, &bias) in self.model.weights.iter().zip(&self.model.biases) {
            let (w_sens, w_plain) = self.partition.split(row)?;
            let z_plain = dot(&x_plain, &w_plain) + bias;
            let z_enc = enc_x.dot(ctx, &w_sens)?;
            scores.push(z_enc.add_plain(ctx, z_plain));
        }
        Ok(scores)
    }

    /// Decrypt per-class score ciphertexts, in class order.
    pub fn decrypt_scores(
        &self,
        ctx: &EncryptionContext,
        scores: &[EncryptedScalar],
    ) -> Result<Vec<f64>> {
        scores.iter().map(|s| s.decrypt(ctx)).collect()
    }

    /// Full round trip: hybrid protocol plus decryption.
    pub fn score(&self, ctx: &EncryptionContext, x: &[f64]) -> Result<Vec<f64>> {
        let encrypted = self.score_encrypted(ctx, x)?;
        self.decrypt_scores(ctx, &encrypted)
    }

    /// Score and predict the class.
    pub fn predict(&self, ctx: &EncryptionContext, x: &[f64]) -> Result<Prediction> {
        let scores = self.score(ctx, x)?;
        self.model.predict_from_scores(&scores)
    }
}
