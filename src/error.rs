//! Crate-wide error taxonomy.
//!
//! Every failure in the inference pipeline is fatal and one-shot: there is no
//! transient-failure source (no I/O, no network) inside the core, so nothing
//! is retried. Numerical drift from the approximate encryption scheme is NOT
//! an error below the configured tolerance; it only surfaces as
//! [`Error::ToleranceExceeded`] when a [`crate::oracle::ConsistencyOracle`]
//! is asked to enforce a threshold.

use thiserror::Error;

/// Errors surfaced by the hybrid encrypted-inference pipeline.
#[derive(Debug, Error)]
pub enum Error {
    /// A record handed to the vectorizer lacks a column the fitted feature
    /// space requires, or carries a value of the wrong kind for that column.
    ///
    /// Unseen *categorical values* are deliberately not an error: they
    /// activate no one-hot slot and inference proceeds.
    #[error("record does not match fitted schema: column `{column}`: {reason}")]
    SchemaMismatch { column: String, reason: String },

    /// The fitted feature space has zero slots. Degenerate configuration,
    /// rejected at setup before any partition or model can be built on it.
    #[error("feature space has no slots")]
    EmptyFeatureSpace,

    /// Two components that must agree on a dimension do not. This indicates
    /// stale state (e.g. a partition computed against an older feature
    /// space) rather than bad input data.
    #[error("dimension mismatch in {context}: expected {expected}, got {actual}")]
    DimensionMismatch {
        context: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Decryption was requested on an encryption context that holds no
    /// secret key (an evaluator-side context in the key-separation
    /// deployment mode).
    #[error("decryption capability not available in this encryption context")]
    DecryptionUnavailable,

    /// Hybrid-vs-plaintext score drift exceeded the oracle's tolerance for
    /// at least one class.
    #[error(
        "score drift {drift:.6e} for class `{class}` exceeds tolerance {tolerance:.6e}"
    )]
    ToleranceExceeded {
        class: String,
        drift: f64,
        tolerance: f64,
    },
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;
