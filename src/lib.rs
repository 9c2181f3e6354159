//! Hybrid encrypted inference for oral-lesion classification.
//!
//! A trained linear one-vs-rest classifier is evaluated over patient records
//! whose sensitive demographic features never leave encryption: the feature
//! vector is split along a sensitivity partition, the sensitive block is
//! scored homomorphically under a CKKS-style scheme and the rest in
//! plaintext, and the two partial scores recombine inside the ciphertext.
//! Only the key holder sees the final per-class scores.
//!
//! Pipeline:
//!
//! 1. [`feature_space::FeatureSpace`] turns heterogeneous clinical records
//!    into dense standardized/one-hot vectors.
//! 2. [`partition::FeatureIndexPartition`] splits slot indices by column
//!    sensitivity.
//! 3. [`hybrid::HybridScorer`] runs the depth-1 encrypted scoring protocol
//!    against [`model::ModelParameters`].
//! 4. [`oracle::ConsistencyOracle`] validates hybrid scores against the
//!    plaintext reference within a drift tolerance.

pub mod ckks;
pub mod context;
pub mod error;
pub mod feature_space;
pub mod hybrid;
pub mod model;
pub mod oracle;
pub mod params;
pub mod partition;

pub use context::EncryptionContext;
pub use error::{Error, Result};
pub use feature_space::{FeatureSpace, Record, Value};
pub use hybrid::{EncryptedScalar, EncryptedVector, HybridScorer};
pub use model::{ModelParameters, Prediction};
pub use oracle::{ConsistencyOracle, ConsistencyReport};
pub use params::CkksParams;
pub use partition::FeatureIndexPartition;
