//! Encryption context: parameters plus key material.
//!
//! A context created with [`EncryptionContext::new`] holds both keys and can
//! encrypt, evaluate and decrypt. [`EncryptionContext::public_view`] derives
//! an evaluator-side context with the secret key stripped: it can still
//! encrypt and run the homomorphic score protocol, but any decryption attempt
//! fails with [`Error::DecryptionUnavailable`]. This is the seam for
//! deployments where the model host never holds the secret key.

use crate::ckks::{CkksContext, KeyContext, PublicKey, SecretKey};
use crate::error::{Error, Result};
use crate::params::CkksParams;

/// Immutable bundle of parameters and keys for one encryption session.
pub struct EncryptionContext {
    pub params: CkksParams,
    pub(crate) ckks: CkksContext,
    pub(crate) public_key: PublicKey,
    secret_key: Option<SecretKey>,
}

impl EncryptionContext {
    /// Generate a fresh key pair and build a full (decryption-capable)
    /// context for the given parameters.
    pub fn new(params: CkksParams) -> Self {
        let (public_key, secret_key) = KeyContext::new(params.clone()).keygen();
        Self {
            ckks: CkksContext::new(params.clone()),
            params,
            public_key,
            secret_key: Some(secret_key),
        }
    }

    /// Derive an evaluator-side context sharing this context's public key
    /// but holding no secret key.
    pub fn public_view(&self) -> Self {
        Self {
            params: self.params.clone(),
            ckks: CkksContext::new(self.params.clone()),
            public_key: self.public_key.clone(),
            secret_key: None,
        }
    }

    /// Whether this context can decrypt.
    pub fn has_decryption_key(&self) -> bool {
        self.secret_key.is_some()
    }

    pub(crate) fn secret_key(&self) -> Result<&SecretKey> {
        self.secret_key
            .as_ref()
            .ok_or(Error::DecryptionUnavailable)
    }
}
