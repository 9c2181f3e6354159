//! Approximate-arithmetic (CKKS-style) encryption layer over RNS polynomials.

pub mod cipher;
pub mod keys;
pub mod rns;

pub use cipher::{Ciphertext, CkksContext, Plaintext};
pub use keys::{KeyContext, PublicKey, SecretKey};
pub use rns::{negacyclic_mul, RnsPolynomial};
