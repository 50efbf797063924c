//! Typed-data signing over secp256k1.

mod typed_data;

pub use typed_data::{
    domain, hash_typed_data, recover_from_hash, recover_signer, sign_hash, Signature65,
    TypeSchema, TypedDataSigner, TypedField,
};

use thiserror::Error;

/// Signing and recovery failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SigningError {
    #[error("typed data rejected: {0}")]
    TypedData(String),

    #[error("invalid signature: {0}")]
    InvalidSignature(String),

    #[error("invalid private key: {0}")]
    InvalidKey(String),

    #[error("failed to sign: {0}")]
    Sign(String),
}
