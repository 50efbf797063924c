//! Custodial key material for ephemeral trading agents.
//!
//! Keys are generated from the OS RNG, optionally mixed with caller entropy
//! through keccak256, and stored encrypted under a master secret:
//!
//! - KDF: scrypt (`log_n = 15`, `r = 8`, `p = 1`) over a fixed, versioned salt
//! - Cipher: AES-256-GCM with a fresh 96-bit nonce per encryption
//! - Blob: `nonce (12) ‖ ciphertext (32) ‖ tag (16)`
//!
//! Changing any KDF constant requires a new [`CUSTODY_VERSION`] and salt.

use std::fmt;
use std::str::FromStr;

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use alloy_primitives::{hex, keccak256, Address, B256};
use alloy_signer_local::PrivateKeySigner;
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Version tag of the KDF parameters and salt below.
pub const CUSTODY_VERSION: &str = "v1";

const KDF_SALT: &[u8] = b"lmsr-settlement/agent-custody/v1";
const SCRYPT_LOG_N: u8 = 15;
const SCRYPT_R: u32 = 8;
const SCRYPT_P: u32 = 1;

const KEY_LEN: usize = 32;
const NONCE_LEN: usize = 12;
const TAG_LEN: usize = 16;
const BLOB_LEN: usize = NONCE_LEN + KEY_LEN + TAG_LEN;

const MAX_GENERATION_ATTEMPTS: u32 = 16;

/// Key custody failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CustodyError {
    #[error("key generation failed after {attempts} attempts")]
    KeyGeneration { attempts: u32 },

    #[error("invalid private key: {0}")]
    InvalidKey(String),

    #[error("key derivation failed: {0}")]
    Kdf(String),

    #[error("encryption failed")]
    Encrypt,

    /// Wrong master secret or a tampered blob.
    #[error("decryption failed authentication")]
    Authentication,

    #[error("malformed encrypted key: {0}")]
    MalformedBlob(String),
}

/// A trading agent's address and signing key.
///
/// `Debug` never prints the key.
#[derive(Clone)]
pub struct AgentIdentity {
    signer: PrivateKeySigner,
}

impl AgentIdentity {
    /// Wrap an existing private key.
    ///
    /// # Errors
    ///
    /// Returns [`CustodyError::InvalidKey`] for zero or out-of-order scalars.
    pub fn from_private_key(private_key: &B256) -> Result<Self, CustodyError> {
        let signer = PrivateKeySigner::from_bytes(private_key)
            .map_err(|e| CustodyError::InvalidKey(e.to_string()))?;
        Ok(Self { signer })
    }

    #[must_use]
    pub fn address(&self) -> Address {
        self.signer.address()
    }

    /// EIP-55 checksummed address.
    #[must_use]
    pub fn checksum_address(&self) -> String {
        self.address().to_checksum(None)
    }

    #[must_use]
    pub fn private_key(&self) -> B256 {
        self.signer.to_bytes()
    }

    #[must_use]
    pub fn signer(&self) -> &PrivateKeySigner {
        &self.signer
    }
}

impl fmt::Debug for AgentIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AgentIdentity")
            .field("address", &self.address())
            .finish_non_exhaustive()
    }
}

/// Generate a fresh agent identity from the OS RNG.
///
/// # Errors
///
/// Returns [`CustodyError::KeyGeneration`] if no valid scalar is produced.
pub fn generate(seed: Option<&[u8]>) -> Result<AgentIdentity, CustodyError> {
    generate_with(&mut OsRng, seed)
}

/// Generate an identity from `rng`, mixing `seed` in through keccak256.
///
/// Zero and out-of-order candidates are discarded and redrawn; the attempt
/// counter is hashed in as well so a stuck RNG still yields new candidates
/// when a seed is present.
///
/// # Errors
///
/// Returns [`CustodyError::KeyGeneration`] if every attempt is rejected.
pub fn generate_with<R: RngCore + ?Sized>(
    rng: &mut R,
    seed: Option<&[u8]>,
) -> Result<AgentIdentity, CustodyError> {
    for attempt in 0..MAX_GENERATION_ATTEMPTS {
        let mut entropy = [0u8; KEY_LEN];
        rng.fill_bytes(&mut entropy);

        let candidate = match seed {
            Some(seed) => {
                let mut material = Vec::with_capacity(KEY_LEN + seed.len() + 4);
                material.extend_from_slice(&entropy);
                material.extend_from_slice(seed);
                material.extend_from_slice(&attempt.to_be_bytes());
                keccak256(material)
            }
            None => B256::from(entropy),
        };

        if let Ok(identity) = AgentIdentity::from_private_key(&candidate) {
            return Ok(identity);
        }
    }
    Err(CustodyError::KeyGeneration {
        attempts: MAX_GENERATION_ATTEMPTS,
    })
}

/// An encrypted private key: `nonce ‖ ciphertext ‖ tag`.
#[derive(Clone, PartialEq, Eq)]
pub struct EncryptedKey(Vec<u8>);

impl EncryptedKey {
    /// Wrap raw blob bytes.
    ///
    /// # Errors
    ///
    /// Returns [`CustodyError::MalformedBlob`] when the length is wrong.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, CustodyError> {
        if bytes.len() != BLOB_LEN {
            return Err(CustodyError::MalformedBlob(format!(
                "expected {BLOB_LEN} bytes, got {}",
                bytes.len()
            )));
        }
        Ok(Self(bytes))
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    #[must_use]
    pub fn nonce(&self) -> &[u8] {
        &self.0[..NONCE_LEN]
    }
}

impl fmt::Display for EncryptedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode_prefixed(&self.0))
    }
}

impl fmt::Debug for EncryptedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EncryptedKey({self})")
    }
}

impl FromStr for EncryptedKey {
    type Err = CustodyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = hex::decode(s.trim()).map_err(|e| CustodyError::MalformedBlob(e.to_string()))?;
        Self::from_bytes(bytes)
    }
}

impl Serialize for EncryptedKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for EncryptedKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

/// Encrypt an agent's private key under `master_secret`.
///
/// # Errors
///
/// Returns [`CustodyError::Kdf`] for an empty secret and
/// [`CustodyError::Encrypt`] if the cipher fails.
pub fn encrypt(identity: &AgentIdentity, master_secret: &str) -> Result<EncryptedKey, CustodyError> {
    let cipher = cipher_for(master_secret)?;

    let mut nonce = [0u8; NONCE_LEN];
    OsRng.fill_bytes(&mut nonce);
    let sealed = cipher
        .encrypt(Nonce::from_slice(&nonce), identity.private_key().as_slice())
        .map_err(|_| CustodyError::Encrypt)?;

    let mut blob = Vec::with_capacity(BLOB_LEN);
    blob.extend_from_slice(&nonce);
    blob.extend_from_slice(&sealed);
    EncryptedKey::from_bytes(blob)
}

/// Decrypt a blob produced by [`encrypt`].
///
/// # Errors
///
/// Returns [`CustodyError::Authentication`] for a wrong secret or tampered
/// blob; never returns unauthenticated plaintext.
pub fn decrypt(blob: &EncryptedKey, master_secret: &str) -> Result<AgentIdentity, CustodyError> {
    let cipher = cipher_for(master_secret)?;
    let (nonce, sealed) = blob.as_bytes().split_at(NONCE_LEN);
    let plain = cipher
        .decrypt(Nonce::from_slice(nonce), sealed)
        .map_err(|_| CustodyError::Authentication)?;
    let key = B256::try_from(plain.as_slice())
        .map_err(|_| CustodyError::MalformedBlob("decrypted key is not 32 bytes".into()))?;
    AgentIdentity::from_private_key(&key)
}

fn cipher_for(master_secret: &str) -> Result<Aes256Gcm, CustodyError> {
    if master_secret.is_empty() {
        return Err(CustodyError::Kdf("master secret is empty".into()));
    }
    let params = scrypt::Params::new(SCRYPT_LOG_N, SCRYPT_R, SCRYPT_P, KEY_LEN)
        .map_err(|e| CustodyError::Kdf(e.to_string()))?;
    let mut key = [0u8; KEY_LEN];
    scrypt::scrypt(master_secret.as_bytes(), KDF_SALT, &params, &mut key)
        .map_err(|e| CustodyError::Kdf(e.to_string()))?;
    Aes256Gcm::new_from_slice(&key).map_err(|e| CustodyError::Kdf(e.to_string()))
}
