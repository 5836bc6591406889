//! Salted one-way PIN hashing.
//!
//! Stored form: `sha256$<salt hex>$<digest hex>` where the digest is
//! `SHA-256(salt || pin)`. The PIN itself is never stored or logged.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

const SCHEME: &str = "sha256";
const SALT_LEN: usize = 16;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PinError {
    #[error("PIN must not be empty")]
    Empty,

    #[error("malformed PIN hash")]
    Malformed,
}

/// Verification secret for an account PIN.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PinHash(String);

impl PinHash {
    /// Hash a PIN with a fresh random salt.
    pub fn new(pin: &str) -> Result<Self, PinError> {
        if pin.is_empty() {
            return Err(PinError::Empty);
        }
        let salt: [u8; SALT_LEN] = rand::random();
        Ok(Self(format!(
            "{SCHEME}${}${}",
            hex::encode(salt),
            hex::encode(digest(&salt, pin))
        )))
    }

    /// Wrap an already-encoded hash (e.g. loaded from storage).
    pub fn from_encoded(encoded: impl Into<String>) -> Result<Self, PinError> {
        let hash = Self(encoded.into());
        hash.parts()?;
        Ok(hash)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Check a candidate PIN. Malformed stored hashes never verify.
    pub fn verify(&self, pin: &str) -> bool {
        let Ok((salt, expected)) = self.parts() else {
            return false;
        };
        constant_time_eq(&digest(&salt, pin), &expected)
    }

    fn parts(&self) -> Result<(Vec<u8>, Vec<u8>), PinError> {
        let mut fields = self.0.split('$');
        let (Some(scheme), Some(salt), Some(hash), None) =
            (fields.next(), fields.next(), fields.next(), fields.next())
        else {
            return Err(PinError::Malformed);
        };
        if scheme != SCHEME {
            return Err(PinError::Malformed);
        }
        let salt = hex::decode(salt).map_err(|_| PinError::Malformed)?;
        let hash = hex::decode(hash).map_err(|_| PinError::Malformed)?;
        if salt.len() != SALT_LEN || hash.len() != 32 {
            return Err(PinError::Malformed);
        }
        Ok((salt, hash))
    }
}

impl core::fmt::Debug for PinHash {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("PinHash(<redacted>)")
    }
}

fn digest(salt: &[u8], pin: &str) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(salt);
    hasher.update(pin.as_bytes());
    hasher.finalize().into()
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
