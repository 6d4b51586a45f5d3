//! # SHA-256 Hashing
//!
//! Digests used for seal chaining, audit entry linkage and derived anchor ids.
//! Callers prefix a domain tag so digests from different contexts never collide.

use sha2::{Digest, Sha256};

use crate::CryptoError;

/// SHA-256 output (256-bit).
pub type Digest32 = [u8; 32];

/// Stateful SHA-256 hasher.
pub struct Sha256Hasher {
    inner: Sha256,
}

impl Sha256Hasher {
    /// Create new hasher.
    pub fn new() -> Self {
        Self {
            inner: Sha256::new(),
        }
    }

    /// Create a hasher pre-seeded with a domain separation tag.
    pub fn with_domain(domain: &[u8]) -> Self {
        let mut hasher = Self::new();
        hasher.update_prefixed(domain);
        hasher
    }

    /// Update with data.
    pub fn update(&mut self, data: &[u8]) -> &mut Self {
        self.inner.update(data);
        self
    }

    /// Update with a length-prefixed field so adjacent fields cannot shift
    /// bytes between each other.
    pub fn update_prefixed(&mut self, data: &[u8]) -> &mut Self {
        self.inner.update((data.len() as u64).to_be_bytes());
        self.inner.update(data);
        self
    }

    /// Update with a big-endian u64.
    pub fn update_u64(&mut self, value: u64) -> &mut Self {
        self.inner.update(value.to_be_bytes());
        self
    }

    /// Finalize and return hash.
    pub fn finalize(self) -> Digest32 {
        self.inner.finalize().into()
    }
}

impl Default for Sha256Hasher {
    fn default() -> Self {
        Self::new()
    }
}

/// Hash data with SHA-256 (one-shot).
pub fn sha256(data: &[u8]) -> Digest32 {
    Sha256::digest(data).into()
}

/// Hash multiple inputs, each length-prefixed.
pub fn sha256_many(inputs: &[&[u8]]) -> Digest32 {
    let mut hasher = Sha256Hasher::new();
    for input in inputs {
        hasher.update_prefixed(input);
    }
    hasher.finalize()
}

/// Lowercase hex rendering of a digest.
pub fn to_hex(bytes: &[u8]) -> String {
    hex::encode(bytes)
}

/// Parse a 32-byte digest from hex.
pub fn from_hex(value: &str) -> Result<Digest32, CryptoError> {
    let bytes = hex::decode(value).map_err(|e| CryptoError::InvalidHex(e.to_string()))?;
    let len = bytes.len();
    bytes.try_into().map_err(|_| CryptoError::InvalidKeyLength {
        expected: 32,
        actual: len,
    })
}
