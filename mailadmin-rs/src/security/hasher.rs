//! Password digests
//!
//! Digests are `hex(SHA-512(password || salt))`, exported to Dovecot with the
//! `{SHA512.hex}` scheme tag.
//!
//! # Salt lifetime
//! The salt is drawn once per process and never stored. Two invocations that
//! add the same password produce different digests, and nothing here can
//! verify a password against a stored digest afterwards.
//!
//! # Usage
//! ```
//! use mailadmin_rs::security::{CredentialHasher, Salt};
//!
//! let hasher = CredentialHasher::new(Salt::generate());
//! let digest = hasher.hash("correct horse battery").unwrap();
//! assert_eq!(digest.len(), 128);
//! ```

use crate::error::{AdminError, Result};
use rand::{rngs::OsRng, RngCore};
use sha2::{Digest, Sha512};
use std::fmt;

/// Minimum password length, counted after trimming whitespace
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Dovecot password scheme tag matching [`CredentialHasher::hash`]
pub const DIGEST_SCHEME: &str = "{SHA512.hex}";

const SALT_BYTES: usize = 5;

/// Per-process salt, hex encoded
#[derive(Clone, PartialEq, Eq)]
pub struct Salt(String);

impl Salt {
    /// Draw a fresh salt from the OS random source
    pub fn generate() -> Self {
        let mut bytes = [0u8; SALT_BYTES];
        OsRng.fill_bytes(&mut bytes);
        Self(hex::encode(bytes))
    }

    /// Use a fixed salt value
    pub fn from_hex(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Salt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Salt(..)")
    }
}

/// Derives stored password digests
#[derive(Debug, Clone)]
pub struct CredentialHasher {
    salt: Salt,
}

impl CredentialHasher {
    pub fn new(salt: Salt) -> Self {
        Self { salt }
    }

    /// Hash a plaintext password with this hasher's salt
    pub fn hash(&self, password: &str) -> Result<String> {
        hash_password(password, &self.salt)
    }
}

/// Hash `password` (trimmed) with `salt` appended, as lowercase hex SHA-512
pub fn hash_password(password: &str, salt: &Salt) -> Result<String> {
    let password = password.trim();
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AdminError::WeakCredential(MIN_PASSWORD_LENGTH));
    }

    let mut hasher = Sha512::new();
    hasher.update(password.as_bytes());
    hasher.update(salt.as_str().as_bytes());

    Ok(hex::encode(hasher.finalize()))
}
