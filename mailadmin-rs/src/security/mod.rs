//! Security module
//!
//! - [`hasher`]: Salted SHA-512 password digests for the Dovecot passwd file

pub mod hasher;

pub use hasher::{CredentialHasher, Salt, DIGEST_SCHEME, MIN_PASSWORD_LENGTH};
