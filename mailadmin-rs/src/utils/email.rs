use crate::error::{AdminError, Result};
use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

/// Plausibility check only; RFC 3696 allows far more than this.
const ADDRESS_PATTERN: &str = r"^[A-Za-z0-9.+_-]+@[A-Za-z0-9._-]+\.[A-Za-z]{2,}$";

fn address_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(ADDRESS_PATTERN).expect("address pattern compiles"))
}

/// Check that an address has the shape `local-part@domain`
pub fn validate_email(email: &str) -> Result<()> {
    if address_regex().is_match(email) {
        Ok(())
    } else {
        Err(AdminError::InvalidAddress(email.to_string()))
    }
}

/// Split an address on its first `@`
///
/// This does no validation: an input without `@` yields an empty domain.
pub fn split_email(email: &str) -> (&str, &str) {
    match email.split_once('@') {
        Some((local_part, domain)) => (local_part, domain),
        None => (email, ""),
    }
}

/// A validated email address, split into local part and domain
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EmailAddress {
    pub local_part: String,
    pub domain: String,
}

impl EmailAddress {
    /// Validate and split an address
    pub fn parse(email: &str) -> Result<Self> {
        validate_email(email)?;
        let (local_part, domain) = split_email(email);

        Ok(Self {
            local_part: local_part.to_string(),
            domain: domain.to_string(),
        })
    }

    /// Build an address from parts already read back from storage
    pub fn from_parts(local_part: impl Into<String>, domain: impl Into<String>) -> Self {
        Self {
            local_part: local_part.into(),
            domain: domain.into(),
        }
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.local_part, self.domain)
    }
}
