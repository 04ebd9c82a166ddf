use std::fmt;

use crate::utils::EmailAddress;

/// A mail account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mailbox {
    pub local_part: String,
    pub domain: String,
    /// Hex SHA-512 digest, see [`crate::security::hasher`]
    pub password_digest: String,
}

impl Mailbox {
    pub fn address(&self) -> EmailAddress {
        EmailAddress::from_parts(&self.local_part, &self.domain)
    }
}

/// Redirects mail for `source` to `destination`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForwardRule {
    pub src_local_part: String,
    pub src_domain: String,
    pub dst_local_part: String,
    pub dst_domain: String,
}

impl ForwardRule {
    pub fn new(source: &EmailAddress, destination: &EmailAddress) -> Self {
        Self {
            src_local_part: source.local_part.clone(),
            src_domain: source.domain.clone(),
            dst_local_part: destination.local_part.clone(),
            dst_domain: destination.domain.clone(),
        }
    }

    pub fn source(&self) -> EmailAddress {
        EmailAddress::from_parts(&self.src_local_part, &self.src_domain)
    }

    pub fn destination(&self) -> EmailAddress {
        EmailAddress::from_parts(&self.dst_local_part, &self.dst_domain)
    }
}

impl fmt::Display for ForwardRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.source(), self.destination())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mailbox_address() {
        let mailbox = Mailbox {
            local_part: "ann".to_string(),
            domain: "y.com".to_string(),
            password_digest: "00".to_string(),
        };
        assert_eq!(mailbox.address().to_string(), "ann@y.com");
    }

    #[test]
    fn test_forward_display() {
        let rule = ForwardRule::new(
            &EmailAddress::from_parts("a", "x.com"),
            &EmailAddress::from_parts("b", "y.com"),
        );
        assert_eq!(rule.to_string(), "a@x.com -> b@y.com");
        assert_eq!(rule.source(), EmailAddress::from_parts("a", "x.com"));
        assert_eq!(rule.destination(), EmailAddress::from_parts("b", "y.com"));
    }
}
