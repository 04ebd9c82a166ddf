use crate::error::AdminError;
use std::fmt;
use std::str::FromStr;

/// Files consumed by Dovecot and Postfix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Dovecot passwd-file: `user@domain:{SHA512.hex}digest`
    DovecotPasswd,
    /// Postfix `virtual_mailbox_domains`: `domain OK`
    PostfixMailboxDomains,
    /// Postfix `virtual_mailbox_maps`: `user@domain OK`
    PostfixMailboxMaps,
    /// Postfix `virtual_alias_maps`: `source dest1 dest2 ...`
    PostfixAliasMaps,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 4] = [
        Self::DovecotPasswd,
        Self::PostfixMailboxDomains,
        Self::PostfixMailboxMaps,
        Self::PostfixAliasMaps,
    ];

    /// Name used on the command line
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DovecotPasswd => "dovecot.passwd",
            Self::PostfixMailboxDomains => "postfix.mailbox_domains",
            Self::PostfixMailboxMaps => "postfix.mailbox_maps",
            Self::PostfixAliasMaps => "postfix.alias_maps",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = AdminError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|format| format.as_str() == s)
            .ok_or_else(|| AdminError::UnknownExport(s.to_string()))
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
