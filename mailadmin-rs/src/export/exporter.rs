//! Renders the directory into Dovecot and Postfix lookup tables
//!
//! Output formats are fixed; downstream `postmap` and Dovecot's passwd-file
//! driver parse them line by line.

use crate::directory::DirectoryStore;
use crate::error::Result;
use crate::security::DIGEST_SCHEME;
use std::collections::BTreeSet;
use std::io::Write;
use std::path::Path;
use tracing::debug;

use super::types::ExportFormat;

/// Read-only view of the directory producing export files
pub struct Exporter {
    store: DirectoryStore,
}

impl Exporter {
    pub fn new(store: DirectoryStore) -> Self {
        Self { store }
    }

    /// Render `format`, every line newline terminated
    pub async fn render(&self, format: ExportFormat) -> Result<String> {
        debug!("Rendering export {}", format);

        match format {
            ExportFormat::DovecotPasswd => self.dovecot_passwd().await,
            ExportFormat::PostfixMailboxDomains => self.postfix_mailbox_domains().await,
            ExportFormat::PostfixMailboxMaps => self.postfix_mailbox_maps().await,
            ExportFormat::PostfixAliasMaps => self.postfix_alias_maps().await,
        }
    }

    /// Render `format` into `out`
    pub async fn write_to<W: Write>(&self, format: ExportFormat, out: &mut W) -> Result<()> {
        let rendered = self.render(format).await?;
        out.write_all(rendered.as_bytes())?;
        out.flush()?;
        Ok(())
    }

    /// Render `format` and write it to `path`
    ///
    /// The file is only created once rendering has succeeded, so a failed
    /// export leaves an existing table in place.
    pub async fn write_to_file(&self, format: ExportFormat, path: &Path) -> Result<()> {
        let rendered = self.render(format).await?;
        std::fs::write(path, rendered)?;
        debug!("Wrote {} to {}", format, path.display());
        Ok(())
    }

    /// `user@domain:{SHA512.hex}digest`, ordered by domain
    pub async fn dovecot_passwd(&self) -> Result<String> {
        let mut out = String::new();
        for mailbox in self.store.list_mailboxes().await? {
            out.push_str(&format!(
                "{}:{}{}\n",
                mailbox.address(),
                DIGEST_SCHEME,
                mailbox.password_digest
            ));
        }
        Ok(out)
    }

    /// `domain OK` for every mailbox domain and forward source domain
    pub async fn postfix_mailbox_domains(&self) -> Result<String> {
        let mut domains: BTreeSet<String> = self.store.mailbox_domains().await?.into_iter().collect();
        domains.extend(self.store.forward_source_domains().await?);

        let mut out = String::new();
        for domain in domains {
            out.push_str(&format!("{} OK\n", domain));
        }
        Ok(out)
    }

    /// `user@domain OK`, one line per mailbox domain
    ///
    /// Only one mailbox of each domain is listed. Postfix only needs the domain
    /// to be known here, and existing deployments depend on this shape.
    pub async fn postfix_mailbox_maps(&self) -> Result<String> {
        let mut out = String::new();
        for address in self.store.mailbox_per_domain().await? {
            out.push_str(&format!("{} OK\n", address));
        }
        Ok(out)
    }

    /// Forward sources with all their destinations, then one self alias per
    /// mailbox
    pub async fn postfix_alias_maps(&self) -> Result<String> {
        let mut out = String::new();

        for source in self.store.forward_sources().await? {
            out.push_str(&source.to_string());
            for destination in self.store.forward_destinations(&source).await? {
                out.push(' ');
                out.push_str(&destination.to_string());
            }
            out.push('\n');
        }

        // Mailboxes must come after every forward line
        for mailbox in self.store.list_mailboxes().await? {
            let address = mailbox.address();
            out.push_str(&format!("{} {}\n", address, address));
        }

        Ok(out)
    }
}
