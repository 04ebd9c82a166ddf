//! Directory operations driven by the command line
//!
//! Each operation validates its input, then performs exactly one store call.

use crate::error::{AdminError, Result};
use crate::security::CredentialHasher;
use crate::utils::EmailAddress;
use tracing::{debug, info, warn};

use super::store::DirectoryStore;
use super::types::{ForwardRule, Mailbox};

/// Mailbox and forward management
pub struct DirectoryManager {
    store: DirectoryStore,
    hasher: CredentialHasher,
}

impl DirectoryManager {
    pub fn new(store: DirectoryStore, hasher: CredentialHasher) -> Self {
        Self { store, hasher }
    }

    pub fn store(&self) -> &DirectoryStore {
        &self.store
    }

    /// Create a mailbox, or replace the password of an existing one
    pub async fn add_mailbox(&self, address: &str, password: &str) -> Result<Mailbox> {
        let address = EmailAddress::parse(address)?;
        let password_digest = self.hasher.hash(password)?;

        let mailbox = Mailbox {
            local_part: address.local_part,
            domain: address.domain,
            password_digest,
        };

        if self.store.upsert_mailbox(&mailbox).await? == 0 {
            warn!("Mailbox upsert wrote no rows for {}", mailbox.address());
            return Err(AdminError::OperationFailed(format!(
                "add mailbox {}",
                mailbox.address()
            )));
        }

        info!("Mailbox {} saved", mailbox.address());
        Ok(mailbox)
    }

    /// Remove a mailbox
    pub async fn delete_mailbox(&self, address: &str) -> Result<()> {
        let address = EmailAddress::parse(address)?;
        self.store.delete_mailbox(&address).await?;

        info!("Mailbox {} deleted", address);
        Ok(())
    }

    /// Create a forward from `source` to `destination`
    pub async fn add_forward(&self, source: &str, destination: &str) -> Result<ForwardRule> {
        let rule = parse_forward(source, destination)?;

        if rule.source() == rule.destination() {
            return Err(AdminError::SelfForward(rule.source().to_string()));
        }

        if self.store.upsert_forward(&rule).await? == 0 {
            warn!("Forward upsert wrote no rows for {}", rule);
            return Err(AdminError::OperationFailed(format!("add forward {}", rule)));
        }

        info!("Forward {} saved", rule);
        Ok(rule)
    }

    /// Remove a single forward
    pub async fn delete_forward(&self, source: &str, destination: &str) -> Result<()> {
        let rule = parse_forward(source, destination)?;
        self.store.delete_forward(&rule).await?;

        info!("Forward {} deleted", rule);
        Ok(())
    }

    /// Domains that own at least one mailbox
    pub async fn list_domains(&self) -> Result<Vec<String>> {
        debug!("Listing domains");
        self.store.mailbox_domains().await
    }

    pub async fn list_mailboxes(&self) -> Result<Vec<Mailbox>> {
        debug!("Listing mailboxes");
        self.store.list_mailboxes().await
    }

    pub async fn list_forwards(&self) -> Result<Vec<ForwardRule>> {
        debug!("Listing forwards");
        self.store.list_forwards().await
    }
}

fn parse_forward(source: &str, destination: &str) -> Result<ForwardRule> {
    let source = EmailAddress::parse(source)?;
    let destination = EmailAddress::parse(destination)?;
    Ok(ForwardRule::new(&source, &destination))
}
