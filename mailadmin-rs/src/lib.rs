//! mailadmin-rs: Account directory for a Postfix/Dovecot mail server
//!
//! Keeps mailboxes and forwards in a local SQLite database and exports them
//! as the lookup tables Postfix and Dovecot read.
//!
//! # Example
//!
//! ```no_run
//! use mailadmin_rs::directory::{DirectoryManager, DirectoryStore};
//! use mailadmin_rs::export::{ExportFormat, Exporter};
//! use mailadmin_rs::security::{CredentialHasher, Salt};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = DirectoryStore::open("sqlite:///etc/mailadmin.sqlite3").await?;
//!     let manager = DirectoryManager::new(store.clone(), CredentialHasher::new(Salt::generate()));
//!
//!     manager.add_mailbox("user@example.com", "correct horse").await?;
//!     manager.add_forward("postmaster@example.com", "user@example.com").await?;
//!
//!     let exporter = Exporter::new(store);
//!     print!("{}", exporter.render(ExportFormat::PostfixAliasMaps).await?);
//!     Ok(())
//! }
//! ```
//!
//! # Modules
//!
//! - [`config`]: Configuration management
//! - [`error`]: Error types and handling
//! - [`directory`]: Mailbox and forward storage and operations
//! - [`export`]: Dovecot and Postfix table generation
//! - [`security`]: Password digests
//! - [`utils`]: Email address validation

pub mod config;
pub mod directory;
pub mod error;
pub mod export;
pub mod security;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use error::{AdminError, Result};
