//! Mailbox and forward directory
//!
//! - [`types`]: Mailbox and forward records
//! - [`store`]: SQLite persistence with upsert semantics
//! - [`manager`]: Validated add/delete/list operations

pub mod manager;
pub mod store;
pub mod types;

pub use manager::DirectoryManager;
pub use store::DirectoryStore;
pub use types::{ForwardRule, Mailbox};
