//! Utility modules
//!
//! - [`email`]: Email address validation and splitting

pub mod email;

pub use email::{split_email, validate_email, EmailAddress};
