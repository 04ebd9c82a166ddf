//! Export of the directory for the mail transfer and delivery agents
//!
//! - [`types`]: The export formats and their command-line names
//! - [`exporter`]: Rendering of each format from the store

pub mod exporter;
pub mod types;

pub use exporter::Exporter;
pub use types::ExportFormat;
