//! CellClinic admin client library
//!
//! Backup packaging, restore submission, report downloads, bulk import,
//! catalog listings and inquiry tracking against the CellClinic backend.

pub mod api;
pub mod auth;
pub mod backup;
pub mod catalog;
pub mod config;
pub mod import;
pub mod inquiries;
pub mod reports;
pub mod restore;

// Re-export commonly used types for convenience
pub use api::{ApiClient, ApiError, CatalogBackend, CatalogSnapshot};
pub use backup::{create_backup, BackupArchive, BackupError, BackupReport};
pub use restore::{restore, restore_file, RestoreError, RestoreOutcome};
