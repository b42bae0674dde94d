//! Catalog backend API.

mod client;
pub mod models;

pub use client::{
    error_message, parse_content_disposition, ApiClient, ApiError, Download,
    FALLBACK_ERROR_MESSAGE,
};
pub use models::{
    Brand, CatalogRecord, CatalogSnapshot, Device, ExportResponse, Inquiry, ListResponse,
    MessageResponse,
};

use async_trait::async_trait;

/// The two backend calls the backup and restore flows depend on.
///
/// Implemented by [`ApiClient`]; tests provide in-memory backends.
#[async_trait]
pub trait CatalogBackend: Send + Sync {
    /// Fetch the full catalog export.
    async fn fetch_export(&self) -> Result<ExportResponse, ApiError>;

    /// Submit an archive to the restore endpoint.
    async fn upload_restore(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<MessageResponse, ApiError>;
}
