//! Excel bulk import.

use anyhow::{bail, Context, Result};
use std::path::Path;
use tracing::info;

use crate::api::{ApiClient, MessageResponse};

const SPREADSHEET_EXTENSIONS: &[&str] = &["xlsx", "xls"];

/// Check if a file is an Excel workbook.
pub fn is_spreadsheet(file_name: &str) -> bool {
    Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| SPREADSHEET_EXTENSIONS.contains(&e.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Upload endpoint for the whole catalog or a single brand.
pub fn upload_path(brand_id: Option<&str>) -> String {
    match brand_id {
        Some(id) => format!("/catalog/brand/{}/upload", urlencoding::encode(id)),
        None => "/catalog/upload".to_string(),
    }
}

/// Upload an Excel sheet for bulk import, returning the backend message.
pub async fn upload_catalog_excel(
    client: &ApiClient,
    path: &Path,
    brand_id: Option<&str>,
) -> Result<String> {
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .with_context(|| format!("Invalid file path: {:?}", path))?;
    if !is_spreadsheet(file_name) {
        bail!("Unsupported file type: {} (expected .xlsx or .xls)", file_name);
    }

    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {:?}", path))?;
    info!("Uploading {} ({} bytes) for bulk import", file_name, bytes.len());

    let response: MessageResponse = client
        .post_file(&upload_path(brand_id), file_name, bytes, None)
        .await
        .context("Bulk upload failed")?;
    Ok(response.message_or("Bulk Upload Complete!"))
}
