//! Restore of a backup archive.
//!
//! The archive is handed to the backend as is; the backend owns restore
//! semantics, replaces its whole dataset and reloads. Nothing is retried.

use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{error, info};

use crate::api::{ApiError, CatalogBackend};

pub const RESTORE_SUCCESS_FALLBACK: &str = "Restore completed";

#[derive(Debug, Error)]
pub enum RestoreError {
    #[error("Failed to read backup file {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Restore failed: {0}")]
    Backend(#[from] ApiError),
}

/// Result of a successful restore.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestoreOutcome {
    /// Human readable confirmation from the backend.
    pub message: String,
    pub raw: serde_json::Value,
}

/// Submit archive bytes to the backend restore endpoint.
pub async fn restore(
    backend: &dyn CatalogBackend,
    file_name: &str,
    bytes: Vec<u8>,
) -> Result<RestoreOutcome, RestoreError> {
    info!("Uploading {} ({} bytes) for restore", file_name, bytes.len());
    match backend.upload_restore(file_name, bytes).await {
        Ok(response) => {
            let message = response.message_or(RESTORE_SUCCESS_FALLBACK);
            info!("Restore accepted: {}", message);
            let raw = serde_json::to_value(&response).unwrap_or_default();
            Ok(RestoreOutcome { message, raw })
        }
        Err(e) => {
            error!("Restore of {} failed: {}", file_name, e);
            Err(e.into())
        }
    }
}

/// Read a backup file from disk and submit it.
pub async fn restore_file(
    backend: &dyn CatalogBackend,
    path: &Path,
) -> Result<RestoreOutcome, RestoreError> {
    let bytes = tokio::fs::read(path).await.map_err(|source| RestoreError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("backup.zip");

    restore(backend, file_name, bytes).await
}
