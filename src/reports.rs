//! Report and export downloads.

use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::api::ApiClient;

/// Kinds of downloadable exports offered by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ReportKind {
    /// Read-only Excel report.
    Excel,
    /// Editable Excel sheet for bulk re-import.
    Editable,
    /// Plain JSON dump of the database.
    Json,
}

impl ReportKind {
    /// Endpoint path, scoped to a brand when one is given.
    pub fn path(&self, brand_id: Option<&str>) -> Result<String> {
        let path = match (self, brand_id) {
            (ReportKind::Excel, None) => "/backup/download-excel".to_string(),
            (ReportKind::Excel, Some(id)) => {
                format!("/backup/download-excel/{}", urlencoding::encode(id))
            }
            (ReportKind::Editable, None) => "/backup/download-editable".to_string(),
            (ReportKind::Editable, Some(id)) => {
                format!("/backup/download-editable/{}", urlencoding::encode(id))
            }
            (ReportKind::Json, None) => "/backup/download".to_string(),
            (ReportKind::Json, Some(_)) => bail!("JSON backups cannot be scoped to a brand"),
        };
        Ok(path)
    }

    /// File name used when the backend does not suggest one.
    pub fn default_file_name(&self, brand_scoped: bool) -> &'static str {
        match (self, brand_scoped) {
            (ReportKind::Excel, false) => "CellClinic_Report.xlsx",
            (ReportKind::Excel, true) => "Brand_Report.xlsx",
            (ReportKind::Editable, false) => "Global_Editable_Catalog.xlsx",
            (ReportKind::Editable, true) => "Brand_Editable.xlsx",
            (ReportKind::Json, _) => "backup.json",
        }
    }
}

/// Keep only the final path component of a server-suggested name.
fn safe_file_name(suggested: Option<&str>, fallback: &str) -> String {
    suggested
        .and_then(|name| Path::new(name).file_name())
        .and_then(|name| name.to_str())
        .filter(|name| !name.is_empty())
        .unwrap_or(fallback)
        .to_string()
}

/// Download a report into `out_dir`, returning the written path.
pub async fn download_report(
    client: &ApiClient,
    kind: ReportKind,
    brand_id: Option<&str>,
    out_dir: &Path,
) -> Result<PathBuf> {
    let path = kind.path(brand_id)?;
    let download = client
        .download(&path)
        .await
        .with_context(|| format!("Failed to download {:?} report", kind))?;

    let file_name = safe_file_name(
        download.file_name.as_deref(),
        kind.default_file_name(brand_id.is_some()),
    );

    tokio::fs::create_dir_all(out_dir)
        .await
        .with_context(|| format!("Failed to create output directory {:?}", out_dir))?;
    let dest = out_dir.join(file_name);
    tokio::fs::write(&dest, &download.bytes)
        .await
        .with_context(|| format!("Failed to write {:?}", dest))?;

    info!("Saved {} bytes to {:?}", download.bytes.len(), dest);
    Ok(dest)
}
