//! Catalog backup packaging.
//!
//! A backup fetches the full catalog export, moves every inline base64
//! image of brands and devices into its own file under `images/` and writes
//! the rewritten snapshot as `database.json` next to them in one zip.
//!
//! Images that cannot be decoded are left untouched and reported; they never
//! abort the backup.

pub mod archive;
pub mod data_uri;
pub mod naming;

pub use archive::{ArchiveError, ArchiveSummary, BackupContents, ImageEntry};
pub use data_uri::DataUriError;

use chrono::{NaiveDate, Utc};
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

use crate::api::{ApiError, CatalogBackend, CatalogRecord, CatalogSnapshot};
use naming::{sanitize_name, FileNamer};

/// Errors that abort a whole backup.
#[derive(Debug, Error)]
pub enum BackupError {
    #[error("Failed to fetch catalog export: {0}")]
    Fetch(#[from] ApiError),

    #[error("Catalog export response has no data")]
    MissingData,

    #[error("Failed to serialize manifest: {0}")]
    Manifest(#[from] serde_json::Error),

    #[error("Failed to build archive: {0}")]
    Archive(#[from] ArchiveError),
}

impl BackupError {
    /// Whether the backup failed before anything was packaged.
    pub fn is_fetch_error(&self) -> bool {
        matches!(self, BackupError::Fetch(_) | BackupError::MissingData)
    }
}

/// Catalog collections that may carry inline images.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Brands,
    Devices,
}

impl Collection {
    pub fn file_prefix(&self) -> &'static str {
        match self {
            Collection::Brands => "brand",
            Collection::Devices => "device",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Collection::Brands => write!(f, "brands"),
            Collection::Devices => write!(f, "devices"),
        }
    }
}

/// Why a record's image was left unchanged in the manifest.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SkipReason {
    #[error(transparent)]
    InvalidDataUri(#[from] DataUriError),

    #[error("references {0}, which has no file in this backup")]
    MissingArchiveEntry(String),
}

/// What happened to the image of one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageOutcome {
    /// Stored under `path`; `renamed_from` is set when the natural name collided.
    Packed {
        path: String,
        renamed_from: Option<String>,
    },
    /// Left unchanged in the manifest.
    Skipped(SkipReason),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordReport {
    pub collection: Collection,
    pub index: usize,
    pub name: Option<String>,
    pub outcome: ImageOutcome,
}

/// Per-record outcomes of a backup, for every record whose image is an
/// inline data URI or an archive path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BackupReport {
    pub records: Vec<RecordReport>,
}

impl BackupReport {
    pub fn packed_count(&self) -> usize {
        self.records
            .iter()
            .filter(|r| matches!(r.outcome, ImageOutcome::Packed { .. }))
            .count()
    }

    pub fn skipped(&self) -> impl Iterator<Item = &RecordReport> {
        self.records
            .iter()
            .filter(|r| matches!(r.outcome, ImageOutcome::Skipped(_)))
    }

    pub fn renamed(&self) -> impl Iterator<Item = &RecordReport> {
        self.records.iter().filter(|r| {
            matches!(
                r.outcome,
                ImageOutcome::Packed {
                    renamed_from: Some(_),
                    ..
                }
            )
        })
    }
}

/// A finished backup, ready to be written somewhere.
#[derive(Debug, Clone)]
pub struct BackupArchive {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub manifest: CatalogSnapshot,
    pub report: BackupReport,
}

impl BackupArchive {
    /// Write the archive into `dir` under its own file name.
    pub async fn save_to(&self, dir: &Path) -> std::io::Result<PathBuf> {
        tokio::fs::create_dir_all(dir).await?;
        let path = dir.join(&self.file_name);
        tokio::fs::write(&path, &self.bytes).await?;
        Ok(path)
    }
}

/// `<BusinessName>_Backup_<YYYY-MM-DD>.zip`
pub fn backup_file_name(business_name: &str, date: NaiveDate) -> String {
    format!(
        "{}_Backup_{}.zip",
        sanitize_name(business_name),
        date.format("%Y-%m-%d")
    )
}

/// Fetch the catalog export and package it.
pub async fn create_backup(
    backend: &dyn CatalogBackend,
    business_name: &str,
) -> Result<BackupArchive, BackupError> {
    info!("Fetching catalog export...");
    let response = backend.fetch_export().await?;
    let snapshot = response.data.ok_or(BackupError::MissingData)?;
    info!(
        "Fetched {} brands, {} devices, {} services, {} inquiries",
        snapshot.brands().len(),
        snapshot.devices().len(),
        snapshot.services().len(),
        snapshot.inquiries().len()
    );

    package_snapshot(&snapshot, business_name, Utc::now().date_naive())
}

/// Package an already fetched snapshot.
pub fn package_snapshot(
    snapshot: &CatalogSnapshot,
    business_name: &str,
    date: NaiveDate,
) -> Result<BackupArchive, BackupError> {
    let mut namer = FileNamer::new();
    let mut images = Vec::new();
    let mut report = BackupReport::default();

    // Archive paths already present in the export must not be handed out again.
    for image in snapshot
        .brands()
        .iter()
        .chain(snapshot.devices())
        .filter_map(CatalogRecord::image)
    {
        if let Some(file_name) = image.strip_prefix(archive::IMAGES_DIR) {
            namer.reserve(file_name);
        }
    }

    let mut packer = Packer {
        namer: &mut namer,
        images: &mut images,
        report: &mut report,
    };
    let brands = snapshot
        .brands
        .as_deref()
        .map(|records| packer.extract_images(Collection::Brands, records));
    let devices = snapshot
        .devices
        .as_deref()
        .map(|records| packer.extract_images(Collection::Devices, records));

    let manifest = CatalogSnapshot {
        brands,
        devices,
        ..snapshot.clone()
    };
    let manifest_bytes = serde_json::to_vec_pretty(&manifest)?;
    let bytes = archive::write_archive(&manifest_bytes, &images)?;

    info!(
        "Packaged {} images ({} skipped) into {} bytes",
        images.len(),
        report.skipped().count(),
        bytes.len()
    );

    Ok(BackupArchive {
        file_name: backup_file_name(business_name, date),
        bytes,
        manifest,
        report,
    })
}

struct Packer<'a> {
    namer: &'a mut FileNamer,
    images: &'a mut Vec<ImageEntry>,
    report: &'a mut BackupReport,
}

impl Packer<'_> {
    fn extract_images(
        &mut self,
        collection: Collection,
        records: &[CatalogRecord],
    ) -> Vec<CatalogRecord> {
        records
            .iter()
            .enumerate()
            .map(|(index, record)| {
                let Some(image) = record.image() else {
                    return record.clone();
                };

                let outcome = if data_uri::is_data_uri(image) {
                    self.pack(collection, record, image)
                } else if image.starts_with(archive::IMAGES_DIR) {
                    ImageOutcome::Skipped(SkipReason::MissingArchiveEntry(image.to_string()))
                } else {
                    return record.clone();
                };

                let mut cleaned = record.clone();
                match &outcome {
                    ImageOutcome::Packed { path, .. } => cleaned.set_image(path.clone()),
                    ImageOutcome::Skipped(reason) => warn!(
                        "Keeping image of {} #{} ({}) as is: {}",
                        collection,
                        index,
                        record.name().unwrap_or("unnamed"),
                        reason
                    ),
                }
                self.report.records.push(RecordReport {
                    collection,
                    index,
                    name: record.name().map(str::to_string),
                    outcome,
                });
                cleaned
            })
            .collect()
    }

    fn pack(
        &mut self,
        collection: Collection,
        record: &CatalogRecord,
        image: &str,
    ) -> ImageOutcome {
        let decoded = data_uri::parse(image).and_then(|uri| {
            let bytes = uri.decode()?;
            Ok((uri.subtype, bytes))
        });
        let (ext, bytes) = match decoded {
            Ok(decoded) => decoded,
            Err(e) => return ImageOutcome::Skipped(e.into()),
        };

        let id = record.id();
        let assigned = self.namer.assign(
            collection.file_prefix(),
            record.name(),
            id.as_deref(),
            &ext,
        );
        let path = format!("{}{}", archive::IMAGES_DIR, assigned.file_name);
        if let Some(wanted) = &assigned.wanted {
            warn!(
                "Image name {} already taken in {}, storing as {}",
                wanted, collection, path
            );
        }
        self.images.push(ImageEntry {
            path: path.clone(),
            bytes,
        });
        ImageOutcome::Packed {
            path,
            renamed_from: assigned.wanted,
        }
    }
}
