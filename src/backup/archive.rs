//! Reading and writing backup archives.
//!
//! A backup archive is a zip holding `database.json` and the extracted
//! images under `images/`.

use std::collections::{BTreeMap, BTreeSet};
use std::io::{Cursor, Read, Write};
use thiserror::Error;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::api::CatalogSnapshot;

pub const MANIFEST_NAME: &str = "database.json";
pub const IMAGES_DIR: &str = "images/";

/// Errors that can occur while building or reading an archive.
#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Archive has no database.json manifest")]
    MissingManifest,

    #[error("Invalid manifest: {0}")]
    InvalidManifest(#[from] serde_json::Error),

    #[error("Manifest references missing image: {0}")]
    DanglingReference(String),

    #[error("Image is not referenced by any record: {0}")]
    OrphanImage(String),
}

/// An image file to be stored under `images/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageEntry {
    /// Path inside the archive, always starting with `images/`.
    pub path: String,
    pub bytes: Vec<u8>,
}

/// Build the zip bytes from a serialized manifest and its images.
pub fn write_archive(manifest: &[u8], images: &[ImageEntry]) -> Result<Vec<u8>, ArchiveError> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let manifest_options =
        SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    // Image formats are already compressed.
    let image_options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);

    zip.start_file(MANIFEST_NAME, manifest_options)?;
    zip.write_all(manifest)?;

    if !images.is_empty() {
        zip.add_directory(IMAGES_DIR, SimpleFileOptions::default())?;
    }
    for image in images {
        zip.start_file(image.path.as_str(), image_options)?;
        zip.write_all(&image.bytes)?;
    }

    Ok(zip.finish()?.into_inner())
}

/// Counts describing a verified archive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArchiveSummary {
    pub brands: usize,
    pub devices: usize,
    pub services: usize,
    pub inquiries: usize,
    pub images: usize,
    pub image_bytes: u64,
}

/// Contents of a backup archive read back into memory.
#[derive(Debug, Clone)]
pub struct BackupContents {
    pub manifest: CatalogSnapshot,
    /// Image bytes keyed by archive path.
    pub images: BTreeMap<String, Vec<u8>>,
}

impl BackupContents {
    /// Read a backup archive from memory.
    pub fn read(bytes: &[u8]) -> Result<Self, ArchiveError> {
        let mut archive = ZipArchive::new(Cursor::new(bytes))?;
        let mut manifest = None;
        let mut images = BTreeMap::new();

        for i in 0..archive.len() {
            let mut file = archive.by_index(i)?;
            if file.is_dir() {
                continue;
            }
            let name = file.name().to_string();
            let mut content = Vec::new();
            file.read_to_end(&mut content)?;

            if name == MANIFEST_NAME {
                manifest = Some(serde_json::from_slice::<CatalogSnapshot>(&content)?);
            } else if name.starts_with(IMAGES_DIR) {
                images.insert(name, content);
            }
        }

        Ok(Self {
            manifest: manifest.ok_or(ArchiveError::MissingManifest)?,
            images,
        })
    }

    /// Image paths referenced by brand and device records.
    pub fn referenced_images(&self) -> BTreeSet<&str> {
        self.manifest
            .brands()
            .iter()
            .chain(self.manifest.devices())
            .filter_map(|record| record.image())
            .filter(|image| image.starts_with(IMAGES_DIR))
            .collect()
    }

    /// Check that references and image entries match one to one.
    pub fn verify(&self) -> Result<ArchiveSummary, ArchiveError> {
        let referenced = self.referenced_images();

        if let Some(dangling) = referenced
            .iter()
            .find(|path| !self.images.contains_key(**path))
        {
            return Err(ArchiveError::DanglingReference(dangling.to_string()));
        }
        if let Some(orphan) = self
            .images
            .keys()
            .find(|path| !referenced.contains(path.as_str()))
        {
            return Err(ArchiveError::OrphanImage(orphan.clone()));
        }

        Ok(ArchiveSummary {
            brands: self.manifest.brands().len(),
            devices: self.manifest.devices().len(),
            services: self.manifest.services().len(),
            inquiries: self.manifest.inquiries().len(),
            images: self.images.len(),
            image_bytes: self.images.values().map(|b| b.len() as u64).sum(),
        })
    }
}
