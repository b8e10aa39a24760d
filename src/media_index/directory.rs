//! Directory-backed media index.
//!
//! Every supported image under the library root is one record. A record id is
//! derived from the file's path relative to the root, so it survives rescans
//! and restarts as long as the file stays where it is. The id to path table of
//! the latest scan is kept so identifiers can be resolved back to files.

use super::{IndexQuery, IndexRow, MediaIndex};
use crate::config::SUPPORTED_IMAGE_EXTENSIONS;
use crate::error::{GalleryError, Result};
use crate::identifier::ResourceIdentifier;
use crate::render::ResourceResolver;
use chrono::{DateTime, Utc};
use log::{debug, warn};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use walkdir::WalkDir;

/// Returns true if `path` has a supported image extension.
pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext_str| SUPPORTED_IMAGE_EXTENSIONS.contains(&ext_str.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Seconds since the epoch at which the file entered the library.
///
/// Modification time first: birth time is missing on many Linux filesystems.
fn date_added(metadata: &fs::Metadata) -> i64 {
    metadata
        .modified()
        .or_else(|_| metadata.created())
        .map(|time| DateTime::<Utc>::from(time).timestamp())
        .unwrap_or(0)
}

/// Stable record id for a path relative to the library root.
///
/// The first eight bytes of the BLAKE3 hash of the `/`-joined components.
pub fn stable_record_id(relative: &Path) -> u64 {
    let key = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/");
    let hash = blake3::hash(key.as_bytes());
    let mut head = [0u8; 8];
    head.copy_from_slice(&hash.as_bytes()[..8]);
    u64::from_le_bytes(head)
}

/// Media index over an image directory tree.
pub struct DirectoryIndex {
    root: PathBuf,
    collection_address: String,
    records: RwLock<HashMap<u64, PathBuf>>,
}

impl DirectoryIndex {
    pub fn new(root: impl Into<PathBuf>, collection_address: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            collection_address: collection_address.into(),
            records: RwLock::new(HashMap::new()),
        }
    }

    /// Walks the root and returns supported image files in path order.
    fn scan(&self) -> Result<Vec<PathBuf>> {
        if !self.root.is_dir() {
            return Err(GalleryError::IndexUnavailable(format!(
                "{} is not a directory",
                self.root.display()
            )));
        }
        fs::read_dir(&self.root)
            .map_err(|e| GalleryError::IndexUnavailable(format!("{}: {}", self.root.display(), e)))?;

        let mut image_files: Vec<PathBuf> = WalkDir::new(&self.root)
            .follow_links(true)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| entry.into_path())
            .filter(|path| is_supported_image(path))
            .collect();

        image_files.sort();
        Ok(image_files)
    }
}

impl MediaIndex for DirectoryIndex {
    fn collection_address(&self) -> &str {
        &self.collection_address
    }

    fn query(&self, query: &IndexQuery) -> Result<Vec<IndexRow>> {
        let start = std::time::Instant::now();
        let files = self.scan()?;

        let mut records: HashMap<u64, PathBuf> = HashMap::with_capacity(files.len());
        let mut rows = Vec::with_capacity(files.len());
        for path in files {
            let relative = path.strip_prefix(&self.root).unwrap_or(&path);
            let mut record_id = stable_record_id(relative);
            // Collisions are resolved in path order, which keeps them stable too.
            while let Some(taken) = records.get(&record_id) {
                warn!(
                    "Record id {} of {} already used by {}",
                    record_id,
                    path.display(),
                    taken.display()
                );
                record_id = record_id.wrapping_add(1);
            }
            let added = fs::metadata(&path).map(|m| date_added(&m)).unwrap_or(0);
            rows.push(IndexRow {
                record_id,
                date_added: added,
            });
            records.insert(record_id, path);
        }

        query.order(&mut rows);
        let rows = rows.into_iter().map(|row| query.project(row)).collect();

        if let Ok(mut table) = self.records.write() {
            *table = records;
        }

        debug!(
            "Scanned {} in {:?}",
            self.root.display(),
            start.elapsed()
        );
        Ok(rows)
    }
}

impl ResourceResolver for DirectoryIndex {
    fn resolve(&self, id: &ResourceIdentifier) -> Option<PathBuf> {
        let prefix = self.collection_address.trim_end_matches('/');
        let tail = id.as_str().strip_prefix(prefix)?.strip_prefix('/')?;
        let record_id: u64 = tail.parse().ok()?;
        self.records.read().ok()?.get(&record_id).cloned()
    }
}
