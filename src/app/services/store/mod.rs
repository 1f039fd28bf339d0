//! Persistence store for dataset documents
//!
//! Datasets live in a single flat directory, one JSON document per dataset
//! named by the encoded id. Documents are self-describing (id, kind, rows),
//! so the listing is always derived from disk and survives restarts without
//! any side metadata.

use crate::app::models::Dataset;
use crate::app::services::id_codec;
use crate::constants::{DATASET_FILE_EXT, TEMP_FILE_SUFFIX};
use crate::{Error, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

#[cfg(test)]
pub mod tests;

/// Filesystem-backed dataset store rooted at one directory
#[derive(Debug, Clone)]
pub struct DatasetStore {
    root: PathBuf,
}

impl DatasetStore {
    /// Create a store over the given root directory
    ///
    /// The directory is created lazily on the first save.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory of this store
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the document holding the given id
    fn document_path(&self, id: &str) -> PathBuf {
        self.root
            .join(format!("{}.{}", id_codec::encode(id), DATASET_FILE_EXT))
    }

    /// Persist a dataset as a new document
    ///
    /// Writes to a temp sibling and renames into place, so a crashed or
    /// cancelled save never leaves a partial document under the final name.
    /// The facade guarantees the id does not already exist.
    pub async fn save(&self, dataset: &Dataset) -> Result<()> {
        tokio::fs::create_dir_all(&self.root).await.map_err(|e| {
            Error::io(
                format!("failed to create storage directory {}", self.root.display()),
                e,
            )
        })?;

        let bytes = serde_json::to_vec(dataset)
            .map_err(|e| Error::internal(format!("failed to serialize dataset document: {e}")))?;

        let final_path = self.document_path(&dataset.id);
        let temp_path = final_path.with_extension(format!("{DATASET_FILE_EXT}.{TEMP_FILE_SUFFIX}"));

        if let Err(e) = tokio::fs::write(&temp_path, &bytes).await {
            let _ = tokio::fs::remove_file(&temp_path).await;
            return Err(Error::io("failed to write dataset document", e));
        }

        if let Err(e) = tokio::fs::rename(&temp_path, &final_path).await {
            let _ = tokio::fs::remove_file(&temp_path).await;
            return Err(Error::io("failed to finalize dataset document", e));
        }

        debug!(
            "saved dataset '{}' ({} rows) to {}",
            dataset.id,
            dataset.len(),
            final_path.display()
        );
        Ok(())
    }

    /// Load the dataset stored under the given id
    ///
    /// A missing document is `NotFound`; an unreadable or corrupt one is an
    /// internal fault.
    pub async fn load(&self, id: &str) -> Result<Dataset> {
        let path = self.document_path(id);

        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(Error::not_found(id));
            }
            Err(e) => return Err(Error::io("failed to read dataset document", e)),
        };

        serde_json::from_slice(&bytes)
            .map_err(|e| Error::internal(format!("corrupt dataset document for '{id}': {e}")))
    }

    /// Check whether a document exists for the given id
    pub async fn exists(&self, id: &str) -> bool {
        tokio::fs::try_exists(self.document_path(id))
            .await
            .unwrap_or(false)
    }

    /// Enumerate the ids of all stored datasets (order unspecified)
    ///
    /// Files without the dataset extension, and names that do not decode,
    /// are skipped. A missing root directory is simply an empty store.
    pub async fn list_ids(&self) -> Result<Vec<String>> {
        let mut entries = match tokio::fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(Error::io("failed to enumerate storage directory", e)),
        };

        let mut ids = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| Error::io("failed to enumerate storage directory", e))?
        {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(DATASET_FILE_EXT) {
                continue;
            }

            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };

            match id_codec::decode(stem) {
                Ok(id) => ids.push(id),
                Err(e) => warn!("skipping foreign file in storage directory: {e}"),
            }
        }

        Ok(ids)
    }

    /// Load every stored dataset
    ///
    /// The listing is a point-in-time snapshot; a dataset removed while the
    /// snapshot is being materialized is skipped rather than failing the
    /// whole enumeration.
    pub async fn list_all(&self) -> Result<Vec<Dataset>> {
        let mut datasets = Vec::new();
        for id in self.list_ids().await? {
            match self.load(&id).await {
                Ok(dataset) => datasets.push(dataset),
                Err(Error::NotFound { .. }) => continue,
                Err(e) => return Err(e),
            }
        }
        Ok(datasets)
    }

    /// Delete the document stored under the given id
    pub async fn delete(&self, id: &str) -> Result<()> {
        match tokio::fs::remove_file(self.document_path(id)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(Error::not_found(id)),
            Err(e) => Err(Error::io("failed to delete dataset document", e)),
        }
    }
}
