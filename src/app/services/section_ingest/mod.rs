//! Course-section archive ingestion
//!
//! Accepts a base64 zip archive whose single top-level directory `courses/`
//! holds JSON course files, and produces the Section rows of a dataset.
//! Ingestion is all-or-nothing: any malformed file aborts the whole run and
//! nothing reaches the store.

use crate::app::models::Section;
use crate::constants::COURSES_PREFIX;
use crate::{Error, Result};
use base64::Engine;
use futures::{StreamExt, TryStreamExt};
use std::io::{Cursor, Read};
use tracing::{debug, info};
use zip::ZipArchive;

pub mod course_file;

#[cfg(test)]
pub mod tests;

/// Ingester for course-section archives
///
/// Course files are independent, so parsing runs on blocking workers in
/// parallel, bounded by the configured worker count. Results are assembled
/// in archive order, which keeps ingestion deterministic.
#[derive(Debug, Clone)]
pub struct SectionIngester {
    workers: usize,
}

impl SectionIngester {
    /// Create an ingester with the given parse worker bound
    pub fn new(workers: usize) -> Self {
        Self {
            workers: workers.max(1),
        }
    }

    /// Ingest a base64 zip payload into Section rows
    pub async fn ingest(&self, id: &str, payload_b64: &str) -> Result<Vec<Section>> {
        let archive_bytes = base64::engine::general_purpose::STANDARD
            .decode(payload_b64)
            .map_err(|e| Error::invalid_content(format!("payload is not valid base64: {e}")))?;

        let course_files = extract_course_files(&archive_bytes)?;
        info!(
            "parsing {} course files for dataset '{}'",
            course_files.len(),
            id
        );

        let parsed: Vec<Vec<Section>> = futures::stream::iter(
            course_files
                .into_iter()
                .map(|(name, bytes)| {
                    tokio::task::spawn_blocking(move || {
                        course_file::parse_course_file(&name, &bytes)
                    })
                }),
        )
        .buffered(self.workers)
        .map(|joined| joined.map_err(Error::from).and_then(|parsed| parsed))
        .try_collect()
        .await?;

        let sections: Vec<Section> = parsed.into_iter().flatten().collect();
        if sections.is_empty() {
            return Err(Error::invalid_content(
                "archive contains no valid course sections",
            ));
        }

        debug!("dataset '{}' produced {} sections", id, sections.len());
        Ok(sections)
    }
}

/// Validate the archive layout and pull out every course file
///
/// The archive must contain exactly one top-level directory, `courses/`,
/// with at least one file under it. Any other top-level entry fails the
/// ingest.
fn extract_course_files(archive_bytes: &[u8]) -> Result<Vec<(String, Vec<u8>)>> {
    let mut archive = ZipArchive::new(Cursor::new(archive_bytes))
        .map_err(|e| Error::invalid_content(format!("payload is not a valid zip archive: {e}")))?;

    let mut files = Vec::new();
    for index in 0..archive.len() {
        let mut entry = archive
            .by_index(index)
            .map_err(|e| Error::invalid_content(format!("unreadable zip entry: {e}")))?;

        let name = entry.name().to_string();
        if !name.starts_with(COURSES_PREFIX) {
            return Err(Error::invalid_content(format!(
                "unexpected top-level archive entry '{name}'; only '{COURSES_PREFIX}' is allowed"
            )));
        }

        if entry.is_dir() {
            continue;
        }

        let mut bytes = Vec::with_capacity(entry.size() as usize);
        entry
            .read_to_end(&mut bytes)
            .map_err(|e| Error::invalid_content(format!("unreadable zip entry '{name}': {e}")))?;
        files.push((name, bytes));
    }

    if files.is_empty() {
        return Err(Error::invalid_content(format!(
            "archive contains no files under '{COURSES_PREFIX}'"
        )));
    }

    Ok(files)
}
