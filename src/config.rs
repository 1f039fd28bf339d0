//! Configuration management and validation.
//!
//! Provides the service configuration structure with defaults sourced from
//! `constants` and builder-style overrides for the CLI layer.

use crate::constants::{
    DEFAULT_GEOCODER_BASE, DEFAULT_MAX_ARCHIVE_BYTES, DEFAULT_PORT, DEFAULT_STORAGE_DIR,
};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Global configuration for the campus-insight service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// HTTP listen port
    pub port: u16,

    /// Directory holding persisted dataset documents
    pub storage_dir: PathBuf,

    /// Base URL of the address geocoding service
    pub geocoder_base: String,

    /// Maximum accepted archive size in bytes
    pub max_archive_bytes: usize,

    /// Number of parallel workers used while parsing archive entries
    pub ingest_workers: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            storage_dir: PathBuf::from(DEFAULT_STORAGE_DIR),
            geocoder_base: DEFAULT_GEOCODER_BASE.to_string(),
            max_archive_bytes: DEFAULT_MAX_ARCHIVE_BYTES,
            ingest_workers: num_cpus::get(),
        }
    }
}

impl Config {
    /// Create configuration with a custom listen port
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Create configuration with a custom storage directory
    pub fn with_storage_dir(mut self, storage_dir: impl Into<PathBuf>) -> Self {
        self.storage_dir = storage_dir.into();
        self
    }

    /// Create configuration with a custom geocoder base URL
    pub fn with_geocoder_base(mut self, geocoder_base: impl Into<String>) -> Self {
        self.geocoder_base = geocoder_base.into();
        self
    }

    /// Create configuration with a custom archive size limit
    pub fn with_max_archive_bytes(mut self, max_archive_bytes: usize) -> Self {
        self.max_archive_bytes = max_archive_bytes;
        self
    }

    /// Create configuration with a custom ingest worker count
    pub fn with_ingest_workers(mut self, ingest_workers: usize) -> Self {
        self.ingest_workers = ingest_workers;
        self
    }

    /// Validate the configuration for consistency
    pub fn validate(&self) -> Result<()> {
        if self.geocoder_base.is_empty() {
            return Err(Error::internal("geocoder base URL cannot be empty"));
        }

        if self.max_archive_bytes == 0 {
            return Err(Error::internal("archive size limit must be positive"));
        }

        if self.ingest_workers == 0 {
            return Err(Error::internal("ingest worker count must be positive"));
        }

        Ok(())
    }
}
