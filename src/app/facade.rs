//! Dataset facade orchestrating ingestion, storage and querying
//!
//! `DatasetManager` is the single entry point the HTTP layer calls. It
//! validates ids, serializes mutations per dataset id, dispatches archives
//! to the matching ingester, and runs queries against the stored
//! documents. All listing is derived from disk, so a restarted process
//! sees exactly the datasets it had.

use crate::app::models::{Dataset, DatasetKind, validate_dataset_id};
use crate::app::services::query::{self, ResultRow};
use crate::app::services::room_ingest::{GeoClient, RoomIngester};
use crate::app::services::section_ingest::SectionIngester;
use crate::app::services::store::DatasetStore;
use crate::config::Config;
use crate::{Error, Result};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::info;

/// One row of the dataset listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatasetListing {
    pub id: String,
    pub kind: DatasetKind,
    #[serde(rename = "numRows")]
    pub num_rows: usize,
}

/// Facade over the store and both ingesters
///
/// Mutations (add, remove) hold a per-id write guard; queries hold the
/// read guard of the one dataset they reference. Operations on different
/// ids proceed independently.
pub struct DatasetManager {
    store: DatasetStore,
    sections: SectionIngester,
    rooms: RoomIngester,
    locks: Mutex<HashMap<String, Arc<RwLock<()>>>>,
}

impl DatasetManager {
    /// Create a manager from the service configuration
    pub fn new(config: &Config) -> Result<Self> {
        let geocoder = GeoClient::new(config.geocoder_base.clone())?;

        Ok(Self {
            store: DatasetStore::new(config.storage_dir.clone()),
            sections: SectionIngester::new(config.ingest_workers),
            rooms: RoomIngester::new(geocoder, config.ingest_workers),
            locks: Mutex::new(HashMap::new()),
        })
    }

    /// The per-id guard, created on first use
    async fn id_lock(&self, id: &str) -> Arc<RwLock<()>> {
        let mut locks = self.locks.lock().await;
        locks.entry(id.to_string()).or_default().clone()
    }

    /// Ingest an archive and store it under a new dataset id
    ///
    /// Returns the sorted list of all stored dataset ids on success. A
    /// duplicate id, like any malformed archive, is `InvalidContent`.
    pub async fn add_dataset(
        &self,
        id: &str,
        payload_b64: &str,
        kind: DatasetKind,
    ) -> Result<Vec<String>> {
        validate_dataset_id(id)?;

        let lock = self.id_lock(id).await;
        let _guard = lock.write().await;

        if self.store.exists(id).await {
            return Err(Error::invalid_content(format!(
                "dataset '{id}' already exists"
            )));
        }

        let dataset = match kind {
            DatasetKind::Sections => {
                Dataset::sections(id, self.sections.ingest(id, payload_b64).await?)
            }
            DatasetKind::Rooms => Dataset::rooms(id, self.rooms.ingest(id, payload_b64).await?),
        };

        self.store.save(&dataset).await?;
        info!(
            "added dataset '{}' ({}, {} rows)",
            id,
            kind,
            dataset.len()
        );

        let mut ids = self.store.list_ids().await?;
        ids.sort();
        Ok(ids)
    }

    /// Remove a stored dataset, returning its id
    pub async fn remove_dataset(&self, id: &str) -> Result<String> {
        validate_dataset_id(id)?;

        let lock = self.id_lock(id).await;
        let _guard = lock.write().await;

        self.store.delete(id).await?;
        info!("removed dataset '{}'", id);
        Ok(id.to_string())
    }

    /// List every stored dataset with its kind and row count
    ///
    /// Reads a point-in-time snapshot of the storage directory; no guard
    /// is held, so a concurrent add may or may not appear.
    pub async fn list_datasets(&self) -> Result<Vec<DatasetListing>> {
        let datasets = self.store.list_all().await?;
        Ok(datasets
            .into_iter()
            .map(|dataset| DatasetListing {
                kind: dataset.kind(),
                num_rows: dataset.len(),
                id: dataset.id,
            })
            .collect())
    }

    /// Validate and evaluate a query against its referenced dataset
    ///
    /// A query referencing an absent dataset is `InvalidQuery`, not
    /// `NotFound`: the id only exists inside the query text.
    pub async fn perform_query(&self, raw: &serde_json::Value) -> Result<Vec<ResultRow>> {
        let query = query::compile(raw)?;

        let lock = self.id_lock(&query.dataset_id).await;
        let _guard = lock.read().await;

        let dataset = match self.store.load(&query.dataset_id).await {
            Ok(dataset) => dataset,
            Err(Error::NotFound { id }) => {
                return Err(Error::invalid_query(format!(
                    "query references missing dataset '{id}'"
                )));
            }
            Err(e) => return Err(e),
        };

        query::evaluate(&dataset, &query)
    }
}
