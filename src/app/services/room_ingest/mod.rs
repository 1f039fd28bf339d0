//! Campus-room archive ingestion
//!
//! Accepts a base64 zip archive of an HTML campus site: a root `index.htm`
//! listing buildings, and one page per building with its room table.
//! Buildings are geocoded in parallel; a building whose address cannot be
//! resolved, or whose page holds no room table, contributes zero rooms.

use crate::app::models::Room;
use crate::constants::INDEX_PAGE;
use crate::{Error, Result};
use base64::Engine;
use futures::StreamExt;
use std::collections::HashMap;
use std::io::{Cursor, Read};
use tracing::{debug, info, warn};
use zip::ZipArchive;

pub mod building_page;
pub mod geocode;
mod html;
pub mod index_page;

pub use geocode::GeoClient;
pub use index_page::BuildingRef;

#[cfg(test)]
pub mod tests;

/// Ingester for campus-room archives
#[derive(Debug, Clone)]
pub struct RoomIngester {
    geocoder: GeoClient,
    workers: usize,
}

impl RoomIngester {
    /// Create an ingester with the given geocoder and parallelism bound
    pub fn new(geocoder: GeoClient, workers: usize) -> Self {
        Self {
            geocoder,
            workers: workers.max(1),
        }
    }

    /// Ingest a base64 zip payload into Room rows
    pub async fn ingest(&self, id: &str, payload_b64: &str) -> Result<Vec<Room>> {
        let archive_bytes = base64::engine::general_purpose::STANDARD
            .decode(payload_b64)
            .map_err(|e| Error::invalid_content(format!("payload is not valid base64: {e}")))?;

        let (index_html, pages) = extract_site(&archive_bytes)?;
        let buildings = index_page::parse_index(&index_html)?;
        info!(
            "discovered {} buildings in archive for dataset '{}'",
            buildings.len(),
            id
        );

        // Geocode every building concurrently; `buffered` keeps the
        // building order of the index page.
        let located: Vec<(BuildingRef, Option<(f64, f64)>)> =
            futures::stream::iter(buildings.into_iter().map(|building| {
                let geocoder = self.geocoder.clone();
                async move {
                    let location = geocoder.resolve(&building.address).await;
                    (building, location)
                }
            }))
            .buffered(self.workers)
            .collect()
            .await;

        let mut rooms = Vec::new();
        for (building, location) in located {
            let Some((lat, lon)) = location else {
                continue;
            };

            let Some(page_html) = pages.get(&building.path) else {
                debug!(
                    "building page '{}' referenced by the index is absent",
                    building.path
                );
                continue;
            };

            for info in building_page::parse_building(page_html) {
                rooms.push(Room {
                    fullname: building.fullname.clone(),
                    shortname: building.shortname.clone(),
                    name: format!("{}_{}", building.shortname, info.number),
                    number: info.number,
                    address: building.address.clone(),
                    lat,
                    lon,
                    seats: info.seats,
                    room_type: info.room_type,
                    furniture: info.furniture,
                    href: info.href,
                });
            }
        }

        if rooms.is_empty() {
            return Err(Error::invalid_content("archive produced no rooms"));
        }

        debug!("dataset '{}' produced {} rooms", id, rooms.len());
        Ok(rooms)
    }
}

/// Pull the index page and every other file out of the site archive
fn extract_site(archive_bytes: &[u8]) -> Result<(String, HashMap<String, String>)> {
    let mut archive = ZipArchive::new(Cursor::new(archive_bytes))
        .map_err(|e| Error::invalid_content(format!("payload is not a valid zip archive: {e}")))?;

    let mut pages = HashMap::new();
    for index in 0..archive.len() {
        let mut entry = archive
            .by_index(index)
            .map_err(|e| Error::invalid_content(format!("unreadable zip entry: {e}")))?;
        if entry.is_dir() {
            continue;
        }

        let name = entry.name().to_string();
        let mut text = String::with_capacity(entry.size() as usize);
        if entry.read_to_string(&mut text).is_err() {
            warn!("skipping non-text archive entry '{name}'");
            continue;
        }

        pages.insert(name, text);
    }

    let index_html = pages
        .remove(INDEX_PAGE)
        .ok_or_else(|| Error::invalid_content(format!("archive has no root '{INDEX_PAGE}'")))?;

    Ok((index_html, pages))
}
