//! Geocoder HTTP client
//!
//! Resolves a street address to coordinates via
//! `GET <base>/<urlencoded-address>`, which answers either
//! `{"lat": .., "lon": ..}` or `{"error": ".."}`. Failures are always
//! per-address: the caller skips the building and the ingest continues.

use crate::constants::GEOCODER_TIMEOUT_SECONDS;
use crate::{Error, Result};
use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use serde::Deserialize;
use std::time::Duration;
use tracing::warn;

/// Async geocoder client
#[derive(Debug, Clone)]
pub struct GeoClient {
    http: reqwest::Client,
    base: String,
}

#[derive(Debug, Deserialize)]
struct GeoResponse {
    lat: Option<f64>,
    lon: Option<f64>,
    error: Option<String>,
}

impl GeoClient {
    /// Create a client against the given geocoder base URL
    pub fn new(base: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(GEOCODER_TIMEOUT_SECONDS))
            .build()
            .map_err(|e| Error::internal(format!("failed to create geocoder client: {e}")))?;

        Ok(Self {
            http,
            base: base.into().trim_end_matches('/').to_string(),
        })
    }

    /// Resolve an address to `(lat, lon)`, or `None` if the geocoder
    /// fails or rejects it
    pub async fn resolve(&self, address: &str) -> Option<(f64, f64)> {
        let url = self.address_url(address);

        let response = match self.http.get(&url).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!("geocode request for '{address}' failed: {e}");
                return None;
            }
        };

        if !response.status().is_success() {
            warn!(
                "geocoder answered HTTP {} for '{address}'",
                response.status()
            );
            return None;
        }

        let body: GeoResponse = match response.json().await {
            Ok(body) => body,
            Err(e) => {
                warn!("unparseable geocoder response for '{address}': {e}");
                return None;
            }
        };

        if let Some(error) = body.error {
            warn!("geocoder rejected '{address}': {error}");
            return None;
        }

        match (body.lat, body.lon) {
            (Some(lat), Some(lon)) => Some((lat, lon)),
            _ => {
                warn!("geocoder returned no coordinates for '{address}'");
                None
            }
        }
    }

    // URL construction helper
    fn address_url(&self, address: &str) -> String {
        format!(
            "{}/{}",
            self.base,
            utf8_percent_encode(address, NON_ALPHANUMERIC)
        )
    }
}
