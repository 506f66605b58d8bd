use std::time::Duration;

use futures::future::join_all;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, error, info, trace, warn};

use crate::config::constant::DEFAULT_NOMINATIM_BASE_URL;
use crate::domain::types::Location;
use crate::error::{CostError, Result};

use super::body_preview;

const SERVICE: &str = "nominatim";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Nominatim returns coordinates as strings.
#[derive(Debug, Deserialize)]
struct SearchHit {
    lat: String,
    lon: String,
}

/// Resolves free-text place names to coordinates.
pub struct Geocoder {
    base_url: String,
    client: Client,
}

impl Geocoder {
    pub fn new(base_url: impl Into<String>) -> Self {
        Geocoder {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    /// `Ok(None)` when the service has no match; the caller decides whether to abort.
    pub async fn locate(&self, query: &str) -> Result<Option<Location>> {
        let url = format!("{}/search", self.base_url);
        trace!("locate: sending GET to {url} for '{query}'");

        let response = self
            .client
            .get(&url)
            .query(&[("q", query), ("format", "json"), ("limit", "1")])
            .header("User-Agent", "route-cost/0.1")
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(|e| {
                error!("Geocoding request failed for '{query}': {e}");
                CostError::upstream(SERVICE, e.to_string())
            })?;

        if !response.status().is_success() {
            error!("Geocoder returned HTTP {} for '{query}'", response.status());
            return Err(CostError::upstream(
                SERVICE,
                format!("HTTP {}", response.status()),
            ));
        }

        let text = response.text().await.map_err(|e| {
            error!("Failed to read geocoder response body: {e}");
            CostError::upstream(SERVICE, e.to_string())
        })?;

        let location = parse_search_response(query, &text)?;
        match &location {
            Some(l) => info!("Geocoded '{}' to ({}, {})", query, l.latitude, l.longitude),
            None => warn!("No results found for '{query}'"),
        }
        Ok(location)
    }

    /// Resolves every query concurrently, preserving input order.
    pub async fn locate_all(&self, queries: &[String]) -> Vec<Result<Option<Location>>> {
        debug!("Geocoding {} places", queries.len());
        join_all(queries.iter().map(|q| self.locate(q))).await
    }
}

impl Default for Geocoder {
    fn default() -> Self {
        Geocoder::new(DEFAULT_NOMINATIM_BASE_URL)
    }
}

pub(crate) fn parse_search_response(query: &str, text: &str) -> Result<Option<Location>> {
    let hits: Vec<SearchHit> = serde_json::from_str(text).map_err(|e| {
        error!("JSON parse error: {e}");
        debug!("Raw response: {}", body_preview(text));
        CostError::upstream(SERVICE, format!("malformed response: {e}"))
    })?;

    let Some(hit) = hits.first() else {
        return Ok(None);
    };

    let parse = |raw: &str| {
        raw.parse::<f64>()
            .map_err(|e| CostError::upstream(SERVICE, format!("bad coordinate '{raw}': {e}")))
    };
    let location = Location {
        id: query.to_string(),
        latitude: parse(&hit.lat)?,
        longitude: parse(&hit.lon)?,
    };
    location.validate()?;
    Ok(Some(location))
}
