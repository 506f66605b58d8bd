use std::error::Error;

use chrono::Utc;
use dotenv::dotenv;
use tracing::{error, info, span, warn, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::{HistoryBackend, RunMode, Settings};
use crate::database::{CsvHistory, HistoryStore, SqliteHistory, TripRecord};
use crate::distance::providers::{Geocoder, OsrmClient};
use crate::domain::types::{Location, LocationSet, PricedRoute};
use crate::error::{CostError, Result};
use crate::fixtures::load_locations;
use crate::solver::{NearestNeighbor, RouteStrategy};
use crate::trip::{assemble, assemble_direct, print_report, TripRequest};

/// Initialize tracing and environment
fn init_tracing_and_env() -> std::result::Result<(), Box<dyn Error>> {
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(
            fmt::layer()
                .with_span_events(fmt::format::FmtSpan::NEW | fmt::format::FmtSpan::CLOSE)
                .pretty(),
        )
        .try_init()?;

    dotenv().ok();
    Ok(())
}

/// Builds a tour over `locations` starting at `depot_id` (or the first row) and prices it.
pub fn price_batch<S: RouteStrategy>(
    locations: Vec<Location>,
    depot_id: Option<&str>,
    request: &TripRequest,
    strategy: &S,
) -> Result<PricedRoute> {
    let locations = LocationSet::new(locations)?;
    let depot_id = match depot_id {
        Some(id) => id.to_string(),
        None => locations
            .first()
            .map(|l| l.id.clone())
            .ok_or_else(|| CostError::InvalidInput("no locations to route".into()))?,
    };

    info!(
        "Routing {} stops from depot '{}' with {}",
        locations.len().saturating_sub(1),
        depot_id,
        strategy.name()
    );

    let route = {
        let span = span!(Level::INFO, "build_route");
        let _guard = span.enter();
        strategy.build(&depot_id, &locations)?
    };

    let span = span!(Level::INFO, "pricing", policy = request.policy.name());
    let _guard = span.enter();
    assemble(route, &locations, request)
}

/// Geocodes both ends, asks the road-routing service for the leg and prices it.
pub async fn price_direct(
    origin: &str,
    destination: &str,
    request: &TripRequest,
    geocoder: &Geocoder,
    osrm: &OsrmClient,
) -> Result<PricedRoute> {
    let queries = [origin.to_string(), destination.to_string()];
    let mut resolved = Vec::with_capacity(2);
    for (query, found) in queries.iter().zip(geocoder.locate_all(&queries).await) {
        match found? {
            Some(location) => resolved.push(location),
            None => return Err(CostError::NotFound(query.clone())),
        }
    }

    let leg = osrm.road_leg(&resolved[0], &resolved[1]).await?;
    assemble_direct(&resolved[0], &resolved[1], leg, request)
}

/// Appends to history. Failures are logged and never abort the calculation.
pub async fn persist<S: HistoryStore>(store: &S, record: &TripRecord) -> bool {
    match store.append(record).await {
        Ok(()) => {
            info!("Archived calculation to {} history", store.name());
            true
        }
        Err(e) => {
            error!("Failed to archive calculation to {} history: {}", store.name(), e);
            false
        }
    }
}

async fn archive(backend: &HistoryBackend, record: &TripRecord) {
    match backend {
        HistoryBackend::Csv(path) => {
            persist(&CsvHistory::new(path), record).await;
        }
        HistoryBackend::Sqlite(url) => match SqliteHistory::connect(url).await {
            Ok(store) => {
                persist(&store, record).await;
            }
            Err(e) => error!("History database unavailable: {}", e),
        },
        HistoryBackend::Disabled => {}
    }
}

pub async fn run() -> std::result::Result<(), Box<dyn Error>> {
    init_tracing_and_env()?;
    let settings = Settings::from_env()?;
    let request = TripRequest::from_settings(&settings);

    info!(
        "Pricing with {} policy for {} in {} traffic",
        request.policy.name(),
        request.vehicle,
        request.traffic
    );

    let priced = match &settings.mode {
        RunMode::Batch { csv_path, depot_id } => {
            let locations = {
                let span = span!(Level::INFO, "setup");
                let _guard = span.enter();
                load_locations(csv_path)
            };
            price_batch(locations, depot_id.as_deref(), &request, &NearestNeighbor)?
        }
        RunMode::Direct {
            origin,
            destination,
        } => {
            let geocoder = Geocoder::new(&settings.nominatim_base_url);
            let osrm = OsrmClient::new(
                &settings.osrm_base_url,
                settings.contact_email.as_deref(),
            );
            price_direct(origin, destination, &request, &geocoder, &osrm).await?
        }
    };

    if settings.old_cost.is_none() {
        warn!("OLD_COST not set, saving is reported against the new cost");
    }
    let old_cost = settings.old_cost.unwrap_or(priced.final_cost());
    print_report(&priced, old_cost);

    let record = TripRecord::from_priced(&priced, settings.old_cost, Utc::now());
    archive(&settings.history, &record).await;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::history::tests::MemoryHistory;
    use crate::domain::types::{TrafficLevel, VehicleClass};
    use crate::evaluation::{MultiplierTable, PricingPolicy};

    fn request() -> TripRequest {
        TripRequest {
            vehicle: VehicleClass::Light,
            traffic: TrafficLevel::Light,
            policy: PricingPolicy::Tiered,
            multipliers: MultiplierTable::STANDARD,
        }
    }

    fn rows() -> Vec<Location> {
        vec![
            Location::new("Warehouse", 13.7563, 100.5018).unwrap(),
            Location::new("A", 13.7200, 100.5500).unwrap(),
            Location::new("B", 13.8000, 100.4500).unwrap(),
        ]
    }

    #[test]
    fn batch_defaults_depot_to_first_row() {
        let priced = price_batch(rows(), None, &request(), &NearestNeighbor).unwrap();
        assert_eq!(priced.route().origin(), "Warehouse");
        assert_eq!(priced.route().stops().len(), 4);
    }

    #[test]
    fn batch_honours_explicit_depot() {
        let priced = price_batch(rows(), Some("B"), &request(), &NearestNeighbor).unwrap();
        assert_eq!(priced.route().stops().first().map(String::as_str), Some("B"));
        assert_eq!(priced.route().stops().last().map(String::as_str), Some("B"));
    }

    #[test]
    fn batch_rejects_empty_input_and_unknown_depot() {
        assert!(matches!(
            price_batch(vec![], None, &request(), &NearestNeighbor),
            Err(CostError::InvalidInput(_))
        ));
        assert_eq!(
            price_batch(rows(), Some("Depot 9"), &request(), &NearestNeighbor),
            Err(CostError::NotFound("Depot 9".into()))
        );
    }

    #[tokio::test]
    async fn persisted_record_carries_saving() {
        let priced = price_batch(rows(), None, &request(), &NearestNeighbor).unwrap();
        let store = MemoryHistory::default();
        let record = TripRecord::from_priced(&priced, Some(1500.0), Utc::now());
        assert!(persist(&store, &record).await);

        let saved = store.load_all().await.unwrap();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].route, "Warehouse -> A -> B -> Warehouse");
        assert_eq!(saved[0].new_cost, priced.final_cost());
        assert_eq!(saved[0].saving, 1500.0 - priced.final_cost());
    }

    #[tokio::test]
    async fn persistence_failure_does_not_propagate() {
        let dir = tempfile::tempdir().unwrap();
        // A directory cannot be opened for appending.
        let store = CsvHistory::new(dir.path());
        let priced = price_batch(rows(), None, &request(), &NearestNeighbor).unwrap();
        let record = TripRecord::from_priced(&priced, None, Utc::now());
        assert!(!persist(&store, &record).await);
        assert_eq!(record.saving, 0.0);
    }
}
