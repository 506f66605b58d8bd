use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use csv::{ReaderBuilder, WriterBuilder};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::domain::types::PricedRoute;
use crate::utils::route_description;

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("bad timestamp in history: {0}")]
    Timestamp(#[from] chrono::ParseError),
}

/// One archived calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripRecord {
    pub timestamp: DateTime<Utc>,
    pub route: String,
    pub distance_km: f64,
    pub old_cost: f64,
    pub new_cost: f64,
    pub saving: f64,
}

impl TripRecord {
    /// Without a baseline the old cost is taken as the new cost, so saving is 0.
    pub fn from_priced(priced: &PricedRoute, old_cost: Option<f64>, timestamp: DateTime<Utc>) -> Self {
        let new_cost = priced.final_cost();
        let old_cost = old_cost.unwrap_or(new_cost);
        TripRecord {
            timestamp,
            route: route_description(priced.route().stops()),
            distance_km: priced.total_distance_km(),
            old_cost,
            new_cost,
            saving: old_cost - new_cost,
        }
    }
}

/// Append-only archive of calculations. Records are never updated in place.
#[allow(async_fn_in_trait)]
pub trait HistoryStore {
    fn name(&self) -> &'static str;

    async fn append(&self, record: &TripRecord) -> Result<(), HistoryError>;

    /// All records, oldest first.
    async fn load_all(&self) -> Result<Vec<TripRecord>, HistoryError>;
}

/// History kept as rows of a CSV file.
pub struct CsvHistory {
    path: PathBuf,
}

impl CsvHistory {
    pub fn new(path: impl AsRef<Path>) -> Self {
        CsvHistory {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl HistoryStore for CsvHistory {
    fn name(&self) -> &'static str {
        "csv"
    }

    async fn append(&self, record: &TripRecord) -> Result<(), HistoryError> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let write_header = file.metadata()?.len() == 0;

        let mut wtr = WriterBuilder::new()
            .has_headers(write_header)
            .from_writer(file);
        wtr.serialize(record)?;
        wtr.flush()?;

        debug!("Appended trip record to {}", self.path.display());
        Ok(())
    }

    async fn load_all(&self) -> Result<Vec<TripRecord>, HistoryError> {
        if !self.path.exists() {
            return Ok(vec![]);
        }
        let mut reader = ReaderBuilder::new().has_headers(true).from_path(&self.path)?;
        let records = reader
            .deserialize::<TripRecord>()
            .collect::<Result<Vec<_>, _>>()?;
        info!("Loaded {} trip records from {}", records.len(), self.path.display());
        Ok(records)
    }
}
