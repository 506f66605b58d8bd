use std::env;

use dotenv::dotenv;
use tracing::{info, warn};

use crate::domain::types::{TrafficLevel, VehicleClass};
use crate::error::{CostError, Result};
use crate::evaluation::surcharge::MultiplierTable;
use crate::evaluation::PricingPolicy;

pub mod constant {
    pub const EARTH_RADIUS_KM: f64 = 6371.0;
    /// Road travel versus straight-line distance.
    pub const ROAD_WINDINESS_FACTOR: f64 = 1.4;
    /// Assumes an average of 50 km/h.
    pub const DRIVING_MINUTES_PER_KM: f64 = 1.2;
    pub const DROPOFF_MINUTES_PER_STOP: f64 = 15.0;
    pub const SURCHARGE_PER_EXTRA_MINUTE: f64 = 2.0;

    pub const SEED: u64 = 64;
    pub const RANDOM_STOP_COUNT: usize = 8;
    pub const RANDOM_STOP_RADIUS_KM: f64 = 25.0;
    pub const DEFAULT_DEPOT: (&str, f64, f64) = ("Warehouse", 13.7563, 100.5018);

    pub const DEFAULT_LOCATIONS_CSV: &str = "locations.csv";
    pub const DEFAULT_HISTORY_CSV: &str = "trip_history.csv";
    pub const DEFAULT_DATABASE_URL: &str = "sqlite:trip_history.sqlite";
    pub const DEFAULT_OSRM_BASE_URL: &str = "https://router.project-osrm.org";
    pub const DEFAULT_NOMINATIM_BASE_URL: &str = "https://nominatim.openstreetmap.org";
}

#[derive(Debug, Clone, PartialEq)]
pub enum RunMode {
    /// Nearest-neighbour tour over every row of a locations CSV.
    Batch {
        csv_path: String,
        depot_id: Option<String>,
    },
    /// Single origin to destination quote priced from a road-routing lookup.
    Direct { origin: String, destination: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum HistoryBackend {
    Csv(String),
    Sqlite(String),
    Disabled,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub mode: RunMode,
    pub vehicle: VehicleClass,
    pub traffic: TrafficLevel,
    pub policy: PricingPolicy,
    pub multipliers: MultiplierTable,
    pub old_cost: Option<f64>,
    pub history: HistoryBackend,
    pub osrm_base_url: String,
    pub nominatim_base_url: String,
    /// Sent in the User-Agent when routing through the public OSRM server.
    pub contact_email: Option<String>,
}

impl Settings {
    /// Reads `.env` and the process environment.
    pub fn from_env() -> Result<Self> {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let or_default = |key: &str, default: &str| {
            get(key).unwrap_or_else(|| {
                info!("{key} not set, using default '{default}'");
                default.to_string()
            })
        };

        let mode = match or_default("ROUTE_MODE", "batch").to_ascii_lowercase().as_str() {
            "batch" => RunMode::Batch {
                csv_path: or_default("LOCATIONS_CSV", constant::DEFAULT_LOCATIONS_CSV),
                depot_id: get("DEPOT"),
            },
            "direct" => RunMode::Direct {
                origin: get("DIRECT_ORIGIN").ok_or_else(|| {
                    CostError::InvalidInput("DIRECT_ORIGIN is required in direct mode".into())
                })?,
                destination: get("DIRECT_DESTINATION").ok_or_else(|| {
                    CostError::InvalidInput("DIRECT_DESTINATION is required in direct mode".into())
                })?,
            },
            other => {
                return Err(CostError::InvalidInput(format!(
                    "unknown ROUTE_MODE '{other}' (expected batch or direct)"
                )))
            }
        };

        let vehicle: VehicleClass = or_default("VEHICLE_CLASS", "light").parse()?;
        let traffic: TrafficLevel = or_default("TRAFFIC_LEVEL", "light").parse()?;

        let policy = match or_default("PRICING_POLICY", "tiered").to_ascii_lowercase().as_str() {
            "tiered" => PricingPolicy::Tiered,
            "abc" => {
                let raw = get("FUEL_PRICE").ok_or_else(|| {
                    CostError::InvalidInput("FUEL_PRICE is required for the abc policy".into())
                })?;
                PricingPolicy::ActivityBased {
                    fuel_price_per_liter: parse_amount("FUEL_PRICE", &raw)?,
                }
            }
            other => {
                return Err(CostError::InvalidInput(format!(
                    "unknown PRICING_POLICY '{other}' (expected tiered or abc)"
                )))
            }
        };

        let multipliers: MultiplierTable = or_default("TRAFFIC_TABLE", "standard").parse()?;

        let old_cost = get("OLD_COST")
            .map(|raw| parse_amount("OLD_COST", &raw))
            .transpose()?;

        let history = match or_default("HISTORY_BACKEND", "csv").to_ascii_lowercase().as_str() {
            "csv" => HistoryBackend::Csv(or_default("HISTORY_CSV", constant::DEFAULT_HISTORY_CSV)),
            "sqlite" => {
                HistoryBackend::Sqlite(or_default("DATABASE_URL", constant::DEFAULT_DATABASE_URL))
            }
            "none" => {
                warn!("History persistence disabled");
                HistoryBackend::Disabled
            }
            other => {
                return Err(CostError::InvalidInput(format!(
                    "unknown HISTORY_BACKEND '{other}' (expected csv, sqlite or none)"
                )))
            }
        };

        Ok(Settings {
            mode,
            vehicle,
            traffic,
            policy,
            multipliers,
            old_cost,
            history,
            osrm_base_url: or_default("OSRM_BASE_URL", constant::DEFAULT_OSRM_BASE_URL),
            nominatim_base_url: or_default(
                "NOMINATIM_BASE_URL",
                constant::DEFAULT_NOMINATIM_BASE_URL,
            ),
            contact_email: get("CONTACT_EMAIL"),
        })
    }
}

fn parse_amount(key: &str, raw: &str) -> Result<f64> {
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.0 => Ok(v),
        _ => Err(CostError::InvalidInput(format!(
            "{key} must be a non-negative number, got '{raw}'"
        ))),
    }
}
