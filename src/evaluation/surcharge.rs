use std::str::FromStr;

use tracing::trace;

use crate::config::constant::{
    DRIVING_MINUTES_PER_KM, DROPOFF_MINUTES_PER_STOP, SURCHARGE_PER_EXTRA_MINUTE,
};
use crate::domain::types::TrafficLevel;
use crate::error::{CostError, Result};

use super::ensure_distance;

/// Travel-time multiplier per traffic level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MultiplierTable {
    pub light: f64,
    pub moderate: f64,
    pub heavy: f64,
}

impl MultiplierTable {
    /// Canonical table, used by multi-stop tours.
    pub const STANDARD: MultiplierTable = MultiplierTable {
        light: 1.0,
        moderate: 1.5,
        heavy: 2.0,
    };

    /// Historical point-to-point quote table with a steeper heavy-traffic factor.
    pub const POINT_TO_POINT: MultiplierTable = MultiplierTable {
        light: 1.0,
        moderate: 1.5,
        heavy: 2.5,
    };

    pub fn multiplier(&self, level: TrafficLevel) -> f64 {
        match level {
            TrafficLevel::Light => self.light,
            TrafficLevel::Moderate => self.moderate,
            TrafficLevel::Heavy => self.heavy,
        }
    }

    /// Returns `(actual_minutes, surcharge_baht)`.
    pub fn surcharge(&self, base_minutes: f64, level: TrafficLevel) -> Result<(f64, f64)> {
        if !base_minutes.is_finite() || base_minutes < 0.0 {
            return Err(CostError::InvalidInput(format!(
                "base travel time must be a non-negative number of minutes, got {base_minutes}"
            )));
        }
        let actual_minutes = base_minutes * self.multiplier(level);
        let surcharge = (actual_minutes - base_minutes) * SURCHARGE_PER_EXTRA_MINUTE;
        trace!(
            "{} traffic: {:.1} -> {:.1} min, surcharge {:.2}",
            level,
            base_minutes,
            actual_minutes,
            surcharge
        );
        Ok((actual_minutes, surcharge))
    }
}

impl Default for MultiplierTable {
    fn default() -> Self {
        MultiplierTable::STANDARD
    }
}

impl FromStr for MultiplierTable {
    type Err = CostError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "standard" => Ok(MultiplierTable::STANDARD),
            "point-to-point" => Ok(MultiplierTable::POINT_TO_POINT),
            other => Err(CostError::InvalidInput(format!(
                "unknown traffic table '{other}' (expected standard or point-to-point)"
            ))),
        }
    }
}

/// Surcharge with the standard multiplier table.
pub fn surcharge(base_minutes: f64, level: TrafficLevel) -> Result<(f64, f64)> {
    MultiplierTable::STANDARD.surcharge(base_minutes, level)
}

/// Uncongested duration of a multi-stop tour: driving time plus drop-off
/// handling at every delivery stop.
pub fn estimate_base_minutes(total_km: f64, stop_count: usize) -> Result<f64> {
    ensure_distance(total_km)?;
    let driving_minutes = total_km * DRIVING_MINUTES_PER_KM;
    let dropoff_minutes = stop_count as f64 * DROPOFF_MINUTES_PER_STOP;
    Ok(driving_minutes + dropoff_minutes)
}
