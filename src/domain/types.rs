use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CostError, Result};

/// A named point read from input. Field names follow the upload CSV headers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    #[serde(rename = "Location")]
    pub id: String,
    #[serde(rename = "Latitude")]
    pub latitude: f64,
    #[serde(rename = "Longitude")]
    pub longitude: f64,
}

impl Location {
    pub fn new(id: impl Into<String>, latitude: f64, longitude: f64) -> Result<Self> {
        let location = Location {
            id: id.into(),
            latitude,
            longitude,
        };
        location.validate()?;
        Ok(location)
    }

    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(CostError::InvalidInput("location id is empty".into()));
        }
        if !self.latitude.is_finite() || !(-90.0..=90.0).contains(&self.latitude) {
            return Err(CostError::InvalidInput(format!(
                "latitude {} of '{}' is outside -90..90",
                self.latitude, self.id
            )));
        }
        if !self.longitude.is_finite() || !(-180.0..=180.0).contains(&self.longitude) {
            return Err(CostError::InvalidInput(format!(
                "longitude {} of '{}' is outside -180..180",
                self.longitude, self.id
            )));
        }
        Ok(())
    }

    pub fn coords(&self) -> (f64, f64) {
        (self.latitude, self.longitude)
    }
}

/// Validated input for one route-building call: unique ids, coordinates in range.
///
/// Input order is preserved and is the tie-break order of the route builder.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationSet {
    locations: Vec<Location>,
}

impl LocationSet {
    pub fn new(locations: Vec<Location>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(locations.len());
        for location in &locations {
            location.validate()?;
            if !seen.insert(location.id.as_str()) {
                return Err(CostError::InvalidInput(format!(
                    "duplicate location id '{}'",
                    location.id
                )));
            }
        }
        Ok(LocationSet { locations })
    }

    pub fn get(&self, id: &str) -> Option<&Location> {
        self.locations.iter().find(|l| l.id == id)
    }

    pub fn require(&self, id: &str) -> Result<&Location> {
        self.get(id).ok_or_else(|| CostError::NotFound(id.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Location> {
        self.locations.iter()
    }

    pub fn first(&self) -> Option<&Location> {
        self.locations.first()
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }
}

/// Ordered visiting sequence of location ids plus its length in km.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    stops: Vec<String>,
    total_km: f64,
    closed: bool,
}

impl Route {
    /// Tour starting and ending at `stops[0]`.
    pub(crate) fn closed(stops: Vec<String>, total_km: f64) -> Self {
        Route {
            stops,
            total_km,
            closed: true,
        }
    }

    /// One-way origin to destination trip.
    pub fn direct(origin: impl Into<String>, destination: impl Into<String>, km: f64) -> Self {
        Route {
            stops: vec![origin.into(), destination.into()],
            total_km: km,
            closed: false,
        }
    }

    pub fn stops(&self) -> &[String] {
        &self.stops
    }

    pub fn total_km(&self) -> f64 {
        self.total_km
    }

    pub fn origin(&self) -> &str {
        &self.stops[0]
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Delivery stops, depot endpoints excluded.
    pub fn delivery_count(&self) -> usize {
        if self.closed {
            self.stops.len().saturating_sub(2)
        } else {
            self.stops.len().saturating_sub(1)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VehicleClass {
    /// 4-wheel pickup.
    Light,
    /// 6-wheel truck.
    Heavy,
}

impl FromStr for VehicleClass {
    type Err = CostError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" | "4-wheel" | "light-truck" => Ok(VehicleClass::Light),
            "heavy" | "6-wheel" | "heavy-truck" => Ok(VehicleClass::Heavy),
            other => Err(CostError::InvalidInput(format!(
                "unknown vehicle class '{other}'"
            ))),
        }
    }
}

impl fmt::Display for VehicleClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VehicleClass::Light => write!(f, "Light truck (4-wheel)"),
            VehicleClass::Heavy => write!(f, "Heavy truck (6-wheel)"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrafficLevel {
    Light,
    Moderate,
    Heavy,
}

impl FromStr for TrafficLevel {
    type Err = CostError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(TrafficLevel::Light),
            "moderate" => Ok(TrafficLevel::Moderate),
            "heavy" => Ok(TrafficLevel::Heavy),
            other => Err(CostError::InvalidInput(format!(
                "unknown traffic level '{other}'"
            ))),
        }
    }
}

impl fmt::Display for TrafficLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TrafficLevel::Light => "light",
            TrafficLevel::Moderate => "moderate",
            TrafficLevel::Heavy => "heavy",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Waypoint {
    pub id: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl From<&Location> for Waypoint {
    fn from(location: &Location) -> Self {
        Waypoint {
            id: location.id.clone(),
            latitude: location.latitude,
            longitude: location.longitude,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Leg {
    pub from: String,
    pub to: String,
    pub km: f64,
}

/// Result of one pricing request. Built once by the trip assembler.
#[derive(Debug, Clone, PartialEq)]
pub struct PricedRoute {
    pub(crate) route: Route,
    pub(crate) vehicle: VehicleClass,
    pub(crate) traffic: TrafficLevel,
    pub(crate) base_cost: f64,
    pub(crate) surcharge: f64,
    pub(crate) estimated_minutes: f64,
    pub(crate) waypoints: Vec<Waypoint>,
    pub(crate) legs: Vec<Leg>,
}

impl PricedRoute {
    pub fn route(&self) -> &Route {
        &self.route
    }

    pub fn vehicle(&self) -> VehicleClass {
        self.vehicle
    }

    pub fn traffic(&self) -> TrafficLevel {
        self.traffic
    }

    pub fn total_distance_km(&self) -> f64 {
        self.route.total_km()
    }

    pub fn base_cost(&self) -> f64 {
        self.base_cost
    }

    pub fn surcharge(&self) -> f64 {
        self.surcharge
    }

    pub fn final_cost(&self) -> f64 {
        self.base_cost + self.surcharge
    }

    /// Travel time after the traffic multiplier.
    pub fn estimated_minutes(&self) -> f64 {
        self.estimated_minutes
    }

    /// Coordinates in visiting order, depot first and last for a tour.
    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    pub fn legs(&self) -> &[Leg] {
        &self.legs
    }
}
