//! Greedy nearest-neighbour tour construction.
//!
//! From the depot, repeatedly travel to the closest unvisited stop, then return
//! to the depot. O(n²) distance evaluations for n stops, no backtracking.

use tracing::{debug, trace};

use crate::distance::distance;
use crate::domain::types::{Location, LocationSet, Route};
use crate::error::Result;

use super::RouteStrategy;

#[derive(Debug, Default, Clone, Copy)]
pub struct NearestNeighbor;

impl RouteStrategy for NearestNeighbor {
    fn name(&self) -> &'static str {
        "nearest-neighbor"
    }

    fn build(&self, depot_id: &str, locations: &LocationSet) -> Result<Route> {
        let depot = locations.require(depot_id)?;

        // Input order is the tie-break order: the first minimum found wins.
        let mut unvisited: Vec<&Location> = locations.iter().filter(|l| l.id != depot.id).collect();

        let mut stops = Vec::with_capacity(unvisited.len() + 2);
        stops.push(depot.id.clone());

        let mut total_km = 0.0;
        let mut current = depot;

        while !unvisited.is_empty() {
            let mut best_idx = 0;
            let mut best_km = distance(current, unvisited[0]);
            for (idx, candidate) in unvisited.iter().enumerate().skip(1) {
                let km = distance(current, candidate);
                if km < best_km {
                    best_idx = idx;
                    best_km = km;
                }
            }

            let next = unvisited.remove(best_idx);
            trace!("{} -> {} ({:.3} km)", current.id, next.id, best_km);
            total_km += best_km;
            stops.push(next.id.clone());
            current = next;
        }

        let return_km = distance(current, depot);
        trace!("{} -> {} ({:.3} km, return leg)", current.id, depot.id, return_km);
        total_km += return_km;
        stops.push(depot.id.clone());

        debug!("Built {}-stop tour of {:.2} km", stops.len() - 2, total_km);
        Ok(Route::closed(stops, total_km))
    }
}

/// Nearest-neighbour tour from `depot_id` through every other location and back.
pub fn build_route(depot_id: &str, locations: &LocationSet) -> Result<Route> {
    NearestNeighbor.build(depot_id, locations)
}
