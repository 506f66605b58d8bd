use itertools::Itertools;
use tracing::{debug, info};

use crate::config::Settings;
use crate::distance::distance;
use crate::distance::providers::RoadLeg;
use crate::domain::types::{
    Leg, Location, LocationSet, PricedRoute, Route, TrafficLevel, VehicleClass, Waypoint,
};
use crate::error::{CostError, Result};
use crate::evaluation::surcharge::{estimate_base_minutes, MultiplierTable};
use crate::evaluation::PricingPolicy;

/// Pricing inputs chosen by configuration for one calculation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TripRequest {
    pub vehicle: VehicleClass,
    pub traffic: TrafficLevel,
    pub policy: PricingPolicy,
    pub multipliers: MultiplierTable,
}

impl TripRequest {
    pub fn from_settings(settings: &Settings) -> Self {
        TripRequest {
            vehicle: settings.vehicle,
            traffic: settings.traffic,
            policy: settings.policy,
            multipliers: settings.multipliers,
        }
    }
}

/// Prices a depot tour: base cost from the tour length, base time from driving
/// plus drop-offs, then the traffic surcharge.
pub fn assemble(route: Route, locations: &LocationSet, request: &TripRequest) -> Result<PricedRoute> {
    if !route.is_closed() {
        return Err(CostError::InvalidInput(format!(
            "expected a depot tour, got a one-way route from '{}'",
            route.origin()
        )));
    }

    let visited: Vec<&Location> = route
        .stops()
        .iter()
        .map(|id| locations.require(id))
        .collect::<Result<_>>()?;

    let legs: Vec<Leg> = visited
        .iter()
        .tuple_windows()
        .map(|(from, to)| Leg {
            from: from.id.clone(),
            to: to.id.clone(),
            km: distance(from, to),
        })
        .collect();

    let base_cost = request.policy.price(route.total_km(), request.vehicle)?;
    let base_minutes = estimate_base_minutes(route.total_km(), route.delivery_count())?;
    let (estimated_minutes, surcharge) = request.multipliers.surcharge(base_minutes, request.traffic)?;

    debug!(
        "Tour priced with {} policy: base {:.2}, surcharge {:.2}",
        request.policy.name(),
        base_cost,
        surcharge
    );

    Ok(PricedRoute {
        waypoints: visited.into_iter().map(Waypoint::from).collect(),
        legs,
        route,
        vehicle: request.vehicle,
        traffic: request.traffic,
        base_cost,
        surcharge,
        estimated_minutes,
    })
}

/// Prices a one-way trip whose distance and base duration come from a road-routing lookup.
pub fn assemble_direct(
    origin: &Location,
    destination: &Location,
    leg: RoadLeg,
    request: &TripRequest,
) -> Result<PricedRoute> {
    let base_cost = request.policy.price(leg.distance_km, request.vehicle)?;
    let (estimated_minutes, surcharge) = request
        .multipliers
        .surcharge(leg.duration_minutes, request.traffic)?;

    info!(
        "Direct quote {} -> {}: {:.2} km, base {:.2}, surcharge {:.2}",
        origin.id, destination.id, leg.distance_km, base_cost, surcharge
    );

    Ok(PricedRoute {
        route: Route::direct(origin.id.clone(), destination.id.clone(), leg.distance_km),
        vehicle: request.vehicle,
        traffic: request.traffic,
        base_cost,
        surcharge,
        estimated_minutes,
        waypoints: vec![Waypoint::from(origin), Waypoint::from(destination)],
        legs: vec![Leg {
            from: origin.id.clone(),
            to: destination.id.clone(),
            km: leg.distance_km,
        }],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::build_route;

    fn request(traffic: TrafficLevel) -> TripRequest {
        TripRequest {
            vehicle: VehicleClass::Light,
            traffic,
            policy: PricingPolicy::Tiered,
            multipliers: MultiplierTable::STANDARD,
        }
    }

    fn bangkok() -> LocationSet {
        LocationSet::new(vec![
            Location::new("Warehouse", 13.7563, 100.5018).unwrap(),
            Location::new("A", 13.7200, 100.5500).unwrap(),
            Location::new("B", 13.8000, 100.4500).unwrap(),
        ])
        .unwrap()
    }

    #[test]
    fn tour_pricing_adds_up() {
        let locations = bangkok();
        let route = build_route("Warehouse", &locations).unwrap();
        let km = route.total_km();
        let priced = assemble(route, &locations, &request(TrafficLevel::Moderate)).unwrap();

        let base_minutes = km * 1.2 + 2.0 * 15.0;
        assert_eq!(priced.base_cost(), 450.0 + km * 14.0);
        assert!((priced.estimated_minutes() - base_minutes * 1.5).abs() < 1e-9);
        assert!((priced.surcharge() - base_minutes * 0.5 * 2.0).abs() < 1e-9);
        assert_eq!(priced.final_cost(), priced.base_cost() + priced.surcharge());
    }

    #[test]
    fn waypoints_and_legs_follow_visiting_order() {
        let locations = bangkok();
        let route = build_route("Warehouse", &locations).unwrap();
        let priced = assemble(route, &locations, &request(TrafficLevel::Light)).unwrap();

        let ids: Vec<&str> = priced.waypoints().iter().map(|w| w.id.as_str()).collect();
        assert_eq!(ids, priced.route().stops().iter().map(String::as_str).collect::<Vec<_>>());
        assert_eq!(ids.first(), Some(&"Warehouse"));
        assert_eq!(ids.last(), Some(&"Warehouse"));
        assert_eq!(priced.legs().len(), 3);
        assert_eq!(priced.legs()[0].from, "Warehouse");
        assert_eq!(priced.legs()[2].to, "Warehouse");
        assert_eq!(priced.surcharge(), 0.0);
    }

    #[test]
    fn unknown_route_stop_is_not_found() {
        let locations = bangkok();
        let route = Route::closed(vec!["Warehouse".into(), "Z".into(), "Warehouse".into()], 1.0);
        assert_eq!(
            assemble(route, &locations, &request(TrafficLevel::Light)),
            Err(CostError::NotFound("Z".into()))
        );
    }

    #[test]
    fn direct_quote_uses_routing_duration() {
        let origin = Location::new("Bangkok", 13.7563, 100.5018).unwrap();
        let destination = Location::new("Chiang Mai", 18.7883, 98.9853).unwrap();
        let leg = RoadLeg {
            distance_km: 100.0,
            duration_minutes: 80.0,
        };
        let req = TripRequest {
            vehicle: VehicleClass::Heavy,
            traffic: TrafficLevel::Heavy,
            policy: PricingPolicy::Tiered,
            multipliers: MultiplierTable::POINT_TO_POINT,
        };
        let priced = assemble_direct(&origin, &destination, leg, &req).unwrap();

        assert_eq!(priced.route().stops(), ["Bangkok", "Chiang Mai"]);
        assert_eq!(priced.total_distance_km(), 100.0);
        assert_eq!(priced.base_cost(), 4480.0);
        assert_eq!(priced.estimated_minutes(), 200.0);
        assert_eq!(priced.surcharge(), 240.0);
        assert_eq!(priced.final_cost(), 4720.0);
    }

    #[test]
    fn direct_route_cannot_be_assembled_as_tour() {
        let locations = bangkok();
        let route = Route::direct("Warehouse", "A", 3.0);
        assert!(matches!(
            assemble(route, &locations, &request(TrafficLevel::Light)),
            Err(CostError::InvalidInput(_))
        ));
    }
}
