//! Activity-based costing: fixed daily costs (wages, depreciation) plus
//! distance-driven variable costs (fuel, maintenance).

use tracing::trace;

use crate::domain::types::VehicleClass;
use crate::error::{CostError, Result};

use super::ensure_distance;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AbcCoefficients {
    pub driver_wage: f64,
    pub helper_wage: f64,
    pub vehicle_depreciation: f64,
    pub fuel_efficiency_km_per_liter: f64,
    pub maintenance_per_km: f64,
}

pub const LIGHT_ABC: AbcCoefficients = AbcCoefficients {
    driver_wage: 500.0,
    helper_wage: 0.0,
    vehicle_depreciation: 150.0,
    fuel_efficiency_km_per_liter: 12.0,
    maintenance_per_km: 1.0,
};

pub const HEAVY_ABC: AbcCoefficients = AbcCoefficients {
    driver_wage: 600.0,
    helper_wage: 350.0,
    vehicle_depreciation: 300.0,
    fuel_efficiency_km_per_liter: 7.0,
    maintenance_per_km: 2.5,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AbcBreakdown {
    pub fixed: f64,
    pub fuel: f64,
    pub maintenance: f64,
}

impl AbcBreakdown {
    pub fn total(&self) -> f64 {
        self.fixed + self.fuel + self.maintenance
    }
}

impl AbcCoefficients {
    pub fn for_class(class: VehicleClass) -> Self {
        match class {
            VehicleClass::Light => LIGHT_ABC,
            VehicleClass::Heavy => HEAVY_ABC,
        }
    }

    pub fn fixed_cost(&self) -> f64 {
        self.driver_wage + self.helper_wage + self.vehicle_depreciation
    }

    pub fn breakdown(&self, total_km: f64, fuel_price_per_liter: f64) -> AbcBreakdown {
        AbcBreakdown {
            fixed: self.fixed_cost(),
            fuel: (total_km / self.fuel_efficiency_km_per_liter) * fuel_price_per_liter,
            maintenance: total_km * self.maintenance_per_km,
        }
    }
}

pub fn abc_breakdown(
    total_km: f64,
    class: VehicleClass,
    fuel_price_per_liter: f64,
) -> Result<AbcBreakdown> {
    ensure_distance(total_km)?;
    if !fuel_price_per_liter.is_finite() || fuel_price_per_liter < 0.0 {
        return Err(CostError::InvalidInput(format!(
            "fuel price must be a non-negative number, got {fuel_price_per_liter}"
        )));
    }
    let breakdown = AbcCoefficients::for_class(class).breakdown(total_km, fuel_price_per_liter);
    trace!("abc breakdown for {:.2} km ({:?}): {:?}", total_km, class, breakdown);
    Ok(breakdown)
}

/// Activity-based price in baht. `fuel_price_per_liter` changes daily and is
/// always supplied by the caller.
pub fn abc_price(total_km: f64, class: VehicleClass, fuel_price_per_liter: f64) -> Result<f64> {
    abc_breakdown(total_km, class, fuel_price_per_liter).map(|b| b.total())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_costs_are_sums_of_named_parts() {
        assert_eq!(LIGHT_ABC.fixed_cost(), 650.0);
        assert_eq!(HEAVY_ABC.fixed_cost(), 1250.0);
    }

    #[test]
    fn light_price() {
        // 650 + (120 / 12) * 30 + 120 * 1
        assert_eq!(abc_price(120.0, VehicleClass::Light, 30.0).unwrap(), 1070.0);
    }

    #[test]
    fn heavy_breakdown() {
        let b = abc_breakdown(70.0, VehicleClass::Heavy, 35.0).unwrap();
        assert_eq!(b.fixed, 1250.0);
        assert_eq!(b.fuel, 350.0);
        assert_eq!(b.maintenance, 175.0);
        assert_eq!(b.total(), 1775.0);
    }

    #[test]
    fn zero_distance_costs_only_fixed() {
        assert_eq!(abc_price(0.0, VehicleClass::Heavy, 40.0).unwrap(), 1250.0);
    }

    #[test]
    fn rejects_bad_inputs() {
        assert!(abc_price(-1.0, VehicleClass::Light, 30.0).is_err());
        assert!(abc_price(10.0, VehicleClass::Light, -30.0).is_err());
        assert!(abc_price(10.0, VehicleClass::Light, f64::INFINITY).is_err());
    }
}
