pub mod abc;
pub mod surcharge;
pub mod tiered;

pub use abc::{abc_breakdown, abc_price, AbcBreakdown, AbcCoefficients};
pub use surcharge::{estimate_base_minutes, surcharge, MultiplierTable};
pub use tiered::{tiered_price, TierRates};

use crate::domain::types::VehicleClass;
use crate::error::{CostError, Result};

/// Deployment-selected pricing policy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PricingPolicy {
    Tiered,
    ActivityBased { fuel_price_per_liter: f64 },
}

impl PricingPolicy {
    pub fn name(&self) -> &'static str {
        match self {
            PricingPolicy::Tiered => "tiered",
            PricingPolicy::ActivityBased { .. } => "activity-based",
        }
    }

    /// Base cost in baht for a trip of `total_km`.
    pub fn price(&self, total_km: f64, class: VehicleClass) -> Result<f64> {
        match *self {
            PricingPolicy::Tiered => tiered_price(total_km, class),
            PricingPolicy::ActivityBased {
                fuel_price_per_liter,
            } => abc_price(total_km, class, fuel_price_per_liter),
        }
    }
}

pub(crate) fn ensure_distance(total_km: f64) -> Result<()> {
    if total_km.is_finite() && total_km >= 0.0 {
        Ok(())
    } else {
        Err(CostError::InvalidInput(format!(
            "distance must be a non-negative number of km, got {total_km}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn policy_dispatches() {
        assert_eq!(
            PricingPolicy::Tiered.price(10.0, VehicleClass::Light).unwrap(),
            590.0
        );
        let abc = PricingPolicy::ActivityBased {
            fuel_price_per_liter: 30.0,
        };
        assert_eq!(abc.price(120.0, VehicleClass::Light).unwrap(), 1070.0);
        assert_eq!(abc.name(), "activity-based");
    }
}
