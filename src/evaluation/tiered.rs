use tracing::trace;

use crate::domain::types::VehicleClass;
use crate::error::Result;

use super::ensure_distance;

/// Flat call-out fee plus a per-km rate that drops past a threshold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TierRates {
    pub base: f64,
    pub threshold_km: f64,
    pub rate_below: f64,
    pub rate_above: f64,
}

pub const LIGHT_TIER: TierRates = TierRates {
    base: 450.0,
    threshold_km: 40.0,
    rate_below: 14.0,
    rate_above: 10.0,
};

pub const HEAVY_TIER: TierRates = TierRates {
    base: 1800.0,
    threshold_km: 80.0,
    rate_below: 28.0,
    rate_above: 22.0,
};

impl TierRates {
    pub fn for_class(class: VehicleClass) -> Self {
        match class {
            VehicleClass::Light => LIGHT_TIER,
            VehicleClass::Heavy => HEAVY_TIER,
        }
    }

    pub fn price(&self, total_km: f64) -> f64 {
        if total_km <= self.threshold_km {
            self.base + total_km * self.rate_below
        } else {
            self.base
                + self.threshold_km * self.rate_below
                + (total_km - self.threshold_km) * self.rate_above
        }
    }
}

/// Tiered per-km price in baht.
pub fn tiered_price(total_km: f64, class: VehicleClass) -> Result<f64> {
    ensure_distance(total_km)?;
    let price = TierRates::for_class(class).price(total_km);
    trace!("tiered price for {:.2} km ({:?}): {:.2}", total_km, class, price);
    Ok(price)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CostError;

    #[test]
    fn continuous_at_threshold() {
        for class in [VehicleClass::Light, VehicleClass::Heavy] {
            let r = TierRates::for_class(class);
            let below = r.base + r.threshold_km * r.rate_below;
            let above = r.base
                + r.threshold_km * r.rate_below
                + (r.threshold_km - r.threshold_km) * r.rate_above;
            assert_eq!(below, above);
            assert_eq!(tiered_price(r.threshold_km, class).unwrap(), below);
        }
        assert_eq!(tiered_price(40.0, VehicleClass::Light).unwrap(), 450.0 + 40.0 * 14.0);
    }

    #[test]
    fn light_pricing_on_both_sides() {
        assert_eq!(tiered_price(0.0, VehicleClass::Light).unwrap(), 450.0);
        assert_eq!(tiered_price(10.0, VehicleClass::Light).unwrap(), 590.0);
        // 450 + 560 + 20 * 10
        assert_eq!(tiered_price(60.0, VehicleClass::Light).unwrap(), 1210.0);
    }

    #[test]
    fn heavy_pricing_on_both_sides() {
        assert_eq!(tiered_price(50.0, VehicleClass::Heavy).unwrap(), 3200.0);
        // 1800 + 2240 + 20 * 22
        assert_eq!(tiered_price(100.0, VehicleClass::Heavy).unwrap(), 4480.0);
    }

    #[test]
    fn negative_distance_is_invalid() {
        assert!(matches!(
            tiered_price(-0.1, VehicleClass::Light),
            Err(CostError::InvalidInput(_))
        ));
        assert!(tiered_price(f64::NAN, VehicleClass::Heavy).is_err());
    }
}
