use colored::*;

use crate::domain::types::PricedRoute;
use crate::utils::{format_baht, route_description};

impl PricedRoute {
    /// Numbered, human-readable stop list with per-leg distances.
    pub fn stop_list(&self) -> Vec<String> {
        let mut lines = Vec::with_capacity(self.legs.len() + 1);
        if let Some(first) = self.waypoints.first() {
            lines.push(format!("0. {} (start)", first.id));
        }
        for (idx, leg) in self.legs.iter().enumerate() {
            lines.push(format!("{}. {} (+{:.2} km)", idx + 1, leg.to, leg.km));
        }
        lines
    }

    /// Google Maps directions link through every waypoint in visiting order.
    pub fn directions_url(&self) -> String {
        let path = self
            .waypoints
            .iter()
            .map(|w| format!("{},{}", w.latitude, w.longitude))
            .collect::<Vec<_>>()
            .join("/");
        format!("https://www.google.com/maps/dir/{path}")
    }
}

pub fn print_report(priced: &PricedRoute, old_cost: f64) {
    let saving = old_cost - priced.final_cost();

    println!("{}", "Delivery cost estimate".bold());
    println!("Vehicle:   {}", priced.vehicle());
    println!("Traffic:   {}", priced.traffic());
    println!("Route:     {}", route_description(priced.route().stops()));
    println!("Distance:  {:.2} km", priced.total_distance_km());
    println!("Time:      {:.0} min", priced.estimated_minutes());
    println!("Base cost: {} THB", format_baht(priced.base_cost()));
    println!("Surcharge: {} THB", format_baht(priced.surcharge()));
    println!(
        "{}",
        format!("Total:     {} THB", format_baht(priced.final_cost())).green()
    );
    if saving >= 0.0 {
        println!("Saving:    {}", format!("{} THB", format_baht(saving)).green());
    } else {
        println!("Saving:    {}", format!("{} THB", format_baht(saving)).red());
    }

    println!();
    for line in priced.stop_list() {
        println!("  {line}");
    }
    println!("\n{}", priced.directions_url().underline());
}
