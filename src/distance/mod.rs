pub mod geo;
pub mod providers;

pub use geo::{distance, haversine_km};
