//! Delivery cost estimation for a single vehicle leaving from and returning to
//! a depot: nearest-neighbour visiting order over geographic coordinates, then
//! distance-based pricing with a traffic surcharge.

pub mod config;
pub mod database;
pub mod distance;
pub mod domain;
pub mod error;
pub mod evaluation;
pub mod fixtures;
pub mod runner;
pub mod solver;
pub mod trip;
pub mod utils;

pub use error::{CostError, Result};
