pub mod data_generator;

pub use data_generator::{generate_random_stops, load_locations, read_locations, read_locations_from_csv};
