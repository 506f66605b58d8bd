use std::error::Error;
use std::io::Read;

use csv::ReaderBuilder;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, warn};

use crate::config::constant::{DEFAULT_DEPOT, RANDOM_STOP_COUNT, RANDOM_STOP_RADIUS_KM, SEED};
use crate::domain::types::Location;

const KM_PER_DEGREE: f64 = 111.0;

/// Reads `Location,Latitude,Longitude` rows from an uploaded CSV file.
pub fn read_locations_from_csv(csv_path: &str) -> Result<Vec<Location>, Box<dyn Error>> {
    let file = std::fs::File::open(csv_path)?;
    let locations = read_locations(file)?;
    info!("Loaded {} locations from {}", locations.len(), csv_path);
    Ok(locations)
}

pub fn read_locations<R: Read>(source: R) -> Result<Vec<Location>, Box<dyn Error>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(source);

    let mut locations = Vec::new();
    for (idx, row) in reader.deserialize::<Location>().enumerate() {
        let location = row.map_err(|e| format!("row {}: {}", idx + 1, e))?;
        debug!("row {}: {:?}", idx + 1, location);
        locations.push(location);
    }

    if locations.is_empty() {
        warn!("Location CSV contained no rows");
    }
    Ok(locations)
}

/// Seeded random stops scattered around `depot`, depot first.
pub fn generate_random_stops(depot: &Location, count: usize, radius_km: f64, seed: u64) -> Vec<Location> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let spread = radius_km / KM_PER_DEGREE;

    let mut locations = Vec::with_capacity(count + 1);
    locations.push(depot.clone());
    for n in 1..=count {
        let latitude = (depot.latitude + rng.gen_range(-spread..spread)).clamp(-90.0, 90.0);
        let longitude = (depot.longitude + rng.gen_range(-spread..spread)).clamp(-180.0, 180.0);
        locations.push(Location {
            id: format!("Stop-{n:02}"),
            latitude,
            longitude,
        });
    }
    locations
}

/// Loads the CSV, falling back to a seeded demo stop set when it cannot be read.
pub fn load_locations(csv_path: &str) -> Vec<Location> {
    match read_locations_from_csv(csv_path) {
        Ok(list) => list,
        Err(err) => {
            warn!(
                "Failed to read location CSV at {}: {}. Falling back to random generation.",
                csv_path, err
            );
            let (id, latitude, longitude) = DEFAULT_DEPOT;
            let depot = Location {
                id: id.to_string(),
                latitude,
                longitude,
            };
            generate_random_stops(&depot, RANDOM_STOP_COUNT, RANDOM_STOP_RADIUS_KM, SEED)
        }
    }
}
