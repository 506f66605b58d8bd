pub mod nominatim;
pub mod osrm;

pub use nominatim::Geocoder;
pub use osrm::{OsrmClient, RoadLeg};

const PREVIEW_CHARS: usize = 200;

/// Leading characters of a response body for log lines. Cuts on a char boundary.
pub(crate) fn body_preview(text: &str) -> String {
    text.chars().take(PREVIEW_CHARS).collect()
}
