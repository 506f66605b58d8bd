pub mod nearest_neighbor;

pub use nearest_neighbor::{build_route, NearestNeighbor};

use crate::domain::types::{LocationSet, Route};
use crate::error::Result;

/// Tour construction policy. Pricing and surcharge logic only consume the
/// resulting [`Route`], so alternative heuristics plug in here.
pub trait RouteStrategy {
    fn name(&self) -> &'static str;

    /// Builds a closed tour starting and ending at `depot_id` that visits every
    /// other location exactly once.
    fn build(&self, depot_id: &str, locations: &LocationSet) -> Result<Route>;
}
