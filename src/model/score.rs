use serde::{Deserialize, Serialize};

/// Derived fields for one centroid, in output column order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub id: String,
    pub lat: f64,
    pub lon: f64,
    pub num_amenities: usize,
    pub ave_amenity_distance: f64,
    pub accessibility_score: f64,
}
