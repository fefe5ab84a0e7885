//! Gravity-model accessibility scoring for zone centroids against amenity
//! locations, plus the table and Overpass adapters that feed it.

pub mod amenities;
pub mod config;
pub mod score;
pub mod table;
pub mod utils;

mod error;
mod model;

pub use error::ScoreError;
pub use model::{Amenity, AmenityRecord, Centroid, GeoPoint, OsmId, ScoreResult};
