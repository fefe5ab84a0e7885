mod amenity;
mod osm;
mod point;
mod score;

pub use amenity::{Amenity, AmenityRecord, Centroid};
pub use osm::OsmId;
pub use point::GeoPoint;
pub use score::ScoreResult;
