use serde::{Deserialize, Serialize};

use crate::ScoreError;

use super::GeoPoint;

/// A point of interest that contributes to a centroid's score.
#[derive(Clone, Debug, PartialEq)]
pub struct Amenity {
    pub id: String,
    pub point: GeoPoint,
    pub amenity_type: String,
    pub name: String,
}

/// A zone's representative location.
#[derive(Clone, Debug, PartialEq)]
pub struct Centroid {
    pub id: String,
    pub point: GeoPoint,
}

/// Row layout of an amenities table.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct AmenityRecord {
    pub id: String,
    pub lat: f64,
    pub lon: f64,
    #[serde(default)]
    pub amenity_type: String,
    #[serde(default)]
    pub amenity: String,
}

impl AmenityRecord {
    pub fn refine(self) -> Result<Amenity, ScoreError> {
        let point = GeoPoint::validate(&self.id, self.lat, self.lon)?;
        Ok(Amenity {
            id: self.id,
            point,
            amenity_type: self.amenity_type,
            name: self.amenity,
        })
    }
}

impl From<&Amenity> for AmenityRecord {
    fn from(x: &Amenity) -> Self {
        Self {
            id: x.id.clone(),
            lat: x.point.lat(),
            lon: x.point.lon(),
            amenity_type: x.amenity_type.clone(),
            amenity: x.name.clone(),
        }
    }
}
