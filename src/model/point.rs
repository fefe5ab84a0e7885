use geo::{HaversineDistance, Point};

use crate::ScoreError;

/// A validated WGS84 coordinate in decimal degrees.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GeoPoint {
    lat: f64,
    lon: f64,
}

impl GeoPoint {
    /// Checks both coordinates against their ranges. `id` names the record
    /// the coordinate came from so a failure can be traced back to the input.
    pub fn validate(id: &str, lat: f64, lon: f64) -> Result<Self, ScoreError> {
        if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return Err(ScoreError::InvalidLatitude {
                id: id.to_string(),
                value: lat,
            });
        }
        if !lon.is_finite() || !(-180.0..=180.0).contains(&lon) {
            return Err(ScoreError::InvalidLongitude {
                id: id.to_string(),
                value: lon,
            });
        }

        Ok(Self { lat, lon })
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn lon(&self) -> f64 {
        self.lon
    }

    /// geo stores x as longitude and y as latitude.
    pub fn point(&self) -> Point {
        Point::new(self.lon, self.lat)
    }

    /// Great-circle distance in kilometres on the mean-radius sphere.
    pub fn distance_km(&self, other: &GeoPoint) -> f64 {
        self.point().haversine_distance(&other.point()) / 1000.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_ranges() {
        assert!(GeoPoint::validate("a", 90.0, 180.0).is_ok());
        assert!(GeoPoint::validate("a", -90.0, -180.0).is_ok());
        assert_eq!(
            GeoPoint::validate("a", 90.5, 0.0),
            Err(ScoreError::InvalidLatitude {
                id: "a".to_string(),
                value: 90.5
            })
        );
        assert_eq!(
            GeoPoint::validate("b", 0.0, -181.0),
            Err(ScoreError::InvalidLongitude {
                id: "b".to_string(),
                value: -181.0
            })
        );
        assert!(GeoPoint::validate("c", f64::NAN, 0.0).is_err());
    }

    #[test]
    fn distance_is_symmetric() {
        let a = GeoPoint::validate("a", 14.65, 121.03).unwrap();
        let b = GeoPoint::validate("b", 14.67, 121.05).unwrap();

        assert_eq!(a.distance_km(&b), b.distance_km(&a));
        assert_eq!(a.distance_km(&a), 0.0);
        assert!((a.distance_km(&b) - 3.0943).abs() < 1e-3);
    }

    #[test]
    fn distance_along_equator() {
        let origin = GeoPoint::validate("o", 0.0, 0.0).unwrap();
        let east = GeoPoint::validate("e", 0.0, 1.0).unwrap();

        // one degree of arc on a 6371.0088 km sphere
        assert!((origin.distance_km(&east) - 111.1951).abs() < 1e-3);
    }
}
