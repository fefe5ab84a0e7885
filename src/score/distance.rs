use crate::{Amenity, Centroid};

/// Distances in kilometres from `centroid` to each amenity no further than
/// `max_study_area`, in amenity order.
pub fn distances_within(
    centroid: &Centroid,
    amenities: &[Amenity],
    max_study_area: f64,
) -> Vec<f64> {
    amenities
        .iter()
        .map(|x| centroid.point.distance_km(&x.point))
        .filter(|d| *d <= max_study_area)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GeoPoint;

    fn amenity(id: &str, lat: f64, lon: f64) -> Amenity {
        Amenity {
            id: id.to_string(),
            point: GeoPoint::validate(id, lat, lon).unwrap(),
            amenity_type: "hospital".to_string(),
            name: id.to_string(),
        }
    }

    #[test]
    fn keeps_only_amenities_inside_radius() {
        let centroid = Centroid {
            id: "c".to_string(),
            point: GeoPoint::validate("c", 0.0, 0.0).unwrap(),
        };
        // ~2.0 km and ~8.0 km east along the equator
        let amenities = vec![amenity("near", 0.0, 0.018), amenity("far", 0.0, 0.072)];

        let kept = distances_within(&centroid, &amenities, 5.0);
        assert_eq!(kept.len(), 1);
        assert!((kept[0] - 2.0015).abs() < 1e-3);

        let kept = distances_within(&centroid, &amenities, 10.0);
        assert_eq!(kept.len(), 2);
        assert!(kept[0] < kept[1]);
    }

    #[test]
    fn radius_is_inclusive() {
        let centroid = Centroid {
            id: "c".to_string(),
            point: GeoPoint::validate("c", 14.67, 121.05).unwrap(),
        };
        let amenities = vec![amenity("h", 14.65, 121.03)];
        let exact = centroid.point.distance_km(&amenities[0].point);

        assert_eq!(distances_within(&centroid, &amenities, exact), vec![exact]);
        assert!(distances_within(&centroid, &amenities, exact - 1e-9).is_empty());
    }
}
