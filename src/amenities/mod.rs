use std::path::PathBuf;

use anyhow::Result;
use log::{debug, info, warn};
use ureq::Agent;

use crate::{table, Amenity, AmenityRecord, GeoPoint, ScoreError};

use self::overpass::OsmElement;

pub mod merge;
pub mod overpass;

/// Anything that can hand the scorer a complete list of amenities.
pub trait AmenitySource {
    fn amenities(&self) -> Result<Vec<Amenity>>;
}

/// An amenities table on disk.
pub struct AmenityCsv(pub PathBuf);

impl AmenitySource for AmenityCsv {
    fn amenities(&self) -> Result<Vec<Amenity>> {
        table::load_amenities(&self.0)
    }
}

/// Named amenities of one type around a point, fetched from Overpass.
pub struct Overpass {
    pub agent: Agent,
    pub amenity_type: String,
    pub center: GeoPoint,
    /// metres
    pub radius: u32,
}

impl AmenitySource for Overpass {
    fn amenities(&self) -> Result<Vec<Amenity>> {
        overpass::parse_amenity_type(&self.amenity_type)?;
        info!(
            "Downloading {} amenities within {}m of ({}, {}) via Overpass...",
            self.amenity_type,
            self.radius,
            self.center.lat(),
            self.center.lon()
        );
        let q = overpass::amenity_query(&self.amenity_type, self.center, self.radius);
        let elements = overpass::query(&self.agent, &q)?;
        info!("{} elements found", elements.len());

        let mut output = Vec::new();
        for elem in elements {
            if let Some(x) = to_amenity(elem, &self.amenity_type)? {
                output.push(x);
            }
        }
        info!("{} named {} amenities kept", output.len(), self.amenity_type);
        Ok(output)
    }
}

fn is_blank(text: &str) -> bool {
    text.chars().all(char::is_whitespace)
}

/// Turns an Overpass element into an amenity. Unnamed elements and elements
/// without coordinates yield `None`.
pub fn to_amenity(elem: OsmElement, amenity_type: &str) -> Result<Option<Amenity>, ScoreError> {
    let name = match elem.tags.get("name") {
        Some(x) if !is_blank(x) => x.clone(),
        _ => {
            debug!("{:?} has no name, skipping", elem.id);
            return Ok(None);
        }
    };

    let Some((lat, lon)) = elem.position else {
        warn!("{:?} has no coordinates, skipping", elem.id);
        return Ok(None);
    };

    let amenity_type = elem
        .tags
        .get("amenity")
        .cloned()
        .unwrap_or_else(|| amenity_type.to_string());

    let record = AmenityRecord {
        id: elem.id.raw().to_string(),
        lat,
        lon,
        amenity_type,
        amenity: name,
    };
    record.refine().map(Some)
}
