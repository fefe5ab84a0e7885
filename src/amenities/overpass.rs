use std::collections::BTreeMap;

use anyhow::{Context, Result};
use serde::Deserialize;
use ureq::Agent;

use crate::{GeoPoint, OsmId, ScoreError};

pub const OVERPASS_URL: &str = "https://overpass-api.de/api/interpreter";

/// Accepts OSM amenity tag values such as `hospital` or `fire_station`.
/// Anything else would need quoting in the query and in file names.
pub fn parse_amenity_type(value: &str) -> Result<String, ScoreError> {
    let valid = !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');
    if valid {
        Ok(value.to_string())
    } else {
        Err(ScoreError::InvalidAmenityType(value.to_string()))
    }
}

/// Nodes, ways and relations tagged `amenity=<amenity_type>` within `radius`
/// metres of `center`, with ways and relations reduced to their centre.
pub fn amenity_query(amenity_type: &str, center: GeoPoint, radius: u32) -> String {
    let around = format!("(around:{radius},{},{})", center.lat(), center.lon());
    format!(
        r#"
            (
                node["amenity"="{amenity_type}"]{around};
                way["amenity"="{amenity_type}"]{around};
                rel["amenity"="{amenity_type}"]{around};
            );
            out center;
        "#
    )
}

pub fn query(agent: &Agent, q: &str) -> Result<Vec<OsmElement>> {
    let payload = format!("[out:json]; {q}");
    let response: OverpassResponse = agent
        .post(OVERPASS_URL)
        .send_form(&[("data", &payload)])
        .with_context(|| format!("Overpass request to {OVERPASS_URL} failed"))?
        .into_json()
        .context("Overpass returned an unreadable response")?;

    Ok(response.simplify())
}

#[derive(Deserialize)]
pub struct OverpassResponse {
    elements: Vec<RawElement>,
}

impl OverpassResponse {
    pub fn simplify(self) -> Vec<OsmElement> {
        self.elements.into_iter().map(|x| x.simplify()).collect()
    }
}

#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
enum RawElement {
    Node {
        id: u64,
        lat: Option<f64>,
        lon: Option<f64>,
        #[serde(default)]
        tags: BTreeMap<String, String>,
    },
    Way {
        id: u64,
        center: Option<RawPosition>,
        #[serde(default)]
        tags: BTreeMap<String, String>,
    },
    Relation {
        id: u64,
        center: Option<RawPosition>,
        #[serde(default)]
        tags: BTreeMap<String, String>,
    },
}

impl RawElement {
    fn simplify(self) -> OsmElement {
        match self {
            Self::Node { id, lat, lon, tags } => OsmElement {
                id: OsmId::Node(id),
                position: lat.zip(lon),
                tags,
            },
            Self::Way { id, center, tags } => OsmElement {
                id: OsmId::Way(id),
                position: center.map(|x| x.simplify()),
                tags,
            },
            Self::Relation { id, center, tags } => OsmElement {
                id: OsmId::Relation(id),
                position: center.map(|x| x.simplify()),
                tags,
            },
        }
    }
}

#[derive(Deserialize)]
struct RawPosition {
    lat: f64,
    lon: f64,
}

impl RawPosition {
    fn simplify(self) -> (f64, f64) {
        (self.lat, self.lon)
    }
}

/// An OSM feature as returned by `out center`, with `(lat, lon)` when the
/// response carried one.
#[derive(Debug)]
pub struct OsmElement {
    pub id: OsmId,
    pub position: Option<(f64, f64)>,
    pub tags: BTreeMap<String, String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_text() {
        let center = GeoPoint::validate("qc", 14.673671, 121.045322).unwrap();
        let q = amenity_query("hospital", center, 10000);
        assert!(q.contains(r#"node["amenity"="hospital"](around:10000,14.673671,121.045322);"#));
        assert!(q.contains(r#"way["amenity"="hospital"](around:10000,14.673671,121.045322);"#));
        assert!(q.contains(r#"rel["amenity"="hospital"](around:10000,14.673671,121.045322);"#));
        assert!(q.trim_end().ends_with("out center;"));
    }

    #[test]
    fn amenity_type_values() {
        assert_eq!(parse_amenity_type("hospital"), Ok("hospital".to_string()));
        assert_eq!(
            parse_amenity_type("fire_station"),
            Ok("fire_station".to_string())
        );
        for bad in ["", "school\"]", "../etc/passwd", "a/b", "Hospital", "bus station"] {
            assert_eq!(
                parse_amenity_type(bad),
                Err(ScoreError::InvalidAmenityType(bad.to_string()))
            );
        }
    }

    #[test]
    fn simplify_elements() {
        let response: OverpassResponse = serde_json::from_str(
            r#"{
                "version": 0.6,
                "elements": [
                    {"type": "node", "id": 1, "lat": 14.6, "lon": 121.0,
                     "tags": {"amenity": "hospital", "name": "A"}},
                    {"type": "way", "id": 2, "center": {"lat": 14.7, "lon": 121.1},
                     "nodes": [5, 6, 7], "tags": {"amenity": "hospital"}},
                    {"type": "relation", "id": 3, "members": []}
                ]
            }"#,
        )
        .unwrap();

        let elements = response.simplify();
        assert_eq!(elements.len(), 3);
        assert_eq!(elements[0].id, OsmId::Node(1));
        assert_eq!(elements[0].position, Some((14.6, 121.0)));
        assert_eq!(elements[0].tags["name"], "A");
        assert_eq!(elements[1].id, OsmId::Way(2));
        assert_eq!(elements[1].position, Some((14.7, 121.1)));
        assert_eq!(elements[2].id, OsmId::Relation(3));
        assert_eq!(elements[2].position, None);
        assert!(elements[2].tags.is_empty());
    }
}
