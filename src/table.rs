use std::{
    fs::File,
    io::{Read, Write},
    path::Path,
};

use anyhow::{Context, Result};
use csv::StringRecord;
use log::error;

use crate::{Amenity, AmenityRecord, Centroid, GeoPoint, ScoreError, ScoreResult};

const AMENITY_COLUMNS: [&str; 3] = ["id", "lat", "lon"];
const LAT_ALIASES: [&str; 3] = ["lat", "latitude", "ycoor"];
const LON_ALIASES: [&str; 4] = ["lon", "lng", "longitude", "xcoor"];

/// Header names to read a centroid table with. `None` means pick the first
/// header matching a known alias.
#[derive(Clone, Debug)]
pub struct CoordinateColumns {
    pub id: String,
    pub lat: Option<String>,
    pub lon: Option<String>,
}

impl Default for CoordinateColumns {
    fn default() -> Self {
        Self {
            id: "id".to_string(),
            lat: None,
            lon: None,
        }
    }
}

impl CoordinateColumns {
    fn resolve(&self, source_name: &str, headers: &StringRecord) -> Result<(usize, usize, usize)> {
        let find = |names: &[&str], column: &str| {
            position(headers, names).ok_or_else(|| missing(source_name, column))
        };

        let id = find(&[self.id.as_str()], &self.id)?;
        let lat = match &self.lat {
            Some(x) => find(&[x.as_str()], x)?,
            None => find(&LAT_ALIASES, "lat")?,
        };
        let lon = match &self.lon {
            Some(x) => find(&[x.as_str()], x)?,
            None => find(&LON_ALIASES, "lon")?,
        };
        Ok((id, lat, lon))
    }
}

fn position(headers: &StringRecord, names: &[&str]) -> Option<usize> {
    names.iter().find_map(|name| {
        headers
            .iter()
            .position(|x| x.trim().eq_ignore_ascii_case(name))
    })
}

fn missing(source_name: &str, column: &str) -> ScoreError {
    ScoreError::MissingColumn {
        source_name: source_name.to_string(),
        column: column.to_string(),
    }
}

/// Logs every invalid record and returns the first failure, so a bad input
/// set is reported in full before the run stops.
fn collect_valid<T>(source_name: &str, items: Vec<Result<T, ScoreError>>) -> Result<Vec<T>> {
    let mut output = Vec::with_capacity(items.len());
    let mut first = None;
    for item in items {
        match item {
            Ok(x) => output.push(x),
            Err(e) => {
                error!("{source_name}: {e}");
                first.get_or_insert(e);
            }
        }
    }

    match first {
        Some(e) => Err(e).with_context(|| format!("{source_name} has invalid records")),
        None => Ok(output),
    }
}

pub fn read_amenity_records<R: Read>(reader: R, source_name: &str) -> Result<Vec<AmenityRecord>> {
    let mut reader = csv::Reader::from_reader(reader);
    // serde matches rows by exact header text
    let headers: StringRecord = reader
        .headers()?
        .iter()
        .map(|x| x.trim().to_ascii_lowercase())
        .collect();
    for column in AMENITY_COLUMNS {
        if position(&headers, &[column]).is_none() {
            return Err(missing(source_name, column).into());
        }
    }
    reader.set_headers(headers);

    let mut records = Vec::new();
    for (row, x) in reader.deserialize().enumerate() {
        let record: AmenityRecord =
            x.with_context(|| format!("{source_name}: failed to parse row {}", row + 1))?;
        records.push(record);
    }
    Ok(records)
}

pub fn read_amenities<R: Read>(reader: R, source_name: &str) -> Result<Vec<Amenity>> {
    let records = read_amenity_records(reader, source_name)?;
    collect_valid(
        source_name,
        records.into_iter().map(AmenityRecord::refine).collect(),
    )
}

pub fn load_amenities(path: &Path) -> Result<Vec<Amenity>> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    read_amenities(file, &path.display().to_string())
}

pub fn read_centroids<R: Read>(
    reader: R,
    source_name: &str,
    columns: &CoordinateColumns,
) -> Result<Vec<Centroid>> {
    let mut reader = csv::Reader::from_reader(reader);
    let headers = reader.headers()?.clone();
    let (id_idx, lat_idx, lon_idx) = columns.resolve(source_name, &headers)?;

    let mut items = Vec::new();
    for (row, x) in reader.records().enumerate() {
        let x = x.with_context(|| format!("{source_name}: failed to read row {}", row + 1))?;
        let id = x.get(id_idx).unwrap_or_default().to_string();
        let lat = parse_coordinate(&x, lat_idx)
            .with_context(|| format!("{source_name}: bad latitude for centroid {id}"))?;
        let lon = parse_coordinate(&x, lon_idx)
            .with_context(|| format!("{source_name}: bad longitude for centroid {id}"))?;

        items.push(GeoPoint::validate(&id, lat, lon).map(|point| Centroid { id, point }));
    }

    collect_valid(source_name, items)
}

fn parse_coordinate(record: &StringRecord, idx: usize) -> Result<f64> {
    let raw = record.get(idx).unwrap_or_default().trim();
    raw.parse().with_context(|| format!("`{raw}` is not a number"))
}

pub fn load_centroids(path: &Path, columns: &CoordinateColumns) -> Result<Vec<Centroid>> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    read_centroids(file, &path.display().to_string(), columns)
}

pub fn write_amenity_records<W: Write>(writer: W, records: &[AmenityRecord]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(writer);
    for x in records {
        writer.serialize(x)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_amenities<W: Write>(writer: W, amenities: &[Amenity]) -> Result<()> {
    let records: Vec<_> = amenities.iter().map(AmenityRecord::from).collect();
    write_amenity_records(writer, &records)
}

pub fn write_scores<W: Write>(writer: W, results: &[ScoreResult]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(writer);
    for x in results {
        writer.serialize(x)?;
    }
    writer.flush()?;
    Ok(())
}
