use std::{fs::File, path::Path};

use anyhow::{Context, Result};
use itertools::Itertools;
use log::info;

use crate::{table, AmenityRecord};

/// Concatenates amenity tables in the given order. With `dedup`, only the
/// first row for each `(id, amenity_type)` pair is kept.
pub fn merge<P: AsRef<Path>>(files: &[P], dedup: bool) -> Result<Vec<AmenityRecord>> {
    let mut records = Vec::new();
    for path in files {
        let path = path.as_ref();
        let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
        let before = records.len();
        records.extend(table::read_amenity_records(file, &path.display().to_string())?);
        info!("{}: {} amenities", path.display(), records.len() - before);
    }

    if dedup {
        let total = records.len();
        records = records
            .into_iter()
            .unique_by(|x| (x.id.clone(), x.amenity_type.clone()))
            .collect();
        info!("Dropped {} duplicate rows", total - records.len());
    }

    Ok(records)
}

/// Splits a comma separated file list, ignoring empty entries.
pub fn split_files(list: &str) -> Vec<&str> {
    list.split(',').map(str::trim).filter(|x| !x.is_empty()).collect()
}
