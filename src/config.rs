use std::{
    fs::read_to_string,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::Args;
use serde::Deserialize;

use crate::{
    score::{Execution, Normalization, ScoringConfig, DEFAULT_COEFF, DEFAULT_MAX_STUDY_AREA},
    table::CoordinateColumns,
};

pub const DEFAULT_OUTPUT: &str = "scores.csv";

#[derive(Debug, Args)]
pub struct ScoreArgs {
    /// Amenities table with id, lat, lon, amenity_type, amenity columns
    pub amenities: PathBuf,
    /// Centroids table with an id column and a coordinate pair
    pub centroids: PathBuf,

    /// YAML file supplying any of the options below
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Where to write scores, `-` for stdout [default: scores.csv]
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    /// Study radius around each centroid in km [default: 10]
    #[arg(long)]
    pub max_study_area: Option<f64>,
    /// Friction coefficient, 2.0 suits dense cities [default: 1.75]
    #[arg(long)]
    pub coeff: Option<f64>,
    /// Rescale distances with the normalize bounds before decay
    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    pub normalize: Option<bool>,
    #[arg(long)]
    pub normalize_min: Option<f64>,
    #[arg(long)]
    pub normalize_max: Option<f64>,
    /// Score on one thread instead of the rayon pool
    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    pub sequential: Option<bool>,
    #[arg(long)]
    pub id_column: Option<String>,
    #[arg(long)]
    pub lat_column: Option<String>,
    #[arg(long)]
    pub lon_column: Option<String>,
}

/// Options read from `--config`. Every field is optional and loses to the
/// matching command line flag.
#[derive(Debug, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub output: Option<PathBuf>,
    pub max_study_area: Option<f64>,
    pub coeff: Option<f64>,
    pub normalize: Option<bool>,
    pub normalize_min: Option<f64>,
    pub normalize_max: Option<f64>,
    pub sequential: Option<bool>,
    pub id_column: Option<String>,
    pub lat_column: Option<String>,
    pub lon_column: Option<String>,
}

impl FileConfig {
    pub fn parse(contents: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(contents)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents =
            read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
        Self::parse(&contents).with_context(|| format!("invalid config in {}", path.display()))
    }
}

#[derive(Debug)]
pub struct ScoreSettings {
    pub amenities: PathBuf,
    pub centroids: PathBuf,
    pub output: PathBuf,
    pub scoring: ScoringConfig,
    pub columns: CoordinateColumns,
}

impl ScoreSettings {
    pub fn resolve(args: ScoreArgs) -> Result<Self> {
        let file = match &args.config {
            Some(path) => FileConfig::load(path)?,
            None => FileConfig::default(),
        };
        Self::merge(args, file)
    }

    /// Command line beats file, file beats defaults.
    pub fn merge(args: ScoreArgs, file: FileConfig) -> Result<Self> {
        let normalization = if args.normalize.or(file.normalize).unwrap_or(false) {
            Normalization::bounds(
                args.normalize_min.or(file.normalize_min).unwrap_or(0.0),
                args.normalize_max.or(file.normalize_max).unwrap_or(1.0),
            )?
        } else {
            Normalization::Off
        };

        let execution = if args.sequential.or(file.sequential).unwrap_or(false) {
            Execution::Sequential
        } else {
            Execution::Parallel
        };

        let scoring = ScoringConfig::new(
            args.max_study_area
                .or(file.max_study_area)
                .unwrap_or(DEFAULT_MAX_STUDY_AREA),
            args.coeff.or(file.coeff).unwrap_or(DEFAULT_COEFF),
            normalization,
            execution,
        )?;

        let columns = CoordinateColumns {
            id: args
                .id_column
                .or(file.id_column)
                .unwrap_or_else(|| "id".to_string()),
            lat: args.lat_column.or(file.lat_column),
            lon: args.lon_column.or(file.lon_column),
        };

        Ok(Self {
            amenities: args.amenities,
            centroids: args.centroids,
            output: args
                .output
                .or(file.output)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT)),
            scoring,
            columns,
        })
    }
}
