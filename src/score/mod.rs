use indicatif::{ParallelProgressIterator, ProgressBar, ProgressIterator};
use rayon::prelude::*;
use typed_floats::tf64::StrictlyPositiveFinite;

use crate::{Amenity, Centroid, ScoreError, ScoreResult};

mod distance;
mod gravity;

pub use distance::distances_within;
pub use gravity::{hansen_score, Normalization, MIN_DISTANCE_KM};

pub const DEFAULT_MAX_STUDY_AREA: f64 = 10.0;
pub const DEFAULT_COEFF: f64 = 1.75;

/// Whether centroids are scored on the current thread or across the rayon
/// pool. Both produce results in centroid order.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Execution {
    Sequential,
    #[default]
    Parallel,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ScoringConfig {
    max_study_area: StrictlyPositiveFinite,
    coeff: StrictlyPositiveFinite,
    pub normalization: Normalization,
    pub execution: Execution,
}

impl ScoringConfig {
    pub fn new(
        max_study_area: f64,
        coeff: f64,
        normalization: Normalization,
        execution: Execution,
    ) -> Result<Self, ScoreError> {
        let max_study_area = StrictlyPositiveFinite::new(max_study_area)
            .map_err(|_| ScoreError::InvalidStudyArea(max_study_area))?;
        let coeff =
            StrictlyPositiveFinite::new(coeff).map_err(|_| ScoreError::InvalidCoefficient(coeff))?;
        normalization.check()?;

        Ok(Self {
            max_study_area,
            coeff,
            normalization,
            execution,
        })
    }

    /// Study radius in kilometres.
    pub fn max_study_area(&self) -> f64 {
        self.max_study_area.get()
    }

    pub fn coeff(&self) -> f64 {
        self.coeff.get()
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self::new(
            DEFAULT_MAX_STUDY_AREA,
            DEFAULT_COEFF,
            Normalization::default(),
            Execution::default(),
        )
        .expect("hardcoded")
    }
}

pub fn score_centroid(
    centroid: &Centroid,
    amenities: &[Amenity],
    config: &ScoringConfig,
) -> ScoreResult {
    let distances = distances_within(centroid, amenities, config.max_study_area());

    let ave_amenity_distance = if distances.is_empty() {
        0.0
    } else {
        distances.iter().sum::<f64>() / distances.len() as f64
    };

    ScoreResult {
        id: centroid.id.clone(),
        lat: centroid.point.lat(),
        lon: centroid.point.lon(),
        num_amenities: distances.len(),
        ave_amenity_distance,
        accessibility_score: hansen_score(&distances, config.coeff(), config.normalization),
    }
}

pub fn score_centroids(
    centroids: &[Centroid],
    amenities: &[Amenity],
    config: &ScoringConfig,
) -> Vec<ScoreResult> {
    score_centroids_with_progress(centroids, amenities, config, ProgressBar::hidden())
}

/// Scores every centroid against the shared amenity slice, ticking `pb` once
/// per centroid. Output order always follows `centroids`.
pub fn score_centroids_with_progress(
    centroids: &[Centroid],
    amenities: &[Amenity],
    config: &ScoringConfig,
    pb: ProgressBar,
) -> Vec<ScoreResult> {
    pb.set_length(centroids.len() as u64);

    let results: Vec<_> = match config.execution {
        Execution::Sequential => centroids
            .iter()
            .progress_with(pb.clone())
            .map(|x| score_centroid(x, amenities, config))
            .collect(),
        Execution::Parallel => centroids
            .par_iter()
            .progress_with(pb.clone())
            .map(|x| score_centroid(x, amenities, config))
            .collect(),
    };

    pb.finish_and_clear();
    results
}
